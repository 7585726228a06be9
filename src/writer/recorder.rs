//! Paint-event recorder.
//!
//! A [`Writer`] that keeps every call instead of drawing. Useful for
//! checking layout, and for rebuilding the module pattern from what a
//! render pass painted.

use super::{Backend, Writer};
use crate::error::Result;
use crate::symbology::ModuleSequence;
use crate::writer::options::WriterOptions;

/// One call made by a render pass.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintEvent {
    Initialize { lines: usize, modules_per_line: usize },
    Module { x: f64, y: f64, width: f64, color: String },
    Text { x: f64, y: f64, text: String },
    Finish,
}

/// Records paint calls; [`Writer::finish`] returns them in order.
#[derive(Debug, Clone)]
pub struct Recorder {
    options: WriterOptions,
    events: Vec<PaintEvent>,
}

impl Recorder {
    pub fn new(options: WriterOptions) -> Self {
        Self {
            options,
            events: Vec::new(),
        }
    }
}

impl Writer for Recorder {
    type Output = Vec<PaintEvent>;

    const BACKEND: Backend = Backend::Vector;

    fn options(&self) -> &WriterOptions {
        &self.options
    }

    fn initialize(&mut self, sequence: &ModuleSequence) -> Result<()> {
        self.events.push(PaintEvent::Initialize {
            lines: sequence.len(),
            modules_per_line: sequence.modules_per_line(),
        });
        Ok(())
    }

    fn paint_module(&mut self, x: f64, y: f64, width: f64, color: &str) {
        self.events.push(PaintEvent::Module {
            x,
            y,
            width,
            color: color.to_string(),
        });
    }

    fn paint_text(&mut self, x: f64, y: f64) {
        let text = self.options.display_text().unwrap_or_default().to_string();
        self.events.push(PaintEvent::Text { x, y, text });
    }

    fn finish(mut self) -> Result<Self::Output> {
        self.events.push(PaintEvent::Finish);
        Ok(self.events)
    }
}

/// Rebuild module rows from recorded events.
///
/// Every module event expands to `width / module_width` modules, bar when
/// painted in the foreground color. Right quiet zones of inner lines are
/// skipped.
pub fn reconstruct(events: &[PaintEvent], options: &WriterOptions) -> ModuleSequence {
    let body_end = events.iter().find_map(|e| match e {
        PaintEvent::Initialize { modules_per_line, .. } => {
            Some(options.quiet_zone + *modules_per_line as f64 * options.module_width)
        }
        _ => None,
    });
    let body_end = body_end.unwrap_or(f64::INFINITY);
    let epsilon = options.module_width / 2.0;

    let mut lines: Vec<Vec<bool>> = Vec::new();
    let mut current_y = None;
    for event in events {
        let PaintEvent::Module { x, y, width, color } = event else {
            continue;
        };
        if *x >= body_end - epsilon {
            continue;
        }
        if current_y != Some(*y) {
            lines.push(Vec::new());
            current_y = Some(*y);
        }
        let count = (width / options.module_width).round() as usize;
        let bar = *color == options.foreground;
        if let Some(line) = lines.last_mut() {
            line.extend(std::iter::repeat_n(bar, count));
        }
    }

    let rows: Vec<String> = lines
        .iter()
        .map(|line| line.iter().map(|&b| if b { '1' } else { '0' }).collect())
        .collect();
    ModuleSequence::from_bit_strings(&rows).unwrap_or_default()
}

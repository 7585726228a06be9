//! # Writers
//!
//! A render pass turns a [`ModuleSequence`] into paint calls on a
//! [`Writer`] backend:
//!
//! ```text
//! initialize(sequence)
//! paint_module(x, y, width, color)   one per bar/space run, per line
//! paint_text(x, y)                   once, if there is text
//! finish() -> artifact
//! ```
//!
//! All coordinates are in mm. Backends convert to their own units.
//!
//! ## Vertical Layout
//!
//! ```text
//!  1 mm              padding
//!  module_height     per line of modules
//!  text_distance
//!  pt_to_mm(font)    per text line, lines separated by text_line_distance
//!  1 mm              padding
//! ```
//!
//! ## Backends
//!
//! | Backend | Writer | Formats |
//! |---------|--------|---------|
//! | Vector | [`svg::SvgWriter`] | SVG, SVGZ |
//! | Raster | `raster::ImageWriter` (feature `raster`) | PNG, BMP, GIF, JPEG, PCX, TIFF, XBM |
//! | (test) | [`recorder::Recorder`] | paint events |

pub mod color;
pub mod legacy;
pub mod options;
#[cfg(feature = "raster")]
pub mod raster;
pub mod recorder;
pub mod svg;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::debug;

use crate::error::{BarlineError, Result};
use crate::symbology::ModuleSequence;
use options::{COMMON_KEYS, WriterOptions};

/// Padding above the bars and below the text, in mm.
pub const VERTICAL_PADDING: f64 = 1.0;

/// Millimeters to device pixels.
pub fn mm_to_px(mm: f64, dpi: f64) -> f64 {
    mm * dpi / 25.4
}

/// Typographic points to millimeters.
pub fn pt_to_mm(pt: f64) -> f64 {
    pt * 0.352777778
}

/// Output backend kind, used for option recognition and DPI defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Vector,
    Raster,
}

impl Backend {
    pub fn name(self) -> &'static str {
        match self {
            Self::Vector => "vector",
            Self::Raster => "raster",
        }
    }

    /// Whether an option key is meaningful for this backend.
    pub fn recognises(self, key: &str) -> bool {
        match key {
            "compress" => self == Self::Vector,
            "dpi" => self == Self::Raster,
            _ => COMMON_KEYS.contains(&key),
        }
    }

    /// Vector output works in mm (1 unit = 1 mm); raster defaults to 300 dpi.
    pub fn default_dpi(self) -> f64 {
        match self {
            Self::Vector => 25.4,
            Self::Raster => 300.0,
        }
    }
}

/// A render target.
pub trait Writer {
    /// What [`Writer::finish`] produces.
    type Output;

    const BACKEND: Backend;

    /// Options for this pass (already merged and validated).
    fn options(&self) -> &WriterOptions;

    fn initialize(&mut self, sequence: &ModuleSequence) -> Result<()>;

    /// Paint a `width` x `module_height` rectangle at `(x, y)`.
    fn paint_module(&mut self, x: f64, y: f64, width: f64, color: &str);

    /// Paint the option text; `(x, y)` is the anchor of the first line's
    /// baseline (center or start, per `center_text`).
    fn paint_text(&mut self, x: f64, y: f64);

    fn finish(self) -> Result<Self::Output>;
}

/// Run-length tokens for one line: positive = bar run, negative = space run.
///
/// ```
/// use barline::writer::pack_line;
///
/// // 11010111
/// let line = [true, true, false, true, false, true, true, true];
/// assert_eq!(pack_line(&line), vec![2, -1, 1, -1, 3]);
/// ```
pub fn pack_line(line: &[bool]) -> Vec<i32> {
    let mut tokens = Vec::new();
    let mut iter = line.iter().peekable();
    while let Some(&bar) = iter.next() {
        let mut run = 1;
        while iter.next_if(|&&next| next == bar).is_some() {
            run += 1;
        }
        tokens.push(if bar { run } else { -run });
    }
    tokens
}

/// Expand run-length tokens back into modules.
pub fn unpack_tokens(tokens: &[i32]) -> Vec<bool> {
    tokens
        .iter()
        .flat_map(|&t| std::iter::repeat_n(t > 0, t.unsigned_abs() as usize))
        .collect()
}

/// Canvas size in mm for `modules_per_line` x `lines` modules.
pub fn canvas_mm(options: &WriterOptions, modules_per_line: usize, lines: usize) -> (f64, f64) {
    let width = 2.0 * options.quiet_zone + modules_per_line as f64 * options.module_width;
    let mut height = 2.0 * VERTICAL_PADDING + lines as f64 * options.module_height;
    let text_lines = options.text_lines();
    if text_lines > 0 {
        height += options.text_distance
            + text_lines as f64 * pt_to_mm(options.font_size)
            + (text_lines - 1) as f64 * options.text_line_distance;
    }
    (width, height)
}

/// Canvas size in pixels at `dpi`, rounded to the nearest pixel.
///
/// ```
/// use barline::writer::calculate_size;
/// use barline::writer::options::WriterOptions;
///
/// let options = WriterOptions { write_text: false, ..WriterOptions::default() };
/// // 2 * 6.5 + 95 * 0.2 = 32 mm
/// assert_eq!(calculate_size(&options, 95, 1, 300.0).0, 378);
/// ```
pub fn calculate_size(options: &WriterOptions, modules_per_line: usize, lines: usize, dpi: f64) -> (u32, u32) {
    let (width, height) = canvas_mm(options, modules_per_line, lines);
    (mm_to_px(width, dpi).round() as u32, mm_to_px(height, dpi).round() as u32)
}

/// Drive one render pass of `sequence` through `writer`.
pub fn render<W: Writer>(mut writer: W, sequence: &ModuleSequence) -> Result<W::Output> {
    writer.initialize(sequence)?;

    let options = writer.options().clone();
    debug!(
        "render: {} line(s) x {} modules, {:?} backend",
        sequence.len(),
        sequence.modules_per_line(),
        W::BACKEND
    );

    let mut y = VERTICAL_PADDING;
    let mut body = (options.quiet_zone, options.quiet_zone);
    for (i, line) in sequence.lines().iter().enumerate() {
        let start = options.quiet_zone;
        let mut x = start;
        for token in pack_line(line) {
            let color = if token > 0 { &options.foreground } else { &options.background };
            let width = options.module_width * f64::from(token.unsigned_abs());
            writer.paint_module(x, y, width, color);
            x += width;
        }
        body = (start, x);
        if i + 1 != sequence.len() {
            writer.paint_module(x, y, options.quiet_zone, &options.background);
        }
        y += options.module_height;
    }

    if options.text_lines() > 0 {
        let (start, end) = body;
        let x = if options.center_text { start + (end - start) / 2.0 } else { start };
        y += options.text_distance + pt_to_mm(options.font_size);
        writer.paint_text(x, y);
    }

    writer.finish()
}

/// Raster image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Png,
    Bmp,
    Gif,
    Jpeg,
    Pcx,
    Tiff,
    Xbm,
}

impl RasterFormat {
    pub const ALL: [RasterFormat; 7] = [
        Self::Png,
        Self::Bmp,
        Self::Gif,
        Self::Jpeg,
        Self::Pcx,
        Self::Tiff,
        Self::Xbm,
    ];

    /// Lowercase file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Bmp => "bmp",
            Self::Gif => "gif",
            Self::Jpeg => "jpeg",
            Self::Pcx => "pcx",
            Self::Tiff => "tiff",
            Self::Xbm => "xbm",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        let format = match name.to_lowercase().as_str() {
            "png" => Self::Png,
            "bmp" => Self::Bmp,
            "gif" => Self::Gif,
            "jpeg" | "jpg" => Self::Jpeg,
            "pcx" => Self::Pcx,
            "tiff" | "tif" => Self::Tiff,
            "xbm" => Self::Xbm,
            _ => return None,
        };
        Some(format)
    }
}

/// Requested output: vector markup or a raster image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Raster(RasterFormat),
}

impl OutputFormat {
    pub fn backend(self) -> Backend {
        match self {
            Self::Svg => Backend::Vector,
            Self::Raster(_) => Backend::Raster,
        }
    }

    /// Whether raster output was compiled in.
    pub fn raster_available() -> bool {
        cfg!(feature = "raster")
    }
}

impl FromStr for OutputFormat {
    type Err = BarlineError;

    /// Parse a format name. Raster names fail with
    /// [`BarlineError::BackendUnavailable`] when the `raster` feature is off.
    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("svg") {
            return Ok(Self::Svg);
        }
        match RasterFormat::from_name(s) {
            Some(format) if Self::raster_available() => Ok(Self::Raster(format)),
            Some(format) => Err(BarlineError::BackendUnavailable(format!(
                "{} output needs the 'raster' feature",
                format.extension().to_uppercase()
            ))),
            None => Err(BarlineError::InvalidOption {
                key: "file_type".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Svg => f.write_str("SVG"),
            Self::Raster(format) => f.write_str(&format.extension().to_uppercase()),
        }
    }
}

/// A finished render, owned by the caller.
#[derive(Debug, Clone)]
pub enum Artifact {
    Svg(svg::SvgDocument),
    #[cfg(feature = "raster")]
    Raster(raster::RasterImage),
}

impl Artifact {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Svg(doc) => doc.extension(),
            #[cfg(feature = "raster")]
            Self::Raster(image) => image.format().extension(),
        }
    }

    /// Encoded file contents.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Self::Svg(doc) => Ok(doc.as_bytes().to_vec()),
            #[cfg(feature = "raster")]
            Self::Raster(image) => image.encode(),
        }
    }

    /// Write to `<stem>.<extension>` and return the path.
    pub fn save(&self, stem: &Path) -> Result<PathBuf> {
        match self {
            Self::Svg(doc) => doc.save(stem),
            #[cfg(feature = "raster")]
            Self::Raster(image) => image.save(stem),
        }
    }
}

/// `<stem>.<extension>`, keeping any dots already in the stem.
pub(crate) fn path_with_extension(stem: &Path, extension: &str) -> PathBuf {
    let mut path = stem.as_os_str().to_owned();
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::recorder::{PaintEvent, Recorder};
    use super::*;
    use pretty_assertions::assert_eq;

    fn no_text() -> WriterOptions {
        WriterOptions {
            write_text: false,
            ..WriterOptions::default()
        }
    }

    #[test]
    fn test_unit_conversions() {
        assert_eq!(mm_to_px(25.4, 300.0), 300.0);
        assert!((pt_to_mm(10.0) - 3.52777778).abs() < 1e-9);
    }

    #[test]
    fn test_pack_round_trip() {
        let line: Vec<bool> = "1101011100010".chars().map(|c| c == '1').collect();
        let tokens = pack_line(&line);
        assert_eq!(tokens, vec![2, -1, 1, -1, 3, -3, 1, -1]);
        assert_eq!(unpack_tokens(&tokens), line);
        assert!(pack_line(&[]).is_empty());
    }

    #[test]
    fn test_calculate_size_without_text() {
        // round(mm_to_px(2 * 6.5 + 95 * 0.2, 300))
        let (w, h) = calculate_size(&no_text(), 95, 1, 300.0);
        assert_eq!(w, (mm_to_px(32.0, 300.0)).round() as u32);
        assert_eq!(w, 378);
        // 1 + 15 + 1 mm
        assert_eq!(h, mm_to_px(17.0, 300.0).round() as u32);
    }

    #[test]
    fn test_canvas_with_text() {
        let options = WriterOptions::default().with_human_text("one\ntwo");
        let (_, h) = canvas_mm(&options, 95, 1);
        let expected = 2.0 + 15.0 + 5.0 + 2.0 * pt_to_mm(10.0) + 1.0;
        assert!((h - expected).abs() < 1e-9);
    }

    #[test]
    fn test_render_paint_order() {
        let seq = ModuleSequence::from_bit_strings(&["1101"]).unwrap();
        let options = WriterOptions::default().with_human_text("X");
        let events = render(Recorder::new(options), &seq).unwrap();

        assert_eq!(events[0], PaintEvent::Initialize { lines: 1, modules_per_line: 4 });
        let modules: Vec<(f64, f64, String)> = events
            .iter()
            .filter_map(|e| match e {
                PaintEvent::Module { x, width, color, .. } => Some((*x, *width, color.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(modules.len(), 3);
        assert_eq!(modules[0], (6.5, 0.4, "black".to_string()));
        assert_eq!(modules[1].2, "white");
        assert!((modules[2].0 - 7.1).abs() < 1e-9);

        match &events[4] {
            PaintEvent::Text { x, y, text } => {
                // Centered on the 0.8 mm body
                assert!((x - 6.9).abs() < 1e-9);
                assert!((y - (1.0 + 15.0 + 5.0 + pt_to_mm(10.0))).abs() < 1e-9);
                assert_eq!(text, "X");
            }
            other => panic!("expected text, got {:?}", other),
        }
        assert_eq!(events[5], PaintEvent::Finish);
    }

    #[test]
    fn test_render_left_aligned_text() {
        let seq = ModuleSequence::from_bit_strings(&["1111"]).unwrap();
        let options = WriterOptions {
            center_text: false,
            ..WriterOptions::default()
        }
        .with_human_text("X");
        let events = render(Recorder::new(options), &seq).unwrap();
        assert!(events.iter().any(|e| matches!(e, PaintEvent::Text { x, .. } if *x == 6.5)));
    }

    #[test]
    fn test_multi_line_right_quiet_zone() {
        let seq = ModuleSequence::from_bit_strings(&["10", "01"]).unwrap();
        let events = render(Recorder::new(no_text()), &seq).unwrap();
        let modules: Vec<&PaintEvent> = events.iter().filter(|e| matches!(e, PaintEvent::Module { .. })).collect();
        // 2 runs + quiet zone on the first line, 2 runs on the last
        assert_eq!(modules.len(), 5);
        assert!(matches!(modules[2], PaintEvent::Module { width, .. } if *width == 6.5));
        assert!(matches!(modules[3], PaintEvent::Module { y, .. } if *y == 16.0));
        assert!(!events.iter().any(|e| matches!(e, PaintEvent::Text { .. })));
    }

    #[test]
    fn test_backend_keys() {
        assert!(Backend::Vector.recognises("compress"));
        assert!(!Backend::Raster.recognises("compress"));
        assert!(Backend::Raster.recognises("dpi"));
        assert!(Backend::Raster.recognises("module_width"));
        assert!(!Backend::Vector.recognises("bogus"));
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("svg".parse::<OutputFormat>().unwrap(), OutputFormat::Svg);
        assert_eq!("SVG".parse::<OutputFormat>().unwrap().backend(), Backend::Vector);
        assert!(matches!("webp".parse::<OutputFormat>(), Err(BarlineError::InvalidOption { .. })));
        if OutputFormat::raster_available() {
            assert_eq!("PNG".parse::<OutputFormat>().unwrap(), OutputFormat::Raster(RasterFormat::Png));
            assert_eq!("jpg".parse::<OutputFormat>().unwrap(), OutputFormat::Raster(RasterFormat::Jpeg));
        } else {
            assert!(matches!("png".parse::<OutputFormat>(), Err(BarlineError::BackendUnavailable(_))));
        }
    }

    #[test]
    fn test_path_with_extension() {
        assert_eq!(path_with_extension(Path::new("out/code.v1"), "svg"), PathBuf::from("out/code.v1.svg"));
    }
}

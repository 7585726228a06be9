//! # SVG Writer
//!
//! Vector backend. One unit is one millimeter (dpi 25.4), sizes are written
//! with three decimals.
//!
//! ## Document Structure
//!
//! ```text
//! <?xml ...?>
//! <!DOCTYPE svg ...>
//! <svg width="..mm" height="..mm">
//!     <!--generator comment-->
//!     <g id="barcode_group">
//!         <rect width="100%" height="100%" .../>   background
//!         <rect x=.. y=.. width=.. height=.. .../> one per module run
//!         <text ...>line</text>                    one per text line
//!     </g>
//! </svg>
//! ```
//!
//! Pretty output indents with four spaces. Compact output has no
//! whitespace between elements; with `compress` it is gzipped (`.svgz`).

use std::fmt::Write as FmtWrite;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use log::{debug, info};

use super::{Backend, Writer, canvas_mm, path_with_extension, pt_to_mm};
use crate::error::{BarlineError, Result};
use crate::symbology::ModuleSequence;
use crate::writer::options::WriterOptions;

const DOCTYPE: &str =
    r#"<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">"#;

const INDENT: &str = "    ";
const INDENT2: &str = "        ";

fn size(mm: f64) -> String {
    format!("{:.3}mm", mm)
}

/// Escape text for use in element content and attribute values.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Writes barcodes as SVG.
#[derive(Debug, Clone)]
pub struct SvgWriter {
    options: WriterOptions,
    compact: bool,
    width: f64,
    height: f64,
    /// Children of `barcode_group`, one element per entry
    elements: Vec<String>,
}

impl SvgWriter {
    pub fn new(options: WriterOptions) -> Self {
        let compact = options.compress;
        Self {
            options,
            compact,
            width: 0.0,
            height: 0.0,
            elements: Vec::new(),
        }
    }

    /// Emit compact markup even without compression.
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact || self.options.compress;
        self
    }

    fn serialize(&self) -> std::result::Result<String, std::fmt::Error> {
        let (nl, i1, i2) = if self.compact { ("", "", "") } else { ("\n", INDENT, INDENT2) };
        let mut svg = String::new();
        write!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>{}"#, nl)?;
        write!(svg, "{}{}", DOCTYPE, nl)?;
        write!(
            svg,
            r#"<svg version="1.1" xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">{}"#,
            size(self.width),
            size(self.height),
            nl
        )?;
        write!(
            svg,
            "{}<!--Autogenerated with barline {}-->{}",
            i1,
            env!("CARGO_PKG_VERSION"),
            nl
        )?;
        write!(svg, r#"{}<g id="barcode_group">{}"#, i1, nl)?;
        for element in &self.elements {
            write!(svg, "{}{}{}", i2, element, nl)?;
        }
        write!(svg, "{}</g>{}", i1, nl)?;
        write!(svg, "</svg>{}", nl)?;
        Ok(svg)
    }
}

impl Writer for SvgWriter {
    type Output = SvgDocument;

    const BACKEND: Backend = Backend::Vector;

    fn options(&self) -> &WriterOptions {
        &self.options
    }

    fn initialize(&mut self, sequence: &ModuleSequence) -> Result<()> {
        let (width, height) = canvas_mm(&self.options, sequence.modules_per_line(), sequence.len());
        self.width = width;
        self.height = height;
        self.elements.clear();
        self.elements.push(format!(
            r#"<rect width="100%" height="100%" style="fill:{}"/>"#,
            escape(&self.options.background)
        ));
        Ok(())
    }

    fn paint_module(&mut self, x: f64, y: f64, width: f64, color: &str) {
        self.elements.push(format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" style="fill:{};"/>"#,
            size(x),
            size(y),
            size(width),
            size(self.options.module_height),
            escape(color)
        ));
    }

    fn paint_text(&mut self, x: f64, y: f64) {
        let Some(text) = self.options.display_text() else {
            return;
        };
        let anchor = if self.options.center_text { "middle" } else { "start" };
        let step = pt_to_mm(self.options.font_size) + self.options.text_line_distance;
        let mut y = y;
        let mut elements = Vec::new();
        for line in text.split('\n') {
            elements.push(format!(
                r#"<text x="{}" y="{}" style="fill:{};font-size:{}pt;text-anchor:{};">{}</text>"#,
                size(x),
                size(y),
                escape(&self.options.foreground),
                self.options.font_size,
                anchor,
                escape(line)
            ));
            y += step;
        }
        self.elements.extend(elements);
    }

    fn finish(self) -> Result<SvgDocument> {
        let markup = self
            .serialize()
            .map_err(|e| BarlineError::Image(format!("Failed to write SVG: {}", e)))?;

        let document = if self.options.compress {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(markup.as_bytes())?;
            SvgDocument {
                bytes: encoder.finish()?,
                compressed: true,
            }
        } else {
            SvgDocument {
                bytes: markup.into_bytes(),
                compressed: false,
            }
        };
        debug!(
            "svg: {} elements, {} bytes{}",
            self.elements.len(),
            document.bytes.len(),
            if document.compressed { " (gzip)" } else { "" }
        );
        Ok(document)
    }
}

/// SVG output, possibly gzip-compressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgDocument {
    bytes: Vec<u8>,
    compressed: bool,
}

impl SvgDocument {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// `svgz` when compressed, `svg` otherwise.
    pub fn extension(&self) -> &'static str {
        if self.compressed { "svgz" } else { "svg" }
    }

    /// Write to `<stem>.svg` / `<stem>.svgz`.
    pub fn save(&self, stem: &Path) -> Result<PathBuf> {
        let path = path_with_extension(stem, self.extension());
        std::fs::write(&path, &self.bytes)?;
        info!("Wrote {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::render;
    use flate2::read::GzDecoder;
    use pretty_assertions::assert_eq;
    use std::io::Read;

    fn render_svg(bits: &str, options: WriterOptions) -> SvgDocument {
        let seq = ModuleSequence::from_bit_strings(&[bits]).unwrap();
        render(SvgWriter::new(options), &seq).unwrap()
    }

    fn text_of(doc: &SvgDocument) -> String {
        String::from_utf8(doc.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn test_pretty_document() {
        let options = WriterOptions {
            write_text: false,
            ..WriterOptions::default()
        };
        let svg = text_of(&render_svg("1101", options));
        let expected = [
            r#"<?xml version="1.0" encoding="UTF-8"?>"#.to_string(),
            DOCTYPE.to_string(),
            r#"<svg version="1.1" xmlns="http://www.w3.org/2000/svg" width="13.800mm" height="17.000mm">"#.to_string(),
            format!("    <!--Autogenerated with barline {}-->", env!("CARGO_PKG_VERSION")),
            r#"    <g id="barcode_group">"#.to_string(),
            r#"        <rect width="100%" height="100%" style="fill:white"/>"#.to_string(),
            r#"        <rect x="6.500mm" y="1.000mm" width="0.400mm" height="15.000mm" style="fill:black;"/>"#.to_string(),
            r#"        <rect x="6.900mm" y="1.000mm" width="0.200mm" height="15.000mm" style="fill:white;"/>"#.to_string(),
            r#"        <rect x="7.100mm" y="1.000mm" width="0.200mm" height="15.000mm" style="fill:black;"/>"#.to_string(),
            "    </g>".to_string(),
            "</svg>".to_string(),
            String::new(),
        ]
        .join("\n");
        assert_eq!(svg, expected);
    }

    #[test]
    fn test_text_lines() {
        let options = WriterOptions {
            text: "A & B\nsecond".to_string(),
            ..WriterOptions::default()
        };
        let svg = text_of(&render_svg("11", options));
        assert!(svg.contains(r#"style="fill:black;font-size:10pt;text-anchor:middle;">A &amp; B</text>"#));
        assert!(svg.contains(">second</text>"));
        assert_eq!(svg.matches("<text ").count(), 2);
    }

    #[test]
    fn test_left_aligned_text() {
        let options = WriterOptions {
            center_text: false,
            ..WriterOptions::default()
        }
        .with_human_text("left");
        let svg = text_of(&render_svg("11", options));
        assert!(svg.contains(r#"<text x="6.500mm""#));
        assert!(svg.contains("text-anchor:start;"));
    }

    #[test]
    fn test_compact_has_no_newlines() {
        let seq = ModuleSequence::from_bit_strings(&["1010"]).unwrap();
        let doc = render(SvgWriter::new(WriterOptions::default()).with_compact(true), &seq).unwrap();
        let svg = text_of(&doc);
        assert!(!svg.contains('\n'));
        assert!(svg.contains(r#"<g id="barcode_group"><rect width="100%""#));
        assert_eq!(doc.extension(), "svg");
    }

    #[test]
    fn test_compressed_round_trip() {
        let compressed = render_svg(
            "10101",
            WriterOptions {
                compress: true,
                ..WriterOptions::default()
            },
        );
        assert!(compressed.is_compressed());
        assert_eq!(compressed.extension(), "svgz");
        assert_eq!(&compressed.as_bytes()[..2], &[0x1f, 0x8b]);

        let mut decoded = String::new();
        GzDecoder::new(compressed.as_bytes()).read_to_string(&mut decoded).unwrap();
        let seq = ModuleSequence::from_bit_strings(&["10101"]).unwrap();
        let compact = render(SvgWriter::new(WriterOptions::default()).with_compact(true), &seq).unwrap();
        assert_eq!(decoded, text_of(&compact));
    }

    #[test]
    fn test_compressed_is_deterministic() {
        let options = WriterOptions {
            compress: true,
            ..WriterOptions::default()
        };
        assert_eq!(render_svg("1100101", options.clone()), render_svg("1100101", options));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&apos;");
    }
}

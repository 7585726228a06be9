//! # Barline - 1D Barcode Generation
//!
//! Barline encodes text into standard linear barcodes and renders them as
//! SVG or raster images. It provides:
//!
//! - **Symbologies**: EAN-8/13/14, JAN, UPC-A, ISBN-10/13, ISSN, Code 39,
//!   PZN, Code 128, GS1-128, Interleaved 2 of 5
//! - **Check digits**: computed, or verified when supplied
//! - **Writers**: SVG (optionally gzipped) and raster (PNG, BMP, GIF, JPEG,
//!   PCX, TIFF, XBM)
//!
//! ## Quick Start
//!
//! ```
//! use barline::writer::OutputFormat;
//! use barline::writer::options::OptionOverrides;
//!
//! let barcode = barline::get("ean13", "590123412345")?;
//! assert_eq!(barcode.full_code(), "5901234123457");
//!
//! let artifact = barline::render_barcode(barcode.as_ref(), OutputFormat::Svg, &OptionOverrides::new())?;
//! let svg = String::from_utf8(artifact.to_bytes()?).unwrap();
//! assert!(svg.contains("barcode_group"));
//!
//! # Ok::<(), barline::error::BarlineError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`symbology`] | Encoders, check digits, encoding tables, name registry |
//! | [`writer`] | Render pass, options, SVG and raster backends |
//! | [`error`] | Error types |
//!
//! ## Pipeline
//!
//! ```text
//! name + text --> Symbology::build --> Barcode::encode --> ModuleSequence
//!                                                               |
//!           WriterOptions (defaults < symbology preset < overrides)
//!                                                               v
//!                                  writer::render(Writer) --> Artifact
//! ```

pub mod error;
pub mod symbology;
pub mod writer;

use std::path::{Path, PathBuf};

use log::debug;

pub use error::{BarlineError, Result, ValidationError, ValidationKind};
pub use symbology::{Barcode, ModuleSequence, PROVIDED_BARCODES, Symbology};
pub use writer::options::{OptionOverrides, WriterOptions};
pub use writer::{Artifact, OutputFormat};

/// Build the barcode registered as `name` (case-insensitive) for `code`.
///
/// ```
/// let err = barline::get("notabarcode", "123").unwrap_err();
/// assert!(matches!(err, barline::BarlineError::UnknownSymbology(_)));
/// ```
pub fn get(name: &str, code: &str) -> Result<Box<dyn Barcode>> {
    let symbology = symbology::by_name(name).ok_or_else(|| BarlineError::UnknownSymbology(name.to_string()))?;
    debug!("'{}' resolved to {:?}", name, symbology);
    Ok(symbology.build(code)?)
}

/// The writer options `barcode` renders with for `backend`.
pub fn resolve_options(
    barcode: &dyn Barcode,
    backend: writer::Backend,
    overrides: &OptionOverrides,
) -> Result<WriterOptions> {
    Ok(barcode
        .writer_defaults()
        .merged(overrides, backend)?
        .with_human_text(&barcode.full_code()))
}

/// Render `barcode` in `format`.
pub fn render_barcode(barcode: &dyn Barcode, format: OutputFormat, overrides: &OptionOverrides) -> Result<Artifact> {
    let options = resolve_options(barcode, format.backend(), overrides)?;
    let sequence = barcode.encode();
    match format {
        OutputFormat::Svg => {
            let document = writer::render(writer::svg::SvgWriter::new(options), &sequence)?;
            Ok(Artifact::Svg(document))
        }
        #[cfg(feature = "raster")]
        OutputFormat::Raster(raster_format) => {
            let image = writer::render(writer::raster::ImageWriter::new(options, raster_format)?, &sequence)?;
            Ok(Artifact::Raster(image))
        }
        #[cfg(not(feature = "raster"))]
        OutputFormat::Raster(raster_format) => Err(BarlineError::BackendUnavailable(format!(
            "{} output needs the 'raster' feature",
            raster_format.extension().to_uppercase()
        ))),
    }
}

/// Build, render and save in one step. Returns the written path
/// (`stem` plus the format's extension).
pub fn generate(
    name: &str,
    code: &str,
    format: OutputFormat,
    overrides: &OptionOverrides,
    stem: &Path,
) -> Result<PathBuf> {
    let barcode = get(name, code)?;
    let artifact = render_barcode(barcode.as_ref(), format, overrides)?;
    artifact.save(stem)
}

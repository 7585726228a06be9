//! # Symbologies
//!
//! Encoders that turn validated input text into a [`ModuleSequence`]. Each
//! symbology lives in its own module with a struct implementing the
//! [`Barcode`] trait; [`Symbology`] is the static registry that maps names
//! to constructors.
//!
//! ## Adding a New Symbology
//!
//! 1. Create `src/symbology/mycode.rs` with a struct implementing [`Barcode`]
//! 2. Add `pub mod mycode;` below
//! 3. Add a [`Symbology`] variant and its registry names to [`PROVIDED_BARCODES`]
//!    and [`Symbology::from_name`]
//!
//! ## Example
//!
//! ```
//! use barline::symbology::{Barcode, Symbology};
//!
//! let ean = Symbology::from_name("EAN13").unwrap().build("400638133393").unwrap();
//! assert_eq!(ean.full_code(), "4006381333931");
//! assert_eq!(ean.encode().modules_per_line(), 95);
//! ```

pub mod checksum;
pub mod code128;
pub mod code39;
pub mod ean;
pub mod isxn;
pub mod itf;
pub mod tables;
pub mod upc;

use std::fmt;

use crate::error::{ValidationError, ValidationKind};
use crate::writer::options::WriterOptions;

/// All registry names, sorted.
pub const PROVIDED_BARCODES: &[&str] = &[
    "code128", "code39", "ean", "ean13", "ean14", "ean8", "gs1", "gs1_128", "gtin", "isbn",
    "isbn10", "isbn13", "issn", "itf", "jan", "pzn", "upc", "upca",
];

/// An encoded barcode.
///
/// Instances are immutable: validation and check digit computation happen
/// in the constructor, so an existing value always encodes.
pub trait Barcode: fmt::Debug + Send + Sync {
    /// Symbology name for humans (e.g. "EAN-13").
    fn name(&self) -> &'static str;

    /// Number of data digits the symbology expects, 0 if variable.
    fn digits(&self) -> usize {
        0
    }

    /// The human-readable code including computed check characters.
    fn full_code(&self) -> String;

    /// Bars and spaces for this code.
    fn encode(&self) -> ModuleSequence;

    /// Writer options this symbology is specified for.
    ///
    /// Callers layer their own overrides on top.
    fn writer_defaults(&self) -> WriterOptions {
        WriterOptions::default()
    }

    /// Text rendering of the modules: `X` for bars, space for spaces.
    fn to_ascii(&self) -> String {
        self.encode()
            .lines()
            .iter()
            .map(|line| line.iter().map(|&bar| if bar { 'X' } else { ' ' }).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Ordered rows of modules, `true` = bar.
///
/// Every symbology here produces a single row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModuleSequence {
    lines: Vec<Vec<bool>>,
}

impl ModuleSequence {
    /// A sequence with one row.
    pub fn single(line: Vec<bool>) -> Self {
        Self { lines: vec![line] }
    }

    /// Build from rows of `'1'`/`'0'` characters.
    ///
    /// Returns `None` if a row contains any other character.
    pub fn from_bit_strings<S: AsRef<str>>(rows: &[S]) -> Option<Self> {
        let mut lines = Vec::with_capacity(rows.len());
        for row in rows {
            let mut line = Vec::with_capacity(row.as_ref().len());
            for c in row.as_ref().chars() {
                match c {
                    '1' => line.push(true),
                    '0' => line.push(false),
                    _ => return None,
                }
            }
            lines.push(line);
        }
        Some(Self { lines })
    }

    pub fn lines(&self) -> &[Vec<bool>] {
        &self.lines
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Width of the widest row in modules.
    pub fn modules_per_line(&self) -> usize {
        self.lines.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Rows as `'1'`/`'0'` strings.
    pub fn to_bit_strings(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| line.iter().map(|&bar| if bar { '1' } else { '0' }).collect())
            .collect()
    }
}

impl fmt::Display for ModuleSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bit_strings().join("\n"))
    }
}

/// Supported symbologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbology {
    Ean8,
    Ean13,
    Ean14,
    Jan,
    UpcA,
    Isbn13,
    Isbn10,
    Issn,
    Code39,
    Pzn,
    Code128,
    Gs1_128,
    Itf,
}

impl Symbology {
    /// Look up a registry name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let symbology = match name.to_lowercase().as_str() {
            "ean8" => Self::Ean8,
            "ean13" | "ean" => Self::Ean13,
            "ean14" | "gtin" => Self::Ean14,
            "jan" => Self::Jan,
            "upc" | "upca" => Self::UpcA,
            "isbn" | "isbn13" | "gs1" => Self::Isbn13,
            "isbn10" => Self::Isbn10,
            "issn" => Self::Issn,
            "code39" => Self::Code39,
            "pzn" => Self::Pzn,
            "code128" => Self::Code128,
            "gs1_128" => Self::Gs1_128,
            "itf" => Self::Itf,
            _ => return None,
        };
        Some(symbology)
    }

    /// Validate `code` and build the barcode with default settings.
    pub fn build(self, code: &str) -> Result<Box<dyn Barcode>, ValidationError> {
        Ok(match self {
            Self::Ean8 => Box::new(ean::Ean8::new(code)?),
            Self::Ean13 => Box::new(ean::Ean13::new(code)?),
            Self::Ean14 => Box::new(ean::Ean14::new(code)?),
            Self::Jan => Box::new(ean::Jan::new(code)?),
            Self::UpcA => Box::new(upc::UpcA::new(code)?),
            Self::Isbn13 => Box::new(isxn::Isbn13::new(code)?),
            Self::Isbn10 => Box::new(isxn::Isbn10::new(code)?),
            Self::Issn => Box::new(isxn::Issn::new(code)?),
            Self::Code39 => Box::new(code39::Code39::new(code)?),
            Self::Pzn => Box::new(code39::Pzn::new(code)?),
            Self::Code128 => Box::new(code128::Code128::new(code)?),
            Self::Gs1_128 => Box::new(code128::Gs1_128::new(code)?),
            Self::Itf => Box::new(itf::Itf::new(code)?),
        })
    }
}

/// Get a symbology by name.
pub fn by_name(name: &str) -> Option<Symbology> {
    Symbology::from_name(name)
}

/// Validate a fixed-length numeric code and complete it with its check
/// character.
///
/// Accepts exactly `digits` characters (the check character is computed)
/// or `digits + 1` (the last one is a supplied check character and must
/// match). `allow_x` permits `X` as the supplied check character.
pub(crate) fn complete_digits(
    symbology: &'static str,
    input: &str,
    digits: usize,
    allow_x: bool,
    check: impl Fn(&str) -> char,
) -> Result<String, ValidationError> {
    if input.is_empty() {
        return Err(ValidationError::new(symbology, ValidationKind::Empty, "nothing to encode"));
    }

    let len = input.chars().count();
    for (i, c) in input.chars().enumerate() {
        let check_position = allow_x && len == digits + 1 && i == digits;
        if !c.is_ascii_digit() && !(check_position && c.eq_ignore_ascii_case(&'X')) {
            return Err(ValidationError::new(
                symbology,
                ValidationKind::IllegalCharacter,
                format!("'{}' at position {}, only digits are allowed", c, i + 1),
            ));
        }
    }

    if len == digits {
        Ok(format!("{}{}", input, check(input)))
    } else if len == digits + 1 {
        let (body, supplied) = input.split_at(digits);
        let expected = check(body);
        if supplied.chars().next().map(|c| c.to_ascii_uppercase()) == Some(expected) {
            Ok(format!("{}{}", body, expected))
        } else {
            Err(ValidationError::new(
                symbology,
                ValidationKind::WrongChecksum,
                format!("check digit is {}, not {}", expected, supplied),
            ))
        }
    } else {
        Err(ValidationError::new(
            symbology,
            ValidationKind::WrongLength,
            format!("expected {} digits (or {} with check digit), got {}", digits, digits + 1, len),
        ))
    }
}

/// Reject empty input and characters outside `allowed`.
pub(crate) fn check_alphabet(
    symbology: &'static str,
    input: &str,
    allowed: impl Fn(char) -> bool,
) -> Result<(), ValidationError> {
    if input.is_empty() {
        return Err(ValidationError::new(symbology, ValidationKind::Empty, "nothing to encode"));
    }
    if let Some((i, c)) = input.chars().enumerate().find(|&(_, c)| !allowed(c)) {
        return Err(ValidationError::new(
            symbology,
            ValidationKind::IllegalCharacter,
            format!("{:?} at position {}", c, i + 1),
        ));
    }
    Ok(())
}

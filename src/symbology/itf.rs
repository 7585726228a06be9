//! # Interleaved 2 of 5
//!
//! Numeric-only, encodes digits in pairs: the first digit of a pair is
//! carried by the five bars, the second by the five spaces in between.
//!
//! ```text
//! start (n n n n) | pair 1 | pair 2 | ... | stop (w n n)
//! ```
//!
//! Narrow elements are [`ITF_NARROW`] modules, wide elements [`ITF_WIDE`].

use std::fmt;

use super::tables::{ITF_NARROW, ITF_START, ITF_STOP, ITF_WIDE, ITF_WIDTHS, push_element, push_widths};
use super::{Barcode, ModuleSequence, check_alphabet, checksum};
use crate::error::ValidationError;
use crate::writer::options::WriterOptions;

/// Narrowest bar ITF is specified for, in mm.
const MIN_SIZE: f64 = 0.2;

/// Minimum ITF quiet zone, in mm.
const MIN_QUIET_ZONE: f64 = 6.4;

/// Writer options for ITF-style symbols: one narrow element is
/// [`MIN_SIZE`] wide.
pub(crate) fn itf_writer_defaults() -> WriterOptions {
    WriterOptions {
        module_width: MIN_SIZE / ITF_NARROW as f64,
        quiet_zone: MIN_QUIET_ZONE,
        ..WriterOptions::default()
    }
}

/// Modules for an even-length digit string.
pub(crate) fn interleave(digits: &str) -> Vec<bool> {
    let mut line = Vec::new();
    push_widths(&mut line, ITF_START, ITF_NARROW, ITF_WIDE);
    for pair in digits.as_bytes().chunks(2) {
        let bars = ITF_WIDTHS[usize::from(pair[0] - b'0')].as_bytes();
        let spaces = ITF_WIDTHS[usize::from(pair[1] - b'0')].as_bytes();
        for (&b, &s) in bars.iter().zip(spaces) {
            push_element(&mut line, true, if b == b'w' { ITF_WIDE } else { ITF_NARROW });
            push_element(&mut line, false, if s == b'w' { ITF_WIDE } else { ITF_NARROW });
        }
    }
    push_widths(&mut line, ITF_STOP, ITF_NARROW, ITF_WIDE);
    line
}

/// Interleaved 2 of 5 barcode.
///
/// Odd-length input is padded with a leading zero.
///
/// ```
/// use barline::symbology::{Barcode, itf::Itf};
///
/// assert_eq!(Itf::new("123").unwrap().full_code(), "0123");
/// assert_eq!(Itf::with_checksum("1234567", true).unwrap().full_code(), "12345670");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itf {
    code: String,
}

impl Itf {
    pub const NAME: &'static str = "ITF";

    pub fn new(code: &str) -> Result<Self, ValidationError> {
        Self::with_checksum(code, false)
    }

    /// Build with an optional trailing mod-10 check digit.
    pub fn with_checksum(code: &str, add_checksum: bool) -> Result<Self, ValidationError> {
        check_alphabet(Self::NAME, code, |c| c.is_ascii_digit())?;
        let mut code = code.to_string();
        if add_checksum {
            code.push(checksum::mod10_char(&code));
        }
        if code.len() % 2 != 0 {
            code.insert(0, '0');
        }
        Ok(Self { code })
    }
}

impl Barcode for Itf {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn full_code(&self) -> String {
        self.code.clone()
    }

    fn encode(&self) -> ModuleSequence {
        ModuleSequence::single(interleave(&self.code))
    }

    fn writer_defaults(&self) -> WriterOptions {
        itf_writer_defaults()
    }
}

impl fmt::Display for Itf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

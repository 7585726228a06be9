//! # EAN Family
//!
//! | Type | Data digits | Encoded as |
//! |------|-------------|------------|
//! | EAN-13 | 12 + check | EAN-13 |
//! | EAN-8 | 7 + check | EAN-8 |
//! | JAN | 12 + check, prefix 45/49 | EAN-13 |
//! | EAN-14 (GTIN-14) | 13 + check | ITF-14 carrier |
//!
//! ## EAN-13 Layout
//!
//! ```text
//! 101 | 6 left digits (parity from digit 1) | 01010 | 6 right digits | 101
//! ```
//!
//! The first digit is not drawn as bars. It selects, via [`EAN13_PARITY`],
//! whether each left digit uses the odd (A) or even (B) table.

use std::fmt;

use super::tables::{
    EAN13_PARITY, EAN_CODES_A, EAN_CODES_B, EAN_CODES_C, EAN_EDGE, EAN_MIDDLE, push_bits,
};
use super::{Barcode, ModuleSequence, checksum, complete_digits, itf};
use crate::error::{ValidationError, ValidationKind};
use crate::writer::options::WriterOptions;

fn digit(c: u8) -> usize {
    usize::from(c - b'0')
}

/// Modules for a complete 13-digit EAN.
pub(crate) fn encode_ean13(code: &str) -> Vec<bool> {
    let bytes = code.as_bytes();
    let parity = EAN13_PARITY[digit(bytes[0])].as_bytes();

    let mut line = Vec::with_capacity(95);
    push_bits(&mut line, EAN_EDGE);
    for (i, &c) in bytes[1..7].iter().enumerate() {
        let table = if parity[i] == b'A' { &EAN_CODES_A } else { &EAN_CODES_B };
        push_bits(&mut line, table[digit(c)]);
    }
    push_bits(&mut line, EAN_MIDDLE);
    for &c in &bytes[7..13] {
        push_bits(&mut line, EAN_CODES_C[digit(c)]);
    }
    push_bits(&mut line, EAN_EDGE);
    line
}

/// EAN-13 barcode.
///
/// ```
/// use barline::symbology::{Barcode, ean::Ean13};
///
/// let ean = Ean13::new("590123412345").unwrap();
/// assert_eq!(ean.full_code(), "5901234123457");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ean13 {
    ean: String,
}

impl Ean13 {
    pub const NAME: &'static str = "EAN-13";
    pub const DIGITS: usize = 12;

    pub fn new(code: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            ean: Self::validate(code)?,
        })
    }

    /// Validate 12 digits (or 13 with a matching check digit) and return
    /// the complete 13-digit code.
    pub fn validate(code: &str) -> Result<String, ValidationError> {
        complete_digits(Self::NAME, code, Self::DIGITS, false, checksum::mod10_char)
    }
}

impl Barcode for Ean13 {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn digits(&self) -> usize {
        Self::DIGITS
    }

    fn full_code(&self) -> String {
        self.ean.clone()
    }

    fn encode(&self) -> ModuleSequence {
        ModuleSequence::single(encode_ean13(&self.ean))
    }
}

impl fmt::Display for Ean13 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ean)
    }
}

/// EAN-8 barcode: four odd-parity digits left, four right-hand digits right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ean8 {
    ean: String,
}

impl Ean8 {
    pub const NAME: &'static str = "EAN-8";
    pub const DIGITS: usize = 7;

    pub fn new(code: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            ean: complete_digits(Self::NAME, code, Self::DIGITS, false, checksum::mod10_char)?,
        })
    }
}

impl Barcode for Ean8 {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn digits(&self) -> usize {
        Self::DIGITS
    }

    fn full_code(&self) -> String {
        self.ean.clone()
    }

    fn encode(&self) -> ModuleSequence {
        let bytes = self.ean.as_bytes();
        let mut line = Vec::with_capacity(67);
        push_bits(&mut line, EAN_EDGE);
        for &c in &bytes[..4] {
            push_bits(&mut line, EAN_CODES_A[digit(c)]);
        }
        push_bits(&mut line, EAN_MIDDLE);
        for &c in &bytes[4..] {
            push_bits(&mut line, EAN_CODES_C[digit(c)]);
        }
        push_bits(&mut line, EAN_EDGE);
        ModuleSequence::single(line)
    }
}

impl fmt::Display for Ean8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ean)
    }
}

/// Japanese Article Number: an EAN-13 restricted to the 450-459 and
/// 490-499 prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jan {
    ean: Ean13,
}

impl Jan {
    pub const NAME: &'static str = "JAN";

    pub fn new(code: &str) -> Result<Self, ValidationError> {
        let full = complete_digits(Self::NAME, code, Ean13::DIGITS, false, checksum::mod10_char)?;
        if !(full.starts_with("45") || full.starts_with("49")) {
            return Err(ValidationError::new(
                Self::NAME,
                ValidationKind::WrongPrefix,
                format!("country code {} is not between 450-459 or 490-499", &full[..3]),
            ));
        }
        Ok(Self { ean: Ean13 { ean: full } })
    }
}

impl Barcode for Jan {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn digits(&self) -> usize {
        Ean13::DIGITS
    }

    fn full_code(&self) -> String {
        self.ean.full_code()
    }

    fn encode(&self) -> ModuleSequence {
        self.ean.encode()
    }
}

/// EAN-14 / GTIN-14.
///
/// Thirteen digits plus a mod-10 check digit, printed on the ITF-14
/// carrier (interleaved 2 of 5, no additional check).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ean14 {
    ean: String,
}

impl Ean14 {
    pub const NAME: &'static str = "EAN-14";
    pub const DIGITS: usize = 13;

    pub fn new(code: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            ean: complete_digits(Self::NAME, code, Self::DIGITS, false, checksum::mod10_char)?,
        })
    }
}

impl Barcode for Ean14 {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn digits(&self) -> usize {
        Self::DIGITS
    }

    fn full_code(&self) -> String {
        self.ean.clone()
    }

    fn encode(&self) -> ModuleSequence {
        ModuleSequence::single(itf::interleave(&self.ean))
    }

    fn writer_defaults(&self) -> WriterOptions {
        itf::itf_writer_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ean13_check_digit() {
        let ean = Ean13::new("400638133393").unwrap();
        assert_eq!(ean.full_code(), "4006381333931");
        assert_eq!(Ean13::new("5901234123457").unwrap().full_code(), "5901234123457");
    }

    #[test]
    fn test_ean13_wrong_check_digit() {
        let err = Ean13::new("5901234123458").unwrap_err();
        assert_eq!(err.kind, ValidationKind::WrongChecksum);
    }

    #[test]
    fn test_ean13_rejects_letters() {
        let err = Ean13::new("40063813339A").unwrap_err();
        assert_eq!(err.kind, ValidationKind::IllegalCharacter);
    }

    #[test]
    fn test_ean13_modules() {
        let modules = Ean13::new("590123412345").unwrap().encode();
        let bits = &modules.to_bit_strings()[0];
        assert_eq!(bits.len(), 95);
        assert!(bits.starts_with("101"));
        assert!(bits.ends_with("101"));
        assert_eq!(&bits[45..50], EAN_MIDDLE);
        // First digit 5 -> parity ABBAAB: digit 9 uses A, digit 0 uses B
        assert_eq!(&bits[3..10], EAN_CODES_A[9]);
        assert_eq!(&bits[10..17], EAN_CODES_B[0]);
        // Check digit 7 is the last right-hand symbol
        assert_eq!(&bits[85..92], EAN_CODES_C[7]);
    }

    #[test]
    fn test_ean13_leading_zero_is_all_odd() {
        let bits = &Ean13::new("012345678901").unwrap().encode().to_bit_strings()[0];
        let left: Vec<&str> = (0..6).map(|i| &bits[3 + i * 7..10 + i * 7]).collect();
        let expected: Vec<&str> = [1, 2, 3, 4, 5, 6].iter().map(|&d| EAN_CODES_A[d]).collect();
        assert_eq!(left, expected);
    }

    #[test]
    fn test_ean8() {
        let ean = Ean8::new("4026770").unwrap();
        assert_eq!(ean.full_code(), "40267708");
        let bits = &ean.encode().to_bit_strings()[0];
        assert_eq!(bits.len(), 67);
        assert_eq!(&bits[3..10], EAN_CODES_A[4]);
        assert_eq!(&bits[31..36], EAN_MIDDLE);
        assert_eq!(&bits[57..64], EAN_CODES_C[8]);
    }

    #[test]
    fn test_jan_prefix() {
        assert_eq!(Jan::new("490123456789").unwrap().full_code(), "4901234567894");
        assert_eq!(Jan::new("4501234567890").unwrap_err().kind, ValidationKind::WrongChecksum);
        let err = Jan::new("590123412345").unwrap_err();
        assert_eq!(err.kind, ValidationKind::WrongPrefix);
    }

    #[test]
    fn test_ean14_on_itf_carrier() {
        let ean = Ean14::new("1234567891123").unwrap();
        assert_eq!(ean.full_code(), "12345678911230");
        // ITF: 8 start + 7 pairs * 32 + 9 stop
        assert_eq!(ean.encode().modules_per_line(), 8 + 7 * 32 + 9);
        assert_eq!(ean.writer_defaults().module_width, 0.1);
    }
}

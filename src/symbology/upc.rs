//! # UPC-A
//!
//! Eleven data digits and a mod-10 check digit. The bar pattern is the
//! EAN-13 pattern of the same code with a leading `0` (all left-hand digits
//! in odd parity), so every UPC-A is also a valid EAN-13.

use std::fmt;

use super::ean::encode_ean13;
use super::{Barcode, ModuleSequence, checksum, complete_digits};
use crate::error::ValidationError;
use crate::writer::options::WriterOptions;

/// UPC-A nominal module width, in mm.
const MODULE_WIDTH: f64 = 0.33;

/// Universal Product Code (UPC-A).
///
/// ```
/// use barline::symbology::{Barcode, upc::UpcA};
///
/// assert_eq!(UpcA::new("36000291453").unwrap().full_code(), "360002914539");
/// assert_eq!(UpcA::with_ean("36000291453", true).unwrap().full_code(), "0360002914539");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcA {
    upc: String,
    make_ean: bool,
}

impl UpcA {
    pub const NAME: &'static str = "UPC-A";
    pub const DIGITS: usize = 11;

    pub fn new(code: &str) -> Result<Self, ValidationError> {
        Self::with_ean(code, false)
    }

    /// With `make_ean`, the human-readable code is shown as the
    /// equivalent 13-digit EAN.
    pub fn with_ean(code: &str, make_ean: bool) -> Result<Self, ValidationError> {
        Ok(Self {
            upc: complete_digits(Self::NAME, code, Self::DIGITS, false, checksum::mod10_char)?,
            make_ean,
        })
    }
}

impl Barcode for UpcA {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn digits(&self) -> usize {
        Self::DIGITS
    }

    fn full_code(&self) -> String {
        if self.make_ean {
            format!("0{}", self.upc)
        } else {
            self.upc.clone()
        }
    }

    fn encode(&self) -> ModuleSequence {
        ModuleSequence::single(encode_ean13(&format!("0{}", self.upc)))
    }

    fn writer_defaults(&self) -> WriterOptions {
        WriterOptions {
            module_width: MODULE_WIDTH,
            ..WriterOptions::default()
        }
    }
}

impl fmt::Display for UpcA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationKind;
    use crate::symbology::tables::{EAN_CODES_A, EAN_CODES_C};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_upca_check_digit() {
        assert_eq!(UpcA::new("03600029145").unwrap().full_code(), "036000291452");
        assert_eq!(UpcA::new("036000291452").unwrap().full_code(), "036000291452");
        assert_eq!(UpcA::new("036000291453").unwrap_err().kind, ValidationKind::WrongChecksum);
    }

    #[test]
    fn test_upca_modules() {
        let bits = &UpcA::new("03600029145").unwrap().encode().to_bit_strings()[0];
        assert_eq!(bits.len(), 95);
        // Left digits are all odd parity, first one is the leading 0
        assert_eq!(&bits[3..10], EAN_CODES_A[0]);
        assert_eq!(&bits[10..17], EAN_CODES_A[3]);
        assert_eq!(&bits[85..92], EAN_CODES_C[2]);
    }

    #[test]
    fn test_upca_matches_ean13() {
        let upc = UpcA::new("36000291453").unwrap();
        let ean = crate::symbology::ean::Ean13::new("036000291453").unwrap();
        assert_eq!(upc.encode(), ean.encode());
    }

    #[test]
    fn test_upca_module_width() {
        assert_eq!(UpcA::new("36000291453").unwrap().writer_defaults().module_width, 0.33);
    }
}

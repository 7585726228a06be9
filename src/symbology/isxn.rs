//! # ISBN and ISSN
//!
//! Book and serial numbers are printed as EAN-13 ("Bookland"):
//!
//! | Type | Input | EAN-13 |
//! |------|-------|--------|
//! | ISBN-13 | 12 digits, prefix 978 or 979-10/979-11 | as is |
//! | ISBN-10 | 9 digits + mod-11 check (`X` = 10) | `978` + 9 digits + check |
//! | ISSN | 7 digits + mod-11 check (`X` = 10) | `977` + 7 digits + `00` + check |
//!
//! Hyphens in the input are ignored.

use std::fmt;

use super::ean::encode_ean13;
use super::{Barcode, ModuleSequence, checksum, complete_digits};
use crate::error::{ValidationError, ValidationKind};

fn strip_hyphens(code: &str) -> String {
    code.chars().filter(|&c| c != '-').collect()
}

/// EAN-13 over `prefix` + `body`, check digit included.
fn bookland(prefix: &str, body: &str) -> String {
    let mut ean = format!("{}{}", prefix, body);
    ean.push(checksum::mod10_char(&ean));
    ean
}

/// International Standard Book Number, 13 digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Isbn13 {
    ean: String,
}

impl Isbn13 {
    pub const NAME: &'static str = "ISBN-13";
    pub const DIGITS: usize = 12;

    pub fn new(code: &str) -> Result<Self, ValidationError> {
        let code = strip_hyphens(code);
        let ean = complete_digits(Self::NAME, &code, Self::DIGITS, false, checksum::mod10_char)?;
        let valid_prefix = ean.starts_with("978") || ean.starts_with("97910") || ean.starts_with("97911");
        if !valid_prefix {
            return Err(ValidationError::new(
                Self::NAME,
                ValidationKind::WrongPrefix,
                "ISBN must start with 978, 979-10 or 979-11",
            ));
        }
        Ok(Self { ean })
    }
}

impl Barcode for Isbn13 {
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

impl fmt::Display for Isbn13 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ean)
    }
}

/// International Standard Book Number, 10 digits.
///
/// ```
/// use barline::symbology::{Barcode, isxn::Isbn10};
///
/// let isbn = Isbn10::new("3-12-517154-7").unwrap();
/// assert_eq!(isbn.to_string(), "3125171547");
/// assert_eq!(isbn.full_code(), "9783125171541");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Isbn10 {
    isbn10: String,
    ean: String,
}

impl Isbn10 {
    pub const NAME: &'static str = "ISBN-10";
    pub const DIGITS: usize = 9;

    pub fn new(code: &str) -> Result<Self, ValidationError> {
        let code = strip_hyphens(code);
        let isbn10 = complete_digits(Self::NAME, &code, Self::DIGITS, true, checksum::isbn10)?;
        let ean = bookland("978", &isbn10[..Self::DIGITS]);
        Ok(Self { isbn10, ean })
    }

    /// The ten-character ISBN, check character included.
    pub fn isbn10(&self) -> &str {
        &self.isbn10
    }
}

impl Barcode for Isbn10 {
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

impl fmt::Display for Isbn10 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.isbn10)
    }
}

/// International Standard Serial Number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issn {
    issn: String,
    ean: String,
}

impl Issn {
    pub const NAME: &'static str = "ISSN";
    pub const DIGITS: usize = 7;

    pub fn new(code: &str) -> Result<Self, ValidationError> {
        let code = strip_hyphens(code);
        let issn = complete_digits(Self::NAME, &code, Self::DIGITS, true, checksum::issn)?;
        let ean = bookland("977", &format!("{}00", &issn[..Self::DIGITS]));
        Ok(Self { issn, ean })
    }

    /// The eight-character ISSN, check character included.
    pub fn issn(&self) -> &str {
        &self.issn
    }
}

impl Barcode for Issn {
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

impl fmt::Display for Issn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.issn)
    }
}

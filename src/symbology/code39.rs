//! # Code 39
//!
//! Alphanumeric symbology with 43 data characters. Every character is nine
//! elements (five bars, four spaces), three of them wide:
//!
//! ```text
//! * | char | char | ... | [check] | *
//! ```
//!
//! Characters are separated by one narrow space. A wide element is
//! [`CODE39_WIDE`] modules.
//!
//! PZN (Pharmazentralnummer) is printed as Code 39 too, see [`Pzn`].

use std::fmt;

use super::tables::{CODE39_ALPHABET, CODE39_EDGE, CODE39_WIDE, CODE39_WIDTHS, push_element, push_widths};
use super::{Barcode, ModuleSequence, check_alphabet, checksum, complete_digits};
use crate::error::{ValidationError, ValidationKind};

fn alphabet_index(c: char) -> Option<usize> {
    CODE39_ALPHABET.find(c)
}

/// Code 39 barcode.
///
/// Input is upper-cased. The mod-43 check character is appended by default.
///
/// ```
/// use barline::symbology::{Barcode, code39::Code39};
///
/// assert_eq!(Code39::new("code39").unwrap().full_code(), "CODE39W");
/// assert_eq!(Code39::with_checksum("code39", false).unwrap().full_code(), "CODE39");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code39 {
    code: String,
    checksum: Option<char>,
}

impl Code39 {
    pub const NAME: &'static str = "Code 39";

    pub fn new(code: &str) -> Result<Self, ValidationError> {
        Self::with_checksum(code, true)
    }

    pub fn with_checksum(code: &str, add_checksum: bool) -> Result<Self, ValidationError> {
        let code = code.to_uppercase();
        check_alphabet(Self::NAME, &code, |c| alphabet_index(c).is_some())?;

        let checksum = if add_checksum {
            let value = checksum::mod43(code.chars().filter_map(alphabet_index));
            CODE39_ALPHABET[value..].chars().next()
        } else {
            None
        };
        Ok(Self { code, checksum })
    }

    /// The computed check character, if enabled.
    pub fn checksum(&self) -> Option<char> {
        self.checksum
    }
}

impl Barcode for Code39 {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn full_code(&self) -> String {
        let mut full = self.code.clone();
        full.extend(self.checksum);
        full
    }

    fn encode(&self) -> ModuleSequence {
        let mut line = Vec::new();
        push_widths(&mut line, CODE39_EDGE, 1, CODE39_WIDE);
        for c in self.full_code().chars() {
            // Alphabet was checked in the constructor
            if let Some(index) = alphabet_index(c) {
                push_element(&mut line, false, 1);
                push_widths(&mut line, CODE39_WIDTHS[index], 1, CODE39_WIDE);
            }
        }
        push_element(&mut line, false, 1);
        push_widths(&mut line, CODE39_EDGE, 1, CODE39_WIDE);
        ModuleSequence::single(line)
    }
}

impl fmt::Display for Code39 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_code())
    }
}

/// Placeholder returned by the check function when PZN's remainder is 10.
const NO_PZN_CHECK: char = '?';

/// Pharmazentralnummer (PZN7).
///
/// Six digits plus a mod-11 check digit, printed as Code 39 `PZN-nnnnnnn`
/// without the Code 39 check character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pzn {
    pzn: String,
    code39: Code39,
}

impl Pzn {
    pub const NAME: &'static str = "Pharmazentralnummer";
    pub const DIGITS: usize = 6;

    pub fn new(code: &str) -> Result<Self, ValidationError> {
        let code = code.strip_prefix("PZN-").unwrap_or(code);
        let pzn = complete_digits(Self::NAME, code, Self::DIGITS, false, |body| {
            checksum::pzn(body).map_or(NO_PZN_CHECK, |d| char::from(b'0' + d))
        })?;
        if pzn.ends_with(NO_PZN_CHECK) {
            return Err(ValidationError::new(
                Self::NAME,
                ValidationKind::WrongChecksum,
                format!("{} has check value 10 and is not a valid PZN", &pzn[..Self::DIGITS]),
            ));
        }
        let code39 = Code39::with_checksum(&format!("PZN-{}", pzn), false)?;
        Ok(Self { pzn, code39 })
    }

    /// The seven PZN digits without the `PZN-` prefix.
    pub fn pzn(&self) -> &str {
        &self.pzn
    }
}

impl Barcode for Pzn {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn digits(&self) -> usize {
        Self::DIGITS
    }

    fn full_code(&self) -> String {
        self.code39.full_code()
    }

    fn encode(&self) -> ModuleSequence {
        self.code39.encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Split a Code 39 line back into 15-module characters.
    fn characters(bits: &str) -> Vec<&str> {
        let mut out = Vec::new();
        let mut rest = bits;
        while rest.len() >= 15 {
            out.push(&rest[..15]);
            rest = rest.get(16..).unwrap_or("");
        }
        out
    }

    fn expand(widths: &str) -> String {
        let mut line = Vec::new();
        push_widths(&mut line, widths, 1, CODE39_WIDE);
        line.iter().map(|&b| if b { '1' } else { '0' }).collect()
    }

    #[test]
    fn test_code39_without_checksum() {
        let code = Code39::with_checksum("CODE39", false).unwrap();
        let bits = &code.encode().to_bit_strings()[0];
        // 6 characters + start/stop, 15 modules each, 7 single-module gaps
        assert_eq!(bits.len(), 8 * 15 + 7);
        let chars = characters(bits);
        assert_eq!(chars.len(), 8);
        assert_eq!(chars[0], expand(CODE39_EDGE));
        assert_eq!(chars[7], expand(CODE39_EDGE));
        assert_eq!(chars[1], expand(CODE39_WIDTHS[12])); // C
        // Gaps are single narrow spaces
        for i in 1..8 {
            assert_eq!(&bits[i * 16 - 1..i * 16], "0");
        }
    }

    #[test]
    fn test_code39_checksum() {
        // C(12) + O(24) + D(13) + E(14) + 3 + 9 = 75, 75 % 43 = 32 -> W
        let code = Code39::new("CODE39").unwrap();
        assert_eq!(code.checksum(), Some('W'));
        assert_eq!(code.full_code(), "CODE39W");
        assert_eq!(code.encode().modules_per_line(), 9 * 15 + 8);
    }

    #[test]
    fn test_code39_uppercases() {
        let code = Code39::new("Example Code 39").unwrap();
        assert!(code.full_code().starts_with("EXAMPLE CODE 39"));
    }

    #[test]
    fn test_code39_rejects_illegal_characters() {
        let err = Code39::new("ABC*").unwrap_err();
        assert_eq!(err.kind, ValidationKind::IllegalCharacter);
        let err = Code39::new("a_b").unwrap_err();
        assert_eq!(err.kind, ValidationKind::IllegalCharacter);
        assert_eq!(Code39::new("").unwrap_err().kind, ValidationKind::Empty);
    }

    #[test]
    fn test_pzn() {
        let pzn = Pzn::new("487780").unwrap();
        assert_eq!(pzn.pzn(), "4877800");
        assert_eq!(pzn.full_code(), "PZN-4877800");
        assert_eq!(pzn.encode(), Code39::with_checksum("PZN-4877800", false).unwrap().encode());
        assert_eq!(Pzn::new("PZN-4877800").unwrap().pzn(), "4877800");
    }

    #[test]
    fn test_pzn_invalid_check() {
        assert_eq!(Pzn::new("000003").unwrap_err().kind, ValidationKind::WrongChecksum);
        assert_eq!(Pzn::new("4877801").unwrap_err().kind, ValidationKind::WrongChecksum);
    }
}

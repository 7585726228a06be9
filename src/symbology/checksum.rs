//! # Check Digit Algorithms
//!
//! | Algorithm | Used by | Result |
//! |-----------|---------|--------|
//! | Weighted mod 10 (3,1 from the right) | EAN-8/13/14, JAN, UPC-A, ISBN-13, ITF | digit |
//! | Weighted mod 11 (1..9) | ISBN-10 | digit or `X` |
//! | Weighted mod 11 (8..2) | ISSN | digit or `X` |
//! | Weighted mod 11 (2..7) | PZN | digit (10 is invalid) |
//! | Sum mod 43 | Code 39 | alphabet index |
//! | Positional mod 103 | Code 128 | symbol value |
//!
//! All digit functions expect ASCII digits; callers validate first.

fn digit_values(digits: &str) -> impl DoubleEndedIterator<Item = u32> + '_ {
    digits.bytes().map(|b| u32::from(b - b'0'))
}

/// GS1 mod-10 check digit.
///
/// The rightmost data digit has weight 3, then weights alternate 1, 3, ...
///
/// ```
/// use barline::symbology::checksum::mod10;
///
/// assert_eq!(mod10("400638133393"), 1);
/// ```
pub fn mod10(digits: &str) -> u8 {
    let sum: u32 = digit_values(digits)
        .rev()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { d })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

/// Same as [`mod10`], as an ASCII character.
pub fn mod10_char(digits: &str) -> char {
    char::from(b'0' + mod10(digits))
}

fn mod11_char(value: u32) -> char {
    if value == 10 {
        'X'
    } else {
        char::from(b'0' + value as u8)
    }
}

/// ISBN-10 check character over the first nine digits.
///
/// Equivalent to weights 10..2 with the check completing a multiple of 11.
pub fn isbn10(digits: &str) -> char {
    let sum: u32 = digit_values(digits)
        .take(9)
        .zip(1..)
        .map(|(d, w)| d * w)
        .sum();
    mod11_char(sum % 11)
}

/// ISSN check character over the first seven digits (weights 8..2).
pub fn issn(digits: &str) -> char {
    let sum: u32 = digit_values(digits)
        .take(7)
        .zip((2..=8).rev())
        .map(|(d, w)| d * w)
        .sum();
    mod11_char((11 - sum % 11) % 11)
}

/// PZN7 check digit over six digits (weights 2..7).
///
/// Returns `None` when the remainder is 10; such numbers are never issued.
pub fn pzn(digits: &str) -> Option<u8> {
    let sum: u32 = digit_values(digits)
        .take(6)
        .zip(2..)
        .map(|(d, w)| d * w)
        .sum();
    match sum % 11 {
        10 => None,
        n => Some(n as u8),
    }
}

/// Code 39 check value: sum of alphabet indices mod 43.
pub fn mod43(values: impl IntoIterator<Item = usize>) -> usize {
    values.into_iter().sum::<usize>() % 43
}

/// Code 128 check value.
///
/// `symbols[0]` is the start symbol (weight 1); every following symbol is
/// weighted by its position. The sum is reduced at every step, so input
/// length is unbounded.
pub fn mod103(symbols: &[u32]) -> u32 {
    let mut sum = u64::from(symbols.first().copied().unwrap_or(0)) % 103;
    for (i, &value) in symbols.iter().enumerate().skip(1) {
        sum = (sum + (i as u64 % 103) * u64::from(value)) % 103;
    }
    sum as u32
}

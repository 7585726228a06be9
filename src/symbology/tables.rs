//! # Encoding Tables
//!
//! Static bar/space patterns for every supported symbology.
//!
//! Two notations are used:
//!
//! | Notation | Example | Meaning |
//! |----------|---------|---------|
//! | Module bits | `"0001101"` | One character per module, `1` = bar, `0` = space |
//! | Element widths | `"nnnwwnwnn"` | One character per element, alternating bar/space starting with a bar, `n` = narrow, `w` = wide |
//!
//! EAN/UPC and Code 128 are stored as module bits, Code 39 and ITF as element
//! widths because their wide:narrow ratio is a rendering parameter.

// ============================================================================
// EAN / UPC
// ============================================================================

/// Start and end guard.
pub const EAN_EDGE: &str = "101";

/// Center guard.
pub const EAN_MIDDLE: &str = "01010";

/// Left-hand odd parity (set A), indexed by digit.
pub const EAN_CODES_A: [&str; 10] = [
    "0001101", "0011001", "0010011", "0111101", "0100011",
    "0110001", "0101111", "0111011", "0110111", "0001011",
];

/// Left-hand even parity (set B), indexed by digit.
pub const EAN_CODES_B: [&str; 10] = [
    "0100111", "0110011", "0011011", "0100001", "0011101",
    "0111001", "0000101", "0010001", "0001001", "0010111",
];

/// Right-hand patterns (set C), indexed by digit.
pub const EAN_CODES_C: [&str; 10] = [
    "1110010", "1100110", "1101100", "1000010", "1011100",
    "1001110", "1010000", "1000100", "1001000", "1110100",
];

/// EAN-13 parity of the six left-hand digits, selected by the first digit.
pub const EAN13_PARITY: [&str; 10] = [
    "AAAAAA", "AABABB", "AABBAB", "AABBBA", "ABAABB",
    "ABBAAB", "ABBBAA", "ABABAB", "ABABBA", "ABBABA",
];

// ============================================================================
// CODE 39
// ============================================================================

/// Code 39 alphabet in check-value order (index = mod-43 value).
pub const CODE39_ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%";

/// Element widths for each character of [`CODE39_ALPHABET`].
pub const CODE39_WIDTHS: [&str; 43] = [
    "nnnwwnwnn", "wnnwnnnnw", "nnwwnnnnw", "wnwwnnnnn", "nnnwwnnnw",
    "wnnwwnnnn", "nnwwwnnnn", "nnnwnnwnw", "wnnwnnwnn", "nnwwnnwnn",
    "wnnnnwnnw", "nnwnnwnnw", "wnwnnwnnn", "nnnnwwnnw", "wnnnwwnnn",
    "nnwnwwnnn", "nnnnnwwnw", "wnnnnwwnn", "nnwnnwwnn", "nnnnwwwnn",
    "wnnnnnnww", "nnwnnnnww", "wnwnnnnwn", "nnnnwnnww", "wnnnwnnwn",
    "nnwnwnnwn", "nnnnnnwww", "wnnnnnwwn", "nnwnnnwwn", "nnnnwnwwn",
    "wwnnnnnnw", "nwwnnnnnw", "wwwnnnnnn", "nwnnwnnnw", "wwnnwnnnn",
    "nwwnwnnnn", "nwnnnnwnw", "wwnnnnwnn", "nwwnnnwnn", "nwnwnwnnn",
    "nwnwnnnwn", "nwnnnwnwn", "nnnwnwnwn",
];

/// Start/stop character `*`.
pub const CODE39_EDGE: &str = "nwnnwnwnn";

/// Modules in a Code 39 wide element (narrow is one module).
pub const CODE39_WIDE: usize = 3;

// ============================================================================
// CODE 128
// ============================================================================

/// Module bits for symbol values 0-105 (105 = START C).
pub const CODE128_PATTERNS: [&str; 106] = [
    "11011001100", "11001101100", "11001100110", "10010011000", "10010001100", "10001001100",
    "10011001000", "10011000100", "10001100100", "11001001000", "11001000100", "11000100100",
    "10110011100", "10011011100", "10011001110", "10111001100", "10011101100", "10011100110",
    "11001110010", "11001011100", "11001001110", "11011100100", "11001110100", "11101101110",
    "11101001100", "11100101100", "11100100110", "11101100100", "11100110100", "11100110010",
    "11011011000", "11011000110", "11000110110", "10100011000", "10001011000", "10001000110",
    "10110001000", "10001101000", "10001100010", "11010001000", "11000101000", "11000100010",
    "10110111000", "10110001110", "10001101110", "10111011000", "10111000110", "10001110110",
    "11101110110", "11010001110", "11000101110", "11011101000", "11011100010", "11011101110",
    "11101011000", "11101000110", "11100010110", "11101101000", "11101100010", "11100011010",
    "11101111010", "11001000010", "11110001010", "10100110000", "10100001100", "10010110000",
    "10010000110", "10000101100", "10000100110", "10110010000", "10110000100", "10011010000",
    "10011000010", "10000110100", "10000110010", "11000010010", "11001010000", "11110111010",
    "11000010100", "10001111010", "10100111100", "10010111100", "10010011110", "10111100100",
    "10011110100", "10011110010", "11110100100", "11110010100", "11110010010", "11011011110",
    "11011110110", "11110110110", "10101111000", "10100011110", "10001011110", "10111101000",
    "10111100010", "11110101000", "11110100010", "10111011110", "10111101110", "11101011110",
    "11110101110", "11010000100", "11010010000", "11010011100",
];

/// Stop symbol including the final 2-module termination bar.
pub const CODE128_STOP: &str = "1100011101011";

pub const CODE128_SHIFT: u32 = 98;
pub const CODE128_CODE_C: u32 = 99;
pub const CODE128_CODE_B: u32 = 100;
pub const CODE128_CODE_A: u32 = 101;
pub const CODE128_FNC1: u32 = 102;
pub const CODE128_START_A: u32 = 103;
pub const CODE128_START_B: u32 = 104;
pub const CODE128_START_C: u32 = 105;

// ============================================================================
// INTERLEAVED 2 OF 5
// ============================================================================

/// Element widths per digit. Bars of the first digit of a pair interleave
/// with the spaces of the second.
pub const ITF_WIDTHS: [&str; 10] = [
    "nnwwn", "wnnnw", "nwnnw", "wwnnn", "nnwnw",
    "wnwnn", "nwwnn", "nnnww", "wnnwn", "nwnwn",
];

/// Start pattern: narrow bar, narrow space, narrow bar, narrow space.
pub const ITF_START: &str = "nnnn";

/// Stop pattern: wide bar, narrow space, narrow bar.
pub const ITF_STOP: &str = "wnn";

/// Modules in an ITF narrow element.
pub const ITF_NARROW: usize = 2;

/// Modules in an ITF wide element.
pub const ITF_WIDE: usize = 5;

// ============================================================================
// PATTERN EXPANSION
// ============================================================================

/// Append module bits (`'1'` = bar) to a line.
pub fn push_bits(line: &mut Vec<bool>, bits: &str) {
    line.extend(bits.bytes().map(|b| b == b'1'));
}

/// Append one element of `width` modules.
pub fn push_element(line: &mut Vec<bool>, bar: bool, width: usize) {
    line.extend(std::iter::repeat_n(bar, width));
}

/// Append element widths, alternating bar/space starting with a bar.
pub fn push_widths(line: &mut Vec<bool>, widths: &str, narrow: usize, wide: usize) {
    for (i, w) in widths.bytes().enumerate() {
        let width = if w == b'w' { wide } else { narrow };
        push_element(line, i % 2 == 0, width);
    }
}

//! # Code 128
//!
//! Full ASCII symbology with three code sets:
//!
//! | Set | Encodes | Symbols per character |
//! |-----|---------|-----------------------|
//! | A | control characters, upper case, digits, punctuation | 1 |
//! | B | printable ASCII | 1 |
//! | C | digit pairs `00`-`99` | 1 per pair |
//!
//! The encoder picks the start set and the switches between sets that give
//! the fewest symbols, using a shortest-path search over
//! `(position, active set)`. Single characters from the other of A/B are
//! encoded with SHIFT when that is cheaper than switching.
//!
//! ```text
//! START | data symbols | mod-103 check | STOP (with termination bar)
//! ```
//!
//! FNC1 is written as [`FNC1_CHAR`] in the input.

use std::fmt;

use super::tables::{
    CODE128_CODE_A, CODE128_CODE_B, CODE128_CODE_C, CODE128_FNC1, CODE128_PATTERNS,
    CODE128_SHIFT, CODE128_START_A, CODE128_START_B, CODE128_START_C, CODE128_STOP, push_bits,
};
use super::{Barcode, ModuleSequence, check_alphabet, checksum};
use crate::error::{ValidationError, ValidationKind};

/// Input character standing for the FNC1 function symbol.
pub const FNC1_CHAR: char = '\u{f1}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodeSet {
    A,
    B,
    C,
}

/// Search order; on equal symbol counts the earlier set wins.
const SETS: [CodeSet; 3] = [CodeSet::B, CodeSet::C, CodeSet::A];

impl CodeSet {
    fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
        }
    }

    fn start(self) -> u32 {
        match self {
            Self::A => CODE128_START_A,
            Self::B => CODE128_START_B,
            Self::C => CODE128_START_C,
        }
    }

    /// Symbol that switches into this set.
    fn switch(self) -> u32 {
        match self {
            Self::A => CODE128_CODE_A,
            Self::B => CODE128_CODE_B,
            Self::C => CODE128_CODE_C,
        }
    }

    /// Symbol value of a single character in this set.
    fn value(self, c: char) -> Option<u32> {
        if c == FNC1_CHAR {
            return Some(CODE128_FNC1);
        }
        let c = u32::from(c);
        match (self, c) {
            (Self::A, 0..=31) => Some(c + 64),
            (Self::A, 32..=95) => Some(c - 32),
            (Self::B, 32..=127) => Some(c - 32),
            _ => None,
        }
    }

    /// The set a SHIFT temporarily switches to.
    fn shifted(self) -> Option<Self> {
        match self {
            Self::A => Some(Self::B),
            Self::B => Some(Self::A),
            Self::C => None,
        }
    }
}

/// How a search node was reached.
#[derive(Debug, Clone, Copy)]
enum Step {
    Start,
    Switch(CodeSet),
    Single,
    Shift,
    Pair,
}

fn digit_pair(chars: &[char], i: usize) -> Option<u32> {
    let a = chars.get(i)?.to_digit(10)?;
    let b = chars.get(i + 1)?.to_digit(10)?;
    Some(a * 10 + b)
}

/// Minimal symbol sequence for `chars`, starting with the start symbol and
/// excluding the check symbol.
fn encode_symbols(chars: &[char]) -> Vec<u32> {
    let n = chars.len();
    // best[i][set] = (symbols so far, how we got here)
    let mut best: Vec<[Option<(usize, Step)>; 3]> = vec![[None; 3]; n + 1];

    fn relax(slot: &mut Option<(usize, Step)>, cost: usize, step: Step) {
        if slot.is_none_or(|(current, _)| cost < current) {
            *slot = Some((cost, step));
        }
    }

    for set in SETS {
        relax(&mut best[0][set.index()], 1, Step::Start);
    }

    for i in 0..=n {
        let before_switch = best[i];
        for to in SETS {
            for from in SETS {
                if from == to {
                    continue;
                }
                if let Some((cost, _)) = before_switch[from.index()] {
                    relax(&mut best[i][to.index()], cost + 1, Step::Switch(from));
                }
            }
        }

        if i == n {
            break;
        }
        for set in SETS {
            let Some((cost, _)) = best[i][set.index()] else {
                continue;
            };
            let c = chars[i];
            if set == CodeSet::C {
                if c == FNC1_CHAR {
                    relax(&mut best[i + 1][set.index()], cost + 1, Step::Single);
                } else if digit_pair(chars, i).is_some() {
                    relax(&mut best[i + 2][set.index()], cost + 1, Step::Pair);
                }
            } else if set.value(c).is_some() {
                relax(&mut best[i + 1][set.index()], cost + 1, Step::Single);
            } else if set.shifted().and_then(|other| other.value(c)).is_some() {
                relax(&mut best[i + 1][set.index()], cost + 2, Step::Shift);
            }
        }
    }

    let mut end = None;
    for set in SETS {
        if let Some((cost, _)) = best[n][set.index()] {
            if end.is_none_or(|(_, current)| cost < current) {
                end = Some((set, cost));
            }
        }
    }

    let mut symbols = Vec::new();
    let (mut set, _) = match end {
        Some(end) => end,
        None => return symbols,
    };
    let mut i = n;
    while let Some((_, step)) = best[i][set.index()] {
        match step {
            Step::Start => {
                symbols.push(set.start());
                break;
            }
            Step::Switch(from) => {
                symbols.push(set.switch());
                set = from;
            }
            Step::Single if set == CodeSet::C => {
                symbols.push(CODE128_FNC1);
                i -= 1;
            }
            Step::Single => {
                symbols.extend(set.value(chars[i - 1]));
                i -= 1;
            }
            Step::Shift => {
                symbols.extend(set.shifted().and_then(|other| other.value(chars[i - 1])));
                symbols.push(CODE128_SHIFT);
                i -= 1;
            }
            Step::Pair => {
                symbols.extend(digit_pair(chars, i - 2));
                i -= 2;
            }
        }
    }
    symbols.reverse();
    symbols
}

fn is_encodable(c: char) -> bool {
    c.is_ascii() || c == FNC1_CHAR
}

fn modules_for(symbols: &[u32]) -> ModuleSequence {
    let mut line = Vec::with_capacity(11 * (symbols.len() + 1) + 13);
    for &value in symbols {
        push_bits(&mut line, CODE128_PATTERNS[value as usize]);
    }
    push_bits(&mut line, CODE128_PATTERNS[checksum::mod103(symbols) as usize]);
    push_bits(&mut line, CODE128_STOP);
    ModuleSequence::single(line)
}

/// Code 128 barcode.
///
/// ```
/// use barline::symbology::{Barcode, code128::Code128};
///
/// let code = Code128::new("1234").unwrap();
/// // START C, 12, 34
/// assert_eq!(code.symbols(), &[105, 12, 34]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code128 {
    code: String,
    symbols: Vec<u32>,
}

impl Code128 {
    pub const NAME: &'static str = "Code 128";

    pub fn new(code: &str) -> Result<Self, ValidationError> {
        check_alphabet(Self::NAME, code, is_encodable)?;
        let chars: Vec<char> = code.chars().collect();
        Ok(Self {
            code: code.to_string(),
            symbols: encode_symbols(&chars),
        })
    }

    /// Start symbol and data symbols, without check and stop.
    pub fn symbols(&self) -> &[u32] {
        &self.symbols
    }

    /// The mod-103 check symbol.
    pub fn check_symbol(&self) -> u32 {
        checksum::mod103(&self.symbols)
    }
}

impl Barcode for Code128 {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn full_code(&self) -> String {
        self.code.clone()
    }

    fn encode(&self) -> ModuleSequence {
        modules_for(&self.symbols)
    }
}

impl fmt::Display for Code128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// GS1-128 (formerly UCC/EAN-128).
///
/// Code 128 with a leading FNC1. Application identifiers may be written in
/// parentheses, e.g. `(01)12345678901231`; the parentheses are part of the
/// human-readable text only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gs1_128 {
    text: String,
    code: Code128,
}

impl Gs1_128 {
    pub const NAME: &'static str = "GS1-128";

    /// Maximum number of data characters.
    pub const MAX_LENGTH: usize = 48;

    pub fn new(code: &str) -> Result<Self, ValidationError> {
        check_alphabet(Self::NAME, code, |c| c.is_ascii())?;
        let data: String = code.chars().filter(|&c| c != '(' && c != ')').collect();
        if data.is_empty() {
            return Err(ValidationError::new(Self::NAME, ValidationKind::Empty, "nothing to encode"));
        }
        if data.len() > Self::MAX_LENGTH {
            return Err(ValidationError::new(
                Self::NAME,
                ValidationKind::WrongLength,
                format!("at most {} characters, got {}", Self::MAX_LENGTH, data.len()),
            ));
        }
        let mut encoded = String::with_capacity(data.len() + 2);
        encoded.push(FNC1_CHAR);
        encoded.push_str(&data);
        Ok(Self {
            text: code.to_string(),
            code: Code128::new(&encoded)?,
        })
    }

    pub fn symbols(&self) -> &[u32] {
        self.code.symbols()
    }
}

impl Barcode for Gs1_128 {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn full_code(&self) -> String {
        self.text.clone()
    }

    fn encode(&self) -> ModuleSequence {
        self.code.encode()
    }
}

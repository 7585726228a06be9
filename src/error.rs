//! # Error Types
//!
//! This module defines error types used throughout the barline library.
//!
//! Input problems (unknown symbology, malformed code, bad options) are
//! deterministic and reported before any encoding or painting happens.

use std::fmt;
use thiserror::Error;

/// Main error type for barline operations
#[derive(Debug, Error)]
pub enum BarlineError {
    /// The requested symbology name is not in the registry
    #[error("Unknown barcode '{0}'. Try the list action for available barcodes.")]
    UnknownSymbology(String),

    /// The input text does not satisfy the symbology's rules
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A configuration key the active writer does not recognise
    #[error("Option '{key}' is not supported by the {backend} writer")]
    UnsupportedOption { key: String, backend: &'static str },

    /// A recognised option with a value that cannot be used
    #[error("Invalid value '{value}' for option '{key}'")]
    InvalidOption { key: String, value: String },

    /// Raster output requested but the imaging backend is not compiled in
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Image encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON option file
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, BarlineError>;

/// What is wrong with an input code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    /// Nothing to encode
    Empty,
    /// Too few or too many characters for the symbology
    WrongLength,
    /// A character outside the symbology's alphabet
    IllegalCharacter,
    /// A supplied check digit that does not match the computed one
    WrongChecksum,
    /// A mandatory number-system prefix is missing
    WrongPrefix,
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Empty => "empty code",
            Self::WrongLength => "wrong length",
            Self::IllegalCharacter => "illegal character",
            Self::WrongChecksum => "wrong checksum",
            Self::WrongPrefix => "wrong prefix",
        };
        f.write_str(s)
    }
}

/// Input rejected by a symbology encoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{symbology}: {kind}: {detail}")]
pub struct ValidationError {
    /// Human-readable symbology name (e.g. "EAN-13")
    pub symbology: &'static str,
    pub kind: ValidationKind,
    pub detail: String,
}

impl ValidationError {
    pub fn new(symbology: &'static str, kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self {
            symbology,
            kind,
            detail: detail.into(),
        }
    }
}

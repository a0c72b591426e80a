//! yEnc error types

use std::fmt;

use thiserror::Error;

/// Where in a part the input ran out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Searching for the `=ypart` line of a multi-part segment
    PartHeader,
    /// Reading data lines before the `=yend` trailer
    Body,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::PartHeader => f.write_str("=ypart header"),
            Stage::Body => f.write_str("body"),
        }
    }
}

/// yEnc decoding and encoding errors
#[derive(Error, Debug)]
pub enum YencError {
    /// IO error while reading the input source
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input ended in the middle of a part
    #[error("yenc: unexpected end of input while reading {stage}")]
    UnexpectedEof {
        /// Phase that was in progress
        stage: Stage,
    },

    /// `part=` in the trailer disagrees with the header
    #[error("yenc: =yend header out of order expected part {expected} got {got}")]
    PartOutOfOrder {
        /// Part number from `=ybegin`
        expected: u32,
        /// Part number from `=yend`
        got: u32,
    },

    /// Decoded body length differs from the trailer size
    #[error("body size {actual} did not match expected size {expected} (part {part})")]
    SizeMismatch {
        /// Part number (0 for single-part)
        part: u32,
        /// Size declared in `=yend`
        expected: u64,
        /// Number of decoded bytes
        actual: u64,
    },

    /// `pcrc32` of a part did not match
    #[error("crc check failed for part {part} expected {expected:08x} got {actual:08x}")]
    PartCrcMismatch {
        /// Part number (0 for single-part)
        part: u32,
        /// Digest declared in `=yend`
        expected: u32,
        /// Digest of the decoded bytes
        actual: u32,
    },

    /// `crc32` over every decoded part did not match
    #[error("crc check failed expected {expected:08x} got {actual:08x}")]
    CrcMismatch {
        /// Digest declared in `=yend`
        expected: u32,
        /// Digest of all decoded bytes
        actual: u32,
    },

    /// No `=ybegin` header was found in the input
    #[error("no yenc parts found")]
    NoParts,

    /// Numeric or hex field failed to parse (strict mode only)
    #[error("invalid value for '{key}': {value:?}")]
    InvalidField {
        /// Field name, e.g. `size`
        key: String,
        /// Raw value as it appeared on the line
        value: String,
    },

    /// Encoder line length outside 1..=997
    #[error("Invalid line length: {0} (must be 1-997)")]
    InvalidLineLength(usize),
}

/// Result type alias using YencError
pub type Result<T> = std::result::Result<T, YencError>;

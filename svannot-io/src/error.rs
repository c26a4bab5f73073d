use std::io;
use thiserror::Error;

use svannot_core::errors::SegmentError;

/// Error type for svannot-io readers.
#[derive(Error, Debug)]
pub enum ParseError {
    /// IO error occurred while reading.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A record has fewer columns than its format requires.
    #[error("Line {line}: expected at least {expected} columns, found {found}")]
    MissingFields {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A column could not be parsed into the expected type.
    #[error("Line {line}: invalid value `{value}` for {column}")]
    InvalidField {
        line: usize,
        column: &'static str,
        value: String,
    },

    /// A record whose start is past its end.
    #[error("Line {line}: start {start} is greater than end {end}")]
    InvertedInterval { line: usize, start: u64, end: u64 },

    /// An alignment record that fails segment validation.
    #[error("Line {line}: {source}")]
    Segment {
        line: usize,
        #[source]
        source: SegmentError,
    },

    /// A required INFO key is absent from a VCF record.
    #[error("Line {line}: missing INFO key {key}")]
    MissingInfo { line: usize, key: &'static str },

    /// A deletion whose first breakpoint lies past the second.
    #[error("pos1 {pos1} > pos2 {pos2} for DEL {id}")]
    InvertedDeletion { id: String, pos1: u32, pos2: u32 },
}

/// Result type alias for svannot-io operations.
pub type Result<T> = std::result::Result<T, ParseError>;

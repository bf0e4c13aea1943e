//! Error types for ferro-txmap
//!
//! Coordinate and membership failures are ordinary, recoverable results: the
//! caller decides whether to skip, mark or retry a record.
//! [`TxMapError::InvariantViolation`] is different. It reports an internal
//! defect and is fatal for the record being processed, but never for the
//! whole batch.

use std::fmt;
use thiserror::Error;

/// Error codes for categorizing errors
///
/// These codes can be used for programmatic error handling
/// and for documentation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Coordinate errors (E1xxx)
    /// Position outside transcript/CDS bounds
    OutOfRangeCoordinate = 1001,
    /// Genome position not inside an exon
    NotInExon = 1002,
    /// Genome position not inside the coding region
    NotInCds = 1003,

    // Reference errors (E2xxx)
    /// Sequence not available from the provider
    SequenceNotFound = 2001,
    /// Contig not known to the provider
    ContigNotFound = 2002,
    /// Transcript model violates its construction contract
    InvalidModel = 2003,

    // Normalization errors (E3xxx)
    /// Change passed to the wrong normalizer
    InvalidChangeShape = 3001,
    /// Internal defect between projection and normalization
    InvariantViolation = 3002,

    // IO errors (E9xxx)
    /// File IO error
    IoError = 9001,
    /// JSON parsing error
    JsonError = 9002,
    /// Configuration file error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E1001")
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    /// Get a brief description of this error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::OutOfRangeCoordinate => "coordinate out of range",
            ErrorCode::NotInExon => "position not in an exon",
            ErrorCode::NotInCds => "position not in the coding sequence",
            ErrorCode::SequenceNotFound => "sequence not available",
            ErrorCode::ContigNotFound => "contig not found",
            ErrorCode::InvalidModel => "invalid transcript model",
            ErrorCode::InvalidChangeShape => "change has the wrong shape for this operation",
            ErrorCode::InvariantViolation => "internal invariant violated",
            ErrorCode::IoError => "file I/O error",
            ErrorCode::JsonError => "JSON parsing error",
            ErrorCode::ConfigError => "configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for ferro-txmap operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TxMapError {
    /// Position lies outside the transcript or CDS
    #[error("Coordinate out of range: {msg}")]
    OutOfRangeCoordinate { msg: String },

    /// Genome position cannot be mapped to the transcript
    #[error("Position {position} is not in an exon of {transcript}")]
    NotInExon {
        transcript: String,
        position: String,
    },

    /// Genome or transcript position lies outside the coding region
    #[error("Position {position} is not in the CDS of {transcript}")]
    NotInCds {
        transcript: String,
        position: String,
    },

    /// A change was given to a normalizer that does not handle its shape
    #[error("Invalid change shape: {msg}")]
    InvalidChangeShape { msg: String },

    /// Projection and normalization disagree; this is a defect, not bad input
    #[error("Invariant violation: {msg}")]
    InvariantViolation { msg: String },

    /// Transcript model builder contract violated
    #[error("Invalid transcript model {accession}: {msg}")]
    InvalidModel { accession: String, msg: String },

    /// Sequence lookup failed
    #[error("Sequence not available for {contig}:{start}-{end}")]
    SequenceNotFound { contig: String, start: u64, end: u64 },

    /// Contig unknown to the reference provider
    #[error("Contig not found: {contig}")]
    ContigNotFound { contig: String },

    /// IO error (for file operations)
    #[error("IO error: {msg}")]
    Io { msg: String },

    /// JSON parsing error
    #[error("JSON error: {msg}")]
    Json { msg: String },

    /// Configuration file error
    #[error("Config error: {msg}")]
    Config { msg: String },
}

impl TxMapError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            TxMapError::OutOfRangeCoordinate { .. } => ErrorCode::OutOfRangeCoordinate,
            TxMapError::NotInExon { .. } => ErrorCode::NotInExon,
            TxMapError::NotInCds { .. } => ErrorCode::NotInCds,
            TxMapError::InvalidChangeShape { .. } => ErrorCode::InvalidChangeShape,
            TxMapError::InvariantViolation { .. } => ErrorCode::InvariantViolation,
            TxMapError::InvalidModel { .. } => ErrorCode::InvalidModel,
            TxMapError::SequenceNotFound { .. } => ErrorCode::SequenceNotFound,
            TxMapError::ContigNotFound { .. } => ErrorCode::ContigNotFound,
            TxMapError::Io { .. } => ErrorCode::IoError,
            TxMapError::Json { .. } => ErrorCode::JsonError,
            TxMapError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// Returns true for internal defects that must not be silently dropped
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, TxMapError::InvariantViolation { .. })
    }

    /// Returns true for errors describing the input data rather than a defect
    pub fn is_recoverable(&self) -> bool {
        !self.is_invariant_violation()
    }

    pub(crate) fn out_of_range(msg: impl Into<String>) -> Self {
        TxMapError::OutOfRangeCoordinate { msg: msg.into() }
    }

    pub(crate) fn invalid_shape(msg: impl Into<String>) -> Self {
        TxMapError::InvalidChangeShape { msg: msg.into() }
    }
}

impl From<std::io::Error> for TxMapError {
    fn from(err: std::io::Error) -> Self {
        TxMapError::Io {
            msg: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for TxMapError {
    fn from(err: serde_json::Error) -> Self {
        TxMapError::Json {
            msg: err.to_string(),
        }
    }
}

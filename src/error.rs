//! Error types for ferro-annotate
//!
//! Errors fall into two groups:
//! - per-record failures (`InvalidVariant`, `UnsupportedVariantType`,
//!   `IncompleteTranslation`, `SequenceMismatch`, `Coordinate`,
//!   `TranscriptNotFound`) that are isolated to a single (variant, transcript)
//!   pair and never abort a batch
//! - fatal failures (`Configuration`) raised when a transcript model violates
//!   its structural invariants; such a model must not enter annotation

use std::fmt;
use thiserror::Error;

/// Error codes for categorizing errors
///
/// These codes can be used for programmatic error handling
/// and for documentation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Input errors (E1xxx)
    /// Malformed variant input
    InvalidVariant = 1001,
    /// Unrecognized contig name
    UnknownContig = 1002,
    /// Invalid nucleotide in an allele
    InvalidBase = 1003,

    // Reference errors (E2xxx)
    /// Transcript accession not found
    TranscriptNotFound = 2001,
    /// Stated reference allele does not match the transcript
    SequenceMismatch = 2002,

    // Annotation errors (E3xxx)
    /// No builder for the variant kind and region
    UnsupportedVariantType = 3001,
    /// Translation ran off the end of the transcript
    IncompleteTranslation = 3002,
    /// Position outside the interval used for a relative computation
    CoordinateOutOfRange = 3003,

    // Configuration errors (E4xxx)
    /// Transcript model violates its structural invariants
    InvalidTranscriptModel = 4001,
    /// Invalid configuration file
    InvalidConfig = 4002,

    // IO errors (E9xxx)
    /// File IO error
    IoError = 9001,
    /// JSON parsing error
    JsonError = 9002,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E1001")
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    /// Get a brief description of this error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::InvalidVariant => "invalid variant",
            ErrorCode::UnknownContig => "unrecognized contig",
            ErrorCode::InvalidBase => "invalid nucleotide base",
            ErrorCode::TranscriptNotFound => "transcript not found",
            ErrorCode::SequenceMismatch => "reference allele does not match transcript",
            ErrorCode::UnsupportedVariantType => "unsupported variant type for region",
            ErrorCode::IncompleteTranslation => "translation reached end of transcript",
            ErrorCode::CoordinateOutOfRange => "coordinate outside interval",
            ErrorCode::InvalidTranscriptModel => "invalid transcript model",
            ErrorCode::InvalidConfig => "invalid configuration",
            ErrorCode::IoError => "file I/O error",
            ErrorCode::JsonError => "JSON parsing error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for ferro-annotate operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnnotateError {
    /// Malformed variant input (non-positive position, unknown contig, ref == alt)
    #[error("Invalid variant: {msg}")]
    InvalidVariant { msg: String, code: ErrorCode },

    /// No builder matches the (kind, region) combination
    #[error("Unsupported variant type: {kind} in {region} of {transcript}")]
    UnsupportedVariantType {
        transcript: String,
        kind: String,
        region: String,
    },

    /// Reading frame simulation exhausted the transcript before a stop codon
    #[error("Incomplete translation in {transcript}: no stop codon before end of transcript")]
    IncompleteTranslation { transcript: String },

    /// The stated reference allele does not match the transcript sequence
    #[error("Reference mismatch in {transcript} at {location}: expected {expected}, found {found}")]
    SequenceMismatch {
        transcript: String,
        location: String,
        expected: String,
        found: String,
    },

    /// Transcript model violates its structural invariants
    #[error("Invalid transcript model {transcript}: {msg}")]
    Configuration { transcript: String, msg: String },

    /// Position lies outside the interval used for a relative computation
    #[error("Coordinate error: {msg}")]
    Coordinate { msg: String },

    /// Transcript accession not present in the database
    #[error("Transcript not found: {accession}")]
    TranscriptNotFound { accession: String },

    /// Invalid configuration file
    #[error("Config error: {msg}")]
    Config { msg: String },

    /// IO error (for file operations)
    #[error("IO error: {msg}")]
    Io { msg: String },

    /// JSON parsing error
    #[error("JSON error: {msg}")]
    Json { msg: String },
}

impl AnnotateError {
    /// Create an invalid variant error with the generic code
    pub fn invalid_variant(msg: impl Into<String>) -> Self {
        AnnotateError::InvalidVariant {
            msg: msg.into(),
            code: ErrorCode::InvalidVariant,
        }
    }

    /// Create an invalid variant error for an unrecognized contig
    pub fn unknown_contig(contig: &str) -> Self {
        AnnotateError::InvalidVariant {
            msg: format!("unrecognized contig '{}'", contig),
            code: ErrorCode::UnknownContig,
        }
    }

    /// Create a coordinate error
    pub fn coordinate(msg: impl Into<String>) -> Self {
        AnnotateError::Coordinate { msg: msg.into() }
    }

    /// Create a configuration error for a transcript model
    pub fn configuration(transcript: impl Into<String>, msg: impl Into<String>) -> Self {
        AnnotateError::Configuration {
            transcript: transcript.into(),
            msg: msg.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            AnnotateError::InvalidVariant { code, .. } => *code,
            AnnotateError::UnsupportedVariantType { .. } => ErrorCode::UnsupportedVariantType,
            AnnotateError::IncompleteTranslation { .. } => ErrorCode::IncompleteTranslation,
            AnnotateError::SequenceMismatch { .. } => ErrorCode::SequenceMismatch,
            AnnotateError::Configuration { .. } => ErrorCode::InvalidTranscriptModel,
            AnnotateError::Coordinate { .. } => ErrorCode::CoordinateOutOfRange,
            AnnotateError::TranscriptNotFound { .. } => ErrorCode::TranscriptNotFound,
            AnnotateError::Config { .. } => ErrorCode::InvalidConfig,
            AnnotateError::Io { .. } => ErrorCode::IoError,
            AnnotateError::Json { .. } => ErrorCode::JsonError,
        }
    }

    /// Whether this error halts further use of a transcript model.
    ///
    /// Everything else is isolated to a single (variant, transcript) pair.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AnnotateError::Configuration { .. })
    }

    /// Message prefixed with the error code, e.g. `[E1001] Invalid variant: ...`
    pub fn detailed_message(&self) -> String {
        format!("[{}] {}", self.code(), self)
    }
}

impl From<std::io::Error> for AnnotateError {
    fn from(err: std::io::Error) -> Self {
        AnnotateError::Io {
            msg: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AnnotateError {
    fn from(err: serde_json::Error) -> Self {
        AnnotateError::Json {
            msg: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for AnnotateError {
    fn from(err: toml::de::Error) -> Self {
        AnnotateError::Config {
            msg: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::InvalidVariant.as_str(), "E1001");
        assert_eq!(ErrorCode::TranscriptNotFound.as_str(), "E2001");
        assert_eq!(ErrorCode::UnsupportedVariantType.as_str(), "E3001");
        assert_eq!(ErrorCode::InvalidTranscriptModel.as_str(), "E4001");
        assert_eq!(ErrorCode::IoError.as_str(), "E9001");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::InvalidBase.description(), "invalid nucleotide base");
        assert_eq!(
            ErrorCode::IncompleteTranslation.description(),
            "translation reached end of transcript"
        );
    }

    #[test]
    fn test_unknown_contig_code() {
        let err = AnnotateError::unknown_contig("chrQ");
        assert_eq!(err.code(), ErrorCode::UnknownContig);
        assert!(err.to_string().contains("chrQ"));
    }

    #[test]
    fn test_only_configuration_is_fatal() {
        assert!(AnnotateError::configuration("NM_1.1", "unsorted exons").is_fatal());
        assert!(!AnnotateError::invalid_variant("ref == alt").is_fatal());
        assert!(!AnnotateError::IncompleteTranslation {
            transcript: "NM_1.1".to_string()
        }
        .is_fatal());
    }

    #[test]
    fn test_detailed_message() {
        let err = AnnotateError::TranscriptNotFound {
            accession: "NM_000257.2".to_string(),
        };
        assert_eq!(
            err.detailed_message(),
            "[E2001] Transcript not found: NM_000257.2"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AnnotateError = io.into();
        assert_eq!(err.code(), ErrorCode::IoError);
    }
}

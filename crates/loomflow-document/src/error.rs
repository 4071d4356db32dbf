//! Error types for the document crate

use thiserror::Error;

/// Result type alias using DocumentError
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Errors that can occur working with workflow documents
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Malformed serialized text
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Serialization failed
    #[error(transparent)]
    Serialize(#[from] SerializeError),
}

/// A document could not be parsed from its serialized form.
///
/// Raised only for genuinely unparsable input; schema violations on a
/// parsed document are the validator's output and never raise.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Malformed structured text, with the offending line
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// Malformed JSON
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Parsed structure does not form a workflow document
    #[error("invalid document: {0}")]
    Document(String),
}

/// A document could not be written out.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

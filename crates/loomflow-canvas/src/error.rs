//! Error types for the canvas crate

use thiserror::Error;

/// Result type alias using CanvasError
pub type Result<T> = std::result::Result<T, CanvasError>;

/// Errors that can occur in the canvas layer
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot compression error
    #[error("compression error: {0}")]
    Compression(String),
}

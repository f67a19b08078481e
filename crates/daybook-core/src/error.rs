//! Error types for daybook-core

use thiserror::Error;

/// Result type alias using daybook-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in daybook-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Remote store call failed (transient; retried on the next pass)
    #[error("Remote store error: {0}")]
    Remote(String),

    /// Remote container could not be resolved; aborts the current pass
    #[error("Container resolution error: {0}")]
    Container(String),

    /// Note not found
    #[error("Note not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

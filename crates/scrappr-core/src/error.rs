//! Error types for scrappr.

use thiserror::Error;

/// Result type alias using scrappr's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for scrappr operations.
///
/// Every error is terminal for the operation that raised it: nothing in
/// the engine retries automatically, and a failed atomic batch leaves the
/// store untouched.
#[derive(Error, Debug)]
pub enum Error {
    /// Input rejected before any write (empty content, empty/duplicate tag)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Microphone capture permission not granted
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Store read/write/batch failed; prior state unchanged
    #[error("Store error: {0}")]
    Store(String),

    /// Note not found
    #[error("Note not found: {0}")]
    NoteNotFound(uuid::Uuid),

    /// Remote transcription rejected the caller's session
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Remote transcription rejected the payload (missing/empty audio)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Internal error (remote processing failure or unexpected state)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

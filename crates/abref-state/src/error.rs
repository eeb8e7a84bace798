//! Error types for abref-state

use thiserror::Error;

/// Errors returned by a check-run store.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The request never produced a response (DNS, TLS, connect, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The token was rejected or lacks the `checks: write` permission.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// The API answered with a non-success status.
    #[error("api error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// Update targeted a check run the store does not know.
    #[error("check run not found: {id}")]
    NotFound { id: u64 },

    /// Client configuration is unusable.
    #[error("invalid store configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StorageError::Deserialization(err.to_string())
        } else {
            StorageError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Deserialization(err.to_string())
    }
}

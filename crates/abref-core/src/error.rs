//! Error taxonomy for an abref invocation.
//!
//! A `Missing` verdict is not an error: it is a legitimate outcome reported
//! through [`crate::InvocationOutcome`].

use abref_state::StorageError;

/// abref invocation errors.
#[derive(Debug, thiserror::Error)]
pub enum AbrefError {
    #[error("this action can only be run on pull request events")]
    InvocationContext,

    #[error("invalid event payload: {0}")]
    EventPayload(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to look up existing check run: {0}")]
    CheckQuery(#[source] StorageError),

    #[error("failed to write check run: {0}")]
    CheckWrite(#[source] StorageError),
}

/// Result type for abref core operations.
pub type Result<T> = std::result::Result<T, AbrefError>;

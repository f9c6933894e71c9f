//! Store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while talking to the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached at all.
    #[error("store unreachable: {0}")]
    Unreachable(String),

    /// The request was sent but failed on the way back.
    #[error("store request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("store returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The path or key cannot be used as a location in the tree.
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// The database URL could not be parsed.
    #[error("invalid database url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A value could not be encoded or a response decoded.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The server ended a live subscription.
    #[error("subscription cancelled by the server: {0}")]
    Cancelled(String),

    /// The handle was shut down.
    #[error("store has been shut down")]
    Closed,
}

impl From<reqwest::Error> for StoreError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            StoreError::Unreachable(error.to_string())
        } else {
            StoreError::Request(error)
        }
    }
}

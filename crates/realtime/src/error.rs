//! Error types for the realtime store client.

use thiserror::Error;

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A path segment was empty or contained the `/` separator.
    #[error("Invalid store path: {0}")]
    InvalidPath(String),

    /// The backend could not be reached or returned a transport-level failure.
    #[error("Store transport error: {0}")]
    Transport(String),

    /// The backend returned a payload that could not be decoded.
    #[error("Store returned malformed data: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Transport(err.to_string())
    }
}

//! Error types for core operations.

use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in core type handling.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid hash format or value.
    #[error("invalid hash: {0}")]
    InvalidHash(String),

    /// Invalid signer key.
    #[error("invalid key: {0}")]
    InvalidKey(String),
}

impl Error {
    /// Create an InvalidHash error.
    pub fn invalid_hash(message: impl Into<String>) -> Self {
        Error::InvalidHash(message.into())
    }

    /// Create an InvalidKey error.
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Error::InvalidKey(message.into())
    }
}

impl From<hex::FromHexError> for Error {
    fn from(e: hex::FromHexError) -> Self {
        Error::InvalidHash(e.to_string())
    }
}

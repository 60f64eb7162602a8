//! Error types for authority resolution.

use thiserror::Error;

/// Result type for authority operations.
pub type Result<T> = std::result::Result<T, AuthorityError>;

/// Errors that can occur while resolving an authority.
#[derive(Debug, Error)]
pub enum AuthorityError {
    /// A configured signer key failed hex decoding or point validation.
    #[error("invalid signer key at slot {slot}: {reason}")]
    InvalidSignerKey {
        /// Position of the key in its table.
        slot: usize,
        /// What went wrong with the key.
        reason: String,
    },
}

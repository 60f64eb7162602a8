//! Error types for chain index operations.

use kedge_core::BlockHash;
use thiserror::Error;

/// Result type for chain index operations.
pub type Result<T> = std::result::Result<T, ChainError>;

/// Errors that can occur in the chain index.
#[derive(Debug, Error)]
pub enum ChainError {
    /// A trimmed solution blob could not be reloaded from storage.
    #[error("solution unavailable for block {0}")]
    SolutionUnavailable(BlockHash),

    /// Storage collaborator failure.
    #[error("storage error: {0}")]
    Storage(String),
}

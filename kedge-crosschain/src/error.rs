//! Error types for proof-chain construction.

use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by the proof-chain engine.
///
/// `NotFound` is recoverable; the caller may retry once more data has
/// been indexed, or fall back to the notary-approval path.
/// `Inconsistent` is fatal for the attempt: the located data contradicts
/// itself and must never be downgraded to a partial proof.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A referenced transaction, block, or notarization is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// Located data is structurally contradictory.
    #[error("inconsistent notarization data: {0}")]
    Inconsistent(String),

    /// An embedded proof blob failed to decode.
    #[error("malformed proof data: {0}")]
    Malformed(String),
}

impl EngineError {
    /// A `NotFound` with a reason.
    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::NotFound(reason.into())
    }

    /// An `Inconsistent` with a reason.
    pub fn inconsistent(reason: impl Into<String>) -> Self {
        Self::Inconsistent(reason.into())
    }

    /// A `Malformed` with a reason.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed(reason.into())
    }
}

//! Notarization records.
//!
//! A notarization is a transaction committed to the hub chain carrying a
//! source chain's MoM (Merkle root over a run of its per-block Merkle
//! roots). Hub-side notarizations additionally carry a MoMoM aggregating
//! MoMs across chains. A back-notarization is the receipt on the source
//! chain acknowledging that the hub accepted its notarization.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::crypto::{BlockHash, Hash, TxId};

/// A chain's declared symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChainSymbol(String);

impl ChainSymbol {
    /// Create a new symbol.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The symbol as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether the symbol starts with `prefix`.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for ChainSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChainSymbol {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Payload of a notarization transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notarization {
    /// Symbol of the source chain.
    pub symbol: ChainSymbol,
    /// Height on the source chain this notarization covers.
    pub height: u64,
    /// Hash of the notarized source-chain block.
    pub block_hash: BlockHash,
    /// Merkle root over `mom_depth` consecutive source-chain block roots.
    pub mom: Hash,
    /// Number of source-chain blocks folded into the MoM.
    pub mom_depth: u32,
    /// Aggregate cross-chain root; zero except on the hub's own
    /// notarizations.
    pub momom: Hash,
    /// Epoch/version of the authority set that produced this record.
    pub cc_id: u32,
    /// For back-notarizations: the hub notarization transaction being
    /// acknowledged. Zero otherwise.
    pub ack_txid: TxId,
}

/// A notarization as observed in a block: its transaction id plus payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotarizationRecord {
    /// Transaction id of the notarization.
    pub txid: TxId,
    /// The notarization payload.
    pub data: Notarization,
}

impl NotarizationRecord {
    /// Create a new record.
    pub fn new(txid: TxId, data: Notarization) -> Self {
        Self { txid, data }
    }
}

//! Collaborator contracts the engine reads through.
//!
//! The engine never owns chain state or storage. It reads the hub chain
//! through [`ChainSource`], notarization records through
//! [`NotarizationStore`], and transactions through [`TxIndex`]. All three
//! are expected to be consistent for the duration of one engine call;
//! callers hold the chain lock across it.

use kedge_chain::ChainView;
use kedge_core::{BlockHash, Hash, NotarizationRecord, Transaction, TxId};

/// Read access to the active chain.
pub trait ChainSource {
    /// Height of the active tip, `None` for an empty chain.
    fn active_height(&self) -> Option<u64>;

    /// Block hash at `height` on the active chain.
    fn block_hash_at(&self, height: u64) -> Option<BlockHash>;

    /// Transaction Merkle root at `height` on the active chain.
    fn merkle_root_at(&self, height: u64) -> Option<Hash>;

    /// Block timestamp at `height` on the active chain.
    fn time_at(&self, height: u64) -> Option<i64>;
}

impl ChainSource for ChainView {
    fn active_height(&self) -> Option<u64> {
        self.height()
    }

    fn block_hash_at(&self, height: u64) -> Option<BlockHash> {
        self.hash_at(height)
    }

    fn merkle_root_at(&self, height: u64) -> Option<Hash> {
        self.merkle_root_at(height)
    }

    fn time_at(&self, height: u64) -> Option<i64> {
        self.time_at(height)
    }
}

/// Lookup of notarization records observed on chain.
pub trait NotarizationStore {
    /// All notarization records committed in the block with `hash`, or
    /// `None` when the block carries none (or is unknown).
    fn notarizations_in_block(&self, hash: &BlockHash) -> Option<Vec<NotarizationRecord>>;

    /// The back-notarization receipt acknowledging the hub notarization
    /// `notarization_txid`.
    fn back_notarization(&self, notarization_txid: &TxId) -> Option<NotarizationRecord>;
}

/// Lookup of transactions by id.
pub trait TxIndex {
    /// A confirmed transaction plus the height of its confirming block.
    fn confirmed_tx(&self, txid: &TxId) -> Option<(Transaction, u64)>;

    /// An unconfirmed (mempool) transaction.
    fn unconfirmed_tx(&self, txid: &TxId) -> Option<Transaction>;

    /// Ordered transaction ids of the block at `height`, or `None` when
    /// the block body has been pruned.
    fn block_txids(&self, height: u64) -> Option<Vec<TxId>>;
}

//! Mock collaborators for testing and development.
//!
//! [`MockChain`] simulates an active chain with settable per-block
//! Merkle roots; [`MockLedger`] backs the notarization and transaction
//! lookups with plain maps. Both are built up-front by the test and then
//! read immutably through the collaborator traits.

use std::collections::HashMap;

use kedge_core::{hash, BlockHash, Hash, NotarizationRecord, Transaction, TxId};

use crate::traits::{ChainSource, NotarizationStore, TxIndex};

#[derive(Debug, Clone)]
struct MockBlock {
    hash: BlockHash,
    merkle_root: Hash,
    time: i64,
}

/// An in-memory active chain, one synthetic block per height.
#[derive(Debug, Default)]
pub struct MockChain {
    blocks: Vec<MockBlock>,
}

impl MockChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow the chain until its tip is at `height`.
    pub fn extend_to(&mut self, height: u64) {
        while self.blocks.len() <= height as usize {
            let n = self.blocks.len() as u64;
            self.blocks.push(MockBlock {
                hash: BlockHash(hash(format!("block-{n}").as_bytes())),
                merkle_root: hash(format!("root-{n}").as_bytes()),
                time: 1_600_000_000 + n as i64 * 60,
            });
        }
    }

    /// Replace the Merkle root of the block at `height`.
    ///
    /// # Panics
    ///
    /// Panics when `height` is beyond the tip.
    pub fn set_merkle_root(&mut self, height: u64, root: Hash) {
        self.blocks[height as usize].merkle_root = root;
    }

    /// The hash of the block at `height`.
    ///
    /// # Panics
    ///
    /// Panics when `height` is beyond the tip.
    pub fn block_hash(&self, height: u64) -> BlockHash {
        self.blocks[height as usize].hash
    }
}

impl ChainSource for MockChain {
    fn active_height(&self) -> Option<u64> {
        self.blocks.len().checked_sub(1).map(|h| h as u64)
    }

    fn block_hash_at(&self, height: u64) -> Option<BlockHash> {
        self.blocks.get(height as usize).map(|b| b.hash)
    }

    fn merkle_root_at(&self, height: u64) -> Option<Hash> {
        self.blocks.get(height as usize).map(|b| b.merkle_root)
    }

    fn time_at(&self, height: u64) -> Option<i64> {
        self.blocks.get(height as usize).map(|b| b.time)
    }
}

/// Map-backed notarization and transaction storage.
#[derive(Debug, Default)]
pub struct MockLedger {
    notarizations: HashMap<BlockHash, Vec<NotarizationRecord>>,
    back_notarizations: HashMap<TxId, NotarizationRecord>,
    confirmed: HashMap<TxId, (Transaction, u64)>,
    mempool: HashMap<TxId, Transaction>,
    block_txids: HashMap<u64, Vec<TxId>>,
}

impl MockLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a notarization as observed in the block with `block_hash`.
    pub fn add_notarization(&mut self, block_hash: BlockHash, record: NotarizationRecord) {
        self.notarizations.entry(block_hash).or_default().push(record);
    }

    /// Record the back-notarization receipt for `hub_txid`.
    pub fn add_back_notarization(&mut self, hub_txid: TxId, receipt: NotarizationRecord) {
        self.back_notarizations.insert(hub_txid, receipt);
    }

    /// Confirm `tx` at `height`, returning its id.
    pub fn confirm_tx(&mut self, tx: Transaction, height: u64) -> TxId {
        let txid = tx.txid();
        self.confirmed.insert(txid, (tx, height));
        txid
    }

    /// Register a confirmed transaction under an explicit id. Used when
    /// the id is computed elsewhere (burn payloads, notarization
    /// markers).
    pub fn insert_confirmed(&mut self, txid: TxId, tx: Transaction, height: u64) {
        self.confirmed.insert(txid, (tx, height));
    }

    /// Add `tx` to the mempool, returning its id.
    pub fn add_mempool_tx(&mut self, tx: Transaction) -> TxId {
        let txid = tx.txid();
        self.mempool.insert(txid, tx);
        txid
    }

    /// Set the ordered transaction ids of the block at `height`.
    pub fn set_block_txids(&mut self, height: u64, txids: Vec<TxId>) {
        self.block_txids.insert(height, txids);
    }
}

impl NotarizationStore for MockLedger {
    fn notarizations_in_block(&self, hash: &BlockHash) -> Option<Vec<NotarizationRecord>> {
        self.notarizations.get(hash).cloned()
    }

    fn back_notarization(&self, notarization_txid: &TxId) -> Option<NotarizationRecord> {
        self.back_notarizations.get(notarization_txid).cloned()
    }
}

impl TxIndex for MockLedger {
    fn confirmed_tx(&self, txid: &TxId) -> Option<(Transaction, u64)> {
        self.confirmed.get(txid).cloned()
    }

    fn unconfirmed_tx(&self, txid: &TxId) -> Option<Transaction> {
        self.mempool.get(txid).cloned()
    }

    fn block_txids(&self, height: u64) -> Option<Vec<TxId>> {
        self.block_txids.get(&height).cloned()
    }
}

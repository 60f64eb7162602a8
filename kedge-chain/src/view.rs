//! The shared, lockable chain view.
//!
//! The hub tip and block index are shared mutable state guarded by one
//! exclusive lock. Every mutation and every read that depends on a
//! consistent height/ancestor picture must happen under a single guard;
//! ancestor pointers may be rewritten mid-walk during a reorg otherwise.
//! The proof engine borrows a locked view for the duration of each
//! operation and takes no locks of its own.

use std::sync::Arc;

use kedge_core::{BlockHash, Hash};
use parking_lot::RwLock;

use crate::active::ActiveChain;
use crate::index::{BlockArena, BlockHeaderInfo, EntryId};

/// A consistent snapshot of the block index plus the active chain.
#[derive(Debug, Default)]
pub struct ChainView {
    /// The block index arena.
    pub arena: BlockArena,
    /// The active (best) chain over the arena.
    pub active: ActiveChain,
}

impl ChainView {
    /// Create an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect a block and, when `make_tip` is set, advance the active
    /// chain to it. Returns the new entry's handle.
    pub fn connect(
        &mut self,
        parent: Option<EntryId>,
        header: BlockHeaderInfo,
        make_tip: bool,
    ) -> EntryId {
        let id = self.arena.connect(parent, header);
        if make_tip {
            self.active.set_tip(&self.arena, Some(id));
        }
        id
    }

    /// Height of the active tip.
    pub fn height(&self) -> Option<u64> {
        self.active.height()
    }

    /// Block hash at `height` on the active chain.
    pub fn hash_at(&self, height: u64) -> Option<BlockHash> {
        self.active
            .entry_at(height)
            .map(|id| self.arena.entry(id).hash)
    }

    /// Transaction Merkle root at `height` on the active chain.
    pub fn merkle_root_at(&self, height: u64) -> Option<Hash> {
        self.active
            .entry_at(height)
            .map(|id| self.arena.entry(id).merkle_root)
    }

    /// Block timestamp at `height` on the active chain.
    pub fn time_at(&self, height: u64) -> Option<i64> {
        self.active
            .entry_at(height)
            .map(|id| self.arena.entry(id).time)
    }
}

/// Handle to a chain view shared across threads behind its single lock.
pub type SharedChain = Arc<RwLock<ChainView>>;

/// Create a new shared, empty chain view.
pub fn shared_chain() -> SharedChain {
    Arc::new(RwLock::new(ChainView::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kedge_core::hash;

    fn header(n: u64) -> BlockHeaderInfo {
        BlockHeaderInfo {
            hash: BlockHash(hash(&n.to_le_bytes())),
            time: 1_600_000_000 + n as i64,
            bits: 0,
            merkle_root: hash(format!("r{n}").as_bytes()),
            solution: Vec::new(),
        }
    }

    #[test]
    fn test_connect_and_lookup() {
        let mut view = ChainView::new();
        let g = view.connect(None, header(0), true);
        let b1 = view.connect(Some(g), header(1), true);

        assert_eq!(view.height(), Some(1));
        assert_eq!(view.hash_at(1), Some(view.arena.entry(b1).hash));
        assert_eq!(view.merkle_root_at(0), Some(view.arena.entry(g).merkle_root));
        assert!(view.hash_at(2).is_none());
    }

    #[test]
    fn test_shared_chain_locks() {
        let chain = shared_chain();
        {
            let mut guard = chain.write();
            let g = guard.connect(None, header(0), true);
            guard.connect(Some(g), header(1), true);
        }
        let guard = chain.read();
        assert_eq!(guard.height(), Some(1));
    }
}

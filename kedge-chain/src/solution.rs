//! Lazily-evictable solution blobs.
//!
//! The proof-of-work solution is by far the largest header field. Once a
//! block's index entry is durably persisted the in-memory copy can be
//! trimmed; reconstructing a full header afterwards reloads the blob from
//! the storage collaborator.

use kedge_core::{BlockHash, Hash};

use crate::error::{ChainError, Result};
use crate::index::{BlockArena, EntryId};

/// A solution blob that is either resident in memory or evicted to
/// persistent storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Solution {
    /// The blob is held in memory.
    Resident(Vec<u8>),
    /// The blob has been trimmed; reload it through a [`SolutionStore`].
    Persisted,
}

impl Solution {
    /// Whether the blob is resident.
    pub fn is_resident(&self) -> bool {
        matches!(self, Solution::Resident(_))
    }

    /// Drop a resident blob. Only valid once the entry is durably stored;
    /// returns whether anything was evicted.
    pub fn trim(&mut self) -> bool {
        match self {
            Solution::Resident(_) => {
                *self = Solution::Persisted;
                true
            }
            Solution::Persisted => false,
        }
    }
}

/// Storage collaborator able to reload evicted solution blobs.
pub trait SolutionStore {
    /// Load the solution blob for `hash`.
    fn load_solution(&self, hash: &BlockHash) -> Result<Vec<u8>>;
}

/// A fully reconstructed block header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    /// Hash of the parent block; zero for genesis.
    pub prev_hash: BlockHash,
    /// Merkle root over the block's transactions.
    pub merkle_root: Hash,
    /// Block timestamp.
    pub time: i64,
    /// Difficulty bits.
    pub bits: u32,
    /// Proof-of-work solution.
    pub solution: Vec<u8>,
}

impl BlockArena {
    /// Reconstruct the full header for `id`, reloading the solution blob
    /// from `store` when it has been trimmed.
    pub fn header<S: SolutionStore>(&self, id: EntryId, store: &S) -> Result<BlockHeader> {
        let entry = self.entry(id);
        let solution = match &entry.solution {
            Solution::Resident(bytes) => bytes.clone(),
            Solution::Persisted => store.load_solution(&entry.hash)?,
        };

        Ok(BlockHeader {
            prev_hash: entry
                .parent
                .map(|p| self.entry(p).hash)
                .unwrap_or_default(),
            merkle_root: entry.merkle_root,
            time: entry.time,
            bits: entry.bits,
            solution,
        })
    }

    /// Trim the solution blob of `id`. Returns whether anything was
    /// evicted.
    pub fn trim_solution(&mut self, id: EntryId) -> bool {
        self.entry_mut(id).solution.trim()
    }
}

/// Convenience store used when every solution is expected to be resident.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSolutionStore;

impl SolutionStore for NoSolutionStore {
    fn load_solution(&self, hash: &BlockHash) -> Result<Vec<u8>> {
        Err(ChainError::SolutionUnavailable(*hash))
    }
}

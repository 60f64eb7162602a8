//! The active chain: an array-backed view of the current best chain.
//!
//! Slots are indexed by height, so membership and lookup are O(1). Tip
//! changes reuse the longest common prefix with the previous chain, which
//! bounds reorg work to the length of the diverging segment.

use kedge_core::BlockHash;

use crate::index::{BlockArena, EntryId};

/// The currently-best chain, indexed by height.
///
/// Invariant: `entry_at(h)` has height `h` for every populated slot.
#[derive(Debug, Default)]
pub struct ActiveChain {
    slots: Vec<EntryId>,
}

impl ActiveChain {
    /// Create an empty chain view.
    pub fn new() -> Self {
        Self::default()
    }

    /// The tip entry, if the chain is non-empty.
    pub fn tip(&self) -> Option<EntryId> {
        self.slots.last().copied()
    }

    /// Height of the tip, if the chain is non-empty.
    pub fn height(&self) -> Option<u64> {
        self.slots.len().checked_sub(1).map(|h| h as u64)
    }

    /// The entry at `height`, if populated.
    pub fn entry_at(&self, height: u64) -> Option<EntryId> {
        self.slots.get(height as usize).copied()
    }

    /// O(1) membership test: is `id` on the active chain?
    pub fn contains(&self, arena: &BlockArena, id: EntryId) -> bool {
        self.entry_at(arena.entry(id).height) == Some(id)
    }

    /// Rebuild the view to represent the chain ending at `tip`.
    ///
    /// Walks parent links downward only while the slot at each height does
    /// not already hold the walked entry, so switching tips costs the
    /// length of the diverging suffix. Returns the number of slots
    /// rewritten.
    pub fn set_tip(&mut self, arena: &BlockArena, tip: Option<EntryId>) -> usize {
        let Some(tip) = tip else {
            self.slots.clear();
            return 0;
        };

        let target_len = arena.entry(tip).height as usize + 1;

        let mut suffix = Vec::new();
        let mut cursor = Some(tip);
        while let Some(id) = cursor {
            let entry = arena.entry(id);
            let h = entry.height as usize;
            if h < self.slots.len() && self.slots[h] == id {
                break;
            }
            suffix.push(id);
            cursor = entry.parent;
        }

        let rewritten = suffix.len();
        self.slots.truncate(target_len - rewritten);
        self.slots.extend(suffix.into_iter().rev());
        debug_assert_eq!(self.slots.len(), target_len);
        rewritten
    }

    /// The highest entry that is both an ancestor of `id` and a member of
    /// this chain.
    pub fn find_fork(&self, arena: &BlockArena, id: EntryId) -> Option<EntryId> {
        let chain_height = self.height()?;

        let mut cursor = if arena.entry(id).height > chain_height {
            arena.ancestor_at(id, chain_height)?
        } else {
            id
        };

        while !self.contains(arena, cursor) {
            cursor = arena.entry(cursor).parent?;
        }
        Some(cursor)
    }

    /// Produce a block locator: an exponentially-sparse list of ancestor
    /// hashes ending at genesis.
    ///
    /// Starts from `from` (or the tip when `None`). Step size doubles once
    /// the locator holds more than 10 entries; genesis is always the final
    /// element.
    pub fn locator(&self, arena: &BlockArena, from: Option<EntryId>) -> Vec<BlockHash> {
        let mut have = Vec::with_capacity(32);
        let Some(mut cursor) = from.or_else(|| self.tip()) else {
            return have;
        };

        let mut step = 1u64;
        loop {
            let entry = arena.entry(cursor);
            have.push(entry.hash);
            if entry.height == 0 {
                break;
            }

            let next_height = entry.height.saturating_sub(step);
            cursor = if self.contains(arena, cursor) {
                // O(1) height lookup while still on the active chain
                match self.entry_at(next_height) {
                    Some(id) => id,
                    None => break,
                }
            } else {
                match arena.ancestor_at(cursor, next_height) {
                    Some(id) => id,
                    None => break,
                }
            };

            if have.len() > 10 {
                step *= 2;
            }
        }

        have
    }
}

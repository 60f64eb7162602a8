//! Property-based tests for the block index.
//!
//! Uses proptest to verify that the skip-pointer walk, the active-chain
//! rebuild, and locator generation hold for arbitrary chain shapes,
//! checked against a naive parent-walk oracle.

use proptest::prelude::*;

use kedge_core::{hash, BlockHash, Hash};

use crate::active::ActiveChain;
use crate::index::{BlockArena, BlockHeaderInfo, EntryId};

fn header(tag: u64) -> BlockHeaderInfo {
    BlockHeaderInfo {
        hash: BlockHash(hash(&tag.to_le_bytes())),
        time: 1_600_000_000 + tag as i64,
        bits: 0x1d00ffff,
        merkle_root: Hash::ZERO,
        solution: Vec::new(),
    }
}

fn extend(arena: &mut BlockArena, from: Option<EntryId>, tag: u64, len: u64) -> Vec<EntryId> {
    let mut ids = Vec::new();
    let mut parent = from;
    for i in 0..len {
        let id = arena.connect(parent, header(tag * 1_000_000 + i));
        ids.push(id);
        parent = Some(id);
    }
    ids
}

/// Reference oracle: walk parent links one step at a time.
fn naive_ancestor(arena: &BlockArena, id: EntryId, height: u64) -> Option<EntryId> {
    let mut cursor = id;
    if height > arena.entry(id).height {
        return None;
    }
    while arena.entry(cursor).height > height {
        cursor = arena.entry(cursor).parent?;
    }
    Some(cursor)
}

proptest! {
    #[test]
    fn ancestor_matches_naive_oracle(
        len in 1u64..3000,
        queries in prop::collection::vec(any::<u64>(), 1..32),
    ) {
        let mut arena = BlockArena::new();
        let ids = extend(&mut arena, None, 0, len);
        let tip = *ids.last().unwrap();

        for q in queries {
            let target = q % len;
            prop_assert_eq!(
                arena.ancestor_at(tip, target),
                naive_ancestor(&arena, tip, target)
            );
        }
    }

    #[test]
    fn ancestor_every_height_matches_oracle(len in 1u64..400) {
        let mut arena = BlockArena::new();
        let ids = extend(&mut arena, None, 0, len);
        let tip = *ids.last().unwrap();

        for target in 0..len {
            prop_assert_eq!(arena.ancestor_at(tip, target), Some(ids[target as usize]));
        }
    }

    #[test]
    fn ancestor_on_random_fork_shapes(
        trunk_len in 2u64..500,
        fork_frac in 0.0f64..1.0,
        branch_len in 1u64..500,
        target_frac in 0.0f64..1.0,
    ) {
        let mut arena = BlockArena::new();
        let trunk = extend(&mut arena, None, 0, trunk_len);

        let fork_at = ((trunk_len - 1) as f64 * fork_frac) as u64;
        let branch = extend(&mut arena, Some(trunk[fork_at as usize]), 1, branch_len);
        let branch_tip = *branch.last().unwrap();

        let branch_height = fork_at + branch_len;
        let target = (branch_height as f64 * target_frac) as u64;

        let expected = if target <= fork_at {
            trunk[target as usize]
        } else {
            branch[(target - fork_at - 1) as usize]
        };
        prop_assert_eq!(arena.ancestor_at(branch_tip, target), Some(expected));
    }

    #[test]
    fn set_tip_rewrites_only_divergence(
        shared in 1u64..200,
        a_extra in 1u64..200,
        b_extra in 1u64..200,
    ) {
        let mut arena = BlockArena::new();
        let trunk = extend(&mut arena, None, 0, shared);
        let fork = *trunk.last().unwrap();
        let a = extend(&mut arena, Some(fork), 1, a_extra);
        let b = extend(&mut arena, Some(fork), 2, b_extra);

        let mut chain = ActiveChain::new();
        chain.set_tip(&arena, Some(*a.last().unwrap()));
        let written = chain.set_tip(&arena, Some(*b.last().unwrap()));

        prop_assert_eq!(written as u64, b_extra);
        prop_assert_eq!(chain.height(), Some(shared - 1 + b_extra));
        prop_assert_eq!(chain.entry_at(shared - 1), Some(fork));
    }

    #[test]
    fn locator_is_sparse_and_ends_at_genesis(len in 1u64..4000) {
        let mut arena = BlockArena::new();
        let ids = extend(&mut arena, None, 0, len);

        let mut chain = ActiveChain::new();
        chain.set_tip(&arena, Some(*ids.last().unwrap()));

        let locator = chain.locator(&arena, None);
        prop_assert_eq!(locator.last(), Some(&arena.entry(ids[0]).hash));

        let log_bound = 64 - len.leading_zeros() as usize;
        prop_assert!(locator.len() <= 12 + 2 * log_bound);
    }
}

//! Property-based tests for core types.

use proptest::prelude::*;

use crate::crypto::Hash;
use crate::merkle::{compute_branch, compute_root, exec_branch};
use crate::proof::MerkleBranch;

fn arb_bytes32() -> impl Strategy<Value = [u8; 32]> {
    prop::array::uniform32(any::<u8>())
}

fn arb_hash() -> impl Strategy<Value = Hash> {
    arb_bytes32().prop_map(Hash::from_bytes)
}

fn arb_leaves(max: usize) -> impl Strategy<Value = Vec<Hash>> {
    prop::collection::vec(arb_hash(), 1..max)
}

proptest! {
    #[test]
    fn every_leaf_branch_verifies(leaves in arb_leaves(64)) {
        let root = compute_root(&leaves);
        for (i, leaf) in leaves.iter().enumerate() {
            let branch = compute_branch(&leaves, i).expect("index in range");
            prop_assert_eq!(exec_branch(*leaf, &branch, i as u64), root);
        }
    }

    #[test]
    fn flipping_any_leaf_changes_the_root(
        leaves in arb_leaves(32),
        pick in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let root = compute_root(&leaves);
        let i = pick.index(leaves.len());

        let mut mutated = leaves.clone();
        let mut bytes = *mutated[i].as_bytes();
        bytes[0] ^= 1 << bit;
        mutated[i] = Hash::from_bytes(bytes);

        prop_assert_ne!(compute_root(&mutated), root);
    }

    #[test]
    fn composed_branch_matches_two_layer_root(
        lower_leaves in arb_leaves(16),
        upper_leaves in arb_leaves(16),
        pick_lower in any::<prop::sample::Index>(),
        pick_upper in any::<prop::sample::Index>(),
    ) {
        let li = pick_lower.index(lower_leaves.len());
        let ui = pick_upper.index(upper_leaves.len());

        // Plant the lower root as a leaf of the upper layer
        let lower_root = compute_root(&lower_leaves);
        let mut upper_leaves = upper_leaves;
        upper_leaves[ui] = lower_root;
        let top = compute_root(&upper_leaves);

        let lower = MerkleBranch::new(li as u64, compute_branch(&lower_leaves, li).unwrap());
        let upper = MerkleBranch::new(ui as u64, compute_branch(&upper_leaves, ui).unwrap());
        let combined = lower.compose(upper);

        prop_assert_eq!(combined.exec(lower_leaves[li]), top);
    }

    #[test]
    fn hash_hex_roundtrip(h in arb_hash()) {
        prop_assert_eq!(Hash::from_hex(&h.to_hex()).unwrap(), h);
    }
}

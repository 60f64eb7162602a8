//! Merkle tree construction over hash leaves.
//!
//! Trees here follow the block convention used across the network: levels
//! with an odd node count pair the last node with itself. Branch indices
//! therefore address leaves bit-by-bit from the bottom, which is what makes
//! branches from adjacent layers composable (see [`crate::proof`]).

use crate::crypto::{hash_pair, Hash};

/// Compute the Merkle root of a list of leaf hashes.
///
/// Empty input yields [`Hash::ZERO`]; a single leaf is its own root.
pub fn compute_root(leaves: &[Hash]) -> Hash {
    if leaves.is_empty() {
        return Hash::ZERO;
    }

    let mut level = leaves.to_vec();
    while level.len() > 1 {
        level = next_level(&level);
    }
    level[0]
}

/// Compute the Merkle branch for the leaf at `index`.
///
/// Returns the sibling hashes from leaf level to root, or `None` when the
/// index is out of range. A leaf duplicated to fill an odd level is its own
/// sibling.
pub fn compute_branch(leaves: &[Hash], index: usize) -> Option<Vec<Hash>> {
    if index >= leaves.len() {
        return None;
    }

    let mut branch = Vec::new();
    let mut level = leaves.to_vec();
    let mut idx = index;

    while level.len() > 1 {
        let sibling = std::cmp::min(idx ^ 1, level.len() - 1);
        branch.push(level[sibling]);
        level = next_level(&level);
        idx >>= 1;
    }

    Some(branch)
}

/// Re-compute the root implied by a leaf, its branch, and its index.
pub fn exec_branch(leaf: Hash, branch: &[Hash], index: u64) -> Hash {
    let mut current = leaf;
    let mut idx = index;

    for sibling in branch {
        if idx & 1 == 1 {
            current = hash_pair(*sibling, current);
        } else {
            current = hash_pair(current, *sibling);
        }
        idx >>= 1;
    }

    current
}

fn next_level(level: &[Hash]) -> Vec<Hash> {
    let mut next = Vec::with_capacity((level.len() + 1) / 2);
    for pair in level.chunks(2) {
        let left = pair[0];
        let right = if pair.len() == 2 { pair[1] } else { pair[0] };
        next.push(hash_pair(left, right));
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash;

    fn leaves(n: usize) -> Vec<Hash> {
        (0..n).map(|i| hash(&[i as u8])).collect()
    }

    #[test]
    fn test_root_empty() {
        assert_eq!(compute_root(&[]), Hash::ZERO);
    }

    #[test]
    fn test_root_single() {
        let l = leaves(1);
        assert_eq!(compute_root(&l), l[0]);
    }

    #[test]
    fn test_root_two() {
        let l = leaves(2);
        assert_eq!(compute_root(&l), hash_pair(l[0], l[1]));
    }

    #[test]
    fn test_root_odd_duplicates_last() {
        let l = leaves(3);
        let expected = hash_pair(hash_pair(l[0], l[1]), hash_pair(l[2], l[2]));
        assert_eq!(compute_root(&l), expected);
    }

    #[test]
    fn test_branch_verifies_every_leaf() {
        for n in 1..=17 {
            let l = leaves(n);
            let root = compute_root(&l);
            for (i, leaf) in l.iter().enumerate() {
                let branch = compute_branch(&l, i).expect("index in range");
                assert_eq!(
                    exec_branch(*leaf, &branch, i as u64),
                    root,
                    "leaf {} of {}",
                    i,
                    n
                );
            }
        }
    }

    #[test]
    fn test_branch_out_of_range() {
        let l = leaves(4);
        assert!(compute_branch(&l, 4).is_none());
    }

    #[test]
    fn test_wrong_leaf_fails() {
        let l = leaves(8);
        let root = compute_root(&l);
        let branch = compute_branch(&l, 3).unwrap();
        assert_ne!(exec_branch(l[4], &branch, 3), root);
    }

    #[test]
    fn test_mutated_sibling_fails() {
        let l = leaves(8);
        let root = compute_root(&l);
        let mut branch = compute_branch(&l, 5).unwrap();
        let mut bytes = *branch[1].as_bytes();
        bytes[0] ^= 1;
        branch[1] = Hash::from_bytes(bytes);
        assert_ne!(exec_branch(l[5], &branch, 5), root);
    }
}

//! Boundary condition tests for proof composition.
//!
//! Exercises the layer shapes that show up in production: odd leaf
//! counts (duplicated last node), single-entry layers (empty branches),
//! and deep stacks, plus the index bit-packing across layers.

use kedge_core::{compute_branch, compute_root, hash, Hash, MerkleBranch, TxId, TxProof};

fn leaves(tag: u8, n: usize) -> Vec<Hash> {
    (0..n).map(|i| hash(&[tag, i as u8])).collect()
}

/// Plant `leaf` at `index` in a fresh layer and return the layer, its
/// root, and the branch for that position.
fn layer_over(leaf: Hash, tag: u8, n: usize, index: usize) -> (Hash, MerkleBranch) {
    let mut layer = leaves(tag, n);
    layer[index] = leaf;
    let root = compute_root(&layer);
    let branch = MerkleBranch::new(index as u64, compute_branch(&layer, index).unwrap());
    (root, branch)
}

#[test]
fn odd_layer_counts_at_every_level() {
    // 3 txs in the block, 5 block roots in the MoM, 7 MoMs in the MoMoM;
    // every level has a duplicated last node somewhere.
    let txid = TxId(hash(b"odd-tx"));

    let (block_root, tx_branch) = layer_over(txid.0, 1, 3, 2);
    let (mom, block_branch) = layer_over(block_root, 2, 5, 4);
    let (momom, mom_branch) = layer_over(mom, 3, 7, 6);

    let full = tx_branch.compose(block_branch).compose(mom_branch);
    assert_eq!(full.exec(txid.0), momom);
}

#[test]
fn last_position_of_odd_layer_is_its_own_sibling() {
    let layer = leaves(4, 5);
    let root = compute_root(&layer);
    let branch = compute_branch(&layer, 4).unwrap();

    // The first sibling is the leaf itself (paired with itself)
    assert_eq!(branch[0], layer[4]);
    assert_eq!(MerkleBranch::new(4, branch).exec(layer[4]), root);
}

#[test]
fn single_entry_layers_contribute_empty_branches() {
    // A block with one tx and a MoM over one block root: both lower
    // branches are empty and the combined proof is just the top branch.
    let txid = TxId(hash(b"solo"));

    let block_root = compute_root(&[txid.0]);
    assert_eq!(block_root, txid.0);
    let tx_branch = MerkleBranch::new(0, compute_branch(&[txid.0], 0).unwrap());
    assert!(tx_branch.hashes.is_empty());

    let mom = compute_root(&[block_root]);
    let block_branch = MerkleBranch::new(0, compute_branch(&[block_root], 0).unwrap());

    let (momom, mom_branch) = layer_over(mom, 5, 4, 1);
    let full = tx_branch.compose(block_branch).compose(mom_branch.clone());

    assert_eq!(full.exec(txid.0), momom);
    // Degenerate lower layers leave the index and hashes untouched
    assert_eq!(full.index, mom_branch.index);
    assert_eq!(full.hashes.len(), mom_branch.hashes.len());
}

#[test]
fn combined_index_packs_lower_bits_first() {
    let txid = TxId(hash(b"packed"));

    // 8 txs (3 index bits), 4 block roots (2 bits), 2 MoMs (1 bit)
    let (block_root, tx_branch) = layer_over(txid.0, 6, 8, 5);
    let (mom, block_branch) = layer_over(block_root, 7, 4, 3);
    let (momom, mom_branch) = layer_over(mom, 8, 2, 1);

    let full = tx_branch.compose(block_branch).compose(mom_branch);
    assert_eq!(full.index, 5 | (3 << 3) | (1 << 5));
    assert_eq!(full.hashes.len(), 3 + 2 + 1);
    assert_eq!(full.exec(txid.0), momom);
}

#[test]
fn mid_layer_tampering_breaks_the_top_root() {
    let txid = TxId(hash(b"tamper"));

    let (block_root, tx_branch) = layer_over(txid.0, 9, 4, 1);
    let (mom, block_branch) = layer_over(block_root, 10, 4, 2);
    let (momom, mom_branch) = layer_over(mom, 11, 4, 3);

    let full = tx_branch.compose(block_branch).compose(mom_branch);
    assert_eq!(full.exec(txid.0), momom);

    for i in 0..full.hashes.len() {
        let mut tampered = full.clone();
        let mut bytes = *tampered.hashes[i].as_bytes();
        bytes[31] ^= 0x80;
        tampered.hashes[i] = Hash::from_bytes(bytes);
        assert_ne!(tampered.exec(txid.0), momom, "sibling {i}");
    }
}

#[test]
fn proof_anchor_rides_along() {
    let txid = TxId(hash(b"anchored"));
    let (root, branch) = layer_over(txid.0, 12, 6, 0);

    let anchor = TxId(hash(b"the-notarization"));
    let proof = TxProof::new(anchor, branch);

    assert_eq!(proof.anchor, anchor);
    assert_eq!(proof.exec(txid), root);
}

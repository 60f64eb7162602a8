//! Composable transaction proofs.
//!
//! A [`TxProof`] ties a transaction to a Merkle root via a branch whose
//! layers can be stacked: tx → block root, block roots → MoM, MoMs → MoMoM.
//! Concatenating a lower-layer branch with the branch of the layer above
//! yields a single branch that executes from the original leaf all the way
//! to the top root.

use serde::{Deserialize, Serialize};

use crate::crypto::{Hash, TxId};
use crate::merkle::exec_branch;

/// A Merkle branch: sibling hashes from leaf to root plus the leaf index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleBranch {
    /// Index of the leaf within its layer.
    pub index: u64,
    /// Sibling hashes, lowest layer first.
    pub hashes: Vec<Hash>,
}

impl MerkleBranch {
    /// Create a branch from an index and sibling hashes.
    pub fn new(index: u64, hashes: Vec<Hash>) -> Self {
        Self { index, hashes }
    }

    /// Execute the branch from `leaf`, returning the implied root.
    pub fn exec(&self, leaf: Hash) -> Hash {
        exec_branch(leaf, &self.hashes, self.index)
    }

    /// Stack `upper` on top of this branch.
    ///
    /// `self` is the lower layer; its root is the leaf `upper` proves. The
    /// combined index places the lower index in the low bits and the upper
    /// index above them, so execution still consumes index bits bottom-up.
    pub fn compose(mut self, upper: MerkleBranch) -> MerkleBranch {
        self.index |= upper.index << self.hashes.len();
        self.hashes.extend(upper.hashes);
        self
    }
}

/// A proof anchoring a transaction to a Merkle root, identified by the
/// notarization transaction that commits that root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxProof {
    /// The notarization transaction the proof is anchored to.
    pub anchor: TxId,
    /// Branch from the transaction to the anchored root.
    pub branch: MerkleBranch,
}

impl TxProof {
    /// Create a new proof.
    pub fn new(anchor: TxId, branch: MerkleBranch) -> Self {
        Self { anchor, branch }
    }

    /// Execute the proof for `txid`, returning the implied root.
    pub fn exec(&self, txid: TxId) -> Hash {
        self.branch.exec(txid.0)
    }
}

/// A proven transaction within a partial block proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenTx {
    /// The transaction id.
    pub txid: TxId,
    /// Branch from the transaction to the block Merkle root.
    pub branch: MerkleBranch,
}

/// A self-contained partial-block Merkle proof: a claimed block root plus
/// one or more proven transactions. Embedded in notary approval payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTxProof {
    /// The block's Merkle root the proof resolves to.
    pub merkle_root: Hash,
    /// Transactions proven against that root.
    pub proven: Vec<ProvenTx>,
}

impl BlockTxProof {
    /// Check that every proven transaction's branch resolves to the claimed
    /// block root.
    pub fn verify(&self) -> bool {
        !self.proven.is_empty()
            && self
                .proven
                .iter()
                .all(|p| p.branch.exec(p.txid.0) == self.merkle_root)
    }

    /// Check whether `txid` is among the proven transactions.
    pub fn contains(&self, txid: &TxId) -> bool {
        self.proven.iter().any(|p| &p.txid == txid)
    }
}

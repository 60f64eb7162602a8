//! Minimal transaction model.
//!
//! Only the structure the proof engine inspects is modeled: inputs
//! referencing spent outputs, outputs carrying an optional signer key (the
//! pay-to-pubkey case the authority checks rely on) and an optional opaque
//! payload (the op-return analog carrying embedded proofs). Script
//! evaluation is out of scope.

use serde::{Deserialize, Serialize};

use crate::crypto::{hash, Hash, SignerKey, TxId};
use crate::notarization::ChainSymbol;
use crate::proof::TxProof;

/// A transaction input spending a previous output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxIn {
    /// Transaction whose output is being spent.
    pub prev_txid: TxId,
    /// Index of the spent output.
    pub prev_vout: u32,
}

/// A transaction output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOut {
    /// Signer key for pay-to-pubkey outputs.
    pub pubkey: Option<SignerKey>,
    /// Opaque data payload (op-return analog).
    pub payload: Option<Vec<u8>>,
}

impl TxOut {
    /// An output paying to a signer key.
    pub fn to_key(key: SignerKey) -> Self {
        Self {
            pubkey: Some(key),
            payload: None,
        }
    }

    /// A data-carrying output.
    pub fn with_payload(payload: Vec<u8>) -> Self {
        Self {
            pubkey: None,
            payload: Some(payload),
        }
    }
}

/// A transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Inputs.
    pub inputs: Vec<TxIn>,
    /// Outputs.
    pub outputs: Vec<TxOut>,
}

impl Transaction {
    /// Compute the transaction id.
    pub fn txid(&self) -> TxId {
        let bytes = bincode::serialize(self).expect("in-memory struct always serializes");
        TxId(hash(&bytes))
    }

    /// The data payload of the final output, if any.
    pub fn payload(&self) -> Option<&[u8]> {
        self.outputs
            .last()
            .and_then(|out| out.payload.as_deref())
    }
}

/// Payload of a burn transaction on a source chain, declaring where the
/// burnt value should be re-minted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnTransaction {
    /// Symbol of the target chain.
    pub target_symbol: ChainSymbol,
    /// Authority epoch the import must verify under.
    pub target_cc_id: u32,
    /// Commitment to the declared payouts.
    pub payouts_hash: Hash,
    /// Opaque auxiliary proof data.
    pub raw_proof: Vec<u8>,
}

impl BurnTransaction {
    /// Compute the burn transaction id.
    pub fn txid(&self) -> TxId {
        let bytes = bincode::serialize(self).expect("in-memory struct always serializes");
        TxId(hash(&bytes))
    }
}

/// The proof attached to an import transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportProof {
    /// A plain Merkle-branch proof, extendable through the hub.
    Branch(TxProof),
    /// Fallback: transaction ids of notary-signed inclusion approvals.
    NotaryApprovals(Vec<TxId>),
}

impl ImportProof {
    /// The Merkle-branch form, if this proof is one.
    pub fn as_branch(&self) -> Option<&TxProof> {
        match self {
            ImportProof::Branch(p) => Some(p),
            ImportProof::NotaryApprovals(_) => None,
        }
    }
}

/// An import transaction: re-mints burnt value on the target chain, backed
/// by a proof of the burn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportTransaction {
    /// Proof that the burn happened.
    pub proof: ImportProof,
    /// The backing burn transaction.
    pub burn: BurnTransaction,
    /// Declared payouts.
    pub payouts: Vec<TxOut>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::MerkleBranch;

    #[test]
    fn test_txid_deterministic() {
        let tx = Transaction {
            inputs: vec![TxIn {
                prev_txid: TxId(hash(b"prev")),
                prev_vout: 0,
            }],
            outputs: vec![TxOut::with_payload(vec![1, 2, 3])],
        };
        assert_eq!(tx.txid(), tx.txid());
    }

    #[test]
    fn test_txid_distinguishes_content() {
        let a = Transaction {
            inputs: vec![],
            outputs: vec![TxOut::with_payload(vec![1])],
        };
        let b = Transaction {
            inputs: vec![],
            outputs: vec![TxOut::with_payload(vec![2])],
        };
        assert_ne!(a.txid(), b.txid());
    }

    #[test]
    fn test_payload_is_last_output() {
        let tx = Transaction {
            inputs: vec![],
            outputs: vec![
                TxOut::to_key(SignerKey::from_bytes([2u8; 33])),
                TxOut::with_payload(vec![9, 9]),
            ],
        };
        assert_eq!(tx.payload(), Some(&[9u8, 9][..]));
    }

    #[test]
    fn test_import_proof_as_branch() {
        let branch = ImportProof::Branch(TxProof::new(TxId::ZERO, MerkleBranch::default()));
        assert!(branch.as_branch().is_some());

        let fallback = ImportProof::NotaryApprovals(vec![TxId::ZERO]);
        assert!(fallback.as_branch().is_none());
    }
}

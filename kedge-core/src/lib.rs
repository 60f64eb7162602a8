//! Kedge Core - Fundamental types for the Kedge cross-chain proof engine.
//!
//! This crate provides the data structures shared across the system:
//!
//! - [`crypto`] - Hashing (double SHA-256) and signer-key identities
//! - [`merkle`] - Merkle tree, branch construction and verification
//! - [`proof`] - Composable transaction proofs ([`TxProof`])
//! - [`notarization`] - Notarization and back-notarization records
//! - [`tx`] - The minimal transaction model the proof engine inspects
//!
//! # Example
//!
//! ```rust
//! use kedge_core::{compute_branch, compute_root, hash, MerkleBranch};
//!
//! let leaves: Vec<_> = (0u8..4).map(|i| hash(&[i])).collect();
//! let root = compute_root(&leaves);
//!
//! let branch = MerkleBranch::new(2, compute_branch(&leaves, 2).unwrap());
//! assert_eq!(branch.exec(leaves[2]), root);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod crypto;
pub mod error;
pub mod merkle;
pub mod notarization;
pub mod proof;
pub mod tx;

#[cfg(test)]
mod proptest;

pub use crypto::{hash, hash_pair, BlockHash, Hash, SignerKey, TxId};
pub use error::{Error, Result};
pub use merkle::{compute_branch, compute_root, exec_branch};
pub use notarization::{ChainSymbol, Notarization, NotarizationRecord};
pub use proof::{BlockTxProof, MerkleBranch, ProvenTx, TxProof};
pub use tx::{BurnTransaction, ImportProof, ImportTransaction, Transaction, TxIn, TxOut};

//! Cross-chain proof chaining for Kedge.
//!
//! Chains that anchor into the hub can prove, long after the fact, that
//! one of their transactions is transitively committed to the hub's
//! record. The proof stacks three Merkle layers: transaction → block
//! root, block roots → the chain's notarized MoM, and MoMs → the hub's
//! aggregate MoMoM. This crate builds and verifies those stacked proofs.
//!
//! The engine is purely functional over three collaborators: a
//! [`ChainSource`] for the active chain, a [`NotarizationStore`] plus
//! [`TxIndex`] for records and transactions, and an authority resolver
//! for quorum checks. It holds no state and takes no locks; callers hold
//! the chain lock across each call.

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod engine;
pub mod error;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use engine::{CrossChainEngine, EngineConfig, ProofRoot};
pub use error::{EngineError, Result};
pub use traits::{ChainSource, NotarizationStore, TxIndex};

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockChain, MockLedger};

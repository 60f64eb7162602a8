//! Historical block index for Kedge.
//!
//! Keeps per-block metadata in an arena of entries linked by parent and
//! skip pointers, an array-backed view of the active chain, and the
//! locator/fork utilities that sit on top of them. The proof engine reads
//! block hashes, Merkle roots, and timestamps through [`ChainView`] while
//! the caller holds the single chain lock.

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod active;
pub mod error;
pub mod index;
pub mod solution;
pub mod view;

#[cfg(test)]
mod proptest;

pub use active::ActiveChain;
pub use error::{ChainError, Result};
pub use index::{skip_height, BlockArena, BlockEntry, BlockHeaderInfo, EntryId};
pub use solution::{BlockHeader, NoSolutionStore, Solution, SolutionStore};
pub use view::{shared_chain, ChainView, SharedChain};

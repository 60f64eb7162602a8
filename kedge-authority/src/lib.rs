//! Authority and quorum model for Kedge.
//!
//! Answers one question for the proof engine: for a given chain symbol
//! and point in time, which ordered signer set is authoritative and how
//! many of its signatures constitute proof of consensus?
//!
//! Chains fall into a small closed set of classes selected by symbol
//! prefix. The staked class rotates its table through time-bounded eras
//! with an explicit handover gap during which nothing is authoritative.
//! A chain that resolves to no live authority gets the empty authority,
//! which every quorum check rejects.

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod resolver;

pub use config::{AuthorityConfig, EraTable, MAX_SIGNERS};
pub use error::{AuthorityError, Result};
pub use resolver::{AuthorityResolver, ChainClass, CrosschainAuthority};

//! Authority configuration: signer tables, era boundaries, class policy.
//!
//! Everything here is supplied externally (deployment config); the
//! resolver never computes signer sets or boundaries itself. Keys are
//! hex-encoded compressed SEC1 points, decoded and validated on first
//! use per class/era.

use serde::{Deserialize, Serialize};

/// One staked era: a terminal timestamp plus the signer table active
/// until that boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EraTable {
    /// Last timestamp (inclusive) at which this era's table is live.
    pub end_time: i64,
    /// Hex-encoded compressed public keys, in slot order.
    pub signers: Vec<String>,
}

/// Full authority configuration for a deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorityConfig {
    /// Signer table for the hub chain and ordinary asset chains.
    pub hub_signers: Vec<String>,
    /// Era boundary and signer tables for the staked class, ordered by
    /// `end_time`.
    pub staked_eras: Vec<EraTable>,
    /// Seconds after an era's end during which no staked authority is
    /// live. A timestamp inside the gap denies quorum outright.
    pub era_gap: i64,
    /// Signer table for the other federated class.
    pub federated_signers: Vec<String>,
    /// Symbol prefixes that select the staked class.
    pub staked_prefixes: Vec<String>,
    /// Symbol prefixes that select the other federated class.
    pub federated_prefixes: Vec<String>,
    /// Exact symbols that are permanently denied authority.
    pub banned_symbols: Vec<String>,
    /// Quorum threshold is `table size / threshold_divisor`.
    pub threshold_divisor: usize,
}

/// Largest signer table the wire format admits.
pub const MAX_SIGNERS: usize = 64;

impl Default for AuthorityConfig {
    /// Policy constants with empty signer tables; deployments fill the
    /// tables in.
    fn default() -> Self {
        Self {
            hub_signers: Vec::new(),
            staked_eras: Vec::new(),
            era_gap: 777,
            federated_signers: Vec::new(),
            staked_prefixes: vec!["STKD".into(), "TEST".into()],
            federated_prefixes: vec!["XFED".into()],
            banned_symbols: vec!["BANNED".into()],
            threshold_divisor: 5,
        }
    }
}

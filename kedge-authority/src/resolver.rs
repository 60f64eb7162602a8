//! Authority resolution: which signer set speaks for a chain, and when.
//!
//! Classification is a pure function of the chain symbol. The staked
//! class additionally partitions time into eras separated by a fixed
//! gap; inside the gap no authority is live at all. Signer tables are
//! decoded from hex and point-validated once per class/era, then cached.

use std::collections::HashMap;
use std::sync::Arc;

use k256::PublicKey;
use parking_lot::Mutex;
use tracing::{debug, warn};

use kedge_core::{ChainSymbol, SignerKey};

use crate::config::AuthorityConfig;
use crate::error::{AuthorityError, Result};

/// The closed set of chain classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainClass {
    /// The hub chain and ordinary asset chains notarizing into it.
    Hub,
    /// Staked chains: era-partitioned signer tables.
    Staked,
    /// The other federated class with its own fixed table.
    Federated,
    /// Permanently denied authority.
    Banned,
}

/// A resolved signer set plus its quorum threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrosschainAuthority {
    /// Signer public keys, in slot order.
    pub signers: Vec<SignerKey>,
    /// Signatures required for quorum. Zero means "no valid authority".
    pub required_sigs: usize,
}

impl CrosschainAuthority {
    /// The empty authority: zero signers, zero threshold, rejects all.
    pub fn empty() -> Self {
        Self {
            signers: Vec::new(),
            required_sigs: 0,
        }
    }

    /// Whether this authority can never approve anything.
    pub fn is_empty(&self) -> bool {
        self.required_sigs == 0
    }

    /// Whether `count` distinct signatures constitute quorum.
    ///
    /// A zero threshold always rejects; the empty authority must never
    /// be read as "nothing required, therefore pass".
    pub fn meets_quorum(&self, count: usize) -> bool {
        self.required_sigs > 0 && count >= self.required_sigs
    }

    /// Slot index of `key`, if it is one of this authority's signers.
    pub fn position_of(&self, key: &SignerKey) -> Option<usize> {
        self.signers.iter().position(|k| k == key)
    }
}

/// Resolves chain symbols and timestamps to authorities.
///
/// Owns the decoded-table cache; one instance per process is expected
/// but nothing here is ambient state.
pub struct AuthorityResolver {
    config: AuthorityConfig,
    cache: Mutex<HashMap<(ChainClass, usize), Arc<CrosschainAuthority>>>,
}

impl AuthorityResolver {
    /// Create a resolver over `config`.
    pub fn new(config: AuthorityConfig) -> Self {
        Self {
            config,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The configuration this resolver was built from.
    pub fn config(&self) -> &AuthorityConfig {
        &self.config
    }

    /// Classify a chain by its declared symbol. Pure prefix policy.
    pub fn classify(&self, symbol: &ChainSymbol) -> ChainClass {
        if self
            .config
            .banned_symbols
            .iter()
            .any(|s| s.as_str() == symbol.as_str())
        {
            return ChainClass::Banned;
        }
        if self.config.staked_prefixes.iter().any(|p| symbol.has_prefix(p)) {
            return ChainClass::Staked;
        }
        if self
            .config
            .federated_prefixes
            .iter()
            .any(|p| symbol.has_prefix(p))
        {
            return ChainClass::Federated;
        }
        ChainClass::Hub
    }

    /// Resolve a timestamp to a staked era (1-based), or `None` when it
    /// falls in an inter-era gap or beyond the final boundary.
    pub fn era_for(&self, timestamp: i64) -> Option<usize> {
        let eras = &self.config.staked_eras;
        if eras.is_empty() {
            return None;
        }
        if timestamp <= eras[0].end_time {
            return Some(1);
        }
        for i in 1..eras.len() {
            if timestamp <= eras[i].end_time {
                // Handover gap after the previous era denies authority
                if timestamp >= eras[i - 1].end_time + self.config.era_gap {
                    return Some(i + 1);
                }
                return None;
            }
        }
        None
    }

    /// The authority for `class` (and, for staked, `era`).
    ///
    /// Unknown eras and the banned class resolve to the empty authority
    /// rather than an error; only malformed configured keys fail.
    pub fn authority_for(
        &self,
        class: ChainClass,
        era: Option<usize>,
    ) -> Result<Arc<CrosschainAuthority>> {
        let era_key = match class {
            ChainClass::Staked => match era {
                Some(e) if e >= 1 && e <= self.config.staked_eras.len() => e,
                _ => return Ok(Arc::new(CrosschainAuthority::empty())),
            },
            ChainClass::Banned => return Ok(Arc::new(CrosschainAuthority::empty())),
            ChainClass::Hub | ChainClass::Federated => 0,
        };

        if let Some(cached) = self.cache.lock().get(&(class, era_key)) {
            return Ok(Arc::clone(cached));
        }

        let table = match class {
            ChainClass::Hub => &self.config.hub_signers,
            ChainClass::Staked => &self.config.staked_eras[era_key - 1].signers,
            ChainClass::Federated => &self.config.federated_signers,
            ChainClass::Banned => unreachable!("handled above"),
        };

        let signers = decode_table(table)?;
        let authority = Arc::new(CrosschainAuthority {
            required_sigs: signers.len() / self.config.threshold_divisor,
            signers,
        });
        debug!(
            ?class,
            era = era_key,
            size = authority.signers.len(),
            required = authority.required_sigs,
            "decoded signer table"
        );

        self.cache
            .lock()
            .insert((class, era_key), Arc::clone(&authority));
        Ok(authority)
    }

    /// The authority live for `symbol` at `timestamp`.
    pub fn active_authority(
        &self,
        symbol: &ChainSymbol,
        timestamp: i64,
    ) -> Result<Arc<CrosschainAuthority>> {
        let class = self.classify(symbol);
        let era = match class {
            ChainClass::Staked => {
                let era = self.era_for(timestamp);
                if era.is_none() {
                    warn!(%symbol, timestamp, "timestamp falls in a staked era gap");
                }
                era
            }
            _ => None,
        };
        self.authority_for(class, era)
    }

    /// Reverse lookup: the signer slot whose derived address is
    /// `address` under the authority live for `symbol` at `timestamp`.
    pub fn resolve_notary_id(
        &self,
        symbol: &ChainSymbol,
        timestamp: i64,
        address: &str,
    ) -> Result<Option<usize>> {
        let authority = self.active_authority(symbol, timestamp)?;
        Ok(authority
            .signers
            .iter()
            .position(|key| key.address() == address))
    }
}

impl std::fmt::Debug for AuthorityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorityResolver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Decode one hex table into validated keys.
fn decode_table(table: &[String]) -> Result<Vec<SignerKey>> {
    if table.len() > crate::config::MAX_SIGNERS {
        return Err(AuthorityError::InvalidSignerKey {
            slot: crate::config::MAX_SIGNERS,
            reason: format!("table holds {} keys, limit is {}", table.len(), crate::config::MAX_SIGNERS),
        });
    }
    let mut signers = Vec::with_capacity(table.len());
    for (slot, entry) in table.iter().enumerate() {
        let key = SignerKey::from_hex(entry).map_err(|e| AuthorityError::InvalidSignerKey {
            slot,
            reason: e.to_string(),
        })?;
        // Must be a valid curve point, not just 33 bytes
        PublicKey::from_sec1_bytes(key.as_bytes()).map_err(|_| {
            AuthorityError::InvalidSignerKey {
                slot,
                reason: "not a valid secp256k1 point".into(),
            }
        })?;
        signers.push(key);
    }
    Ok(signers)
}

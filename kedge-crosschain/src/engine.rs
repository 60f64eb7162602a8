//! The proof-chain engine.
//!
//! Extends a proof that a transaction is committed under its own chain's
//! MoM into a proof against a hub-side aggregate root (MoMoM), and
//! verifies the results against recorded notarizations. Construction is a
//! pipeline: resolve the source notarization's hub height, find the
//! target chain's covering notarization, compute the MoMoM over the scan
//! window, splice the branches, and re-verify the full chain root. Any
//! stage that cannot find its data ends the attempt; the caller may retry
//! with a different offset or fall back to counted notary approvals.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use kedge_authority::{AuthorityResolver, CrosschainAuthority};
use kedge_core::{
    compute_branch, compute_root, ChainSymbol, Hash, ImportProof, ImportTransaction,
    MerkleBranch, NotarizationRecord, Transaction, TxId, TxProof,
};

use crate::error::{EngineError, Result};
use crate::traits::{ChainSource, NotarizationStore, TxIndex};

/// Scan windows and policy constants, supplied by the deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Blocks scanned when collecting notarizations for a MoMoM, and the
    /// bound on every forward notarization scan.
    pub scan_window: u64,
    /// How far below a back-notarization's height the MoMoM re-check
    /// scan starts.
    pub momom_recheck_window: u64,
    /// Same-symbol notarizations after which MoM collection stops early.
    pub own_notarization_cap: usize,
    /// Distinct notary approvals required by the fallback path. A policy
    /// constant independent of any authority's own threshold.
    pub min_notary_approvals: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scan_window: 1440,
            momom_recheck_window: 100,
            own_notarization_cap: 7,
            min_notary_approvals: 5,
        }
    }
}

/// Output of [`CrossChainEngine::calculate_proof_root`]: the aggregate
/// root plus the MoM set it was computed over and the anchoring
/// notarization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofRoot {
    /// Merkle root over `moms`.
    pub momom: Hash,
    /// De-duplicated MoMs in scan order.
    pub moms: Vec<Hash>,
    /// Transaction id of the most recent same-symbol notarization in
    /// the window.
    pub anchor: TxId,
}

/// The cross-chain proof engine.
///
/// Borrows its collaborators for the duration of a call; the caller is
/// expected to hold the chain lock across each operation, and the engine
/// takes no locks of its own.
pub struct CrossChainEngine<'a, C, S> {
    chain: &'a C,
    store: &'a S,
    authority: &'a AuthorityResolver,
    local_symbol: ChainSymbol,
    config: EngineConfig,
}

impl<'a, C, S> CrossChainEngine<'a, C, S>
where
    C: ChainSource,
    S: NotarizationStore + TxIndex,
{
    /// Create an engine with the default windows.
    pub fn new(
        chain: &'a C,
        store: &'a S,
        authority: &'a AuthorityResolver,
        local_symbol: ChainSymbol,
    ) -> Self {
        Self::with_config(chain, store, authority, local_symbol, EngineConfig::default())
    }

    /// Create an engine with explicit configuration.
    pub fn with_config(
        chain: &'a C,
        store: &'a S,
        authority: &'a AuthorityResolver,
        local_symbol: ChainSymbol,
        config: EngineConfig,
    ) -> Self {
        Self {
            chain,
            store,
            authority,
            local_symbol,
            config,
        }
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute the MoMoM anchored at `hub_height` for `symbol`.
    ///
    /// Scans hub blocks backward from `hub_height` within the scan
    /// window. The first same-symbol notarization found becomes the
    /// anchor; once one has been seen, every notarization in the same
    /// authority class carrying `target_cc_id` contributes its MoM to
    /// the set (de-duplicated, scan order). Seeing the cap-th
    /// same-symbol notarization stops collection before that block's
    /// MoMs are taken. Returns `None` when no same-symbol notarization
    /// is in the window, or when `target_cc_id` predates cross-chain
    /// epochs (< 2).
    pub fn calculate_proof_root(
        &self,
        symbol: &ChainSymbol,
        target_cc_id: u32,
        hub_height: u64,
    ) -> Option<ProofRoot> {
        if target_cc_id < 2 {
            return None;
        }
        let tip = self.chain.active_height()?;
        if hub_height > tip {
            return None;
        }

        let class = self.authority.classify(symbol);
        let mut seen_own = 0usize;
        let mut anchor = TxId::ZERO;
        let mut moms: Vec<Hash> = Vec::new();

        'scan: for i in 0..self.config.scan_window {
            if i > hub_height {
                break;
            }
            let height = hub_height - i;
            let Some(block_hash) = self.chain.block_hash_at(height) else {
                break;
            };
            let Some(records) = self.store.notarizations_in_block(&block_hash) else {
                continue;
            };

            for record in &records {
                if record.data.symbol == *symbol {
                    seen_own += 1;
                    if seen_own == 1 {
                        anchor = record.txid;
                    } else if seen_own == self.config.own_notarization_cap {
                        // Enough to delimit the range; skip this block's MoMs
                        break 'scan;
                    }
                }
            }

            if seen_own >= 1 {
                for record in &records {
                    if record.data.cc_id == target_cc_id
                        && self.authority.classify(&record.data.symbol) == class
                        && !moms.contains(&record.data.mom)
                    {
                        moms.push(record.data.mom);
                    }
                }
            }
        }

        if seen_own == 0 {
            debug!(%symbol, hub_height, "no notarization in scan window");
            return None;
        }

        debug!(%symbol, hub_height, moms = moms.len(), "computed aggregate root");
        Some(ProofRoot {
            momom: compute_root(&moms),
            moms,
            anchor,
        })
    }

    /// Forward-scan from `start_height` for the first notarization
    /// satisfying `predicate`. Bounded by the scan window and the tip.
    pub fn scan_notarizations_from_height<F>(
        &self,
        start_height: u64,
        predicate: F,
    ) -> Option<(u64, NotarizationRecord)>
    where
        F: Fn(&NotarizationRecord) -> bool,
    {
        let tip = self.chain.active_height()?;
        let limit = (start_height.saturating_add(self.config.scan_window)).min(tip);

        for height in start_height.max(1)..limit {
            let Some(block_hash) = self.chain.block_hash_at(height) else {
                break;
            };
            let Some(records) = self.store.notarizations_in_block(&block_hash) else {
                continue;
            };
            for record in records {
                if predicate(&record) {
                    return Some((height, record));
                }
            }
        }
        None
    }

    /// Extend `source_proof` (transaction → source-chain MoM) into a
    /// proof against the target chain's MoMoM.
    ///
    /// `height_offset` shifts the height the MoMoM is computed at,
    /// absorbing off-by-one window differences between chain topologies.
    /// The recomputed chain root must reproduce the MoMoM exactly or the
    /// whole construction fails.
    pub fn get_cross_chain_proof(
        &self,
        txid: TxId,
        target_symbol: &ChainSymbol,
        target_cc_id: u32,
        source_proof: &TxProof,
        height_offset: i64,
    ) -> Result<TxProof> {
        let (_, source_height) = self
            .store
            .confirmed_tx(&source_proof.anchor)
            .ok_or_else(|| EngineError::not_found("source notarization not confirmed on hub"))?;

        // The first target notarization at or after the source's height
        // is guaranteed to cover the source's range.
        let (found_height, _) = self
            .scan_notarizations_from_height(source_height, |record| {
                record.data.symbol == *target_symbol
            })
            .ok_or_else(|| EngineError::not_found("no notarization for target symbol"))?;

        let adjusted = u64::try_from(found_height as i64 + height_offset)
            .map_err(|_| EngineError::not_found("offset height below genesis"))?;

        let root = self
            .calculate_proof_root(target_symbol, target_cc_id, adjusted)
            .ok_or_else(|| EngineError::not_found("no aggregate root within scan window"))?;

        let source_mom = source_proof.exec(txid);
        let position = root
            .moms
            .iter()
            .position(|mom| *mom == source_mom)
            .ok_or_else(|| {
                EngineError::inconsistent("source MoM absent from computed aggregate set")
            })?;

        let upper_hashes = compute_branch(&root.moms, position)
            .ok_or_else(|| EngineError::inconsistent("aggregate set shorter than position"))?;
        let upper = MerkleBranch::new(position as u64, upper_hashes);
        let combined = source_proof.branch.clone().compose(upper);

        if combined.exec(txid.0) != root.momom {
            return Err(EngineError::inconsistent(
                "recomputed chain root does not match aggregate root",
            ));
        }

        debug!(%txid, %target_symbol, found_height, "extended proof to aggregate root");
        Ok(TxProof::new(root.anchor, combined))
    }

    /// Extend an import transaction's proof through the hub and return
    /// the rewritten transaction. Nothing is modified unless every
    /// verification step succeeds.
    pub fn complete_import_transaction(
        &self,
        import: &ImportTransaction,
        height_offset: i64,
    ) -> Result<ImportTransaction> {
        let source_proof = import.proof.as_branch().ok_or_else(|| {
            EngineError::malformed("import proof is not in Merkle-branch form")
        })?;

        let extended = self.get_cross_chain_proof(
            import.burn.txid(),
            &import.burn.target_symbol,
            import.burn.target_cc_id,
            source_proof,
            height_offset,
        )?;

        Ok(ImportTransaction {
            proof: ImportProof::Branch(extended),
            burn: import.burn.clone(),
            payouts: import.payouts.clone(),
        })
    }

    /// Lightweight acceptance check: does any notarization near the
    /// back-notarization of `notarization_txid` carry `candidate` as its
    /// stored MoMoM?
    ///
    /// Back-notarizations may arrive out of order, so the scan starts a
    /// re-check window below the receipt's height.
    pub fn check_momom(&self, notarization_txid: &TxId, candidate: Hash) -> bool {
        let Some(receipt) = self.store.back_notarization(notarization_txid) else {
            debug!(%notarization_txid, "no back-notarization receipt");
            return false;
        };
        let Some((_, height)) = self.store.confirmed_tx(&receipt.txid) else {
            warn!(%notarization_txid, "back-notarization receipt not confirmed");
            return false;
        };

        let start = height.saturating_sub(self.config.momom_recheck_window);
        self.scan_notarizations_from_height(start, |record| record.data.momom == candidate)
            .is_some()
    }

    /// Fallback acceptance path: count distinct authorized signers whose
    /// approval transactions prove `burn_txid` was included in a block.
    ///
    /// Each approval must carry a decodable partial-block proof that is
    /// internally consistent and covers `burn_txid`, and must spend an
    /// output keyed to a signer of the authority live at its confirming
    /// block. Approvals failing any of these are skipped, never fatal.
    /// Succeeds when the distinct count reaches the configured minimum.
    pub fn check_notaries_approval(&self, burn_txid: TxId, approval_txids: &[TxId]) -> bool {
        let mut seen_slots: Vec<usize> = Vec::new();

        for approval_txid in approval_txids {
            let Some((approval, height)) = self.store.confirmed_tx(approval_txid) else {
                debug!(%approval_txid, "approval not confirmed, skipping");
                continue;
            };

            let Some(payload) = approval.payload() else {
                debug!(%approval_txid, "approval carries no payload, skipping");
                continue;
            };
            let proof: kedge_core::BlockTxProof = match bincode::deserialize(payload) {
                Ok(proof) => proof,
                Err(err) => {
                    debug!(%approval_txid, %err, "approval payload failed to decode, skipping");
                    continue;
                }
            };
            if !proof.verify() || !proof.contains(&burn_txid) {
                debug!(%approval_txid, "approval proof does not cover burn tx, skipping");
                continue;
            }

            let Some(time) = self.chain.time_at(height) else {
                continue;
            };
            let authority = match self.authority.active_authority(&self.local_symbol, time) {
                Ok(authority) => authority,
                Err(err) => {
                    warn!(%err, "authority resolution failed, skipping approval");
                    continue;
                }
            };
            if authority.is_empty() {
                continue;
            }

            let Some(signer) = self.approval_signer(&approval) else {
                continue;
            };
            match authority.position_of(&signer) {
                Some(slot) if !seen_slots.contains(&slot) => seen_slots.push(slot),
                Some(_) => debug!(%approval_txid, "signer already counted"),
                None => debug!(%approval_txid, "signer not in authority set"),
            }
        }

        seen_slots.len() >= self.config.min_notary_approvals
    }

    /// Build a proof that `txid` is committed under its own chain's MoM,
    /// anchored at the notarization covering its block.
    ///
    /// Finds the first notarization whose covered height reaches the
    /// transaction's confirming block, rebuilds the MoM leaf layer from
    /// the active chain's block roots, and splices the in-block branch
    /// beneath the block-to-MoM branch.
    pub fn get_assetchain_proof(&self, txid: TxId) -> Result<TxProof> {
        let (_, tx_height) = self
            .store
            .confirmed_tx(&txid)
            .ok_or_else(|| EngineError::not_found("transaction not confirmed"))?;

        let local = self.local_symbol.clone();
        let (_, nota) = self
            .scan_notarizations_from_height(tx_height, |record| {
                record.data.symbol == local && record.data.height >= tx_height
            })
            .ok_or_else(|| EngineError::not_found("no notarization covering height yet"))?;

        let depth_span = u64::from(nota.data.mom_depth);
        let index = nota.data.height - tx_height;
        if index >= depth_span {
            return Err(EngineError::inconsistent(
                "confirming block outside notarized MoM depth",
            ));
        }
        if depth_span > nota.data.height.saturating_add(1) {
            return Err(EngineError::inconsistent(
                "notarized MoM depth reaches below genesis",
            ));
        }

        // Leaf j of the MoM layer is the block root at (covered height - j)
        let mut leaves = Vec::with_capacity(nota.data.mom_depth as usize);
        for depth in 0..depth_span {
            let root = self
                .chain
                .merkle_root_at(nota.data.height - depth)
                .ok_or_else(|| EngineError::not_found("notarized range beyond active chain"))?;
            leaves.push(root);
        }

        let block_root = leaves[index as usize];
        let upper_hashes = compute_branch(&leaves, index as usize)
            .ok_or_else(|| EngineError::inconsistent("MoM depth shorter than block offset"))?;
        let upper = MerkleBranch::new(index, upper_hashes);
        if upper.exec(block_root) != nota.data.mom {
            return Err(EngineError::inconsistent(
                "block root does not fold into notarized MoM",
            ));
        }

        let txids = self
            .store
            .block_txids(tx_height)
            .ok_or_else(|| EngineError::not_found("confirming block body unavailable"))?;
        let tx_index = txids
            .iter()
            .position(|candidate| *candidate == txid)
            .ok_or_else(|| EngineError::inconsistent("transaction absent from its block"))?;

        let tx_leaves: Vec<Hash> = txids.iter().map(|id| id.0).collect();
        let lower_hashes = compute_branch(&tx_leaves, tx_index)
            .ok_or_else(|| EngineError::inconsistent("block txid list shorter than index"))?;
        let lower = MerkleBranch::new(tx_index as u64, lower_hashes);
        if lower.exec(txid.0) != block_root {
            return Err(EngineError::inconsistent(
                "transaction branch does not reach block root",
            ));
        }

        let combined = lower.compose(upper);
        if combined.exec(txid.0) != nota.data.mom {
            return Err(EngineError::inconsistent(
                "combined branch does not reach notarized MoM",
            ));
        }

        debug!(%txid, covered_height = nota.data.height, "built asset chain proof");
        Ok(TxProof::new(nota.txid, combined))
    }

    /// Check that `tx` is signed by a quorum of `authority`: at least
    /// `required_sigs` inputs, each spending an output keyed to a
    /// distinct authority member. The empty authority rejects outright.
    pub fn check_tx_authority(&self, tx: &Transaction, authority: &CrosschainAuthority) -> bool {
        if authority.is_empty() {
            return false;
        }
        if tx.inputs.len() < authority.required_sigs {
            return false;
        }

        let mut seen = vec![false; authority.signers.len()];
        for input in &tx.inputs {
            let Some(prev) = self.any_tx(&input.prev_txid) else {
                return false;
            };
            let Some(output) = prev.outputs.get(input.prev_vout as usize) else {
                return false;
            };
            let Some(key) = output.pubkey else {
                return false;
            };
            match authority.position_of(&key) {
                Some(slot) if !seen[slot] => seen[slot] = true,
                _ => return false,
            }
        }
        true
    }

    /// The signer key of an approval: the pubkey of the output its first
    /// input spends.
    fn approval_signer(&self, approval: &Transaction) -> Option<kedge_core::SignerKey> {
        let input = approval.inputs.first()?;
        let prev = self.any_tx(&input.prev_txid)?;
        prev.outputs.get(input.prev_vout as usize)?.pubkey
    }

    /// A transaction by id, mempool first, then confirmed.
    fn any_tx(&self, txid: &TxId) -> Option<Transaction> {
        self.store
            .unconfirmed_tx(txid)
            .or_else(|| self.store.confirmed_tx(txid).map(|(tx, _)| tx))
    }
}

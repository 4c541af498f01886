//! Deterministic in-memory collaborators.
//!
//! These adapters answer contract calls with fixed, reproducible
//! encodings so consensus tests never depend on a live chain. Production
//! deployments swap in adapters backed by real contract ABIs; everything
//! above the [`ChainClient`](crate::ChainClient) and
//! [`SnapshotStore`](crate::SnapshotStore) seams stays unchanged.

use crate::codec::u256_be;
use crate::error::{ChainError, ChainResult};
use crate::traits::{
    FundManagerContract, MultisendContract, SafeContract, SnapshotStore, TokenContract,
};
use accord_types::{
    canonical_json, Address, ContentRef, MultisendTx, Proposal, ProposalSnapshot, SafeOperation,
};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

/// Stand-in selector for `approve(spender, amount)`; a live adapter
/// encodes through the real token ABI.
const APPROVE_SELECTOR: [u8; 4] = [0x09, 0x5e, 0xa7, 0xb3];
/// Stand-in selector for `executeProposal(id)`.
const EXECUTE_SELECTOR: [u8; 4] = [0x0d, 0x61, 0xb5, 0x19];
/// Domain tag mixed into simulated safe digests.
const SAFE_DOMAIN: &[u8] = b"accord-simulated-safe-v1";

fn pad_address(address: &Address) -> ChainResult<[u8; 32]> {
    let mut out = [0u8; 32];
    out[12..].copy_from_slice(&address.to_bytes()?);
    Ok(out)
}

/// Simulated ledger answering all four contract surfaces.
///
/// Every failure flag forces the matching call to answer "no data" until
/// the flag is cleared, which is how sentinel propagation is exercised.
#[derive(Default)]
pub struct SimulatedLedger {
    proposals: RwLock<Vec<Proposal>>,
    fail_proposals: AtomicBool,
    fail_approval: AtomicBool,
    fail_execution: AtomicBool,
    fail_multisend: AtomicBool,
    fail_safe_hash: AtomicBool,
}

impl SimulatedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_proposals(proposals: Vec<Proposal>) -> Self {
        Self {
            proposals: RwLock::new(proposals),
            ..Self::default()
        }
    }

    pub fn set_proposals(&self, proposals: Vec<Proposal>) -> ChainResult<()> {
        let mut guard = self
            .proposals
            .write()
            .map_err(|_| ChainError::Backend("proposals lock poisoned".to_string()))?;
        *guard = proposals;
        Ok(())
    }

    pub fn fail_proposals(&self, fail: bool) {
        self.fail_proposals.store(fail, Ordering::SeqCst);
    }

    pub fn fail_approval(&self, fail: bool) {
        self.fail_approval.store(fail, Ordering::SeqCst);
    }

    pub fn fail_execution(&self, fail: bool) {
        self.fail_execution.store(fail, Ordering::SeqCst);
    }

    pub fn fail_multisend(&self, fail: bool) {
        self.fail_multisend.store(fail, Ordering::SeqCst);
    }

    pub fn fail_safe_hash(&self, fail: bool) {
        self.fail_safe_hash.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl FundManagerContract for SimulatedLedger {
    async fn get_all_proposals(&self, _contract_address: &Address) -> ChainResult<Vec<Proposal>> {
        if self.fail_proposals.load(Ordering::SeqCst) {
            return Err(ChainError::no_data("get_all_proposals"));
        }
        let guard = self
            .proposals
            .read()
            .map_err(|_| ChainError::Backend("proposals lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    async fn get_execute_proposal_tx(
        &self,
        _contract_address: &Address,
        proposal_id: u64,
    ) -> ChainResult<String> {
        if self.fail_execution.load(Ordering::SeqCst) {
            return Err(ChainError::no_data("get_execute_proposal_tx"));
        }
        let mut data = Vec::with_capacity(4 + 32);
        data.extend_from_slice(&EXECUTE_SELECTOR);
        data.extend_from_slice(&u256_be(proposal_id));
        Ok(hex::encode(data))
    }
}

#[async_trait]
impl TokenContract for SimulatedLedger {
    async fn build_approval_tx(
        &self,
        _token_address: &Address,
        spender: &Address,
        amount: u64,
    ) -> ChainResult<String> {
        if self.fail_approval.load(Ordering::SeqCst) {
            return Err(ChainError::no_data("build_approval_tx"));
        }
        let mut data = Vec::with_capacity(4 + 64);
        data.extend_from_slice(&APPROVE_SELECTOR);
        data.extend_from_slice(&pad_address(spender)?);
        data.extend_from_slice(&u256_be(amount));
        Ok(hex::encode(data))
    }
}

#[async_trait]
impl MultisendContract for SimulatedLedger {
    async fn get_tx_data(
        &self,
        _multisend_address: &Address,
        txs: &[MultisendTx],
    ) -> ChainResult<String> {
        if self.fail_multisend.load(Ordering::SeqCst) {
            return Err(ChainError::no_data("get_tx_data"));
        }
        // Packed multisend layout, one entry after another.
        let mut combined = Vec::new();
        for tx in txs {
            combined.push(tx.operation.as_u8());
            combined.extend_from_slice(&tx.to.to_bytes()?);
            combined.extend_from_slice(&u256_be(tx.value));
            combined.extend_from_slice(&u256_be(tx.data.len() as u64));
            combined.extend_from_slice(&tx.data);
        }
        Ok(hex::encode(combined))
    }
}

#[async_trait]
impl SafeContract for SimulatedLedger {
    async fn get_raw_safe_transaction_hash(
        &self,
        safe_address: &Address,
        to: &Address,
        value: u64,
        data: &[u8],
        operation: SafeOperation,
        safe_tx_gas: u64,
    ) -> ChainResult<String> {
        if self.fail_safe_hash.load(Ordering::SeqCst) {
            return Err(ChainError::no_data("get_raw_safe_transaction_hash"));
        }
        let mut hasher = Sha256::new();
        hasher.update(SAFE_DOMAIN);
        hasher.update(safe_address.to_bytes()?);
        hasher.update(to.to_bytes()?);
        hasher.update(u256_be(value));
        hasher.update(Sha256::digest(data));
        hasher.update([operation.as_u8()]);
        hasher.update(u256_be(safe_tx_gas));
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Content-addressed snapshot store keyed by the sha256 of the canonical
/// document bytes. Identical documents always yield identical references,
/// which is what lets snapshot references reach quorum at all.
#[derive(Default)]
pub struct InMemorySnapshotStore {
    documents: RwLock<HashMap<ContentRef, String>>,
    fail_put: AtomicBool,
    fail_get: AtomicBool,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_put(&self, fail: bool) {
        self.fail_put.store(fail, Ordering::SeqCst);
    }

    pub fn fail_get(&self, fail: bool) {
        self.fail_get.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.documents.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn put(&self, _name: &str, document: &ProposalSnapshot) -> ChainResult<ContentRef> {
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(ChainError::no_data("snapshot_put"));
        }
        let canonical = canonical_json(document)?;
        let reference = ContentRef::new(hex::encode(Sha256::digest(canonical.as_bytes())));
        let mut guard = self
            .documents
            .write()
            .map_err(|_| ChainError::Backend("documents lock poisoned".to_string()))?;
        guard.insert(reference.clone(), canonical);
        Ok(reference)
    }

    async fn get(&self, reference: &ContentRef) -> ChainResult<ProposalSnapshot> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(ChainError::no_data("snapshot_get"));
        }
        let guard = self
            .documents
            .read()
            .map_err(|_| ChainError::Backend("documents lock poisoned".to_string()))?;
        let canonical = guard
            .get(reference)
            .ok_or_else(|| ChainError::MissingDocument(reference.clone()))?;
        serde_json::from_str(canonical).map_err(|e| ChainError::ResponseMismatch {
            call: "snapshot_get",
            reason: e.to_string(),
        })
    }
}

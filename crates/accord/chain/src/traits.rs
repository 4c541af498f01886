//! Collaborator contracts the consensus core depends on.
//!
//! Each trait models one external call/response surface. Call data and
//! hashes cross these boundaries as unprefixed hex strings; decoding
//! them is the caller's problem, and a response that does not decode is
//! a [`ChainError::ResponseMismatch`](crate::ChainError::ResponseMismatch),
//! never silently retried.

use crate::error::ChainResult;
use accord_types::{Address, ContentRef, MultisendTx, Proposal, ProposalSnapshot, SafeOperation};
use async_trait::async_trait;

/// The fund-manager contract holding the proposal book.
#[async_trait]
pub trait FundManagerContract: Send + Sync {
    /// All proposals currently known to the contract, in contract order.
    ///
    /// Order is part of the contract: the decision engine picks the
    /// first qualifying proposal, so reordering changes the outcome.
    async fn get_all_proposals(&self, contract_address: &Address) -> ChainResult<Vec<Proposal>>;

    /// Call data executing the given proposal, hex-encoded.
    async fn get_execute_proposal_tx(
        &self,
        contract_address: &Address,
        proposal_id: u64,
    ) -> ChainResult<String>;
}

/// The token contract funding disbursements.
#[async_trait]
pub trait TokenContract: Send + Sync {
    /// Call data approving `spender` for `amount`, hex-encoded.
    async fn build_approval_tx(
        &self,
        token_address: &Address,
        spender: &Address,
        amount: u64,
    ) -> ChainResult<String>;
}

/// The multisend contract batching several calls into one.
#[async_trait]
pub trait MultisendContract: Send + Sync {
    /// Combined call data for the ordered batch, hex-encoded.
    async fn get_tx_data(
        &self,
        multisend_address: &Address,
        txs: &[MultisendTx],
    ) -> ChainResult<String>;
}

/// The multisig Safe participants settle through.
#[async_trait]
pub trait SafeContract: Send + Sync {
    /// The digest the participants collectively sign, hex-encoded
    /// without a `0x` prefix.
    async fn get_raw_safe_transaction_hash(
        &self,
        safe_address: &Address,
        to: &Address,
        value: u64,
        data: &[u8],
        operation: SafeOperation,
        safe_tx_gas: u64,
    ) -> ChainResult<String>;
}

/// Content-addressed store for snapshot documents.
///
/// Rounds agree on the returned reference, never on the document, so
/// `put` must give identical references for identical documents.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn put(&self, name: &str, document: &ProposalSnapshot) -> ChainResult<ContentRef>;

    async fn get(&self, reference: &ContentRef) -> ChainResult<ProposalSnapshot>;
}

/// Unified chain bundle used by the behaviours and the builder.
pub trait ChainClient:
    FundManagerContract + TokenContract + MultisendContract + SafeContract + Send + Sync
{
}

impl<T> ChainClient for T where
    T: FundManagerContract + TokenContract + MultisendContract + SafeContract + Send + Sync
{
}

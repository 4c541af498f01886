//! What each participant computes before submitting to a round.
//!
//! A behaviour is the read side of a round: fetch or derive the value,
//! produce the payload content, and leave agreement to the round itself.
//! Behaviours read the synchronized store but never write it; store
//! mutation is the exclusive business of end-of-block transitions.

use crate::config::Params;
use crate::decision::decide;
use crate::error::EngineResult;
use accord_chain::{ChainClient, SnapshotStore, TransactionBuilder};
use accord_rounds::sync::keys;
use accord_rounds::SynchronizedData;
use accord_types::{ContentRef, DecisionContent, ParticipantId, ProposalSnapshot, TxContent};
use std::sync::Arc;
use tracing::{debug, info};

/// Name the snapshot document is stored under each cycle.
pub const SNAPSHOT_DOCUMENT_NAME: &str = "new_proposal.json";

/// The three payload producers of the fund application.
///
/// One instance serves every simulated participant; honest participants
/// share collaborators and therefore compute identical contents, which
/// is what lets rounds converge at all.
pub struct FundBehaviours {
    params: Params,
    client: Arc<dyn ChainClient>,
    snapshots: Arc<dyn SnapshotStore>,
    builder: TransactionBuilder,
}

impl FundBehaviours {
    pub fn new(
        params: Params,
        client: Arc<dyn ChainClient>,
        snapshots: Arc<dyn SnapshotStore>,
    ) -> Self {
        let builder = TransactionBuilder::new(client.clone(), params.settlement_addresses());
        Self {
            params,
            client,
            snapshots,
            builder,
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Snapshot-round behaviour: fetch the proposal book, persist it as
    /// a snapshot document, and submit the content reference.
    pub async fn snapshot_payload(&self, participant: &ParticipantId) -> EngineResult<ContentRef> {
        let proposals = self
            .client
            .get_all_proposals(&self.params.fund_manager_contract_address)
            .await?;
        debug!(
            participant = %participant.short(),
            proposals = proposals.len(),
            "proposal book fetched"
        );
        let snapshot = ProposalSnapshot::new(proposals);
        let reference = self
            .snapshots
            .put(SNAPSHOT_DOCUMENT_NAME, &snapshot)
            .await?;
        Ok(reference)
    }

    /// Decision-round behaviour: resolve the agreed snapshot reference,
    /// scan the book, and submit the resulting decision content.
    pub async fn decision_payload(
        &self,
        participant: &ParticipantId,
        store: &SynchronizedData,
    ) -> EngineResult<DecisionContent> {
        let reference: ContentRef = store.get_strict(keys::IPFS_HASH)?;
        let snapshot = self.snapshots.get(&reference).await?;
        let decision = decide(
            snapshot.proposals(),
            self.params.min_proposal_amount,
            self.params.max_proposal_amount,
        );
        info!(
            participant = %participant.short(),
            decision = decision.event().as_str(),
            "proposal book scanned"
        );
        Ok(decision.to_content())
    }

    /// Transaction-round behaviour: read the agreed proposal fields and
    /// assemble the signable payload. Construction failures surface as
    /// the sentinel content, never as an error.
    pub async fn tx_payload(
        &self,
        participant: &ParticipantId,
        store: &SynchronizedData,
    ) -> EngineResult<TxContent> {
        let proposal_id: u64 = store.get_strict(keys::PROPOSAL_ID)?;
        let proposal_amount: u64 = store.get_strict(keys::PROPOSAL_AMOUNT)?;
        let content = self.builder.build(proposal_id, proposal_amount).await;
        debug!(
            participant = %participant.short(),
            proposal = proposal_id,
            sentinel = content.is_error(),
            "signable payload assembled"
        );
        Ok(content)
    }
}

//! Funding proposals and the snapshot document participants agree on.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A funding proposal as read from the fund-manager contract.
///
/// The contract is the source of truth; the core only ever consumes an
/// ordered sequence of these and never mutates one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// On-chain proposal id.
    pub id: u64,
    /// Beneficiary of the disbursement (opaque to the core).
    pub beneficiary: String,
    /// Requested amount in token base units.
    pub amount: u64,
    /// Whether the proposal has already been executed.
    pub executed: bool,
}

impl Proposal {
    pub fn new(id: u64, beneficiary: impl Into<String>, amount: u64, executed: bool) -> Self {
        Self {
            id,
            beneficiary: beneficiary.into(),
            amount,
            executed,
        }
    }
}

/// The snapshot document persisted to the content-addressed store.
///
/// Every participant must serialize the same contract response to the
/// same bytes, otherwise snapshot references never reach quorum. Keep
/// this struct free of per-participant data such as timestamps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalSnapshot {
    /// The proposals fetched this cycle, in contract order.
    pub new_proposal: Vec<Proposal>,
}

impl ProposalSnapshot {
    pub fn new(proposals: Vec<Proposal>) -> Self {
        Self {
            new_proposal: proposals,
        }
    }

    pub fn proposals(&self) -> &[Proposal] {
        &self.new_proposal
    }
}

/// The selected proposal's fields, as merged into the synchronized store.
///
/// Field order is alphabetical so the canonical JSON matches the
/// sorted-keys form the rest of the protocol expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalInfo {
    /// Requested amount of the selected proposal.
    pub proposal_amount: u64,
    /// Id of the selected proposal.
    pub proposal_id: u64,
}

impl ProposalInfo {
    pub fn new(proposal_id: u64, proposal_amount: u64) -> Self {
        Self {
            proposal_amount,
            proposal_id,
        }
    }

    /// Flatten into store entries, one key per field.
    pub fn into_entries(self) -> BTreeMap<String, serde_json::Value> {
        let mut entries = BTreeMap::new();
        entries.insert(
            "proposal_amount".to_string(),
            serde_json::Value::from(self.proposal_amount),
        );
        entries.insert(
            "proposal_id".to_string(),
            serde_json::Value::from(self.proposal_id),
        );
        entries
    }
}

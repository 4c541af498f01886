//! Round payload contents and their canonical serialization.
//!
//! Quorum grouping compares the canonical JSON of a payload's content, so
//! two participants that computed the same value must serialize it to the
//! same bytes. Structs keep their fields in wire (alphabetical) order and
//! open-ended maps are `BTreeMap`s.

use crate::error::ContentError;
use crate::event::Event;
use crate::proposal::ProposalInfo;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The sentinel a participant submits when transaction construction
/// failed. Never a partial transaction.
pub const ERROR_SENTINEL: &str = "{}";

/// Serialize a content value to its canonical JSON string.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, ContentError> {
    serde_json::to_string(value).map_err(|e| ContentError::Canonical(e.to_string()))
}

/// Content of a decision-round payload: the verdict plus the fields to
/// merge into the synchronized store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionContent {
    /// The event this decision resolves to (`done` or `transact`).
    pub decision: Event,
    /// Store entries describing the selected proposal; empty on hold.
    pub proposal_info: BTreeMap<String, serde_json::Value>,
}

impl DecisionContent {
    /// A decision to act on the given proposal.
    pub fn transact(info: ProposalInfo) -> Self {
        Self {
            decision: Event::Transact,
            proposal_info: info.into_entries(),
        }
    }

    /// A decision to hold: no qualifying proposal this cycle.
    pub fn hold() -> Self {
        Self {
            decision: Event::Done,
            proposal_info: BTreeMap::new(),
        }
    }

    /// Typed view of the proposal fields, if both are present.
    pub fn proposal_info(&self) -> Option<ProposalInfo> {
        let amount = self.proposal_info.get("proposal_amount")?.as_u64()?;
        let id = self.proposal_info.get("proposal_id")?.as_u64()?;
        Some(ProposalInfo::new(id, amount))
    }

    /// Decode from a canonical JSON string.
    pub fn from_json(raw: &str) -> Result<Self, ContentError> {
        serde_json::from_str(raw).map_err(|e| ContentError::PayloadDecode(e.to_string()))
    }
}

/// Content of a transaction-preparation payload: the hex-encoded signable
/// payload, or [`ERROR_SENTINEL`] when construction failed.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TxContent(pub String);

impl TxContent {
    pub fn new(payload_hex: impl Into<String>) -> Self {
        Self(payload_hex.into())
    }

    /// The construction-failure sentinel.
    pub fn error() -> Self {
        Self(ERROR_SENTINEL.to_string())
    }

    pub fn is_error(&self) -> bool {
        self.0 == ERROR_SENTINEL
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TxContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! The synchronized data store replicated across participants.
//!
//! The store is a string-keyed JSON map. It is mutated only by a round's
//! end-of-block transition; behaviours read it, never write it. The
//! external replication layer totally orders those updates, so within a
//! cycle every participant observes the same sequence of states.

use crate::error::{ConsensusError, ConsensusResult};
use accord_types::{Address, ContentRef, DecisionContent, Event, ParticipantId, TxContent};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Well-known store keys.
pub mod keys {
    /// Participant set the cycle was started with (seeded at setup).
    pub const ALL_PARTICIPANTS: &str = "all_participants";
    /// Multisig address the cycle settles through (seeded at setup).
    pub const SAFE_CONTRACT_ADDRESS: &str = "safe_contract_address";
    /// Agreed content reference of the proposal snapshot.
    pub const IPFS_HASH: &str = "ipfs_hash";
    /// Agreed decision verdict, written by the decision round alongside
    /// the merged proposal fields.
    pub const DECISION: &str = "decision";
    /// Selected proposal id.
    pub const PROPOSAL_ID: &str = "proposal_id";
    /// Selected proposal amount.
    pub const PROPOSAL_AMOUNT: &str = "proposal_amount";
    /// Agreed signable transaction payload.
    pub const MOST_VOTED_TX_HASH: &str = "most_voted_tx_hash";
    /// Which round produced the agreed transaction payload.
    pub const TX_SUBMITTER: &str = "tx_submitter";
    /// Collection of the snapshot round.
    pub const PARTICIPANT_TO_SNAPSHOT_ROUND: &str = "participant_to_snapshot_round";
    /// Collection of the decision round.
    pub const PARTICIPANT_TO_DECISION_ROUND: &str = "participant_to_decision_round";
    /// Collection of the transaction round.
    pub const PARTICIPANT_TO_TX_ROUND: &str = "participant_to_tx_round";
}

/// Serialize a participant→content collection for storage.
pub fn serialize_collection<C: Serialize>(
    collection: &BTreeMap<ParticipantId, C>,
) -> ConsensusResult<Value> {
    let mut object = serde_json::Map::new();
    for (participant, content) in collection {
        let value = serde_json::to_value(content).map_err(|e| ConsensusError::ValueType {
            key: participant.0.clone(),
            reason: e.to_string(),
        })?;
        object.insert(participant.0.clone(), value);
    }
    Ok(Value::Object(object))
}

/// Deserialize a stored collection back to the original mapping.
pub fn deserialize_collection<C: DeserializeOwned>(
    value: &Value,
) -> ConsensusResult<BTreeMap<ParticipantId, C>> {
    let object = value.as_object().ok_or_else(|| ConsensusError::ValueType {
        key: "collection".into(),
        reason: "expected a JSON object".into(),
    })?;
    let mut collection = BTreeMap::new();
    for (participant, content) in object {
        let decoded =
            serde_json::from_value(content.clone()).map_err(|e| ConsensusError::ValueType {
                key: participant.clone(),
                reason: e.to_string(),
            })?;
        collection.insert(ParticipantId::new(participant.clone()), decoded);
    }
    Ok(collection)
}

/// The replicated key-value state for one decision cycle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SynchronizedData {
    entries: BTreeMap<String, Value>,
}

impl SynchronizedData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-seeded with entries (tests, cycle setup).
    pub fn from_entries(entries: BTreeMap<String, Value>) -> Self {
        Self { entries }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Optional typed read. Absent keys yield `None`; present keys that do
    /// not decode to `T` are an error, not `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> ConsensusResult<Option<T>> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| ConsensusError::ValueType {
                    key: key.to_string(),
                    reason: e.to_string(),
                }),
        }
    }

    /// Strict typed read; absence is a fatal pre/post-condition breach.
    pub fn get_strict<T: DeserializeOwned>(&self, key: &str) -> ConsensusResult<T> {
        self.get(key)?
            .ok_or_else(|| ConsensusError::MissingKey(key.to_string()))
    }

    /// Merge entries into the store, overwriting existing keys.
    ///
    /// Only round end-of-block transitions call this.
    pub fn update(&mut self, entries: impl IntoIterator<Item = (String, Value)>) {
        for (key, value) in entries {
            self.entries.insert(key, value);
        }
    }

    // ── Typed accessors ─────────────────────────────────────────────

    pub fn all_participants(&self) -> ConsensusResult<Option<BTreeSet<ParticipantId>>> {
        self.get(keys::ALL_PARTICIPANTS)
    }

    pub fn safe_contract_address(&self) -> ConsensusResult<Option<Address>> {
        self.get(keys::SAFE_CONTRACT_ADDRESS)
    }

    pub fn ipfs_hash(&self) -> ConsensusResult<Option<ContentRef>> {
        self.get(keys::IPFS_HASH)
    }

    pub fn decision(&self) -> ConsensusResult<Option<Event>> {
        self.get(keys::DECISION)
    }

    pub fn proposal_id(&self) -> ConsensusResult<Option<u64>> {
        self.get(keys::PROPOSAL_ID)
    }

    pub fn proposal_amount(&self) -> ConsensusResult<Option<u64>> {
        self.get(keys::PROPOSAL_AMOUNT)
    }

    pub fn most_voted_tx_hash(&self) -> ConsensusResult<Option<TxContent>> {
        self.get(keys::MOST_VOTED_TX_HASH)
    }

    /// The round that produced the agreed transaction payload. Strict:
    /// settlement must never run without knowing the submitter.
    pub fn tx_submitter(&self) -> ConsensusResult<String> {
        self.get_strict(keys::TX_SUBMITTER)
    }

    pub fn participant_to_snapshot_round(
        &self,
    ) -> ConsensusResult<BTreeMap<ParticipantId, ContentRef>> {
        self.collection(keys::PARTICIPANT_TO_SNAPSHOT_ROUND)
    }

    pub fn participant_to_decision_round(
        &self,
    ) -> ConsensusResult<BTreeMap<ParticipantId, DecisionContent>> {
        self.collection(keys::PARTICIPANT_TO_DECISION_ROUND)
    }

    pub fn participant_to_tx_round(&self) -> ConsensusResult<BTreeMap<ParticipantId, TxContent>> {
        self.collection(keys::PARTICIPANT_TO_TX_ROUND)
    }

    /// Strict read of a serialized collection.
    fn collection<C: DeserializeOwned>(
        &self,
        key: &str,
    ) -> ConsensusResult<BTreeMap<ParticipantId, C>> {
        let value: Value = self.get_strict(key)?;
        deserialize_collection(&value)
    }
}

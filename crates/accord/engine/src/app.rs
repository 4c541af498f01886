//! The concrete rounds of the fund application.
//!
//! One decision cycle walks the graph
//! `api_check -> decision_making -> (tx_preparation ->)? finished_*`.
//! Every round is the same generic [`ThresholdRound`] collector; what
//! differs is the payload content and the `end_block` policy applied
//! once submissions arrive. The policies are plain functions here so the
//! cycle driver can poll them after every submission.

use accord_rounds::sync::keys;
use accord_rounds::{
    serialize_collection, ConsensusError, ConsensusResult, RoundVerdict, ThresholdRound,
    TransitionGraph,
};
use accord_types::{ContentRef, DecisionContent, Event, TxContent};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Display;

/// The rounds of one decision cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FundRound {
    /// Fetch the proposal book and agree on its snapshot reference.
    ApiCheck,
    /// Agree on the funding decision computed from the snapshot.
    DecisionMaking,
    /// Agree on the assembled signable transaction payload.
    TxPreparation,
    /// Terminal: cycle ended without a transaction.
    FinishedDecisionMaking,
    /// Terminal: cycle ended with an agreed signable transaction.
    FinishedTxPreparation,
}

impl FundRound {
    pub fn as_str(&self) -> &'static str {
        match self {
            FundRound::ApiCheck => "api_check",
            FundRound::DecisionMaking => "decision_making",
            FundRound::TxPreparation => "tx_preparation",
            FundRound::FinishedDecisionMaking => "finished_decision_making",
            FundRound::FinishedTxPreparation => "finished_tx_preparation",
        }
    }
}

impl Display for FundRound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The validated transition graph of the fund application.
///
/// The `Error` edge out of `tx_preparation` deliberately lands on
/// `finished_decision_making`: a failed build ends the cycle on the
/// no-transaction terminal, it does not get a terminal of its own.
pub fn fund_transition_graph() -> ConsensusResult<TransitionGraph<FundRound>> {
    TransitionGraph::builder(FundRound::ApiCheck)
        .transition(FundRound::ApiCheck, Event::Done, FundRound::DecisionMaking)
        .transition(FundRound::ApiCheck, Event::NoMajority, FundRound::ApiCheck)
        .transition(FundRound::ApiCheck, Event::RoundTimeout, FundRound::ApiCheck)
        .transition(
            FundRound::DecisionMaking,
            Event::Done,
            FundRound::FinishedDecisionMaking,
        )
        .transition(
            FundRound::DecisionMaking,
            Event::Error,
            FundRound::FinishedDecisionMaking,
        )
        .transition(
            FundRound::DecisionMaking,
            Event::Transact,
            FundRound::TxPreparation,
        )
        .transition(
            FundRound::DecisionMaking,
            Event::NoMajority,
            FundRound::DecisionMaking,
        )
        .transition(
            FundRound::DecisionMaking,
            Event::RoundTimeout,
            FundRound::DecisionMaking,
        )
        .transition(
            FundRound::TxPreparation,
            Event::Done,
            FundRound::FinishedTxPreparation,
        )
        .transition(
            FundRound::TxPreparation,
            Event::Error,
            FundRound::FinishedDecisionMaking,
        )
        .transition(
            FundRound::TxPreparation,
            Event::NoMajority,
            FundRound::TxPreparation,
        )
        .transition(
            FundRound::TxPreparation,
            Event::RoundTimeout,
            FundRound::TxPreparation,
        )
        .terminal(FundRound::FinishedDecisionMaking)
        .terminal(FundRound::FinishedTxPreparation)
        .terminal_requires(FundRound::FinishedTxPreparation, keys::MOST_VOTED_TX_HASH)
        .build()
}

fn to_value<T: Serialize>(key: &str, value: &T) -> ConsensusResult<Value> {
    serde_json::to_value(value).map_err(|e| ConsensusError::ValueType {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// End-of-block policy of the snapshot round: store the collection and
/// the agreed snapshot reference, then proceed.
pub fn snapshot_end_block(round: &ThresholdRound<ContentRef>) -> ConsensusResult<RoundVerdict> {
    if round.threshold_reached() {
        let winner = round.most_voted()?;
        let mut updates = BTreeMap::new();
        updates.insert(
            keys::PARTICIPANT_TO_SNAPSHOT_ROUND.to_string(),
            serialize_collection(round.collection())?,
        );
        updates.insert(keys::IPFS_HASH.to_string(), to_value(keys::IPFS_HASH, &winner)?);
        return Ok(RoundVerdict::transition(Event::Done, updates));
    }
    Ok(round.fallback_verdict())
}

/// End-of-block policy of the decision round: merge the winning
/// decision's proposal fields into the store and follow its verdict
/// (`done` on hold, `transact` on a selected proposal).
pub fn decision_end_block(
    round: &ThresholdRound<DecisionContent>,
) -> ConsensusResult<RoundVerdict> {
    if round.threshold_reached() {
        let winner = round.most_voted()?;
        let mut updates = winner.proposal_info.clone();
        updates.insert(
            keys::PARTICIPANT_TO_DECISION_ROUND.to_string(),
            serialize_collection(round.collection())?,
        );
        updates.insert(
            keys::DECISION.to_string(),
            to_value(keys::DECISION, &winner.decision)?,
        );
        return Ok(RoundVerdict::transition(winner.decision, updates));
    }
    Ok(round.fallback_verdict())
}

/// End-of-block policy of the transaction round: the sentinel winner
/// means construction failed everywhere, so bail out with `error` and
/// leave the store untouched; otherwise record the agreed payload and
/// which round produced it.
pub fn tx_end_block(round: &ThresholdRound<TxContent>) -> ConsensusResult<RoundVerdict> {
    if round.threshold_reached() {
        let winner = round.most_voted()?;
        if winner.is_error() {
            return Ok(RoundVerdict::bare(Event::Error));
        }
        let mut updates = BTreeMap::new();
        updates.insert(
            keys::PARTICIPANT_TO_TX_ROUND.to_string(),
            serialize_collection(round.collection())?,
        );
        updates.insert(
            keys::MOST_VOTED_TX_HASH.to_string(),
            to_value(keys::MOST_VOTED_TX_HASH, &winner)?,
        );
        updates.insert(
            keys::TX_SUBMITTER.to_string(),
            Value::from(FundRound::TxPreparation.as_str()),
        );
        return Ok(RoundVerdict::transition(Event::Done, updates));
    }
    Ok(round.fallback_verdict())
}

//! Consensus error types.
//!
//! Two families live here. Store and graph violations (`MissingKey`,
//! `PreConditionViolated`, `PostConditionViolated`, `MissingTransition`,
//! `InvalidGraph`) are fatal: they mean broken wiring, not a transient
//! disagreement. Submission rejections (`DuplicateSubmission`,
//! `UnknownParticipant`) are per-payload and leave the round intact.

use accord_types::{ContentError, Event, ParticipantId};
use thiserror::Error;

/// Result alias used throughout the consensus crates.
pub type ConsensusResult<T> = Result<T, ConsensusError>;

/// Errors raised by the synchronized store, threshold rounds, and the
/// transition graph.
#[derive(Debug, Error)]
pub enum ConsensusError {
    /// Strict read of an absent key; a broken pre/post-condition.
    #[error("missing key in synchronized data: {0}")]
    MissingKey(String),

    /// A stored value did not decode to the requested shape.
    #[error("value under key {key} has unexpected shape: {reason}")]
    ValueType { key: String, reason: String },

    /// A participant re-submitted within one round instance. The original
    /// submission is kept.
    #[error("participant {0} has already submitted in this round instance")]
    DuplicateSubmission(ParticipantId),

    /// A submission from outside the declared participant set.
    #[error("participant {0} is not in the declared participant set")]
    UnknownParticipant(ParticipantId),

    /// A configured quorum that no vote count can ever satisfy.
    #[error("threshold {threshold} is not satisfiable with {participants} participants")]
    InvalidThreshold { threshold: usize, participants: usize },

    /// `most_voted` was read before quorum converged.
    #[error("threshold not reached; no agreed payload to read")]
    ThresholdNotReached,

    /// A reachable (round, event) pair has no declared successor.
    #[error("no transition declared for round {round} on event {event}")]
    MissingTransition { round: String, event: Event },

    /// The transition table failed startup validation.
    #[error("invalid transition graph: {0}")]
    InvalidGraph(String),

    /// A key declared absent at graph entry was already present.
    #[error("pre-condition violated: key {0} already present at graph entry")]
    PreConditionViolated(String),

    /// A key declared present at a terminal round was absent.
    #[error("post-condition violated: key {key} absent at terminal round {round}")]
    PostConditionViolated { round: String, key: String },

    /// Payload content could not be canonically encoded or decoded.
    #[error(transparent)]
    Content(#[from] ContentError),
}

//! Same-payload threshold collection.
//!
//! A [`ThresholdRound`] gathers one payload content per participant and
//! converges once a quorum of participants submitted byte-identical
//! content. Identity is decided on the canonical serialized form, so two
//! structurally equal contents always land in the same vote bucket.
//!
//! Each round instance is single-use. A retry (after `no_majority` or
//! `round_timeout`) runs on a fresh instance; submissions never carry
//! over.

use crate::error::{ConsensusError, ConsensusResult};
use accord_types::{canonical_json, Event, ParticipantId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Participant set and quorum for one decision cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsensusParams {
    participants: BTreeSet<ParticipantId>,
    threshold: usize,
}

impl ConsensusParams {
    /// Default quorum: strictly more than two thirds of the participant
    /// set, `(2 * n) / 3 + 1`.
    pub fn new(participants: BTreeSet<ParticipantId>) -> Self {
        let threshold = (2 * participants.len()) / 3 + 1;
        Self {
            participants,
            threshold,
        }
    }

    /// Override the quorum. The threshold must be satisfiable: at least
    /// one vote, at most the full participant set.
    pub fn with_threshold(
        participants: BTreeSet<ParticipantId>,
        threshold: usize,
    ) -> ConsensusResult<Self> {
        if threshold == 0 || threshold > participants.len() {
            return Err(ConsensusError::InvalidThreshold {
                threshold,
                participants: participants.len(),
            });
        }
        Ok(Self {
            participants,
            threshold,
        })
    }

    pub fn participants(&self) -> &BTreeSet<ParticipantId> {
        &self.participants
    }

    pub fn count(&self) -> usize {
        self.participants.len()
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn contains(&self, participant: &ParticipantId) -> bool {
        self.participants.contains(participant)
    }
}

/// What a round reports at the end of a block.
#[derive(Clone, Debug, PartialEq)]
pub enum RoundVerdict {
    /// Keep collecting.
    Pending,
    /// Apply `updates` to the synchronized store, then follow `event`.
    Transition {
        updates: BTreeMap<String, Value>,
        event: Event,
    },
}

impl RoundVerdict {
    pub fn transition(event: Event, updates: BTreeMap<String, Value>) -> Self {
        Self::Transition { updates, event }
    }

    /// A transition that moves the machine without touching the store.
    pub fn bare(event: Event) -> Self {
        Self::Transition {
            updates: BTreeMap::new(),
            event,
        }
    }

    pub fn event(&self) -> Option<Event> {
        match self {
            Self::Pending => None,
            Self::Transition { event, .. } => Some(*event),
        }
    }
}

/// One instance of a collect-same-until-threshold round.
#[derive(Clone, Debug)]
pub struct ThresholdRound<C> {
    params: ConsensusParams,
    collection: BTreeMap<ParticipantId, C>,
    canonical: BTreeMap<ParticipantId, String>,
    started_at: DateTime<Utc>,
}

impl<C: Clone + Serialize> ThresholdRound<C> {
    pub fn new(params: ConsensusParams) -> Self {
        Self {
            params,
            collection: BTreeMap::new(),
            canonical: BTreeMap::new(),
            started_at: Utc::now(),
        }
    }

    /// Record one participant's payload content.
    ///
    /// Rejects submissions from outside the participant set and repeat
    /// submissions; the first accepted content stands.
    pub fn submit(&mut self, participant: ParticipantId, content: C) -> ConsensusResult<()> {
        if !self.params.contains(&participant) {
            return Err(ConsensusError::UnknownParticipant(participant));
        }
        if self.collection.contains_key(&participant) {
            return Err(ConsensusError::DuplicateSubmission(participant));
        }
        let canonical = canonical_json(&content)?;
        self.canonical.insert(participant.clone(), canonical);
        self.collection.insert(participant.clone(), content);
        debug!(
            participant = %participant.short(),
            submissions = self.collection.len(),
            total = self.params.count(),
            "payload recorded"
        );
        Ok(())
    }

    pub fn submission_count(&self) -> usize {
        self.collection.len()
    }

    pub fn collection(&self) -> &BTreeMap<ParticipantId, C> {
        &self.collection
    }

    pub fn params(&self) -> &ConsensusParams {
        &self.params
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Votes per distinct canonical content.
    pub fn vote_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for canonical in self.canonical.values() {
            *counts.entry(canonical.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// The leading content and its vote count. Ties resolve to the
    /// lexicographically smallest canonical form, so every replica picks
    /// the same winner from the same collection.
    fn winner(&self) -> Option<(&str, usize)> {
        let mut best: Option<(&str, usize)> = None;
        for (canonical, count) in self.vote_counts() {
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((canonical, count)),
            }
        }
        best
    }

    /// Whether some content has reached quorum.
    pub fn threshold_reached(&self) -> bool {
        self.winner()
            .is_some_and(|(_, count)| count >= self.params.threshold)
    }

    /// Whether quorum is still reachable given the votes outstanding.
    pub fn is_majority_possible(&self) -> bool {
        let max_count = self.winner().map_or(0, |(_, count)| count);
        let remaining = self.params.count() - self.collection.len();
        max_count + remaining >= self.params.threshold
    }

    /// The agreed content. Errors until quorum converges.
    pub fn most_voted(&self) -> ConsensusResult<C> {
        let (winning, count) = self.winner().ok_or(ConsensusError::ThresholdNotReached)?;
        if count < self.params.threshold {
            return Err(ConsensusError::ThresholdNotReached);
        }
        self.canonical
            .iter()
            .find(|(_, canonical)| canonical.as_str() == winning)
            .and_then(|(participant, _)| self.collection.get(participant))
            .cloned()
            .ok_or(ConsensusError::ThresholdNotReached)
    }

    /// The end-of-block outcome when no content has quorum yet: keep
    /// collecting while convergence is still possible, otherwise report
    /// `no_majority` so the round restarts fresh.
    pub fn fallback_verdict(&self) -> RoundVerdict {
        if self.is_majority_possible() {
            RoundVerdict::Pending
        } else {
            RoundVerdict::bare(Event::NoMajority)
        }
    }
}

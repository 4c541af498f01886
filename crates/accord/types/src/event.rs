//! Protocol events: the only vocabulary the transition graph understands.

use serde::{Deserialize, Serialize};

/// Event emitted by a round at the end of a block.
///
/// Wire values (`done`, `error`, `transact`, `no_majority`,
/// `round_timeout`) are part of the payload format: the decision round
/// carries its verdict as a serialized `Event`, so renaming a variant is a
/// protocol change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// The round completed; proceed along the normal path.
    Done,
    /// The round completed with an unrecoverable build failure.
    Error,
    /// A funding proposal was selected; prepare the transaction.
    Transact,
    /// Quorum on a single value has become impossible; retry the round.
    NoMajority,
    /// The bounded collection window elapsed; retry the round.
    RoundTimeout,
}

impl Event {
    /// The wire spelling of this event.
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::Done => "done",
            Event::Error => "error",
            Event::Transact => "transact",
            Event::NoMajority => "no_majority",
            Event::RoundTimeout => "round_timeout",
        }
    }

    /// Events that re-enter the same round with a clean instance.
    pub fn is_retry(&self) -> bool {
        matches!(self, Event::NoMajority | Event::RoundTimeout)
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

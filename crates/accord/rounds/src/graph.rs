//! Round transition graph.
//!
//! The graph is a closed table over a round-tag enum: for each
//! non-terminal round, the events it may emit and the round each event
//! leads to. It is declared once at startup and validated before any
//! cycle runs, so a missing edge surfaces as a configuration error, not
//! as a stall in production.

use crate::error::{ConsensusError, ConsensusResult};
use crate::sync::SynchronizedData;
use accord_types::Event;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt::Display;

/// Validated transition table for one application.
#[derive(Clone, Debug)]
pub struct TransitionGraph<R> {
    initial: R,
    transitions: BTreeMap<R, BTreeMap<Event, R>>,
    terminals: BTreeSet<R>,
    entry_absent: BTreeSet<String>,
    terminal_present: BTreeMap<R, BTreeSet<String>>,
}

impl<R: Copy + Ord + Display> TransitionGraph<R> {
    pub fn builder(initial: R) -> TransitionGraphBuilder<R> {
        TransitionGraphBuilder::new(initial)
    }

    pub fn initial(&self) -> R {
        self.initial
    }

    pub fn is_terminal(&self, round: R) -> bool {
        self.terminals.contains(&round)
    }

    /// The successor of `current` on `event`.
    ///
    /// Every event a round can emit must be in the table; a miss means
    /// the application declaration and the round implementation disagree.
    pub fn transition(&self, current: R, event: Event) -> ConsensusResult<R> {
        self.transitions
            .get(&current)
            .and_then(|edges| edges.get(&event))
            .copied()
            .ok_or_else(|| ConsensusError::MissingTransition {
                round: current.to_string(),
                event,
            })
    }

    /// Entry guard: keys this graph will produce must not be present
    /// before it starts.
    pub fn check_entry(&self, store: &SynchronizedData) -> ConsensusResult<()> {
        for key in &self.entry_absent {
            if store.contains(key) {
                return Err(ConsensusError::PreConditionViolated(key.clone()));
            }
        }
        Ok(())
    }

    /// Exit guard: keys promised by the reached terminal must be present.
    pub fn check_terminal(&self, round: R, store: &SynchronizedData) -> ConsensusResult<()> {
        if let Some(keys) = self.terminal_present.get(&round) {
            for key in keys {
                if !store.contains(key) {
                    return Err(ConsensusError::PostConditionViolated {
                        round: round.to_string(),
                        key: key.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn validate(&self) -> ConsensusResult<()> {
        for (round, edges) in &self.transitions {
            if self.terminals.contains(round) {
                return Err(ConsensusError::InvalidGraph(format!(
                    "terminal round {round} declares outgoing transitions"
                )));
            }
            for event in [Event::NoMajority, Event::RoundTimeout] {
                match edges.get(&event) {
                    Some(target) if *target == *round => {}
                    Some(target) => {
                        return Err(ConsensusError::InvalidGraph(format!(
                            "round {round} must map {event} to itself, not {target}"
                        )));
                    }
                    None => {
                        return Err(ConsensusError::InvalidGraph(format!(
                            "round {round} has no {event} retry edge"
                        )));
                    }
                }
            }
            for target in edges.values() {
                if !self.transitions.contains_key(target) && !self.terminals.contains(target) {
                    return Err(ConsensusError::InvalidGraph(format!(
                        "round {round} leads to undeclared round {target}"
                    )));
                }
            }
        }
        for round in self.terminal_present.keys() {
            if !self.terminals.contains(round) {
                return Err(ConsensusError::InvalidGraph(format!(
                    "post-conditions declared for non-terminal round {round}"
                )));
            }
        }
        if self.terminals.is_empty() {
            return Err(ConsensusError::InvalidGraph(
                "graph declares no terminal round".into(),
            ));
        }
        self.check_reachability()
    }

    fn check_reachability(&self) -> ConsensusResult<()> {
        let mut seen = BTreeSet::from([self.initial]);
        let mut queue = VecDeque::from([self.initial]);
        while let Some(round) = queue.pop_front() {
            if let Some(edges) = self.transitions.get(&round) {
                for target in edges.values() {
                    if seen.insert(*target) {
                        queue.push_back(*target);
                    }
                }
            }
        }
        let declared: BTreeSet<R> = self
            .transitions
            .keys()
            .copied()
            .chain(self.terminals.iter().copied())
            .collect();
        if let Some(round) = declared.difference(&seen).next() {
            return Err(ConsensusError::InvalidGraph(format!(
                "round {round} is unreachable from {}",
                self.initial
            )));
        }
        Ok(())
    }
}

/// Builder for [`TransitionGraph`]; `build` runs full validation.
#[derive(Clone, Debug)]
pub struct TransitionGraphBuilder<R> {
    initial: R,
    transitions: BTreeMap<R, BTreeMap<Event, R>>,
    terminals: BTreeSet<R>,
    entry_absent: BTreeSet<String>,
    terminal_present: BTreeMap<R, BTreeSet<String>>,
}

impl<R: Copy + Ord + Display> TransitionGraphBuilder<R> {
    pub fn new(initial: R) -> Self {
        Self {
            initial,
            transitions: BTreeMap::new(),
            terminals: BTreeSet::new(),
            entry_absent: BTreeSet::new(),
            terminal_present: BTreeMap::new(),
        }
    }

    pub fn transition(mut self, from: R, event: Event, to: R) -> Self {
        self.transitions.entry(from).or_default().insert(event, to);
        self
    }

    pub fn terminal(mut self, round: R) -> Self {
        self.terminals.insert(round);
        self
    }

    /// Declare a key that must be absent when the graph starts.
    pub fn entry_requires_absent(mut self, key: impl Into<String>) -> Self {
        self.entry_absent.insert(key.into());
        self
    }

    /// Declare a key that must be present when `round` is reached.
    pub fn terminal_requires(mut self, round: R, key: impl Into<String>) -> Self {
        self.terminal_present
            .entry(round)
            .or_default()
            .insert(key.into());
        self
    }

    pub fn build(self) -> ConsensusResult<TransitionGraph<R>> {
        let graph = TransitionGraph {
            initial: self.initial,
            transitions: self.transitions,
            terminals: self.terminals,
            entry_absent: self.entry_absent,
            terminal_present: self.terminal_present,
        };
        graph.validate()?;
        Ok(graph)
    }
}

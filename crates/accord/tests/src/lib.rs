#![deny(unsafe_code)]
//! Shared fixtures for the Accord integration and property suites.

use accord_chain::{InMemorySnapshotStore, SimulatedLedger};
use accord_engine::{CycleDriver, Params};
use accord_types::{ParticipantId, Proposal};
use std::sync::Arc;

/// One simulated deployment: the driver plus handles to its
/// collaborators, kept around so suites can degrade them mid-test.
pub struct Harness {
    pub driver: CycleDriver,
    pub ledger: Arc<SimulatedLedger>,
    pub snapshots: Arc<InMemorySnapshotStore>,
}

/// A deployment over the given proposal book, using the simulation
/// configuration (4 participants, quorum 3, window (100, 1000)).
pub fn harness_with(book: Vec<Proposal>) -> Harness {
    harness_with_params(Params::simulation(), book)
}

/// A deployment with explicit parameters.
pub fn harness_with_params(params: Params, book: Vec<Proposal>) -> Harness {
    let ledger = Arc::new(SimulatedLedger::with_proposals(book));
    let snapshots = Arc::new(InMemorySnapshotStore::new());
    let driver = CycleDriver::new(params, ledger.clone(), snapshots.clone())
        .expect("fixture parameters must validate");
    Harness {
        driver,
        ledger,
        snapshots,
    }
}

/// The participant id scheme the simulation configuration uses.
pub fn participant(i: usize) -> ParticipantId {
    ParticipantId::new(format!("agent_{i}"))
}

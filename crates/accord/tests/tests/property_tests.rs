#[path = "property/consensus_determinism.rs"]
mod consensus_determinism;

#[path = "property/vote_splits.rs"]
mod vote_splits;

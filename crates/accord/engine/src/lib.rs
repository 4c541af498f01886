#![deny(unsafe_code)]
//! The Accord fund application.
//!
//! This crate assembles the generic consensus machinery of
//! `accord-rounds` and the chain collaborators of `accord-chain` into
//! the concrete funding workflow:
//!
//! - [`Params`]: one deployment's configuration, validated at startup.
//! - [`decide`]: the proposal-selection rule.
//! - [`FundRound`] and [`fund_transition_graph`]: the concrete rounds
//!   and the validated graph connecting them.
//! - [`FundBehaviours`]: what each participant computes per round.
//! - [`CycleDriver`]: runs full decision cycles to a terminal and
//!   reports a [`CycleOutcome`].

pub mod app;
pub mod behaviours;
pub mod config;
pub mod cycle;
pub mod decision;
pub mod error;

pub use app::{
    decision_end_block, fund_transition_graph, snapshot_end_block, tx_end_block, FundRound,
};
pub use behaviours::{FundBehaviours, SNAPSHOT_DOCUMENT_NAME};
pub use config::Params;
pub use cycle::{CycleDriver, CycleOutcome};
pub use decision::{decide, FundingDecision};
pub use error::{EngineError, EngineResult};

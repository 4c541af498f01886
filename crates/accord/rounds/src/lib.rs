#![deny(unsafe_code)]
//! Consensus machinery for the Accord engine.
//!
//! Three pieces, each independent of the fund domain:
//!
//! - [`SynchronizedData`]: the replicated key-value store a cycle agrees
//!   its results into.
//! - [`ThresholdRound`]: collect-same-until-threshold voting with
//!   deterministic tie-breaks.
//! - [`TransitionGraph`]: the validated round/event table an application
//!   declares once at startup.
//!
//! The concrete rounds of the fund application live in `accord-engine`;
//! this crate only knows payload contents that serialize canonically.

pub mod error;
pub mod graph;
pub mod sync;
pub mod threshold;

pub use error::{ConsensusError, ConsensusResult};
pub use graph::{TransitionGraph, TransitionGraphBuilder};
pub use sync::{deserialize_collection, serialize_collection, SynchronizedData};
pub use threshold::{ConsensusParams, RoundVerdict, ThresholdRound};

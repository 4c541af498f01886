#![deny(unsafe_code)]
//! Chain collaborators for the Accord engine.
//!
//! The consensus core never talks to a chain directly; it goes through
//! the collaborator traits in [`traits`]. This crate provides those
//! seams, deterministic simulated backends for them, the multisig
//! transaction assembly built on top, and the byte-exact codec for the
//! signable payload participants vote on.

pub mod builder;
pub mod codec;
pub mod error;
pub mod simulated;
pub mod traits;

pub use builder::{SettlementAddresses, TransactionBuilder, ETHER_VALUE, SAFE_TX_GAS};
pub use codec::{decode_signable, encode_signable};
pub use error::{ChainError, ChainResult};
pub use simulated::{InMemorySnapshotStore, SimulatedLedger};
pub use traits::{
    ChainClient, FundManagerContract, MultisendContract, SafeContract, SnapshotStore,
    TokenContract,
};

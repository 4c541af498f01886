#![deny(unsafe_code)]
//! Domain vocabulary for the Accord consensus engine.
//!
//! This crate provides:
//! - **Identity types** for participants and chain addresses
//!   ([`ParticipantId`], [`Address`], [`ContentRef`]).
//! - **Protocol events** emitted by rounds ([`Event`]).
//! - **Funding proposals** and the snapshot document agreed on by
//!   participants ([`Proposal`], [`ProposalSnapshot`], [`ProposalInfo`]).
//! - **Round payload contents** with canonical serialization
//!   ([`DecisionContent`], [`TxContent`], [`canonical_json`]).
//! - **Multisig transaction structures**
//!   ([`SafeOperation`], [`MultisendTx`], [`SignableBundle`]).
//!
//! Canonical serialization matters here: quorum grouping and tie-breaks
//! compare the serialized form of payload contents, so every map in this
//! crate is a `BTreeMap` and struct fields are declared in their wire
//! order.

pub mod error;
pub mod event;
pub mod identity;
pub mod payload;
pub mod proposal;
pub mod transaction;

pub use error::ContentError;
pub use event::Event;
pub use identity::{Address, ContentRef, ParticipantId};
pub use payload::{canonical_json, DecisionContent, TxContent, ERROR_SENTINEL};
pub use proposal::{Proposal, ProposalInfo, ProposalSnapshot};
pub use transaction::{MultisendTx, SafeOperation, SignableBundle};

//! Engine error types.
//!
//! Everything here is cycle-fatal. Transient disagreement is not an
//! error in this system: `no_majority` and `round_timeout` are events
//! resolved by retry inside the driver, and collaborator failures during
//! transaction assembly collapse into the sentinel payload long before
//! they could reach this enum.

use accord_chain::ChainError;
use accord_rounds::ConsensusError;
use accord_types::ContentError;
use thiserror::Error;

/// Result alias for the fund application.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the fund application and its cycle driver.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The configured parameters cannot drive a cycle.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// A round kept retrying past its budget; the cycle is abandoned
    /// rather than spun forever.
    #[error("round {round} exhausted its retry budget of {budget}")]
    RetriesExhausted { round: String, budget: usize },

    /// Consensus machinery failure (store, graph, or round internals).
    #[error(transparent)]
    Consensus(#[from] ConsensusError),

    /// Collaborator failure outside the sentinel-protected build path.
    #[error(transparent)]
    Chain(#[from] ChainError),

    /// Content-level encode/decode failure.
    #[error(transparent)]
    Content(#[from] ContentError),
}

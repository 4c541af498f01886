//! Chain collaborator error types.
//!
//! A `ResponseMismatch` is final for the call that produced it: the
//! transaction builder maps it to the sentinel failure payload instead of
//! retrying, and the snapshot behaviours surface it to the round driver.

use accord_types::{ContentError, ContentRef};
use thiserror::Error;

/// Result alias for collaborator calls.
pub type ChainResult<T> = Result<T, ChainError>;

/// Errors produced by contract collaborators and the snapshot store.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The collaborator answered with the wrong kind of response, or
    /// with no data at all. Hard failure of that call, never retried.
    #[error("collaborator response mismatch in {call}: {reason}")]
    ResponseMismatch {
        call: &'static str,
        reason: String,
    },

    /// No document is stored under the given content reference.
    #[error("no snapshot stored under reference {0}")]
    MissingDocument(ContentRef),

    /// Backend infrastructure failure, such as a poisoned lock.
    #[error("chain backend failure: {0}")]
    Backend(String),

    /// Content could not be canonically encoded or decoded.
    #[error(transparent)]
    Content(#[from] ContentError),
}

impl ChainError {
    /// Shorthand for the common no-data rejection.
    pub fn no_data(call: &'static str) -> Self {
        Self::ResponseMismatch {
            call,
            reason: "no data".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_mismatch_display() {
        let err = ChainError::no_data("build_approval_tx");
        assert_eq!(
            err.to_string(),
            "collaborator response mismatch in build_approval_tx: no data"
        );
    }

    #[test]
    fn missing_document_display() {
        let err = ChainError::MissingDocument(ContentRef::new("deadbeef"));
        assert!(err.to_string().contains("deadbeef"));
    }

    #[test]
    fn content_error_wraps_transparently() {
        let inner = ContentError::UnknownOperation(7);
        let outer = ChainError::from(inner);
        assert_eq!(outer.to_string(), ContentError::UnknownOperation(7).to_string());
    }
}

//! Error types for domain-value construction and encoding.

use thiserror::Error;

/// Errors raised while constructing or encoding domain values.
#[derive(Debug, Error)]
pub enum ContentError {
    /// An address string is not 20 hex-encoded bytes.
    #[error("invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    /// A hex field could not be decoded.
    #[error("invalid hex in {field}: {reason}")]
    InvalidHex { field: String, reason: String },

    /// Canonical JSON serialization failed.
    #[error("canonical encoding failed: {0}")]
    Canonical(String),

    /// A payload content value could not be decoded.
    #[error("payload decode failed: {0}")]
    PayloadDecode(String),

    /// An operation byte outside the Safe operation set.
    #[error("unknown safe operation byte: {0}")]
    UnknownOperation(u8),
}

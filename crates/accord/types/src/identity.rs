//! Identity newtypes: participants, chain addresses, snapshot references.

use crate::error::ContentError;
use serde::{Deserialize, Serialize};

/// Unique identifier of a consensus participant.
///
/// In deployments this is the participant's on-chain address; the core
/// only needs it to be an ordered, displayable key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Short display form (first 8 chars).
    pub fn short(&self) -> &str {
        &self.0[..8.min(self.0.len())]
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A 20-byte chain address carried as a `0x`-prefixed hex string.
///
/// Construction does not validate; [`Address::to_bytes`] does, because only
/// the byte-level encoders care and config files carry free-form strings.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// The hex body without the `0x` prefix.
    pub fn hex_body(&self) -> &str {
        self.0.strip_prefix("0x").unwrap_or(&self.0)
    }

    /// Decode into the 20 raw bytes used by transaction encodings.
    pub fn to_bytes(&self) -> Result<[u8; 20], ContentError> {
        let body = self.hex_body();
        let raw = hex::decode(body).map_err(|e| ContentError::InvalidAddress {
            address: self.0.clone(),
            reason: e.to_string(),
        })?;
        let bytes: [u8; 20] = raw.try_into().map_err(|_| ContentError::InvalidAddress {
            address: self.0.clone(),
            reason: "expected 20 bytes".into(),
        })?;
        Ok(bytes)
    }

    /// Build from raw bytes, lowercase hex with `0x` prefix.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a document in the content-addressed snapshot store.
///
/// Opaque to the core: rounds agree on the reference, never on the
/// document itself.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContentRef(pub String);

impl ContentRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short display form (first 12 chars).
    pub fn short(&self) -> &str {
        &self.0[..12.min(self.0.len())]
    }
}

impl std::fmt::Display for ContentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

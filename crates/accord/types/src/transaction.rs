//! Multisig transaction structures: multisend entries and the signable
//! bundle handed to the settlement layer.

use crate::error::ContentError;
use crate::identity::Address;
use serde::{Deserialize, Serialize};

/// How the Safe executes a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafeOperation {
    /// Regular `CALL` into the target contract.
    Call,
    /// `DELEGATECALL`; required for multisend batches.
    DelegateCall,
}

impl SafeOperation {
    pub fn as_u8(self) -> u8 {
        match self {
            SafeOperation::Call => 0,
            SafeOperation::DelegateCall => 1,
        }
    }

    pub fn from_u8(byte: u8) -> Result<Self, ContentError> {
        match byte {
            0 => Ok(SafeOperation::Call),
            1 => Ok(SafeOperation::DelegateCall),
            other => Err(ContentError::UnknownOperation(other)),
        }
    }
}

/// One entry of a multisend batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultisendTx {
    pub operation: SafeOperation,
    pub to: Address,
    pub value: u64,
    pub data: Vec<u8>,
}

impl MultisendTx {
    /// A plain `CALL` entry with zero value, the only shape this system
    /// batches.
    pub fn call(to: Address, data: Vec<u8>) -> Self {
        Self {
            operation: SafeOperation::Call,
            to,
            value: 0,
            data,
        }
    }
}

/// The fully assembled batch, ready for collective signing.
///
/// `safe_tx_hash` is the digest participants sign; the remaining fields
/// are what the settlement layer needs to submit the execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignableBundle {
    /// The multisend contract the Safe delegates into.
    pub to: Address,
    pub value: u64,
    /// Combined multisend call data.
    pub data: Vec<u8>,
    pub operation: SafeOperation,
    pub safe_tx_gas: u64,
    /// The 32-byte digest to sign.
    pub safe_tx_hash: [u8; 32],
}

impl SignableBundle {
    /// Hex form of the digest, without a `0x` prefix.
    pub fn hash_hex(&self) -> String {
        hex::encode(self.safe_tx_hash)
    }
}

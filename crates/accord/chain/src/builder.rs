//! Multisig transaction assembly.
//!
//! One disbursement settles as a two-call batch through the Safe:
//! approve the fund manager for the proposal amount, then execute the
//! proposal. The batch goes through multisend as a single
//! `DELEGATECALL`, and the Safe hash over that call is what participants
//! collectively sign.
//!
//! The builder's public surface never leaks a partial transaction: any
//! collaborator failure collapses the whole build into the sentinel
//! payload.

use crate::codec::encode_signable;
use crate::error::{ChainError, ChainResult};
use crate::traits::ChainClient;
use accord_types::{Address, MultisendTx, SafeOperation, SignableBundle, TxContent};
use std::sync::Arc;
use tracing::{debug, warn};

/// Gas forwarded to the inner Safe execution; zero lets the Safe
/// estimate at submission time.
pub const SAFE_TX_GAS: u64 = 0;
/// Native value attached to the batch.
pub const ETHER_VALUE: u64 = 0;

/// The contract addresses one deployment settles through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettlementAddresses {
    /// Fund-manager contract holding the proposal book.
    pub fund_manager: Address,
    /// Token the approvals are drawn on.
    pub fund_token: Address,
    /// The participants' multisig Safe.
    pub safe: Address,
    /// Multisend contract batching the two calls.
    pub multisend: Address,
}

/// Assembles the signable payload for a selected proposal.
pub struct TransactionBuilder {
    client: Arc<dyn ChainClient>,
    addresses: SettlementAddresses,
}

impl TransactionBuilder {
    pub fn new(client: Arc<dyn ChainClient>, addresses: SettlementAddresses) -> Self {
        Self { client, addresses }
    }

    /// Build the payload content for the transaction round.
    ///
    /// Infallible by contract: a failed build yields the sentinel
    /// payload, and the failure itself is only logged here.
    pub async fn build(&self, proposal_id: u64, amount: u64) -> TxContent {
        let bundle = match self.try_build(proposal_id, amount).await {
            Ok(bundle) => bundle,
            Err(error) => {
                warn!(proposal = proposal_id, %error, "transaction build failed");
                return TxContent::error();
            }
        };
        match encode_signable(&bundle) {
            Ok(payload) => TxContent::new(payload),
            Err(error) => {
                warn!(proposal = proposal_id, %error, "payload encoding failed");
                TxContent::error()
            }
        }
    }

    /// Assemble the full signable bundle, propagating the first failure.
    pub async fn try_build(&self, proposal_id: u64, amount: u64) -> ChainResult<SignableBundle> {
        let approval_hex = self
            .client
            .build_approval_tx(&self.addresses.fund_token, &self.addresses.fund_manager, amount)
            .await?;
        let approval = decode_call_data("build_approval_tx", &approval_hex)?;

        let execution_hex = self
            .client
            .get_execute_proposal_tx(&self.addresses.fund_manager, proposal_id)
            .await?;
        let execution = decode_call_data("get_execute_proposal_tx", &execution_hex)?;

        // Order matters: approval must land before execution draws on it.
        let batch = [
            MultisendTx::call(self.addresses.fund_token.clone(), approval),
            MultisendTx::call(self.addresses.fund_manager.clone(), execution),
        ];
        let combined_hex = self
            .client
            .get_tx_data(&self.addresses.multisend, &batch)
            .await?;
        let combined = decode_call_data("get_tx_data", &combined_hex)?;

        let hash_hex = self
            .client
            .get_raw_safe_transaction_hash(
                &self.addresses.safe,
                &self.addresses.multisend,
                ETHER_VALUE,
                &combined,
                SafeOperation::DelegateCall,
                SAFE_TX_GAS,
            )
            .await?;
        let safe_tx_hash = decode_hash("get_raw_safe_transaction_hash", &hash_hex)?;

        debug!(
            proposal = proposal_id,
            amount,
            data_len = combined.len(),
            "signable bundle assembled"
        );
        Ok(SignableBundle {
            to: self.addresses.multisend.clone(),
            value: ETHER_VALUE,
            data: combined,
            operation: SafeOperation::DelegateCall,
            safe_tx_gas: SAFE_TX_GAS,
            safe_tx_hash,
        })
    }
}

/// Decode a collaborator's hex call data; an empty answer means the
/// collaborator could not construct the call.
fn decode_call_data(call: &'static str, raw: &str) -> ChainResult<Vec<u8>> {
    let raw = raw.strip_prefix("0x").unwrap_or(raw);
    if raw.is_empty() {
        return Err(ChainError::no_data(call));
    }
    hex::decode(raw).map_err(|e| ChainError::ResponseMismatch {
        call,
        reason: e.to_string(),
    })
}

fn decode_hash(call: &'static str, raw: &str) -> ChainResult<[u8; 32]> {
    let bytes = decode_call_data(call, raw)?;
    bytes
        .try_into()
        .map_err(|_| ChainError::ResponseMismatch {
            call,
            reason: "expected a 32 byte hash".to_string(),
        })
}

//! Runtime parameters of the fund application.

use crate::error::{EngineError, EngineResult};
use accord_chain::SettlementAddresses;
use accord_rounds::{ConsensusParams, ConsensusResult};
use accord_types::{Address, ParticipantId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

/// Configuration one deployment runs with.
///
/// Addresses are carried as strings and validated by [`Params::validate`]
/// before the first cycle, so a malformed config file fails at startup
/// instead of mid-round.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Params {
    /// Fund-manager contract holding the proposal book.
    pub fund_manager_contract_address: Address,
    /// Token the disbursement approvals are drawn on.
    pub fund_token: Address,
    /// Beneficiary for plain transfers (settlement variants that bypass
    /// the proposal book).
    pub transfer_target_address: Address,
    /// The participants' multisig Safe.
    pub safe_contract_address: Address,
    /// Multisend contract batching the settlement calls.
    pub multisend_address: Address,
    /// Lower bound a proposal amount must strictly exceed.
    pub min_proposal_amount: u64,
    /// Upper bound a proposal amount must stay strictly under.
    pub max_proposal_amount: u64,
    /// The declared participant set.
    pub all_participants: BTreeSet<ParticipantId>,
    /// Quorum override; `None` derives `(2n / 3) + 1` from the set size.
    pub consensus_threshold: Option<usize>,
    /// Collection window per round instance, in milliseconds.
    pub round_timeout_ms: u64,
    /// Retry budget for `no_majority`/`round_timeout` loops per round.
    pub max_round_retries: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            fund_manager_contract_address: Address::from_bytes([0u8; 20]),
            fund_token: Address::from_bytes([0u8; 20]),
            transfer_target_address: Address::from_bytes([0u8; 20]),
            safe_contract_address: Address::from_bytes([0u8; 20]),
            multisend_address: Address::from_bytes([0u8; 20]),
            min_proposal_amount: 0,
            max_proposal_amount: u64::MAX,
            all_participants: BTreeSet::new(),
            consensus_threshold: None,
            round_timeout_ms: 30_000,
            max_round_retries: 3,
        }
    }
}

impl Params {
    /// Four-participant configuration for simulated runs.
    pub fn simulation() -> Self {
        Self {
            fund_manager_contract_address: Address::new(
                "0x68FCdF52066CcE5612827E872c45767E5a1f6551",
            ),
            fund_token: Address::new("0x5FbDB2315678afecb367f032d93F642f64180aa3"),
            transfer_target_address: Address::new("0x8626f6940E2eb28930eFb4CeF49B2d1F2C9C1199"),
            safe_contract_address: Address::new("0x5564550A54EcD43bA8f7c666fff1C4762889A572"),
            multisend_address: Address::new("0xA238CBeb142c10Ef7Ad8442C6D1f9E89e07e7761"),
            min_proposal_amount: 100,
            max_proposal_amount: 1_000,
            all_participants: (0..4)
                .map(|i| ParticipantId::new(format!("agent_{i}")))
                .collect(),
            consensus_threshold: None,
            round_timeout_ms: 2_000,
            max_round_retries: 3,
        }
    }

    /// Startup validation: addresses must decode, the amount window must
    /// be non-empty, and a participant set must exist.
    pub fn validate(&self) -> EngineResult<()> {
        for (name, address) in [
            ("fund_manager_contract_address", &self.fund_manager_contract_address),
            ("fund_token", &self.fund_token),
            ("transfer_target_address", &self.transfer_target_address),
            ("safe_contract_address", &self.safe_contract_address),
            ("multisend_address", &self.multisend_address),
        ] {
            address.to_bytes().map_err(|e| {
                EngineError::InvalidParams(format!("{name}: {e}"))
            })?;
        }
        if self.all_participants.is_empty() {
            return Err(EngineError::InvalidParams(
                "no participants configured".into(),
            ));
        }
        // Strict bounds leave no admissible amount unless max > min + 1.
        if self.max_proposal_amount <= self.min_proposal_amount.saturating_add(1) {
            return Err(EngineError::InvalidParams(format!(
                "amount window ({}, {}) admits no proposal",
                self.min_proposal_amount, self.max_proposal_amount
            )));
        }
        if self.max_round_retries == 0 {
            return Err(EngineError::InvalidParams(
                "max_round_retries must be at least 1".into(),
            ));
        }
        self.consensus_params()?;
        Ok(())
    }

    /// The consensus parameters this configuration implies.
    pub fn consensus_params(&self) -> ConsensusResult<ConsensusParams> {
        match self.consensus_threshold {
            Some(threshold) => {
                ConsensusParams::with_threshold(self.all_participants.clone(), threshold)
            }
            None => Ok(ConsensusParams::new(self.all_participants.clone())),
        }
    }

    /// The addresses the transaction builder settles through.
    pub fn settlement_addresses(&self) -> SettlementAddresses {
        SettlementAddresses {
            fund_manager: self.fund_manager_contract_address.clone(),
            fund_token: self.fund_token.clone(),
            safe: self.safe_contract_address.clone(),
            multisend: self.multisend_address.clone(),
        }
    }

    /// Collection window per round instance.
    pub fn round_timeout(&self) -> Duration {
        Duration::from_millis(self.round_timeout_ms)
    }
}

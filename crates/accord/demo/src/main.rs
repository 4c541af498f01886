#![deny(unsafe_code)]
//! Accord demo binary: full decision cycles over simulated backends.
//!
//! Runs four self-contained cycles:
//! 1. A qualifying proposal settling on a signable Safe transaction
//! 2. An exhausted proposal book holding without a transaction
//! 3. A book with only out-of-window amounts, holding likewise
//! 4. A degraded token collaborator collapsing settlement into the
//!    error path
//!
//! No external services required -- all collaborators are simulated.

mod scenario;

use accord_chain::{decode_signable, InMemorySnapshotStore, SimulatedLedger};
use accord_engine::{CycleDriver, CycleOutcome, Params};
use accord_types::Proposal;
use scenario::SimulatedBook;
use std::sync::Arc;

// ── Formatting Helpers ──────────────────────────────────────────────────

const BANNER: &str = r#"
 ╔═══════════════════════════════════════════════════════════════╗
 ║             Accord  --  Treasury Decision Demo                ║
 ║                                                               ║
 ║   Threshold consensus over a simulated proposal book,         ║
 ║   from snapshot agreement to a signable Safe transaction.     ║
 ╚═══════════════════════════════════════════════════════════════╝
"#;

fn section(title: &str) {
    let width: usize = 60;
    let pad = width.saturating_sub(title.len() + 4);
    let left = pad / 2;
    let right = pad - left;
    println!();
    println!(" ┌{}┐", "─".repeat(width));
    println!(" │{}  {}  {}│", " ".repeat(left), title, " ".repeat(right));
    println!(" └{}┘", "─".repeat(width));
}

fn ok(msg: &str) {
    println!("   [OK]  {}", msg);
}

fn info(msg: &str) {
    println!("   [--]  {}", msg);
}

fn warn(msg: &str) {
    println!("   [!!]  {}", msg);
}

// ── Main ────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(tracing::Level::WARN)
        .init();

    println!("{}", BANNER);

    if let Err(e) = run_demo().await {
        eprintln!();
        eprintln!("   [FATAL]  Demo failed: {}", e);
        std::process::exit(1);
    }

    println!();
    println!(" ════════════════════════════════════════════════════════════════");
    println!("  Demo complete.  All cycles reached a terminal round.");
    println!(" ════════════════════════════════════════════════════════════════");
    println!();
}

async fn run_demo() -> Result<(), Box<dyn std::error::Error>> {
    // ── Phase A: Configuration ──────────────────────────────────────
    section("Phase A: Configuration");

    let params = Params::simulation();
    params.validate()?;
    info(&format!(
        "Participants     : {}",
        params.all_participants.len()
    ));
    info(&format!(
        "Quorum           : {} of {}",
        params.consensus_params()?.threshold(),
        params.all_participants.len()
    ));
    info(&format!(
        "Amount window    : ({}, {}) exclusive",
        params.min_proposal_amount, params.max_proposal_amount
    ));
    info(&format!("Round timeout    : {} ms", params.round_timeout_ms));
    info(&format!("Retry budget     : {}", params.max_round_retries));

    // ── Phase B: Settlement Cycle ───────────────────────────────────
    section("Phase B: Settlement Cycle");

    let outcome = run_cycle_with(SimulatedBook::with_qualifying_proposal(), false).await?;
    print_outcome(&outcome)?;
    print_signable(&outcome)?;

    // ── Phase C: Hold Cycle ─────────────────────────────────────────
    section("Phase C: Hold Cycle  (exhausted book)");

    let outcome = run_cycle_with(SimulatedBook::exhausted(), false).await?;
    print_outcome(&outcome)?;

    // ── Phase D: Hold Cycle, window edges ───────────────────────────
    section("Phase D: Hold Cycle  (out-of-window amounts)");

    let outcome = run_cycle_with(SimulatedBook::out_of_window(), false).await?;
    print_outcome(&outcome)?;

    // ── Phase E: Degraded Collaborator ──────────────────────────────
    section("Phase E: Degraded Collaborator");

    let outcome = run_cycle_with(SimulatedBook::with_qualifying_proposal(), true).await?;
    print_outcome(&outcome)?;

    Ok(())
}

/// One full cycle on a fresh driver over the given proposal book.
async fn run_cycle_with(
    book: Vec<Proposal>,
    degrade_token: bool,
) -> Result<CycleOutcome, Box<dyn std::error::Error>> {
    let ledger = Arc::new(SimulatedLedger::with_proposals(book));
    if degrade_token {
        warn("Token collaborator configured to reject approvals");
        ledger.fail_approval(true);
    }
    let snapshots = Arc::new(InMemorySnapshotStore::new());
    let driver = CycleDriver::new(Params::simulation(), ledger, snapshots)?;
    Ok(driver.run_cycle().await?)
}

// ── Outcome helpers ─────────────────────────────────────────────────────

fn print_outcome(outcome: &CycleOutcome) -> Result<(), Box<dyn std::error::Error>> {
    ok(&format!("Terminal round   : {}", outcome.final_round));
    info(&format!("Cycle id         : {}", outcome.cycle_id));
    if let Some(decision) = outcome.store.decision()? {
        info(&format!("Decision         : {}", decision));
    }
    if let Some(id) = outcome.store.proposal_id()? {
        info(&format!("Selected proposal: #{}", id));
    }
    if let Some(amount) = outcome.store.proposal_amount()? {
        info(&format!("Amount           : {}", amount));
    }
    info(&format!(
        "Snapshot votes   : {}",
        outcome.store.participant_to_snapshot_round()?.len()
    ));
    info(&format!(
        "Decision votes   : {}",
        outcome.store.participant_to_decision_round()?.len()
    ));
    match &outcome.tx_payload {
        Some(payload) => ok(&format!(
            "Signable payload : {} hex chars",
            payload.as_str().len()
        )),
        None => info("Signable payload : none (no settlement this cycle)"),
    }
    Ok(())
}

fn print_signable(outcome: &CycleOutcome) -> Result<(), Box<dyn std::error::Error>> {
    let Some(payload) = &outcome.tx_payload else {
        warn("No payload to decode");
        return Ok(());
    };
    let bundle = decode_signable(payload.as_str())?;
    ok(&format!("Batch target     : {}", bundle.to));
    info(&format!("Operation        : {:?}", bundle.operation));
    info(&format!("Batched call data: {} bytes", bundle.data.len()));
    info(&format!("Safe tx gas      : {}", bundle.safe_tx_gas));
    info(&format!("Safe tx hash     : {}..", &bundle.hash_hex()[..16]));
    Ok(())
}

// ── Tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use accord_engine::FundRound;

    #[tokio::test]
    async fn settlement_cycle_reaches_the_tx_terminal() {
        let outcome = run_cycle_with(SimulatedBook::with_qualifying_proposal(), false)
            .await
            .unwrap();
        assert_eq!(outcome.final_round, FundRound::FinishedTxPreparation);
        assert!(outcome.settled());

        let payload = outcome.tx_payload.unwrap();
        let bundle = decode_signable(payload.as_str()).unwrap();
        assert_eq!(bundle.to, Params::simulation().multisend_address);
    }

    #[tokio::test]
    async fn hold_cycle_produces_no_payload() {
        let outcome = run_cycle_with(SimulatedBook::exhausted(), false)
            .await
            .unwrap();
        assert_eq!(outcome.final_round, FundRound::FinishedDecisionMaking);
        assert!(!outcome.settled());
    }

    #[tokio::test]
    async fn degraded_collaborator_ends_without_settlement() {
        let outcome = run_cycle_with(SimulatedBook::with_qualifying_proposal(), true)
            .await
            .unwrap();
        assert_eq!(outcome.final_round, FundRound::FinishedDecisionMaking);
        assert!(!outcome.settled());
        // The decision itself stood; only settlement was abandoned.
        assert_eq!(outcome.store.proposal_id().unwrap(), Some(3));
    }
}

//! End-to-end test: retry exhaustion when a round cannot converge.
//!
//! A degraded collaborator keeps participants from submitting at all;
//! the affected round times out, retries on a fresh collector, and the
//! driver gives up once the budget is spent instead of spinning.

use accord_engine::{EngineError, Params};
use accord_tests::{harness_with, harness_with_params};
use accord_types::Proposal;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn one_proposal() -> Vec<Proposal> {
    vec![Proposal::new(1, "0xA", 500, false)]
}

fn assert_exhausted(err: EngineError, expected_round: &str, expected_budget: usize) {
    let EngineError::RetriesExhausted { round, budget } = err else {
        panic!("expected retries exhausted, got {err}");
    };
    assert_eq!(round, expected_round);
    assert_eq!(budget, expected_budget);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreachable_snapshot_store_exhausts_the_first_round() {
    let harness = harness_with(one_proposal());
    harness.snapshots.fail_put(true);

    let err = harness.driver.run_cycle().await.unwrap_err();
    assert_exhausted(err, "api_check", Params::simulation().max_round_retries);
}

#[tokio::test]
async fn unreachable_proposal_book_exhausts_the_first_round() {
    let harness = harness_with(one_proposal());
    harness.ledger.fail_proposals(true);

    let err = harness.driver.run_cycle().await.unwrap_err();
    assert_exhausted(err, "api_check", Params::simulation().max_round_retries);
}

#[tokio::test]
async fn unreadable_snapshots_exhaust_the_decision_round() {
    let harness = harness_with(one_proposal());
    // Writes succeed, so the first round converges; reads fail, so the
    // decision round starves.
    harness.snapshots.fail_get(true);

    let err = harness.driver.run_cycle().await.unwrap_err();
    assert_exhausted(
        err,
        "decision_making",
        Params::simulation().max_round_retries,
    );
}

#[tokio::test]
async fn reduced_retry_budget_is_honored() {
    let params = Params {
        max_round_retries: 1,
        ..Params::simulation()
    };
    let harness = harness_with_params(params, one_proposal());
    harness.snapshots.fail_put(true);

    let err = harness.driver.run_cycle().await.unwrap_err();
    assert_exhausted(err, "api_check", 1);
}

#[tokio::test]
async fn healthy_collaborators_never_touch_the_budget() {
    let params = Params {
        max_round_retries: 1,
        ..Params::simulation()
    };
    let harness = harness_with_params(params, one_proposal());
    let outcome = harness.driver.run_cycle().await.unwrap();
    assert!(outcome.settled());
}

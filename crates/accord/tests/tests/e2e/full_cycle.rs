//! End-to-end test: proposal book -> snapshot agreement -> decision ->
//! signable transaction, across every terminal of the transition graph.

use accord_chain::{decode_signable, SnapshotStore, ETHER_VALUE, SAFE_TX_GAS};
use accord_engine::{FundRound, Params};
use accord_rounds::sync::keys;
use accord_tests::harness_with;
use accord_types::{Event, Proposal, SafeOperation};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn qualifying_book() -> Vec<Proposal> {
    vec![
        Proposal::new(1, "0xA", 12, false),
        Proposal::new(2, "0xB", 400, false),
        Proposal::new(3, "0xC", 600, false),
    ]
}

fn executed_book() -> Vec<Proposal> {
    vec![
        Proposal::new(1, "0xA", 400, true),
        Proposal::new(2, "0xB", 600, true),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn settlement_cycle_records_the_full_trail() {
    let harness = harness_with(qualifying_book());
    let outcome = harness.driver.run_cycle().await.unwrap();

    assert_eq!(outcome.final_round, FundRound::FinishedTxPreparation);
    assert!(outcome.settled());

    let store = &outcome.store;
    assert_eq!(store.decision().unwrap(), Some(Event::Transact));
    assert_eq!(store.proposal_id().unwrap(), Some(2));
    assert_eq!(store.proposal_amount().unwrap(), Some(400));
    assert_eq!(store.tx_submitter().unwrap(), "tx_preparation");

    // Each round converged, so each collection carries at least a quorum.
    let quorum = Params::simulation().consensus_params().unwrap().threshold();
    assert!(store.participant_to_snapshot_round().unwrap().len() >= quorum);
    assert!(store.participant_to_decision_round().unwrap().len() >= quorum);
    assert!(store.participant_to_tx_round().unwrap().len() >= quorum);

    // Honest participants share collaborators, so every recorded vote
    // matches the winner.
    let payload = outcome.tx_payload.clone().unwrap();
    for content in store.participant_to_tx_round().unwrap().values() {
        assert_eq!(content, &payload);
    }
}

#[tokio::test]
async fn settled_payload_decodes_to_the_expected_batch() {
    let harness = harness_with(qualifying_book());
    let outcome = harness.driver.run_cycle().await.unwrap();

    let payload = outcome.tx_payload.unwrap();
    let bundle = decode_signable(payload.as_str()).unwrap();

    let params = Params::simulation();
    assert_eq!(bundle.to, params.multisend_address);
    assert_eq!(bundle.value, ETHER_VALUE);
    assert_eq!(bundle.operation, SafeOperation::DelegateCall);
    assert_eq!(bundle.safe_tx_gas, SAFE_TX_GAS);
    // Two packed entries: approve (85 + 68 bytes) then execute (85 + 36).
    assert_eq!(bundle.data.len(), 153 + 121);
}

#[tokio::test]
async fn agreed_snapshot_reference_resolves_to_the_book() {
    let harness = harness_with(qualifying_book());
    let outcome = harness.driver.run_cycle().await.unwrap();

    let reference = outcome.store.ipfs_hash().unwrap().unwrap();
    let snapshot = harness.snapshots.get(&reference).await.unwrap();
    assert_eq!(snapshot.proposals(), qualifying_book().as_slice());
}

#[tokio::test]
async fn hold_cycle_leaves_settlement_keys_absent() {
    let harness = harness_with(executed_book());
    let outcome = harness.driver.run_cycle().await.unwrap();

    assert_eq!(outcome.final_round, FundRound::FinishedDecisionMaking);
    assert!(!outcome.settled());

    let store = &outcome.store;
    assert_eq!(store.decision().unwrap(), Some(Event::Done));
    assert!(!store.contains(keys::PROPOSAL_ID));
    assert!(!store.contains(keys::PROPOSAL_AMOUNT));
    assert!(!store.contains(keys::MOST_VOTED_TX_HASH));
    assert!(!store.contains(keys::TX_SUBMITTER));
    assert!(!store.contains(keys::PARTICIPANT_TO_TX_ROUND));
}

#[tokio::test]
async fn boundary_amounts_never_qualify() {
    let params = Params::simulation();
    let harness = harness_with(vec![
        Proposal::new(1, "0xA", params.min_proposal_amount, false),
        Proposal::new(2, "0xB", params.max_proposal_amount, false),
    ]);
    let outcome = harness.driver.run_cycle().await.unwrap();
    assert_eq!(outcome.final_round, FundRound::FinishedDecisionMaking);
    assert!(!outcome.settled());
}

#[tokio::test]
async fn build_failure_takes_the_error_edge() {
    let harness = harness_with(qualifying_book());
    harness.ledger.fail_execution(true);
    let outcome = harness.driver.run_cycle().await.unwrap();

    // The decision stood, settlement was abandoned, and the failed
    // transaction round wrote nothing.
    assert_eq!(outcome.final_round, FundRound::FinishedDecisionMaking);
    assert!(!outcome.settled());
    assert_eq!(outcome.store.decision().unwrap(), Some(Event::Transact));
    assert_eq!(outcome.store.proposal_id().unwrap(), Some(2));
    assert!(!outcome.store.contains(keys::MOST_VOTED_TX_HASH));
    assert!(!outcome.store.contains(keys::PARTICIPANT_TO_TX_ROUND));
}

#[tokio::test]
async fn independent_deployments_settle_identically() {
    let first = harness_with(qualifying_book())
        .driver
        .run_cycle()
        .await
        .unwrap();
    let second = harness_with(qualifying_book())
        .driver
        .run_cycle()
        .await
        .unwrap();

    assert_eq!(first.final_round, second.final_round);
    assert_eq!(first.tx_payload, second.tx_payload);
    assert_eq!(
        first.store.ipfs_hash().unwrap(),
        second.store.ipfs_hash().unwrap()
    );
}

#[tokio::test]
async fn consecutive_cycles_on_one_deployment_are_independent() {
    let harness = harness_with(qualifying_book());
    let first = harness.driver.run_cycle().await.unwrap();

    // The book changes between cycles; the next cycle sees the new book.
    harness
        .ledger
        .set_proposals(vec![Proposal::new(9, "0xD", 900, false)])
        .unwrap();
    let second = harness.driver.run_cycle().await.unwrap();

    assert_eq!(first.store.proposal_id().unwrap(), Some(2));
    assert_eq!(second.store.proposal_id().unwrap(), Some(9));
    assert_ne!(first.tx_payload, second.tx_payload);
}

//! Property tests: a full cycle is a deterministic function of the
//! proposal book, and it never disagrees with the pure decision rule.

use accord_engine::{decide, FundRound, FundingDecision, Params};
use accord_tests::harness_with;
use accord_types::Proposal;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn arb_book() -> impl Strategy<Value = Vec<Proposal>> {
    proptest::collection::vec(
        (0u64..50, 0u64..2_000, any::<bool>()).prop_map(|(id, amount, executed)| {
            Proposal::new(id, "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC", amount, executed)
        }),
        0..12,
    )
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// The cycle's terminal and recorded selection always match the pure
    /// decision rule applied to the same book.
    #[test]
    fn cycle_agrees_with_the_decision_rule(book in arb_book()) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let params = Params::simulation();
            let harness = harness_with(book.clone());
            let outcome = harness.driver.run_cycle().await.unwrap();

            match decide(&book, params.min_proposal_amount, params.max_proposal_amount) {
                FundingDecision::Transact(info) => {
                    prop_assert_eq!(outcome.final_round, FundRound::FinishedTxPreparation);
                    prop_assert!(outcome.settled());
                    prop_assert_eq!(
                        outcome.store.proposal_id().unwrap(),
                        Some(info.proposal_id)
                    );
                    prop_assert_eq!(
                        outcome.store.proposal_amount().unwrap(),
                        Some(info.proposal_amount)
                    );
                }
                FundingDecision::Hold => {
                    prop_assert_eq!(outcome.final_round, FundRound::FinishedDecisionMaking);
                    prop_assert!(!outcome.settled());
                }
            }
            Ok(())
        })?;
    }

    /// Two independent deployments over the same book settle identically.
    #[test]
    fn deployments_are_interchangeable(book in arb_book()) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let a = harness_with(book.clone()).driver.run_cycle().await.unwrap();
            let b = harness_with(book).driver.run_cycle().await.unwrap();

            prop_assert_eq!(a.final_round, b.final_round);
            prop_assert_eq!(a.tx_payload, b.tx_payload);
            prop_assert_eq!(
                a.store.ipfs_hash().unwrap(),
                b.store.ipfs_hash().unwrap()
            );
            Ok(())
        })?;
    }
}

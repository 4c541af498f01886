//! Property tests: round policies classify arbitrary vote splits
//! correctly once every participant has spoken.

use accord_engine::{decision_end_block, tx_end_block};
use accord_rounds::sync::keys;
use accord_rounds::{ConsensusParams, RoundVerdict, ThresholdRound};
use accord_tests::participant;
use accord_types::{DecisionContent, Event, ProposalInfo, TxContent};
use proptest::prelude::*;
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn params_for(n: usize) -> ConsensusParams {
    let participants: BTreeSet<_> = (0..n).map(participant).collect();
    ConsensusParams::new(participants)
}

fn decision_choice(choice: u8) -> DecisionContent {
    match choice {
        0 => DecisionContent::hold(),
        1 => DecisionContent::transact(ProposalInfo::new(1, 500)),
        _ => DecisionContent::transact(ProposalInfo::new(2, 700)),
    }
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// With every participant submitted, the decision policy always
    /// speaks: a quorum verdict when some content reached threshold,
    /// `no_majority` otherwise -- never `Pending`.
    #[test]
    fn full_decision_round_always_resolves(
        choices in proptest::collection::vec(0u8..3, 1..10),
    ) {
        let params = params_for(choices.len());
        let threshold = params.threshold();
        let mut round = ThresholdRound::new(params);
        for (i, choice) in choices.iter().enumerate() {
            round.submit(participant(i), decision_choice(*choice)).unwrap();
        }

        let mut counts = [0usize; 3];
        for choice in &choices {
            counts[*choice as usize] += 1;
        }
        let converged = counts.iter().any(|count| *count >= threshold);

        match decision_end_block(&round).unwrap() {
            RoundVerdict::Pending => prop_assert!(false, "a complete round must resolve"),
            RoundVerdict::Transition { updates, event } => {
                if converged {
                    prop_assert!(event == Event::Done || event == Event::Transact);
                    prop_assert_eq!(
                        updates.contains_key(keys::PROPOSAL_ID),
                        event == Event::Transact
                    );
                    prop_assert!(updates.contains_key(keys::DECISION));
                } else {
                    prop_assert_eq!(event, Event::NoMajority);
                    prop_assert!(updates.is_empty());
                }
            }
        }
    }

    /// The transaction policy converts a sentinel quorum into the error
    /// event and records no settlement state for it; a payload quorum
    /// records the agreed payload.
    #[test]
    fn sentinel_quorums_resolve_to_error(
        flags in proptest::collection::vec(any::<bool>(), 1..10),
    ) {
        let params = params_for(flags.len());
        let threshold = params.threshold();
        let mut round = ThresholdRound::new(params);
        for (i, sentinel) in flags.iter().enumerate() {
            let content = if *sentinel {
                TxContent::error()
            } else {
                TxContent::new("00ab")
            };
            round.submit(participant(i), content).unwrap();
        }

        let sentinels = flags.iter().filter(|sentinel| **sentinel).count();
        let payloads = flags.len() - sentinels;

        match tx_end_block(&round).unwrap() {
            RoundVerdict::Pending => prop_assert!(false, "a complete round must resolve"),
            RoundVerdict::Transition { updates, event } => {
                if sentinels >= threshold {
                    prop_assert_eq!(event, Event::Error);
                    prop_assert!(updates.is_empty());
                } else if payloads >= threshold {
                    prop_assert_eq!(event, Event::Done);
                    prop_assert!(updates.contains_key(keys::MOST_VOTED_TX_HASH));
                    prop_assert!(updates.contains_key(keys::TX_SUBMITTER));
                } else {
                    prop_assert_eq!(event, Event::NoMajority);
                    prop_assert!(updates.is_empty());
                }
            }
        }
    }
}

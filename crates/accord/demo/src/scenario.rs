//! Proposal books for the demo scenarios.
//!
//! Each book is a deterministic stand-in for a fund-manager contract
//! response, shaped to steer one cycle down a specific path of the
//! transition graph without any external services.

use accord_types::Proposal;

/// Produces the proposal books the demo cycles run against.
///
/// The simulation window admits amounts strictly between 100 and 1000,
/// so each book is written against those bounds.
pub struct SimulatedBook;

impl SimulatedBook {
    /// A mixed book whose first qualifying entry sits behind two
    /// non-qualifying ones.
    ///
    /// Proposal 3 (amount 500) is the first unexecuted entry inside the
    /// window; proposal 4 also qualifies but arrives later, which is how
    /// the demo shows first-match selection.
    pub fn with_qualifying_proposal() -> Vec<Proposal> {
        vec![
            Proposal::new(1, "0x8626f6940E2eb28930eFb4CeF49B2d1F2C9C1199", 50, false),
            Proposal::new(2, "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC", 2_500, false),
            Proposal::new(3, "0x90F79bf6EB2c4f870365E785982E1f101E93b906", 500, false),
            Proposal::new(4, "0x15d34AAf54267DB7D7c367839AAf71A00a2C6A65", 700, false),
        ]
    }

    /// A book where every in-window proposal has already been executed.
    ///
    /// The decision round holds and the cycle ends without touching the
    /// transaction round.
    pub fn exhausted() -> Vec<Proposal> {
        vec![
            Proposal::new(1, "0x8626f6940E2eb28930eFb4CeF49B2d1F2C9C1199", 500, true),
            Proposal::new(2, "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC", 800, true),
        ]
    }

    /// A book whose amounts all fall outside the admissible window,
    /// including both exact bounds.
    pub fn out_of_window() -> Vec<Proposal> {
        vec![
            Proposal::new(1, "0x8626f6940E2eb28930eFb4CeF49B2d1F2C9C1199", 100, false),
            Proposal::new(2, "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC", 1_000, false),
            Proposal::new(3, "0x90F79bf6EB2c4f870365E785982E1f101E93b906", 12, false),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accord_engine::{decide, FundingDecision};
    use accord_types::ProposalInfo;

    #[test]
    fn qualifying_book_selects_the_third_proposal() {
        let decision = decide(&SimulatedBook::with_qualifying_proposal(), 100, 1_000);
        assert_eq!(decision, FundingDecision::Transact(ProposalInfo::new(3, 500)));
    }

    #[test]
    fn exhausted_book_holds() {
        let decision = decide(&SimulatedBook::exhausted(), 100, 1_000);
        assert_eq!(decision, FundingDecision::Hold);
    }

    #[test]
    fn out_of_window_book_holds_on_exact_bounds() {
        let decision = decide(&SimulatedBook::out_of_window(), 100, 1_000);
        assert_eq!(decision, FundingDecision::Hold);
    }
}

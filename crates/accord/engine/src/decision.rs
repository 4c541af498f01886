//! Proposal selection, the single business rule of the system.

use accord_types::{DecisionContent, Event, Proposal, ProposalInfo};

/// Outcome of scanning the proposal book.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FundingDecision {
    /// Act on the selected proposal this cycle.
    Transact(ProposalInfo),
    /// No qualifying proposal; hold until the next cycle.
    Hold,
}

impl FundingDecision {
    /// The event this decision resolves the decision round to.
    pub fn event(self) -> Event {
        match self {
            FundingDecision::Transact(_) => Event::Transact,
            FundingDecision::Hold => Event::Done,
        }
    }

    /// The canonical payload content participants vote on.
    pub fn to_content(self) -> DecisionContent {
        match self {
            FundingDecision::Transact(info) => DecisionContent::transact(info),
            FundingDecision::Hold => DecisionContent::hold(),
        }
    }
}

/// Select the first unexecuted proposal whose amount lies strictly
/// between the bounds.
///
/// First match wins, not best match, and the input order is taken as
/// given: the proposal book's own ordering is part of the rule.
pub fn decide(proposals: &[Proposal], min_amount: u64, max_amount: u64) -> FundingDecision {
    for proposal in proposals {
        if proposal.executed {
            continue;
        }
        if proposal.amount > min_amount && proposal.amount < max_amount {
            return FundingDecision::Transact(ProposalInfo::new(proposal.id, proposal.amount));
        }
    }
    FundingDecision::Hold
}

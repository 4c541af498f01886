//! The cycle driver.
//!
//! One cycle walks the transition graph from its entry round to a
//! terminal: run the current round's behaviour for every participant
//! inside the collection window, tally submissions until the round's
//! policy speaks, apply the verdict's updates, and follow the event
//! through the graph. Retry events re-enter the same round on a fresh
//! collector; a bounded budget keeps a permanently split or silent
//! round from spinning forever.

use crate::app::{
    decision_end_block, fund_transition_graph, snapshot_end_block, tx_end_block, FundRound,
};
use crate::behaviours::FundBehaviours;
use crate::config::Params;
use crate::error::{EngineError, EngineResult};
use accord_chain::{ChainClient, SnapshotStore};
use accord_rounds::sync::keys;
use accord_rounds::{
    ConsensusError, ConsensusResult, RoundVerdict, SynchronizedData, ThresholdRound,
    TransitionGraph,
};
use accord_types::{Event, ParticipantId, TxContent};
use futures::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What one finished cycle leaves behind.
#[derive(Clone, Debug)]
pub struct CycleOutcome {
    /// Identifier of this cycle, for log correlation.
    pub cycle_id: Uuid,
    /// The terminal the graph walk ended on.
    pub final_round: FundRound,
    /// The agreed signable payload, present only when the cycle settled
    /// on a transaction.
    pub tx_payload: Option<TxContent>,
    /// The synchronized store as of the terminal.
    pub store: SynchronizedData,
}

impl CycleOutcome {
    /// Whether this cycle produced a transaction to sign.
    pub fn settled(&self) -> bool {
        self.tx_payload.is_some()
    }
}

/// Drives decision cycles for one configured deployment.
pub struct CycleDriver {
    params: Params,
    graph: TransitionGraph<FundRound>,
    behaviours: FundBehaviours,
}

// Manual because the behaviours hold `dyn` collaborators without Debug.
impl std::fmt::Debug for CycleDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CycleDriver")
            .field("params", &self.params)
            .field("graph", &self.graph)
            .finish_non_exhaustive()
    }
}

impl CycleDriver {
    /// Validate the configuration, build the transition graph, and wire
    /// the behaviours to their collaborators.
    pub fn new(
        params: Params,
        client: Arc<dyn ChainClient>,
        snapshots: Arc<dyn SnapshotStore>,
    ) -> EngineResult<Self> {
        params.validate()?;
        let graph = fund_transition_graph()?;
        let behaviours = FundBehaviours::new(params.clone(), client, snapshots);
        Ok(Self {
            params,
            graph,
            behaviours,
        })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Run one full decision cycle to a terminal round.
    pub async fn run_cycle(&self) -> EngineResult<CycleOutcome> {
        let cycle_id = Uuid::new_v4();
        let mut store = SynchronizedData::new();
        self.seed(&mut store)?;
        self.graph.check_entry(&store)?;

        info!(
            cycle = %cycle_id,
            participants = self.params.all_participants.len(),
            threshold = self.params.consensus_params()?.threshold(),
            "cycle started"
        );

        let mut current = self.graph.initial();
        let mut attempts = 0usize;
        while !self.graph.is_terminal(current) {
            let verdict = self.run_round_once(current, &store).await?;
            let (updates, event) = match verdict {
                RoundVerdict::Pending => (BTreeMap::new(), Event::RoundTimeout),
                RoundVerdict::Transition { updates, event } => (updates, event),
            };
            let next = self.graph.transition(current, event)?;

            if event.is_retry() {
                if attempts >= self.params.max_round_retries {
                    return Err(EngineError::RetriesExhausted {
                        round: current.to_string(),
                        budget: self.params.max_round_retries,
                    });
                }
                attempts += 1;
                warn!(
                    cycle = %cycle_id,
                    round = %current,
                    event = %event,
                    attempt = attempts,
                    "round retrying"
                );
                current = next;
                continue;
            }

            store.update(updates);
            debug!(
                cycle = %cycle_id,
                round = %current,
                event = %event,
                next = %next,
                "round transitioned"
            );
            current = next;
            attempts = 0;
        }

        self.graph.check_terminal(current, &store)?;
        let tx_payload = store.most_voted_tx_hash()?;
        info!(
            cycle = %cycle_id,
            terminal = %current,
            settled = tx_payload.is_some(),
            "cycle finished"
        );
        Ok(CycleOutcome {
            cycle_id,
            final_round: current,
            tx_payload,
            store,
        })
    }

    /// Entries every cycle starts from, before the first round runs.
    fn seed(&self, store: &mut SynchronizedData) -> EngineResult<()> {
        let participants = serde_json::to_value(&self.params.all_participants).map_err(|e| {
            ConsensusError::ValueType {
                key: keys::ALL_PARTICIPANTS.to_string(),
                reason: e.to_string(),
            }
        })?;
        let safe = serde_json::to_value(&self.params.safe_contract_address).map_err(|e| {
            ConsensusError::ValueType {
                key: keys::SAFE_CONTRACT_ADDRESS.to_string(),
                reason: e.to_string(),
            }
        })?;
        store.update([
            (keys::ALL_PARTICIPANTS.to_string(), participants),
            (keys::SAFE_CONTRACT_ADDRESS.to_string(), safe),
        ]);
        Ok(())
    }

    async fn run_round_once(
        &self,
        round: FundRound,
        store: &SynchronizedData,
    ) -> EngineResult<RoundVerdict> {
        debug!(round = %round, "round started");
        match round {
            FundRound::ApiCheck => self.run_snapshot_round().await,
            FundRound::DecisionMaking => self.run_decision_round(store).await,
            FundRound::TxPreparation => self.run_tx_round(store).await,
            FundRound::FinishedDecisionMaking | FundRound::FinishedTxPreparation => Err(
                ConsensusError::InvalidGraph(format!("terminal round {round} cannot run")).into(),
            ),
        }
    }

    async fn run_snapshot_round(&self) -> EngineResult<RoundVerdict> {
        let tasks = join_all(self.params.all_participants.iter().map(|participant| {
            async move {
                (
                    participant.clone(),
                    self.behaviours.snapshot_payload(participant).await,
                )
            }
        }));
        let Some(results) = self.within_window(FundRound::ApiCheck, tasks).await else {
            return Ok(RoundVerdict::bare(Event::RoundTimeout));
        };
        self.tally(FundRound::ApiCheck, results, snapshot_end_block)
    }

    async fn run_decision_round(&self, store: &SynchronizedData) -> EngineResult<RoundVerdict> {
        let tasks = join_all(self.params.all_participants.iter().map(|participant| {
            async move {
                (
                    participant.clone(),
                    self.behaviours.decision_payload(participant, store).await,
                )
            }
        }));
        let Some(results) = self.within_window(FundRound::DecisionMaking, tasks).await else {
            return Ok(RoundVerdict::bare(Event::RoundTimeout));
        };
        self.tally(FundRound::DecisionMaking, results, decision_end_block)
    }

    async fn run_tx_round(&self, store: &SynchronizedData) -> EngineResult<RoundVerdict> {
        let tasks = join_all(self.params.all_participants.iter().map(|participant| {
            async move {
                (
                    participant.clone(),
                    self.behaviours.tx_payload(participant, store).await,
                )
            }
        }));
        let Some(results) = self.within_window(FundRound::TxPreparation, tasks).await else {
            return Ok(RoundVerdict::bare(Event::RoundTimeout));
        };
        self.tally(FundRound::TxPreparation, results, tx_end_block)
    }

    /// Await all participant behaviours inside the collection window.
    /// `None` means the window elapsed with submissions outstanding.
    async fn within_window<C>(
        &self,
        round: FundRound,
        tasks: impl Future<Output = Vec<(ParticipantId, EngineResult<C>)>>,
    ) -> Option<Vec<(ParticipantId, EngineResult<C>)>> {
        match tokio::time::timeout(self.params.round_timeout(), tasks).await {
            Ok(results) => Some(results),
            Err(_) => {
                warn!(
                    round = %round,
                    timeout_ms = self.params.round_timeout_ms,
                    "collection window elapsed"
                );
                None
            }
        }
    }

    /// Feed behaviour results into a fresh collector, polling the
    /// round's policy after every accepted submission.
    ///
    /// A collaborator failure costs that participant its submission but
    /// not the round; anything else is cycle-fatal. When the results run
    /// out with the policy still pending, the missing submissions can
    /// never arrive, which from the round's view is the window elapsing.
    fn tally<C, P>(
        &self,
        round: FundRound,
        results: Vec<(ParticipantId, EngineResult<C>)>,
        policy: P,
    ) -> EngineResult<RoundVerdict>
    where
        C: Clone + Serialize,
        P: Fn(&ThresholdRound<C>) -> ConsensusResult<RoundVerdict>,
    {
        let mut collector = ThresholdRound::new(self.params.consensus_params()?);
        for (participant, outcome) in results {
            let content = match outcome {
                Ok(content) => content,
                Err(EngineError::Chain(error)) => {
                    warn!(
                        round = %round,
                        participant = %participant.short(),
                        %error,
                        "participant produced no payload"
                    );
                    continue;
                }
                Err(error) => return Err(error),
            };
            collector.submit(participant, content)?;
            let verdict = policy(&collector)?;
            if verdict.event().is_some() {
                return Ok(verdict);
            }
        }
        warn!(
            round = %round,
            submissions = collector.submission_count(),
            "round stalled below quorum"
        );
        Ok(RoundVerdict::bare(Event::RoundTimeout))
    }
}

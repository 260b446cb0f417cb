//! Workflow engine - sequences steps between pause points.

use std::sync::Arc;

use deckflow_checkpoint::{Checkpoint, SnapshotManager, StepName};
use deckflow_protocols::{
    Route, SessionRecord, SessionUpdate, SharedGenerator, WorkflowState, normalize_feedback,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::WorkflowError;
use crate::executor::{AnalyzeExecutor, CritiqueExecutor, DraftExecutor, StepExecutor};

/// Caller input for a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInput {
    /// Session identifier; generated when absent.
    #[serde(default)]
    pub session_id: Option<String>,
    pub user_request: String,
    pub source_material: String,
}

impl SessionInput {
    pub fn new(user_request: impl Into<String>, source_material: impl Into<String>) -> Self {
        Self {
            session_id: None,
            user_request: user_request.into(),
            source_material: source_material.into(),
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// Result of one `advance` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub session_id: String,
    /// State the session is now waiting in.
    pub next: WorkflowState,
    /// Copy of the session record after the call.
    pub record: SessionRecord,
    pub terminated: bool,
}

impl StepOutcome {
    fn from_checkpoint(checkpoint: Checkpoint) -> Self {
        Self {
            session_id: checkpoint.session_id,
            next: checkpoint.next,
            terminated: checkpoint.next.is_terminal(),
            record: checkpoint.record,
        }
    }
}

/// Answer to a state query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub values: SessionRecord,
    /// Pending state, empty once the workflow is done.
    pub next: Vec<WorkflowState>,
}

/// Snapshots produced during one `advance` call, committed together.
struct PendingRun {
    record: SessionRecord,
    state: WorkflowState,
    sequence: u32,
    checkpoints: Vec<Checkpoint>,
}

impl PendingRun {
    fn from_latest(latest: Checkpoint) -> Self {
        Self {
            sequence: latest.next_sequence(),
            state: latest.next,
            record: latest.record,
            checkpoints: Vec::new(),
        }
    }

    fn record_step(&mut self, step: StepName, next: WorkflowState) {
        self.checkpoints
            .push(Checkpoint::new(self.sequence, step, self.record.clone(), next));
        self.sequence += 1;
        self.state = next;
    }
}

/// The review workflow state machine.
///
/// The engine keeps no per-session state in memory: everything lives in the
/// snapshot store, so callers must serialize `advance` calls per session.
pub struct WorkflowEngine {
    analyze: Arc<dyn StepExecutor>,
    draft: Arc<dyn StepExecutor>,
    critique: Arc<dyn StepExecutor>,
    snapshots: Arc<SnapshotManager>,
}

impl WorkflowEngine {
    /// Create an engine whose executors share one generator.
    pub fn new(generator: SharedGenerator, snapshots: Arc<SnapshotManager>) -> Self {
        Self::with_executors(
            Arc::new(AnalyzeExecutor::new(generator.clone())),
            Arc::new(DraftExecutor::new(generator.clone())),
            Arc::new(CritiqueExecutor::new(generator)),
            snapshots,
        )
    }

    /// Create an engine with custom executors.
    pub fn with_executors(
        analyze: Arc<dyn StepExecutor>,
        draft: Arc<dyn StepExecutor>,
        critique: Arc<dyn StepExecutor>,
        snapshots: Arc<SnapshotManager>,
    ) -> Self {
        Self {
            analyze,
            draft,
            critique,
            snapshots,
        }
    }

    pub fn snapshots(&self) -> &Arc<SnapshotManager> {
        &self.snapshots
    }

    /// Create a session and run it to the first pause.
    ///
    /// The initial snapshot is committed before Analyze runs, so a generation
    /// failure leaves the session waiting at `ANALYZE`.
    pub async fn start(&self, input: SessionInput) -> Result<StepOutcome, WorkflowError> {
        let session_id = input
            .session_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        if self.snapshots.latest(&session_id).await?.is_some() {
            return Err(WorkflowError::SessionExists(session_id));
        }

        let record = SessionRecord::new(&session_id, input.user_request, input.source_material);
        let initial = Checkpoint::new(0, StepName::Input, record, WorkflowState::INITIAL);
        self.snapshots.commit(std::slice::from_ref(&initial)).await?;
        info!(session_id = %session_id, "Session created");

        self.advance(&session_id, None).await
    }

    /// Run the session until the next pause point or the end.
    ///
    /// Input is required at a review pause and rejected anywhere else. On
    /// error nothing is committed.
    pub async fn advance(
        &self,
        session_id: &str,
        human_input: Option<&str>,
    ) -> Result<StepOutcome, WorkflowError> {
        let latest = self.latest(session_id).await?;
        let state = latest.next;

        match (state.is_review_pause(), human_input) {
            (true, None) => {
                return Err(WorkflowError::invalid_resume(
                    session_id,
                    state,
                    "human input is required at a review pause",
                ));
            }
            (false, Some(_)) => {
                return Err(WorkflowError::invalid_resume(
                    session_id,
                    state,
                    "human input is only accepted at a review pause",
                ));
            }
            _ => {}
        }

        if state.is_terminal() {
            debug!(session_id, "Session already done");
            return Ok(StepOutcome::from_checkpoint(latest));
        }

        let mut run = PendingRun::from_latest(latest);

        if let Some(input) = human_input {
            self.apply_review(&mut run, input);
        }

        while !run.state.is_review_pause() && !run.state.is_terminal() {
            if let Err(e) = self.run_step(&mut run).await {
                error!(session_id, state = %run.state, error = %e, "Step failed, session not advanced");
                return Err(e);
            }
        }

        self.snapshots.commit(&run.checkpoints).await?;
        info!(session_id, next = %run.state, steps = run.checkpoints.len(), "Session paused");

        Ok(StepOutcome {
            session_id: session_id.to_string(),
            next: run.state,
            terminated: run.state.is_terminal(),
            record: run.record,
        })
    }

    /// Current record and pending state. Never runs a step.
    pub async fn get_state(&self, session_id: &str) -> Result<SessionSnapshot, WorkflowError> {
        let latest = self.latest(session_id).await?;
        let next = if latest.next.is_terminal() {
            Vec::new()
        } else {
            vec![latest.next]
        };
        Ok(SessionSnapshot {
            values: latest.record,
            next,
        })
    }

    /// All retained snapshots for a session, oldest first.
    pub async fn history(&self, session_id: &str) -> Result<Vec<Checkpoint>, WorkflowError> {
        let history = self.snapshots.history(session_id).await?;
        if history.is_empty() {
            return Err(WorkflowError::SessionNotFound(session_id.to_string()));
        }
        Ok(history)
    }

    /// Remove a session and its snapshots.
    pub async fn delete(&self, session_id: &str) -> Result<(), WorkflowError> {
        self.latest(session_id).await?;
        self.snapshots.delete_session(session_id).await?;
        info!(session_id, "Session deleted");
        Ok(())
    }

    async fn latest(&self, session_id: &str) -> Result<Checkpoint, WorkflowError> {
        self.snapshots
            .latest(session_id)
            .await?
            .ok_or_else(|| WorkflowError::SessionNotFound(session_id.to_string()))
    }

    fn apply_review(&self, run: &mut PendingRun, input: &str) {
        let feedback = normalize_feedback(input);
        run.record.apply(SessionUpdate::new().with_feedback(feedback));

        let (step, next) = match run.state {
            WorkflowState::AwaitStrategyReview if run.record.requests_revision() => {
                (StepName::StrategyReview, WorkflowState::Analyze)
            }
            WorkflowState::AwaitStrategyReview => (StepName::StrategyReview, WorkflowState::Draft),
            _ => (StepName::SlideReview, WorkflowState::Critique),
        };
        info!(
            session_id = run.record.session_id(),
            from = %run.state,
            to = %next,
            approved = !run.record.requests_revision(),
            "Review received"
        );
        run.record_step(step, next);
    }

    async fn run_step(&self, run: &mut PendingRun) -> Result<(), WorkflowError> {
        let executor = match run.state {
            WorkflowState::Analyze => &self.analyze,
            WorkflowState::Draft => &self.draft,
            WorkflowState::Critique => &self.critique,
            // The caller loop never reaches a pause or the end here.
            WorkflowState::AwaitStrategyReview
            | WorkflowState::AwaitSlideReview
            | WorkflowState::Done => return Ok(()),
        };

        info!(session_id = run.record.session_id(), step = %executor.step(), "Running step");
        let update = executor.execute(&run.record).await?;
        run.record.apply(update);

        let next = match run.state {
            WorkflowState::Analyze => WorkflowState::AwaitStrategyReview,
            WorkflowState::Draft => WorkflowState::AwaitSlideReview,
            _ => match run.record.pending_route.take() {
                Some(Route::Proceed) => WorkflowState::Done,
                // A critique that did not decide is treated as a retry.
                Some(Route::Retry) | None => WorkflowState::Draft,
            },
        };

        run.record_step(executor.step(), next);
        Ok(())
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

//! Snapshot data structures and manager.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use deckflow_config::{CheckpointBackend, CheckpointConfig};
use deckflow_protocols::{SessionRecord, WorkflowState};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::CheckpointError;
use crate::store::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};

/// The step whose completion produced a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepName {
    /// Session created from caller input.
    Input,
    Analyze,
    StrategyReview,
    Draft,
    SlideReview,
    Critique,
}

impl StepName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Analyze => "analyze",
            Self::StrategyReview => "strategy_review",
            Self::Draft => "draft",
            Self::SlideReview => "slide_review",
            Self::Critique => "critique",
        }
    }
}

impl std::fmt::Display for StepName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A snapshot of a session record after one completed step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Unique checkpoint ID.
    pub id: Uuid,
    /// Session ID this checkpoint belongs to.
    pub session_id: String,
    /// Position in the session history, starting at 0.
    pub sequence: u32,
    /// Step that completed.
    pub step: StepName,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Session record as of this step.
    pub record: SessionRecord,
    /// State the engine resumes from.
    pub next: WorkflowState,
}

impl Checkpoint {
    /// Create a new checkpoint for `record`.
    pub fn new(sequence: u32, step: StepName, record: SessionRecord, next: WorkflowState) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id: record.session_id().to_string(),
            sequence,
            step,
            created_at: Utc::now(),
            record,
            next,
        }
    }

    /// Sequence number for the checkpoint following this one.
    pub fn next_sequence(&self) -> u32 {
        self.sequence + 1
    }
}

/// Manager for committing and pruning session snapshots.
pub struct SnapshotManager {
    store: Arc<dyn SnapshotStore>,
    max_snapshots: u32,
}

impl SnapshotManager {
    /// Create a new manager. `max_snapshots` of 0 keeps every snapshot.
    pub fn new(store: Arc<dyn SnapshotStore>, max_snapshots: u32) -> Self {
        Self {
            store,
            max_snapshots,
        }
    }

    /// Build the store selected by configuration.
    pub async fn from_config(config: &CheckpointConfig) -> Result<Self, CheckpointError> {
        let store: Arc<dyn SnapshotStore> = match config.backend {
            CheckpointBackend::Memory => Arc::new(MemorySnapshotStore::new()),
            CheckpointBackend::File => {
                Arc::new(FileSnapshotStore::new(&config.storage_path).await?)
            }
        };
        Ok(Self::new(store, config.max_snapshots))
    }

    /// Save a batch of snapshots for one session, then prune.
    pub async fn commit(&self, checkpoints: &[Checkpoint]) -> Result<(), CheckpointError> {
        let Some(last) = checkpoints.last() else {
            return Ok(());
        };
        if checkpoints.iter().any(|cp| cp.session_id != last.session_id) {
            return Err(CheckpointError::InvalidData(
                "batch spans multiple sessions".to_string(),
            ));
        }

        self.store.save_batch(checkpoints).await?;
        debug!(
            session_id = %last.session_id,
            count = checkpoints.len(),
            next = %last.next,
            "Committed snapshots"
        );

        self.cleanup(&last.session_id).await
    }

    /// Latest snapshot for a session.
    pub async fn latest(&self, session_id: &str) -> Result<Option<Checkpoint>, CheckpointError> {
        self.store.load(session_id).await
    }

    /// All snapshots for a session, oldest first.
    pub async fn history(&self, session_id: &str) -> Result<Vec<Checkpoint>, CheckpointError> {
        self.store.list(session_id).await
    }

    /// The state a session resumes from, if it exists.
    pub async fn current_pending_state(
        &self,
        session_id: &str,
    ) -> Result<Option<WorkflowState>, CheckpointError> {
        self.store.current_pending_state(session_id).await
    }

    /// Delete all snapshots for a session.
    pub async fn delete_session(&self, session_id: &str) -> Result<(), CheckpointError> {
        self.store.delete_session(session_id).await
    }

    /// Cleanup old snapshots, keeping only the most recent ones.
    async fn cleanup(&self, session_id: &str) -> Result<(), CheckpointError> {
        if self.max_snapshots == 0 {
            return Ok(());
        }

        let checkpoints = self.store.list(session_id).await?;
        let keep = self.max_snapshots as usize;
        if checkpoints.len() > keep {
            let to_delete = checkpoints.len() - keep;
            for checkpoint in checkpoints.iter().take(to_delete) {
                self.store.delete(session_id, &checkpoint.id).await?;
            }
            debug!(session_id, pruned = to_delete, "Pruned old snapshots");
        }

        Ok(())
    }
}

//! Step executor trait.

use async_trait::async_trait;
use deckflow_checkpoint::StepName;
use deckflow_protocols::{SessionRecord, SessionUpdate};

use crate::error::WorkflowError;

/// A pluggable unit of work run by the engine.
#[async_trait]
pub trait StepExecutor: Send + Sync {
    /// Step name recorded in snapshots.
    fn step(&self) -> StepName;

    /// Run the step against the current record.
    ///
    /// Only [`WorkflowError::GenerationUnavailable`] is expected here; the
    /// engine discards the update and leaves the session untouched on error.
    async fn execute(&self, record: &SessionRecord) -> Result<SessionUpdate, WorkflowError>;
}

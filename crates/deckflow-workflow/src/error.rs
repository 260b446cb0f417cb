//! Workflow errors.

use deckflow_checkpoint::CheckpointError;
use deckflow_protocols::{GenerationError, WorkflowState};
use thiserror::Error;

/// Errors surfaced by the workflow engine.
///
/// Malformed generation output and ambiguous audits are recovered inside the
/// executors and never appear here.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The generation capability failed; the session was not advanced.
    #[error("Generation unavailable: {0}")]
    GenerationUnavailable(#[from] GenerationError),

    /// The caller violated the pause-point protocol.
    #[error("Invalid resume of session '{session_id}' at {state}: {reason}")]
    InvalidResume {
        session_id: String,
        state: WorkflowState,
        reason: String,
    },

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session already exists: {0}")]
    SessionExists(String),

    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
}

impl WorkflowError {
    pub(crate) fn invalid_resume(
        session_id: &str,
        state: WorkflowState,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidResume {
            session_id: session_id.to_string(),
            state,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_resume_display() {
        let err = WorkflowError::invalid_resume(
            "s1",
            WorkflowState::AwaitSlideReview,
            "human input is required",
        );
        let display = err.to_string();
        assert!(display.contains("s1"));
        assert!(display.contains("AWAIT_SLIDE_REVIEW"));
        assert!(display.contains("human input is required"));
    }

    #[test]
    fn test_from_generation_error() {
        let err: WorkflowError = GenerationError::Timeout(30).into();
        assert!(matches!(err, WorkflowError::GenerationUnavailable(_)));
        assert!(err.to_string().contains("30"));
    }

    #[test]
    fn test_from_checkpoint_error() {
        let err: WorkflowError = CheckpointError::NotFound("s1".to_string()).into();
        assert!(matches!(err, WorkflowError::Checkpoint(_)));
    }
}

//! Workflow state machine states.

use serde::{Deserialize, Serialize};

/// A state of the review workflow.
///
/// `Analyze` is initial, `Done` is terminal. The two `Await*` states are the
/// pause points where the engine stops until a human supplies input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowState {
    Analyze,
    AwaitStrategyReview,
    Draft,
    AwaitSlideReview,
    Critique,
    Done,
}

impl WorkflowState {
    /// The state every new session starts in.
    pub const INITIAL: WorkflowState = WorkflowState::Analyze;

    /// Whether the engine must stop here and wait for human input.
    pub fn is_review_pause(self) -> bool {
        matches!(self, Self::AwaitStrategyReview | Self::AwaitSlideReview)
    }

    /// Whether the workflow has finished.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }

    /// Stable name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Analyze => "ANALYZE",
            Self::AwaitStrategyReview => "AWAIT_STRATEGY_REVIEW",
            Self::Draft => "DRAFT",
            Self::AwaitSlideReview => "AWAIT_SLIDE_REVIEW",
            Self::Critique => "CRITIQUE",
            Self::Done => "DONE",
        }
    }
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routing signal written by Critique and consumed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    /// Send the deck back to drafting.
    Retry,
    /// Accept the deck and finish.
    Proceed,
}

//! Session record types.

use serde::{Deserialize, Serialize};

use super::plan::SlidePlan;
use super::state::Route;

/// Feedback value meaning "no objection".
pub const APPROVAL_SENTINEL: &str = "Proceed with this strategy.";

/// Whether the given feedback counts as approval.
///
/// Absent, empty and whitespace-only feedback are treated exactly like the
/// approval sentinel.
pub fn is_approval(feedback: Option<&str>) -> bool {
    match feedback {
        None => true,
        Some(text) => {
            let text = text.trim();
            text.is_empty() || text == APPROVAL_SENTINEL
        }
    }
}

/// Normalize raw reviewer input before it is stored.
///
/// Blank input becomes the approval sentinel; anything else is trimmed.
pub fn normalize_feedback(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        APPROVAL_SENTINEL.to_string()
    } else {
        trimmed.to_string()
    }
}

/// The mutable state threaded through one workflow run.
///
/// `user_request` and `source_material` are fixed at creation and only
/// exposed through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    session_id: String,
    user_request: String,
    source_material: String,

    /// Latest strategy analysis.
    #[serde(default)]
    pub strategy_report: Option<String>,

    /// Latest slide plan (possibly the sentinel failure plan).
    #[serde(default)]
    pub slide_plan: Option<SlidePlan>,

    /// Reviewer feedback for the current cycle.
    #[serde(default)]
    pub human_feedback: Option<String>,

    /// Critique's routing decision, consumed by the engine right after Critique.
    #[serde(default)]
    pub pending_route: Option<Route>,
}

impl SessionRecord {
    /// Create a new record.
    pub fn new(
        session_id: impl Into<String>,
        user_request: impl Into<String>,
        source_material: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            user_request: user_request.into(),
            source_material: source_material.into(),
            strategy_report: None,
            slide_plan: None,
            human_feedback: None,
            pending_route: None,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn user_request(&self) -> &str {
        &self.user_request
    }

    pub fn source_material(&self) -> &str {
        &self.source_material
    }

    /// Whether the current feedback asks for changes.
    pub fn requests_revision(&self) -> bool {
        !is_approval(self.human_feedback.as_deref())
    }

    /// Apply a partial update produced by a step executor.
    pub fn apply(&mut self, update: SessionUpdate) {
        if let Some(report) = update.strategy_report {
            self.strategy_report = Some(report);
        }
        if let Some(plan) = update.slide_plan {
            self.slide_plan = Some(plan);
        }
        if let Some(feedback) = update.human_feedback {
            self.human_feedback = Some(feedback);
        }
        if let Some(route) = update.pending_route {
            self.pending_route = Some(route);
        }
    }
}

/// Partial update written back by a step executor.
///
/// Fields left as `None` are not touched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy_report: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slide_plan: Option<SlidePlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub human_feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_route: Option<Route>,
}

impl SessionUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy_report(mut self, report: impl Into<String>) -> Self {
        self.strategy_report = Some(report.into());
        self
    }

    pub fn with_slide_plan(mut self, plan: SlidePlan) -> Self {
        self.slide_plan = Some(plan);
        self
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.human_feedback = Some(feedback.into());
        self
    }

    pub fn with_route(mut self, route: Route) -> Self {
        self.pending_route = Some(route);
        self
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;

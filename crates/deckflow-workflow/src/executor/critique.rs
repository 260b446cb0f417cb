//! Structural check and feedback-resolution audit.

use async_trait::async_trait;
use deckflow_checkpoint::StepName;
use deckflow_protocols::{Route, SessionRecord, SessionUpdate, SharedGenerator};
use tracing::{debug, info, warn};

use super::traits::StepExecutor;
use crate::audit::{AuditVerdict, classify_audit};
use crate::error::WorkflowError;
use crate::prompts::{AUDITOR_ROLE, audit_prompt};

/// Feedback written when the plan is the failure sentinel or lacks structure.
pub const GENERATION_RETRY_FEEDBACK: &str = "generation failed, try again";

/// Feedback written when the audit does not approve.
pub fn rejection_feedback(feedback: &str) -> String {
    format!("You failed to address: {feedback}. Be more specific.")
}

/// Decides whether a drafted deck is finished or goes back to drafting.
pub struct CritiqueExecutor {
    generator: SharedGenerator,
}

impl CritiqueExecutor {
    pub fn new(generator: SharedGenerator) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl StepExecutor for CritiqueExecutor {
    fn step(&self) -> StepName {
        StepName::Critique
    }

    async fn execute(&self, record: &SessionRecord) -> Result<SessionUpdate, WorkflowError> {
        let session_id = record.session_id();

        // Structural check runs before, and regardless of, any feedback.
        let plan = match &record.slide_plan {
            Some(plan) if !plan.is_generation_failed() && plan.has_required_structure() => plan,
            _ => {
                warn!(session_id, "Slide plan failed structural check, retrying draft");
                return Ok(SessionUpdate::new()
                    .with_route(Route::Retry)
                    .with_feedback(GENERATION_RETRY_FEEDBACK));
            }
        };

        let feedback = match record.human_feedback.as_deref() {
            Some(feedback) if record.requests_revision() => feedback,
            _ => {
                info!(session_id, "No outstanding feedback, deck approved");
                return Ok(SessionUpdate::new().with_route(Route::Proceed));
            }
        };

        let prompt = audit_prompt(feedback, &plan.slides);
        debug!(session_id, prompt_chars = prompt.len(), "Requesting feedback audit");
        let response = self.generator.generate(AUDITOR_ROLE, &prompt).await?;

        let verdict = classify_audit(&response);
        if verdict.is_approved() {
            info!(session_id, "Audit approved feedback resolution");
            return Ok(SessionUpdate::new().with_route(Route::Proceed));
        }

        if verdict == AuditVerdict::Ambiguous {
            warn!(session_id, response = %response, "Ambiguous audit, treating as reject");
        } else {
            info!(session_id, "Audit rejected feedback resolution");
        }
        Ok(SessionUpdate::new()
            .with_route(Route::Retry)
            .with_feedback(rejection_feedback(feedback)))
    }
}

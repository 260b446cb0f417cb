//! Slide drafting.

use async_trait::async_trait;
use deckflow_checkpoint::StepName;
use deckflow_protocols::{SessionRecord, SessionUpdate, SharedGenerator, SlidePlan};
use tracing::{debug, info, warn};

use super::traits::StepExecutor;
use crate::error::WorkflowError;
use crate::extract::parse_slide_plan;
use crate::prompts::{ARCHITECT_ROLE, draft_prompt};

/// Turns the strategy report into a structured slide plan.
///
/// Unparseable output is replaced by the sentinel failure plan instead of
/// failing the step.
pub struct DraftExecutor {
    generator: SharedGenerator,
}

impl DraftExecutor {
    pub fn new(generator: SharedGenerator) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl StepExecutor for DraftExecutor {
    fn step(&self) -> StepName {
        StepName::Draft
    }

    async fn execute(&self, record: &SessionRecord) -> Result<SessionUpdate, WorkflowError> {
        let report = record.strategy_report.as_deref().unwrap_or_default();
        let prompt = draft_prompt(report, record.human_feedback.as_deref());
        debug!(
            session_id = record.session_id(),
            prompt_chars = prompt.len(),
            "Requesting slide plan"
        );

        let response = self.generator.generate(ARCHITECT_ROLE, &prompt).await?;

        let plan = match parse_slide_plan(&response) {
            Ok(plan) => {
                info!(
                    session_id = record.session_id(),
                    slides = plan.slides.len(),
                    "Slide plan drafted"
                );
                plan
            }
            Err(e) => {
                warn!(
                    session_id = record.session_id(),
                    error = %e,
                    response_chars = response.len(),
                    "Malformed slide plan, substituting failure plan"
                );
                SlidePlan::generation_failed()
            }
        };

        Ok(SessionUpdate::new().with_slide_plan(plan))
    }
}

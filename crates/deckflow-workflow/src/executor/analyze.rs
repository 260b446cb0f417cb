//! Strategy analysis.

use async_trait::async_trait;
use deckflow_checkpoint::StepName;
use deckflow_protocols::{GenerationError, SessionRecord, SessionUpdate, SharedGenerator};
use tracing::{debug, info};

use super::traits::StepExecutor;
use crate::error::WorkflowError;
use crate::prompts::{ANALYST_ROLE, analyze_prompt};

/// Produces the strategy report from the request and source material.
pub struct AnalyzeExecutor {
    generator: SharedGenerator,
}

impl AnalyzeExecutor {
    pub fn new(generator: SharedGenerator) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl StepExecutor for AnalyzeExecutor {
    fn step(&self) -> StepName {
        StepName::Analyze
    }

    async fn execute(&self, record: &SessionRecord) -> Result<SessionUpdate, WorkflowError> {
        let feedback = record
            .requests_revision()
            .then(|| record.human_feedback.as_deref())
            .flatten();
        let prompt = analyze_prompt(record.user_request(), record.source_material(), feedback);
        debug!(
            session_id = record.session_id(),
            prompt_chars = prompt.len(),
            revision = feedback.is_some(),
            "Requesting strategy analysis"
        );

        let report = self.generator.generate(ANALYST_ROLE, &prompt).await?;
        if report.trim().is_empty() {
            return Err(GenerationError::EmptyResponse(self.generator.id().to_string()).into());
        }

        info!(
            session_id = record.session_id(),
            report_chars = report.len(),
            "Strategy report generated"
        );
        Ok(SessionUpdate::new().with_strategy_report(report))
    }
}

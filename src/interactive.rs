//! Terminal review loop.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

use deckflow_protocols::{SlidePlan, WorkflowState};
use deckflow_workflow::{StepOutcome, WorkflowEngine, WorkflowError};

const PROMPT: &str = "Feedback (Enter to approve, 'quit' to stop): ";

/// How the review loop ended.
#[derive(Debug)]
pub(crate) enum ReviewEnd {
    /// The workflow reached DONE.
    Done(StepOutcome),
    /// The reviewer stopped at a pause; the session can be resumed later.
    Stopped(StepOutcome),
}

/// Drive a session through its review pauses.
///
/// Each pause prints the artifact under review and reads one line of
/// feedback. A generation failure keeps the session at the same pause and
/// asks again.
pub(crate) async fn review_loop<R, W>(
    engine: &WorkflowEngine,
    mut outcome: StepOutcome,
    input: &mut R,
    output: &mut W,
) -> Result<ReviewEnd, Box<dyn std::error::Error>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    loop {
        match outcome.next {
            WorkflowState::Done => return Ok(ReviewEnd::Done(outcome)),
            WorkflowState::AwaitStrategyReview => {
                writeln!(output, "\n=== Strategy report ===")?;
                writeln!(
                    output,
                    "{}",
                    outcome.record.strategy_report.as_deref().unwrap_or("")
                )?;
            }
            WorkflowState::AwaitSlideReview => {
                writeln!(output, "\n=== Slide plan ===")?;
                match &outcome.record.slide_plan {
                    Some(plan) => write_plan(output, plan)?,
                    None => writeln!(output, "(no slide plan)")?,
                }
            }
            _ => {
                // A previous run failed mid-step; finish it before asking.
                outcome = match engine.advance(&outcome.session_id, None).await {
                    Ok(next) => next,
                    Err(WorkflowError::GenerationUnavailable(e)) => {
                        writeln!(output, "Generation failed: {e}")?;
                        return Ok(ReviewEnd::Stopped(outcome));
                    }
                    Err(e) => return Err(e.into()),
                };
                continue;
            }
        }

        write!(output, "{PROMPT}")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line).await? == 0 {
            return Ok(ReviewEnd::Stopped(outcome));
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            return Ok(ReviewEnd::Stopped(outcome));
        }

        match engine.advance(&outcome.session_id, Some(line)).await {
            Ok(next) => outcome = next,
            Err(WorkflowError::GenerationUnavailable(e)) => {
                warn!(session_id = %outcome.session_id, error = %e, "Generation failed at review");
                writeln!(output, "Generation failed: {e}. Nothing was applied; try again.")?;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Print a numbered outline of a slide plan.
pub(crate) fn write_plan<W: Write>(output: &mut W, plan: &SlidePlan) -> std::io::Result<()> {
    if plan.slides.is_empty() {
        return writeln!(output, "(no slides)");
    }
    for (i, slide) in plan.slides.iter().enumerate() {
        writeln!(output, "{}. {}", i + 1, slide.title)?;
        for bullet in &slide.bullets {
            writeln!(output, "   - {bullet}")?;
        }
        if !slide.speaker_notes.is_empty() {
            writeln!(output, "   notes: {}", slide.speaker_notes)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "interactive_tests.rs"]
mod tests;

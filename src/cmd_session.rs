//! Session subcommand handlers.

use std::path::{Path, PathBuf};

use tokio::io::BufReader;
use tracing::info;
use uuid::Uuid;

use deckflow_config::Config;
use deckflow_export::{DeckRenderer, MarkdownRenderer, export_to_file};
use deckflow_protocols::{SlidePlan, WorkflowState};
use deckflow_workflow::{SessionInput, SourceBundle, StepOutcome, WorkflowEngine, WorkflowError};

use crate::bootstrap::build_engine;
use crate::interactive::{ReviewEnd, review_loop, write_plan};

/// Start a new session from files and notes, then review it.
pub(crate) async fn run_session(
    config: &Config,
    request: String,
    files: Vec<PathBuf>,
    notes: Option<String>,
    session_id: Option<String>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut bundle = SourceBundle::new(config.workflow.source_char_limit);
    for file in &files {
        bundle.add_path(file).await;
    }
    if let Some(notes) = notes.as_deref() {
        bundle.add_notes(notes);
    }

    // Known up front so a failed first step can still be resumed.
    let session_id = resolve_session_id(session_id);
    let input = SessionInput::new(request, bundle.build()).with_session_id(&session_id);

    let engine = build_engine(config).await?;
    println!("Session: {}", session_id);
    println!("Analyzing...");
    let outcome = match engine.start(input).await {
        Ok(outcome) => outcome,
        Err(e @ WorkflowError::GenerationUnavailable(_)) => {
            eprintln!("{}", resume_hint(&session_id));
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    review_and_export(config, &engine, outcome, output).await
}

/// Pick up an existing session where it paused.
pub(crate) async fn resume_session(
    config: &Config,
    session_id: &str,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = build_engine(config).await?;
    let snapshot = engine.get_state(session_id).await?;
    let outcome = StepOutcome {
        session_id: session_id.to_string(),
        next: snapshot.next.first().copied().unwrap_or(WorkflowState::Done),
        terminated: snapshot.next.is_empty(),
        record: snapshot.values,
    };
    review_and_export(config, &engine, outcome, output).await
}

async fn review_and_export(
    config: &Config,
    engine: &WorkflowEngine,
    outcome: StepOutcome,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();

    match review_loop(engine, outcome, &mut stdin, &mut stdout).await? {
        ReviewEnd::Done(done) => {
            let plan = done.record.slide_plan.unwrap_or_default();
            let renderer = MarkdownRenderer::new();
            let path =
                output.unwrap_or_else(|| default_output(config, &done.session_id, &renderer));
            let written = render(config, &renderer, &plan, &path).await?;
            println!("\nDeck written to {}", written.display());
        }
        ReviewEnd::Stopped(stopped) => {
            println!("\nStopped at {}. {}", stopped.next, resume_hint(&stopped.session_id));
        }
    }
    Ok(())
}

/// Print the pending state and the record.
pub(crate) async fn show_status(
    config: &Config,
    session_id: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = build_engine(config).await?;
    let snapshot = engine.get_state(session_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let next = snapshot
        .next
        .first()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "(done)".to_string());
    println!("Session:  {}", snapshot.values.session_id());
    println!("Request:  {}", snapshot.values.user_request());
    println!("Next:     {}", next);
    if let Some(feedback) = &snapshot.values.human_feedback {
        println!("Feedback: {}", feedback);
    }
    if let Some(report) = &snapshot.values.strategy_report {
        println!("\n--- Strategy report ---\n{}", report);
    }
    if let Some(plan) = &snapshot.values.slide_plan {
        println!("\n--- Slide plan ---");
        write_plan(&mut std::io::stdout(), plan)?;
    }
    Ok(())
}

/// Print the checkpoint list, oldest first.
pub(crate) async fn show_history(
    config: &Config,
    session_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = build_engine(config).await?;
    let history = engine.history(session_id).await?;

    println!("{:<5} {:<16} {:<22} {}", "SEQ", "STEP", "NEXT", "CREATED");
    println!("{}", "-".repeat(72));
    for checkpoint in history {
        println!(
            "{:<5} {:<16} {:<22} {}",
            checkpoint.sequence,
            checkpoint.step.as_str(),
            checkpoint.next.as_str(),
            checkpoint.created_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    Ok(())
}

/// Render a finished session to disk.
pub(crate) async fn export_session(
    config: &Config,
    session_id: &str,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = build_engine(config).await?;
    let snapshot = engine.get_state(session_id).await?;
    if let Some(pending) = snapshot.next.first() {
        return Err(format!("Session {session_id} is not done (waiting in {pending})").into());
    }

    let plan = snapshot.values.slide_plan.unwrap_or_default();
    let renderer = MarkdownRenderer::new();
    let path = output.unwrap_or_else(|| default_output(config, session_id, &renderer));
    let written = render(config, &renderer, &plan, &path).await?;
    println!("Deck written to {}", written.display());
    Ok(())
}

async fn render(
    config: &Config,
    renderer: &dyn DeckRenderer,
    plan: &SlidePlan,
    path: &Path,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let written =
        export_to_file(renderer, plan, config.export.template.as_deref(), path).await?;
    info!(path = %written.display(), slides = plan.slides.len(), "Deck rendered");
    Ok(written)
}

fn default_output(config: &Config, session_id: &str, renderer: &dyn DeckRenderer) -> PathBuf {
    config
        .export
        .output_dir
        .join(format!("{session_id}.{}", renderer.extension()))
}

/// Caller-chosen id, or a fresh UUID when absent or blank.
fn resolve_session_id(session_id: Option<String>) -> String {
    session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn resume_hint(session_id: &str) -> String {
    format!("Session {session_id} was saved. Resume with: deckflow resume {session_id}")
}

//! End-to-end review scenarios against a scripted generator.

use std::sync::Arc;

use deckflow_checkpoint::{FileSnapshotStore, MemorySnapshotStore, SnapshotManager};
use deckflow_protocols::{APPROVAL_SENTINEL, MockGenerator, SlidePlan, WorkflowState};
use deckflow_workflow::prompts::{ANALYST_ROLE, ARCHITECT_ROLE, AUDITOR_ROLE};
use deckflow_workflow::{SessionInput, WorkflowEngine, WorkflowError};
use tempfile::TempDir;

const PLAN_V1: &str = r#"```json
{"slides": [
  {"title": "Q3 Revenue Miss", "bullets": ["$8M actual vs $10M target"], "speaker_notes": "State the gap"},
  {"title": "Drivers", "bullets": ["Enterprise deals slipped"], "speaker_notes": ""},
  {"title": "Plan", "bullets": ["Pipeline recovery"], "speaker_notes": ""}
]}
```"#;

const PLAN_V2: &str = r#"{"slides": [
  {"title": "Q3 Revenue Miss", "bullets": ["$8M actual vs $10M target"], "speaker_notes": ""},
  {"title": "Churn", "bullets": ["Churn at 15% vs 5% target"], "speaker_notes": ""},
  {"title": "Retention Plan", "bullets": ["Save desk", "Renewal incentives"], "speaker_notes": ""}
]}"#;

fn memory_engine(mock: Arc<MockGenerator>) -> WorkflowEngine {
    let snapshots = SnapshotManager::new(Arc::new(MemorySnapshotStore::new()), 0);
    WorkflowEngine::new(mock, Arc::new(snapshots))
}

fn q3_input() -> SessionInput {
    SessionInput::new("deck for Q3 miss", "Q3 Actual $8M vs Target $10M").with_session_id("q3")
}

#[tokio::test]
async fn analyze_produces_report_and_pauses() {
    let mock = Arc::new(
        MockGenerator::new().with_response(ANALYST_ROLE, "Core strategy: explain the $2M gap."),
    );
    let engine = memory_engine(mock.clone());

    let outcome = engine.start(q3_input()).await.unwrap();

    assert_eq!(outcome.next, WorkflowState::AwaitStrategyReview);
    let report = outcome.record.strategy_report.unwrap();
    assert!(!report.trim().is_empty());
    assert_eq!(mock.calls().len(), 1);
}

#[tokio::test]
async fn never_passes_a_pause_without_input() {
    let mock = Arc::new(
        MockGenerator::new()
            .with_response(ANALYST_ROLE, "Strategy")
            .with_default_response(PLAN_V2),
    );
    let engine = memory_engine(mock.clone());
    engine.start(q3_input()).await.unwrap();

    for _ in 0..3 {
        assert!(matches!(
            engine.advance("q3", None).await,
            Err(WorkflowError::InvalidResume { .. })
        ));
    }
    assert_eq!(
        engine.get_state("q3").await.unwrap().next,
        vec![WorkflowState::AwaitStrategyReview]
    );

    engine.advance("q3", Some(APPROVAL_SENTINEL)).await.unwrap();
    for _ in 0..3 {
        assert!(matches!(
            engine.advance("q3", None).await,
            Err(WorkflowError::InvalidResume { .. })
        ));
    }
    assert_eq!(
        engine.get_state("q3").await.unwrap().next,
        vec![WorkflowState::AwaitSlideReview]
    );
    // Neither Critique nor a second draft ran.
    assert_eq!(mock.call_count(ARCHITECT_ROLE), 1);
    assert_eq!(mock.call_count(AUDITOR_ROLE), 0);
}

#[tokio::test]
async fn state_query_is_idempotent() {
    let mock = Arc::new(
        MockGenerator::new()
            .with_response(ANALYST_ROLE, "Strategy")
            .with_response(ARCHITECT_ROLE, PLAN_V1),
    );
    let engine = memory_engine(mock.clone());
    engine.start(q3_input()).await.unwrap();
    engine.advance("q3", Some("")).await.unwrap();

    let first = engine.get_state("q3").await.unwrap();
    let second = engine.get_state("q3").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(mock.calls().len(), 2);
}

#[tokio::test]
async fn empty_feedback_is_approval() {
    let mock = Arc::new(
        MockGenerator::new()
            .with_response(ANALYST_ROLE, "Strategy")
            .with_response(ARCHITECT_ROLE, PLAN_V1),
    );
    let engine = memory_engine(mock.clone());
    engine.start(q3_input()).await.unwrap();

    let outcome = engine.advance("q3", Some("")).await.unwrap();

    assert_eq!(outcome.next, WorkflowState::AwaitSlideReview);
    assert_eq!(
        outcome.record.human_feedback.as_deref(),
        Some(APPROVAL_SENTINEL)
    );
    assert_eq!(mock.call_count(ANALYST_ROLE), 1);
    assert_eq!(mock.call_count(ARCHITECT_ROLE), 1);
}

#[tokio::test]
async fn approval_sentinel_skips_audit() {
    let mock = Arc::new(
        MockGenerator::new()
            .with_response(ANALYST_ROLE, "Strategy")
            .with_response(ARCHITECT_ROLE, PLAN_V1)
            .with_response(AUDITOR_ROLE, "REJECT"),
    );
    let engine = memory_engine(mock.clone());
    engine.start(q3_input()).await.unwrap();
    engine.advance("q3", Some(APPROVAL_SENTINEL)).await.unwrap();

    let outcome = engine.advance("q3", Some(APPROVAL_SENTINEL)).await.unwrap();

    assert_eq!(outcome.next, WorkflowState::Done);
    assert_eq!(mock.call_count(AUDITOR_ROLE), 0);
}

#[tokio::test]
async fn malformed_draft_yields_sentinel_then_retry() {
    let mock = Arc::new(
        MockGenerator::new()
            .with_response(ANALYST_ROLE, "Strategy")
            .with_response(ARCHITECT_ROLE, "{\"slides\": [ oops")
            .with_response(ARCHITECT_ROLE, PLAN_V1),
    );
    let engine = memory_engine(mock.clone());
    engine.start(q3_input()).await.unwrap();

    let drafted = engine.advance("q3", Some("")).await.unwrap();
    assert_eq!(
        drafted.record.slide_plan,
        Some(SlidePlan::generation_failed())
    );

    // Approval does not rescue the sentinel plan.
    let retried = engine.advance("q3", Some(APPROVAL_SENTINEL)).await.unwrap();
    assert_eq!(retried.next, WorkflowState::AwaitSlideReview);
    assert!(!retried.record.slide_plan.unwrap().is_generation_failed());
    assert_eq!(mock.call_count(AUDITOR_ROLE), 0);
}

#[tokio::test]
async fn rejection_augments_feedback_for_redraft() {
    let mock = Arc::new(
        MockGenerator::new()
            .with_response(ANALYST_ROLE, "Strategy")
            .with_response(ARCHITECT_ROLE, PLAN_V1)
            .with_response(ARCHITECT_ROLE, PLAN_V2)
            .with_response(AUDITOR_ROLE, "REJECT - churn is not covered")
            .with_response(AUDITOR_ROLE, "APPROVE"),
    );
    let engine = memory_engine(mock.clone());
    engine.start(q3_input()).await.unwrap();
    engine.advance("q3", Some("")).await.unwrap();

    let retried = engine
        .advance("q3", Some("focus more on churn"))
        .await
        .unwrap();

    assert_eq!(retried.next, WorkflowState::AwaitSlideReview);
    let feedback = retried.record.human_feedback.clone().unwrap();
    assert!(feedback.contains("focus more on churn"));
    let redraft_prompt = &mock.calls()[3].prompt;
    assert!(redraft_prompt.contains("focus more on churn"));
    assert_eq!(retried.record.slide_plan.unwrap().slides[1].title, "Churn");

    let done = engine
        .advance("q3", Some("focus more on churn"))
        .await
        .unwrap();
    assert_eq!(done.next, WorkflowState::Done);
    assert_eq!(mock.call_count(AUDITOR_ROLE), 2);
}

#[tokio::test]
async fn ambiguous_audit_is_a_retry() {
    let mock = Arc::new(
        MockGenerator::new()
            .with_response(ANALYST_ROLE, "Strategy")
            .with_response(ARCHITECT_ROLE, PLAN_V1)
            .with_response(ARCHITECT_ROLE, PLAN_V2)
            .with_response(AUDITOR_ROLE, "Mostly there, I think."),
    );
    let engine = memory_engine(mock);
    engine.start(q3_input()).await.unwrap();
    engine.advance("q3", Some("")).await.unwrap();

    let outcome = engine
        .advance("q3", Some("add a risks slide"))
        .await
        .unwrap();
    assert_eq!(outcome.next, WorkflowState::AwaitSlideReview);
    assert!(!outcome.terminated);
}

#[tokio::test]
async fn retries_keep_strategy_report() {
    let mock = Arc::new(
        MockGenerator::new()
            .with_response(ANALYST_ROLE, "Strategy: explain the $2M gap")
            .with_response(ARCHITECT_ROLE, "garbage")
            .with_response(ARCHITECT_ROLE, "more garbage")
            .with_response(ARCHITECT_ROLE, PLAN_V2),
    );
    let engine = memory_engine(mock);
    engine.start(q3_input()).await.unwrap();
    engine.advance("q3", Some("")).await.unwrap();

    let first = engine.advance("q3", Some("")).await.unwrap();
    assert!(first.record.slide_plan.as_ref().unwrap().is_generation_failed());
    let second = engine.advance("q3", Some("")).await.unwrap();
    assert!(!second.record.slide_plan.as_ref().unwrap().is_generation_failed());

    for outcome in [&first, &second] {
        assert_eq!(
            outcome.record.strategy_report.as_deref(),
            Some("Strategy: explain the $2M gap")
        );
        assert_eq!(outcome.record.user_request(), "deck for Q3 miss");
        assert_eq!(
            outcome.record.source_material(),
            "Q3 Actual $8M vs Target $10M"
        );
    }

    let done = engine.advance("q3", Some("")).await.unwrap();
    assert!(done.terminated);
    assert_eq!(
        done.record.strategy_report.as_deref(),
        Some("Strategy: explain the $2M gap")
    );
}

#[tokio::test]
async fn file_store_resumes_in_new_engine() {
    let temp_dir = TempDir::new().unwrap();
    let mock = Arc::new(
        MockGenerator::new()
            .with_response(ANALYST_ROLE, "Strategy")
            .with_response(ARCHITECT_ROLE, PLAN_V1),
    );

    {
        let store = FileSnapshotStore::new(temp_dir.path()).await.unwrap();
        let engine = WorkflowEngine::new(
            mock.clone(),
            Arc::new(SnapshotManager::new(Arc::new(store), 0)),
        );
        engine.start(q3_input()).await.unwrap();
        engine.advance("q3", Some("")).await.unwrap();
    }

    let store = FileSnapshotStore::new(temp_dir.path()).await.unwrap();
    let engine = WorkflowEngine::new(
        mock.clone(),
        Arc::new(SnapshotManager::new(Arc::new(store), 0)),
    );

    let snapshot = engine.get_state("q3").await.unwrap();
    assert_eq!(snapshot.next, vec![WorkflowState::AwaitSlideReview]);
    assert_eq!(snapshot.values.slide_plan.unwrap().slides.len(), 3);

    let done = engine.advance("q3", Some("")).await.unwrap();
    assert!(done.terminated);
    assert_eq!(mock.calls().len(), 2);
}

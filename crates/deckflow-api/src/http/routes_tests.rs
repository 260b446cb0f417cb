use super::*;
use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use deckflow_checkpoint::{MemorySnapshotStore, SnapshotManager};
use deckflow_protocols::MockGenerator;
use deckflow_workflow::WorkflowEngine;
use deckflow_workflow::prompts::{ANALYST_ROLE, ARCHITECT_ROLE, AUDITOR_ROLE};
use serde_json::Value;
use tower::ServiceExt;

const PLAN: &str = r#"{"slides": [
  {"title": "Q3 Revenue Miss", "bullets": ["$8M actual vs $10M target"], "speaker_notes": "State the gap"},
  {"title": "Churn", "bullets": ["15% vs 5% target"]},
  {"title": "Plan", "bullets": ["Retention push"]}
]}"#;

fn scripted_mock() -> Arc<MockGenerator> {
    Arc::new(
        MockGenerator::new()
            .with_response(ANALYST_ROLE, "Core strategy: explain the $2M gap.")
            .with_response(ARCHITECT_ROLE, PLAN)
            .with_response(AUDITOR_ROLE, "APPROVE"),
    )
}

fn create_test_state(mock: Arc<MockGenerator>) -> Arc<AppState> {
    let snapshots = Arc::new(SnapshotManager::new(
        Arc::new(MemorySnapshotStore::new()),
        0,
    ));
    let engine = Arc::new(WorkflowEngine::new(mock, snapshots));
    Arc::new(AppState::new(engine))
}

fn create_test_router(mock: Arc<MockGenerator>) -> Router {
    create_router(create_test_state(mock))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_q3(app: &Router) -> Value {
    let response = app
        .clone()
        .oneshot(post_json(
            "/sessions",
            serde_json::json!({
                "user_request": "deck for Q3 miss",
                "source_material": "Q3 Actual $8M vs Target $10M",
                "session_id": "q3"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_router(scripted_mock());
    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_session_pauses_for_strategy_review() {
    let app = create_test_router(scripted_mock());
    let body = create_q3(&app).await;

    assert_eq!(body["session_id"], "q3");
    assert_eq!(body["next"], "AWAIT_STRATEGY_REVIEW");
    assert_eq!(body["terminated"], false);
    assert_eq!(
        body["record"]["strategy_report"],
        "Core strategy: explain the $2M gap."
    );
}

#[tokio::test]
async fn test_create_duplicate_session_conflicts() {
    let app = create_test_router(scripted_mock());
    create_q3(&app).await;

    let response = app
        .oneshot(post_json(
            "/sessions",
            serde_json::json!({"user_request": "again", "session_id": "q3"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_get_session_state() {
    let app = create_test_router(scripted_mock());
    create_q3(&app).await;

    let response = app.oneshot(get("/sessions/q3")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["next"], serde_json::json!(["AWAIT_STRATEGY_REVIEW"]));
    assert_eq!(body["values"]["user_request"], "deck for Q3 miss");
}

#[tokio::test]
async fn test_get_unknown_session_not_found() {
    let app = create_test_router(scripted_mock());
    let response = app.oneshot(get("/sessions/missing")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn test_advance_without_feedback_at_pause_conflicts() {
    let app = create_test_router(scripted_mock());
    create_q3(&app).await;

    let response = app
        .oneshot(post_json("/sessions/q3/advance", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_full_review_flow_and_export() {
    let mock = scripted_mock();
    let app = create_test_router(mock.clone());
    create_q3(&app).await;

    // Blank feedback approves the strategy.
    let response = app
        .clone()
        .oneshot(post_json(
            "/sessions/q3/advance",
            serde_json::json!({"feedback": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["next"], "AWAIT_SLIDE_REVIEW");
    assert_eq!(body["record"]["slide_plan"]["slides"][0]["title"], "Q3 Revenue Miss");

    let response = app.clone().oneshot(get("/sessions/q3/export")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(post_json(
            "/sessions/q3/advance",
            serde_json::json!({"feedback": "Proceed with this strategy."}),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["next"], "DONE");
    assert_eq!(body["terminated"], true);
    assert_eq!(mock.call_count(AUDITOR_ROLE), 0);

    let response = app.clone().oneshot(get("/sessions/q3/export")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/markdown; charset=utf-8"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let deck = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(deck.contains("## Q3 Revenue Miss"));
    assert!(deck.contains("- 15% vs 5% target"));

    let response = app.oneshot(get("/sessions/q3")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["next"], serde_json::json!([]));
}

#[tokio::test]
async fn test_generation_failure_is_bad_gateway() {
    let mock = scripted_mock();
    mock.set_offline(true);
    let app = create_test_router(mock.clone());

    let response = app
        .clone()
        .oneshot(post_json(
            "/sessions",
            serde_json::json!({"user_request": "deck", "session_id": "offline"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    // The input snapshot survives; the session waits in ANALYZE.
    let response = app.oneshot(get("/sessions/offline")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["next"], serde_json::json!(["ANALYZE"]));
}

#[tokio::test]
async fn test_history_and_delete() {
    let app = create_test_router(scripted_mock());
    create_q3(&app).await;

    let response = app.clone().oneshot(get("/sessions/q3/history")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["checkpoints"][0]["step"], "input");
    assert_eq!(body["checkpoints"][1]["step"], "analyze");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/sessions/q3")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(get("/sessions/q3/history")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_advance_leaves_no_lock_entry() {
    let state = create_test_state(scripted_mock());
    let app = create_router(state.clone());

    for id in ["ghost-1", "ghost-2", "ghost-3"] {
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/sessions/{id}/advance"),
                serde_json::json!({"feedback": "anything"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
    assert_eq!(state.session_lock_count(), 0);
}

#[tokio::test]
async fn test_lock_entries_released_after_session_calls() {
    let state = create_test_state(scripted_mock());
    let app = create_router(state.clone());

    create_q3(&app).await;
    assert_eq!(state.session_lock_count(), 0);

    let response = app
        .clone()
        .oneshot(post_json(
            "/sessions/q3/advance",
            serde_json::json!({"feedback": "Proceed with this strategy."}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.session_lock_count(), 0);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/sessions/q3")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(state.session_lock_count(), 0);
}

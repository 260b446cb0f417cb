//! Session API handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use deckflow_checkpoint::Checkpoint;
use deckflow_export::ExportError;
use deckflow_workflow::{SessionInput, SessionSnapshot, StepOutcome};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::InterfaceError;
use crate::state::AppState;

/// Request to create a session.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub user_request: String,

    #[serde(default)]
    pub source_material: String,

    /// Optional caller-chosen id.
    pub session_id: Option<String>,
}

impl From<CreateSessionRequest> for SessionInput {
    fn from(req: CreateSessionRequest) -> Self {
        let input = SessionInput::new(req.user_request, req.source_material);
        match req.session_id {
            Some(id) => input.with_session_id(id),
            None => input,
        }
    }
}

/// Request to resume a paused session.
#[derive(Debug, Default, Deserialize)]
pub struct AdvanceRequest {
    /// Reviewer feedback; blank means approve.
    #[serde(default)]
    pub feedback: Option<String>,
}

/// Snapshot history of a session.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub count: usize,
    pub checkpoints: Vec<Checkpoint>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime().as_secs(),
    })
}

/// Create a session and run it to the first review pause.
///
/// POST /sessions
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<StepOutcome>), InterfaceError> {
    let input = SessionInput::from(req);
    info!(session_id = ?input.session_id, "Create session request");

    // A caller-chosen id is locked so a racing create or advance queues behind it.
    let outcome = match input.session_id.clone() {
        Some(id) => {
            let _guard = state.lock_session(&id).await;
            state.engine.start(input).await?
        }
        None => state.engine.start(input).await?,
    };

    Ok((StatusCode::CREATED, Json(outcome)))
}

/// GET /sessions/{id}
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSnapshot>, InterfaceError> {
    Ok(Json(state.engine.get_state(&session_id).await?))
}

/// Resume a session with optional feedback.
///
/// POST /sessions/{id}/advance
pub async fn advance_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<AdvanceRequest>,
) -> Result<Json<StepOutcome>, InterfaceError> {
    let _guard = state.lock_session(&session_id).await;

    let outcome = state
        .engine
        .advance(&session_id, req.feedback.as_deref())
        .await?;
    Ok(Json(outcome))
}

/// GET /sessions/{id}/history
pub async fn session_history(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<HistoryResponse>, InterfaceError> {
    let checkpoints = state.engine.history(&session_id).await?;
    Ok(Json(HistoryResponse {
        count: checkpoints.len(),
        session_id,
        checkpoints,
    }))
}

/// Render the finished deck.
///
/// GET /sessions/{id}/export
pub async fn export_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, InterfaceError> {
    let snapshot = state.engine.get_state(&session_id).await?;
    if let Some(pending) = snapshot.next.first() {
        return Err(InterfaceError::NotDone {
            session_id,
            state: *pending,
        });
    }

    let plan = snapshot
        .values
        .slide_plan
        .ok_or_else(|| ExportError::NoPlan(session_id.clone()))?;
    let bytes = state
        .renderer
        .render(&plan, state.template.as_deref())
        .await?;

    info!(session_id, bytes = bytes.len(), "Deck exported");
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        bytes,
    ))
}

/// DELETE /sessions/{id}
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, InterfaceError> {
    let _guard = state.lock_session(&session_id).await;
    state.engine.delete(&session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

//! HTTP route definitions.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::http::handlers::{
    advance_session, create_session, delete_session, export_session, get_session, health,
    session_history,
};
use crate::state::AppState;

/// Create the main router.
///
/// ```text
/// /sessions
///   POST   /sessions              - Create session, run to first pause
///   GET    /sessions/{id}         - Record and pending state
///   DELETE /sessions/{id}         - Delete session
///   POST   /sessions/{id}/advance - Resume with feedback
///   GET    /sessions/{id}/history - Snapshot history
///   GET    /sessions/{id}/export  - Rendered deck (409 until done)
///
/// /health
/// ```
pub fn create_router(state: Arc<AppState>) -> Router {
    let session_routes = Router::new()
        .route("/", post(create_session))
        .route("/{id}", get(get_session).delete(delete_session))
        .route("/{id}/advance", post(advance_session))
        .route("/{id}/history", get(session_history))
        .route("/{id}/export", get(export_session));

    Router::new()
        .nest("/sessions", session_routes)
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;

//! Interface error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use deckflow_export::ExportError;
use deckflow_protocols::WorkflowState;
use deckflow_workflow::WorkflowError;
use thiserror::Error;
use tracing::error;

/// Errors returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum InterfaceError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Export(#[from] ExportError),

    /// Export requested before the session finished.
    #[error("Session {session_id} is not done (waiting in {state})")]
    NotDone {
        session_id: String,
        state: WorkflowState,
    },
}

impl InterfaceError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Workflow(WorkflowError::SessionNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Workflow(WorkflowError::InvalidResume { .. })
            | Self::Workflow(WorkflowError::SessionExists(_)) => StatusCode::CONFLICT,
            Self::Workflow(WorkflowError::GenerationUnavailable(_)) => StatusCode::BAD_GATEWAY,
            Self::Workflow(WorkflowError::Checkpoint(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Export(ExportError::NoPlan(_)) | Self::NotDone { .. } => StatusCode::CONFLICT,
            Self::Export(ExportError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for InterfaceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, Json(serde_json::json!({"error": self.to_string()}))).into_response()
    }
}

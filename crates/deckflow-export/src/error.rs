//! Export errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// The session has no slide plan to render.
    #[error("No slide plan to export for session {0}")]
    NoPlan(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

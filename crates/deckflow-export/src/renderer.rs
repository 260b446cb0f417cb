//! Deck renderer trait.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use deckflow_protocols::SlidePlan;
use tracing::info;

use crate::error::ExportError;

/// Turns a finalized plan into a document.
#[async_trait]
pub trait DeckRenderer: Send + Sync {
    /// File extension of the produced document, without the dot.
    fn extension(&self) -> &str;

    /// Render the plan, optionally on top of a template file.
    ///
    /// An unreadable template falls back to the built-in theme.
    async fn render(
        &self,
        plan: &SlidePlan,
        template: Option<&Path>,
    ) -> Result<Vec<u8>, ExportError>;
}

/// Render `plan` and write it to `output`, creating parent directories.
pub async fn export_to_file(
    renderer: &dyn DeckRenderer,
    plan: &SlidePlan,
    template: Option<&Path>,
    output: &Path,
) -> Result<PathBuf, ExportError> {
    let bytes = renderer.render(plan, template).await?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(output, &bytes).await?;

    info!(path = %output.display(), bytes = bytes.len(), "Deck exported");
    Ok(output.to_path_buf())
}

//! Wiring from configuration to a running engine.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use deckflow_checkpoint::SnapshotManager;
use deckflow_config::{Config, ConfigLoader, ConfigValidator, ProviderConfig};
use deckflow_protocols::SharedGenerator;
use deckflow_provider_openai::OpenAIProvider;
use deckflow_workflow::WorkflowEngine;

/// Load, override and validate configuration.
///
/// Validation errors abort; warnings are returned so they can be logged once
/// tracing is up.
pub(crate) fn load_config(path: &Path) -> Result<(Config, Vec<String>), Box<dyn std::error::Error>> {
    let config = ConfigLoader::load_or_default(path)?;
    let warnings = ConfigValidator::validate(&config)?
        .into_result()?
        .into_iter()
        .map(|w| format!("{}: {}", w.path, w.message))
        .collect();
    Ok((config, warnings))
}

/// Build the text generator described by the provider section.
pub(crate) fn build_generator(
    config: &ProviderConfig,
) -> Result<SharedGenerator, Box<dyn std::error::Error>> {
    if config.api_key.is_none() {
        warn!("No API key configured; requests are sent without authorization");
    }
    let provider = OpenAIProvider::from_config(config)?;
    info!(model = %provider.model(), base_url = %config.base_url, "Registered OpenAI provider");
    Ok(Arc::new(provider))
}

/// Build the engine with the configured generator and snapshot store.
pub(crate) async fn build_engine(
    config: &Config,
) -> Result<Arc<WorkflowEngine>, Box<dyn std::error::Error>> {
    let generator = build_generator(&config.provider)?;
    let snapshots = SnapshotManager::from_config(&config.checkpoint).await?;
    info!(
        backend = ?config.checkpoint.backend,
        path = %config.checkpoint.storage_path.display(),
        "Snapshot store ready"
    );
    Ok(Arc::new(WorkflowEngine::new(generator, Arc::new(snapshots))))
}

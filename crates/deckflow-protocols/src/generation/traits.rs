//! Text generation trait definition.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::GenerationError;

/// Core trait for the external text-generation capability.
///
/// Implementations must not retry internally; retries are a workflow-level
/// concern.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the generator ID (used in logs).
    fn id(&self) -> &str;

    /// Generate text for `prompt` under the given system role.
    async fn generate(&self, system_role: &str, prompt: &str) -> Result<String, GenerationError>;
}

/// Shared handle to a generator, injected into every executor.
pub type SharedGenerator = Arc<dyn TextGenerator>;

//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub workflow: WorkflowConfig,

    #[serde(default)]
    pub checkpoint: CheckpointConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Text-generation provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API (without `/chat/completions`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default)]
    pub temperature: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Per-request timeout. Unset means no client-side timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: 0.0,
            max_tokens: None,
            timeout_seconds: None,
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4".to_string()
}

/// Workflow input configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Maximum characters kept from each source file.
    #[serde(default = "default_source_char_limit")]
    pub source_char_limit: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            source_char_limit: default_source_char_limit(),
        }
    }
}

fn default_source_char_limit() -> usize {
    12_000
}

/// Snapshot storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckpointBackend {
    Memory,
    File,
}

/// Checkpoint configuration for session snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointConfig {
    #[serde(default = "default_backend")]
    pub backend: CheckpointBackend,

    /// Root directory for the file backend.
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,

    /// Maximum number of snapshots kept per session (0 keeps all).
    #[serde(default = "default_max_snapshots")]
    pub max_snapshots: u32,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            storage_path: default_storage_path(),
            max_snapshots: default_max_snapshots(),
        }
    }
}

fn default_backend() -> CheckpointBackend {
    CheckpointBackend::File
}

fn default_storage_path() -> PathBuf {
    deckflow_dir().join("checkpoints")
}

fn default_max_snapshots() -> u32 {
    50
}

/// Deck export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            template: None,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_level")]
    pub level: String,

    /// Directory for daily-rotated log files. Unset disables file logging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// Emit console logs as JSON.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            log_dir: None,
            json: false,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

/// The `~/.deckflow` directory.
pub fn deckflow_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".deckflow"))
        .unwrap_or_else(|| PathBuf::from(".deckflow"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.provider.model, "gpt-4");
        assert_eq!(config.provider.temperature, 0.0);
        assert!(config.provider.api_key.is_none());
        assert!(config.provider.timeout_seconds.is_none());
        assert_eq!(config.workflow.source_char_limit, 12_000);
        assert_eq!(config.checkpoint.backend, CheckpointBackend::File);
        assert_eq!(config.checkpoint.max_snapshots, 50);
        assert!(config.checkpoint.storage_path.ends_with("checkpoints"));
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_backend_serialization() {
        let json = serde_json::to_string(&CheckpointBackend::Memory).unwrap();
        assert_eq!(json, "\"memory\"");
    }

    #[test]
    fn test_config_serializes_without_secrets() {
        let config = Config::default();
        let json = serde_json::to_value(&config).unwrap();
        assert!(json["provider"].get("api_key").is_none());
    }
}

//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

/// Environment variable overriding `provider.api_key`.
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable overriding `provider.base_url`.
pub const ENV_API_BASE: &str = "OPENAI_API_BASE";
/// Environment variable overriding `provider.model`.
pub const ENV_MODEL: &str = "DECKFLOW_MODEL";

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let mut config: Config = toml::from_str(&expanded)?;
        Self::expand_paths(&mut config);
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    ///
    /// Environment overrides are applied in both cases.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        let mut config = if path.exists() {
            Self::load(path)?
        } else {
            Config::default()
        };
        Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override provider settings from the environment.
    ///
    /// `lookup` abstracts `std::env::var` so callers can inject values.
    pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(ENV_API_KEY) {
            config.provider.api_key = Some(key);
        }
        if let Some(base) = non_empty(ENV_API_BASE) {
            config.provider.base_url = base;
        }
        if let Some(model) = non_empty(ENV_MODEL) {
            config.provider.model = model;
        }
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    fn expand_paths(config: &mut Config) {
        let expand = |p: &PathBuf| PathBuf::from(Self::expand_path(&p.to_string_lossy()));

        config.checkpoint.storage_path = expand(&config.checkpoint.storage_path);
        config.export.output_dir = expand(&config.export.output_dir);
        if let Some(template) = &config.export.template {
            config.export.template = Some(expand(template));
        }
        if let Some(dir) = &config.logging.log_dir {
            config.logging.log_dir = Some(expand(dir));
        }
    }

    /// Expand shell-style paths (e.g., `~/.deckflow`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

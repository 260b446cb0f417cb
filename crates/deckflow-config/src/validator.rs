//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Character limits below this produce a warning.
const SMALL_SOURCE_CHAR_LIMIT: usize = 500;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Convert the first error into a `ConfigError`, if any.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_provider(config, &mut result);
        Self::validate_workflow(config, &mut result);

        Ok(result)
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.trim().is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_provider(config: &Config, result: &mut ValidationResult) {
        let provider = &config.provider;

        if provider.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
            result.add_warning(ValidationWarning::new(
                "provider.api_key",
                "API key is not set, may need to be set via OPENAI_API_KEY",
            ));
        }

        if !provider.base_url.starts_with("http://") && !provider.base_url.starts_with("https://")
        {
            result.add_error(ValidationError::new(
                "provider.base_url",
                "base_url must start with http:// or https://",
            ));
        }

        if provider.model.trim().is_empty() {
            result.add_error(ValidationError::new("provider.model", "Model cannot be empty"));
        }

        if !(0.0..=2.0).contains(&provider.temperature) {
            result.add_error(ValidationError::new(
                "provider.temperature",
                "temperature must be between 0 and 2",
            ));
        }

        if provider.timeout_seconds == Some(0) {
            result.add_error(ValidationError::new(
                "provider.timeout_seconds",
                "timeout_seconds must be greater than 0 when set",
            ));
        }
    }

    fn validate_workflow(config: &Config, result: &mut ValidationResult) {
        let limit = config.workflow.source_char_limit;
        if limit == 0 {
            result.add_error(ValidationError::new(
                "workflow.source_char_limit",
                "source_char_limit must be greater than 0",
            ));
        } else if limit < SMALL_SOURCE_CHAR_LIMIT {
            result.add_warning(ValidationWarning::new(
                "workflow.source_char_limit",
                format!(
                    "source_char_limit is very low (<{}), source files will be heavily truncated",
                    SMALL_SOURCE_CHAR_LIMIT
                ),
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

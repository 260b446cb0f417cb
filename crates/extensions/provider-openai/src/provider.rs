//! OpenAI provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use deckflow_config::ProviderConfig;
use deckflow_protocols::{GenerationError, TextGenerator};
use tracing::debug;

use crate::api::{ApiMessage, ApiRequest, ApiResponse};

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Text generator backed by an OpenAI-compatible chat completions API.
pub struct OpenAIProvider {
    api_key: String,
    api_url: String,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout: Option<Duration>,
    client: reqwest::Client,
}

impl OpenAIProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_url(api_key, DEFAULT_API_URL.to_string(), model)
    }

    /// Create provider with custom API URL (for OpenAI-compatible APIs).
    pub fn with_url(api_key: String, api_url: String, model: String) -> Self {
        Self {
            api_key,
            api_url,
            model,
            temperature: None,
            max_tokens: None,
            timeout: None,
            client: reqwest::Client::new(),
        }
    }

    /// Build from configuration. `base_url` is the API root, e.g.
    /// `https://api.openai.com/v1`.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, GenerationError> {
        let api_url = format!(
            "{}{}",
            config.base_url.trim_end_matches('/'),
            CHAT_COMPLETIONS_PATH
        );
        let mut provider = Self::with_url(
            config.api_key.clone().unwrap_or_default(),
            api_url,
            config.model.clone(),
        )
        .with_temperature(config.temperature);

        if let Some(max_tokens) = config.max_tokens {
            provider = provider.with_max_tokens(max_tokens);
        }
        if let Some(secs) = config.timeout_seconds {
            provider = provider.with_timeout(Duration::from_secs(secs))?;
        }
        Ok(provider)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, GenerationError> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, system_role: &str, prompt: &str) -> ApiRequest {
        ApiRequest {
            model: self.model.clone(),
            messages: vec![ApiMessage::system(system_role), ApiMessage::user(prompt)],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    fn map_send_error(&self, error: reqwest::Error) -> GenerationError {
        match self.timeout {
            Some(timeout) if error.is_timeout() => GenerationError::Timeout(timeout.as_secs()),
            _ => GenerationError::Network(error.to_string()),
        }
    }

    async fn send_request(
        &self,
        api_request: &ApiRequest,
    ) -> Result<reqwest::Response, GenerationError> {
        let mut request = self
            .client
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .json(api_request);
        if !self.api_key.is_empty() {
            request = request.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(GenerationError::from_status(status, text));
        }

        Ok(response)
    }
}

#[async_trait]
impl TextGenerator for OpenAIProvider {
    fn id(&self) -> &str {
        "openai"
    }

    async fn generate(&self, system_role: &str, prompt: &str) -> Result<String, GenerationError> {
        let api_request = self.build_request(system_role, prompt);
        debug!(model = %self.model, prompt_chars = prompt.len(), "Sending chat completion");

        let response = self.send_request(&api_request).await?;
        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| self.map_send_error(e))?;

        match api_response.first_text() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(GenerationError::EmptyResponse(self.model.clone())),
        }
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;

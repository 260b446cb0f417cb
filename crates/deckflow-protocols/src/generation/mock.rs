//! Scripted generator for tests and offline runs.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::traits::TextGenerator;
use crate::error::GenerationError;

/// A single recorded call to [`MockGenerator::generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationCall {
    pub system_role: String,
    pub prompt: String,
}

/// Generator that returns pre-configured responses, queued per system role.
pub struct MockGenerator {
    responses: Mutex<HashMap<String, VecDeque<String>>>,
    default_response: Mutex<Option<String>>,
    offline: AtomicBool,
    calls: Mutex<Vec<GenerationCall>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            default_response: Mutex::new(None),
            offline: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a response for the given system role.
    pub fn push_response(&self, system_role: &str, response: impl Into<String>) {
        let mut responses = self.responses.lock().unwrap_or_else(|e| e.into_inner());
        responses
            .entry(system_role.to_string())
            .or_default()
            .push_back(response.into());
    }

    /// Builder form of [`push_response`](Self::push_response).
    pub fn with_response(self, system_role: &str, response: impl Into<String>) -> Self {
        self.push_response(system_role, response);
        self
    }

    /// Response used when a role has nothing queued.
    pub fn with_default_response(self, response: impl Into<String>) -> Self {
        *self.default_response.lock().unwrap_or_else(|e| e.into_inner()) = Some(response.into());
        self
    }

    /// Make every subsequent call fail with [`GenerationError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// All calls made so far, oldest first.
    pub fn calls(&self) -> Vec<GenerationCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of calls made under the given system role.
    pub fn call_count(&self, system_role: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|c| c.system_role == system_role)
            .count()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn id(&self) -> &str {
        "mock"
    }

    async fn generate(&self, system_role: &str, prompt: &str) -> Result<String, GenerationError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(GenerationCall {
                system_role: system_role.to_string(),
                prompt: prompt.to_string(),
            });

        if self.offline.load(Ordering::SeqCst) {
            return Err(GenerationError::Unavailable("mock generator is offline".to_string()));
        }

        let queued = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get_mut(system_role)
            .and_then(|queue| queue.pop_front());

        if let Some(response) = queued {
            return Ok(response);
        }

        self.default_response
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or_else(|| {
                GenerationError::Unavailable(format!(
                    "no scripted response for role '{}'",
                    system_role
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queued_responses_in_order() {
        let mock = MockGenerator::new()
            .with_response("analyst", "first")
            .with_response("analyst", "second");

        assert_eq!(mock.generate("analyst", "p").await.unwrap(), "first");
        assert_eq!(mock.generate("analyst", "p").await.unwrap(), "second");
    }

    #[tokio::test]
    async fn test_missing_response_is_unavailable() {
        let mock = MockGenerator::new();
        let err = mock.generate("analyst", "p").await.unwrap_err();
        assert!(matches!(err, GenerationError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_default_response() {
        let mock = MockGenerator::new()
            .with_response("analyst", "queued")
            .with_default_response("fallback");

        assert_eq!(mock.generate("analyst", "p").await.unwrap(), "queued");
        assert_eq!(mock.generate("analyst", "p").await.unwrap(), "fallback");
        assert_eq!(mock.generate("other", "p").await.unwrap(), "fallback");
    }

    #[tokio::test]
    async fn test_offline() {
        let mock = MockGenerator::new().with_default_response("x");
        mock.set_offline(true);
        assert!(mock.generate("analyst", "p").await.is_err());

        mock.set_offline(false);
        assert!(mock.generate("analyst", "p").await.is_ok());
    }

    #[tokio::test]
    async fn test_calls_recorded() {
        let mock = MockGenerator::new().with_default_response("x");
        mock.generate("analyst", "prompt one").await.unwrap();
        mock.generate("auditor", "prompt two").await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].prompt, "prompt one");
        assert_eq!(mock.call_count("auditor"), 1);
        assert_eq!(mock.call_count("nobody"), 0);
    }

    #[test]
    fn test_id() {
        assert_eq!(MockGenerator::new().id(), "mock");
    }
}

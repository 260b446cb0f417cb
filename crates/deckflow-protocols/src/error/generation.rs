//! Text generation errors.

use thiserror::Error;

/// Failure to obtain text from the generation capability.
///
/// Every variant means "no usable text came back"; a response that arrived but
/// does not have the expected shape is not an error at this layer.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Generation capability unavailable: {0}")]
    Unavailable(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Empty response from model {0}")]
    EmptyResponse(String),
}

impl GenerationError {
    /// Map an HTTP status and body to the closest error variant.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::AuthenticationFailed(message),
            429 => Self::RateLimited(message),
            _ => Self::Api { status, message },
        }
    }
}

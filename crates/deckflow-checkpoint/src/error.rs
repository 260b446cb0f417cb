//! Checkpoint errors.

use thiserror::Error;

/// Checkpoint error types.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Checkpoint not found.
    #[error("Checkpoint not found: {0}")]
    NotFound(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid checkpoint data.
    #[error("Invalid checkpoint data: {0}")]
    InvalidData(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CheckpointError::NotFound("session-1".to_string());
        assert_eq!(err.to_string(), "Checkpoint not found: session-1");

        let err = CheckpointError::InvalidData("sequence gap".to_string());
        assert!(err.to_string().contains("sequence gap"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CheckpointError = io_err.into();
        assert!(matches!(err, CheckpointError::Io(_)));
    }
}

//! Error types for Hearth core

use thiserror::Error;

/// Main error type for Hearth operations
#[derive(Debug, Error)]
pub enum HearthError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error (bad user input, malformed attachment)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Model/LLM error (non-2xx status, malformed answer)
    #[error("Model error: {0}")]
    Model(String),

    /// Network/HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A response is already pending for this conversation
    #[error("Busy: {0}")]
    Busy(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Convenient Result type using HearthError
pub type Result<T> = std::result::Result<T, HearthError>;

impl HearthError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        HearthError::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        HearthError::Validation(msg.into())
    }

    /// Create a model error
    pub fn model(msg: impl Into<String>) -> Self {
        HearthError::Model(msg.into())
    }

    /// Create a template error
    pub fn template(msg: impl Into<String>) -> Self {
        HearthError::Template(msg.into())
    }

    /// Create a busy error
    pub fn busy(msg: impl Into<String>) -> Self {
        HearthError::Busy(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        HearthError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = HearthError::model("upstream returned 500");
        assert_eq!(err.to_string(), "Model error: upstream returned 500");

        let err = HearthError::busy("response pending");
        assert_eq!(err.to_string(), "Busy: response pending");
    }

    #[test]
    fn test_serde_error_converts() {
        fn parse() -> Result<serde_json::Value> {
            Ok(serde_json::from_str("{not json")?)
        }

        assert!(matches!(parse(), Err(HearthError::Serialization(_))));
    }
}

//! Configuration error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    FileReadError(String),

    #[error("Failed to write configuration file: {0}")]
    FileWriteError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to serialize configuration: {0}")]
    SerializeError(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Unknown search mode: {0} (expected case_sensitive or case_insensitive)")]
    UnknownSearchMode(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::ValidationFailed("max_store must be greater than 0".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration validation failed: max_store must be greater than 0"
        );

        let err = ConfigError::UnknownSearchMode("fuzzy".to_string());
        assert!(err.to_string().contains("fuzzy"));
    }
}

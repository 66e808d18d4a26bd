//! Configuration management for BulkStore
//!
//! Environment-based configuration with defaults, TOML files and
//! validation. The `store` and `gas` sections are handed to
//! [`MessageStore::new`](crate::store::MessageStore::new) as-is.

use crate::logging::{LogConfig, LogLevel};
use crate::store::{GasSchedule, MessageStoreConfig, SearchMode};
use serde::{Deserialize, Serialize};
use std::env;

mod error;

pub use error::ConfigError;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Store limits, search policy and greeting
    pub store: MessageStoreConfig,

    /// Gas schedule used by estimates and receipts
    pub gas: GasSchedule,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Metrics configuration
    pub metrics: MetricsConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON formatting
    pub json_format: bool,

    /// Include timestamps
    pub with_timestamp: bool,

    /// Include target module
    pub with_target: bool,
}

/// Metrics configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Register metric descriptions at startup
    pub enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            with_timestamp: true,
            with_target: true,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl LoggingConfig {
    /// Build the logging subsystem config. Call after `validate`.
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig::new(LogLevel::from_str(&self.level).unwrap_or_default())
            .with_timestamp(self.with_timestamp)
            .with_target(self.with_target)
            .json_format(self.json_format)
    }
}

fn parse_env<T>(key: &str, what: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue(format!("Invalid {}: {}", what, e))),
        Err(_) => Ok(None),
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables follow the pattern: BULKSTORE_<SECTION>_<KEY>
    /// Example: BULKSTORE_STORE_MAX_STORE=25
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from environment variables
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        // Store config
        if let Some(max_store) = parse_env("BULKSTORE_STORE_MAX_STORE", "max store")? {
            self.store.max_store = max_store;
        }
        if let Some(max_retrieve) = parse_env("BULKSTORE_STORE_MAX_RETRIEVE", "max retrieve")? {
            self.store.max_retrieve = max_retrieve;
        }
        if let Some(max_length) = parse_env("BULKSTORE_STORE_MAX_LENGTH", "max length")? {
            self.store.max_length = max_length;
        }
        if let Ok(mode) = env::var("BULKSTORE_STORE_SEARCH_MODE") {
            self.store.search_mode = match mode.to_lowercase().as_str() {
                "case_sensitive" => SearchMode::CaseSensitive,
                "case_insensitive" => SearchMode::CaseInsensitive,
                _ => return Err(ConfigError::UnknownSearchMode(mode)),
            };
        }
        if let Ok(message) = env::var("BULKSTORE_STORE_INITIAL_MESSAGE") {
            self.store.initial_message = message;
        }

        // Gas config
        if let Some(base) = parse_env("BULKSTORE_GAS_BASE", "gas base")? {
            self.gas.base = base;
        }
        if let Some(store) = parse_env("BULKSTORE_GAS_STORE", "store gas")? {
            self.gas.store = store;
        }
        if let Some(retrieve) = parse_env("BULKSTORE_GAS_RETRIEVE", "retrieve gas")? {
            self.gas.retrieve = retrieve;
        }
        if let Some(remove) = parse_env("BULKSTORE_GAS_REMOVE", "remove gas")? {
            self.gas.remove = remove;
        }

        // Logging config
        if let Ok(level) = env::var("BULKSTORE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(json) = parse_env("BULKSTORE_LOG_JSON", "JSON flag")? {
            self.logging.json_format = json;
        }

        // Metrics config
        if let Some(enabled) = parse_env("BULKSTORE_METRICS_ENABLED", "metrics flag")? {
            self.metrics.enabled = enabled;
        }

        Ok(())
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError(e.to_string()))?;

        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.max_store == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_store must be greater than 0".to_string(),
            ));
        }

        if self.store.max_retrieve == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_retrieve must be greater than 0".to_string(),
            ));
        }

        if self.store.max_length == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_length must be greater than 0".to_string(),
            ));
        }

        if LogLevel::from_str(&self.logging.level).is_none() {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), ConfigError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, contents).map_err(|e| ConfigError::FileWriteError(e.to_string()))?;

        Ok(())
    }
}

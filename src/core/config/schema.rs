//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing: the log level must be a
//! known level name, and metadata strings must not be blank.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::metadata::DEFAULT_VERSION;

/// Log level names accepted in `[logging] level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// User configuration.
///
/// # Example
///
/// ```toml
/// [logging]
/// level = "info"
///
/// [metadata]
/// creator = "analyst"
/// version = "0.1.0"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Diagnostic logging settings
    pub logging: Option<LoggingConfig>,

    /// Defaults for new metadata records
    pub metadata: Option<MetadataConfig>,
}

impl Config {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(logging) = &self.logging {
            logging.validate()?;
        }
        if let Some(metadata) = &self.metadata {
            metadata.validate()?;
        }
        Ok(())
    }

    /// Configured log level, or `"info"`.
    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or("info")
    }

    /// Configured creator for new administrative records.
    pub fn creator(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.creator.as_deref())
    }

    /// Configured initial version, or the default.
    pub fn version(&self) -> &str {
        self.metadata
            .as_ref()
            .and_then(|m| m.version.as_deref())
            .unwrap_or(DEFAULT_VERSION)
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum level (trace, debug, info, warn, error)
    pub level: Option<String>,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(level) = &self.level {
            if !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid log level '{}', must be one of: {}",
                    level,
                    LOG_LEVELS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

/// `[metadata]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MetadataConfig {
    /// Creator recorded on new entities (default: OS user)
    pub creator: Option<String>,

    /// Initial descriptive version (default: "0.1.0")
    pub version: Option<String>,
}

impl MetadataConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("creator", &self.creator), ("version", &self.version)] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(ConfigError::InvalidValue(format!(
                    "metadata.{} must not be empty",
                    field
                )));
            }
        }
        Ok(())
    }
}

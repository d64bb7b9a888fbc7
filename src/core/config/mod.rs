//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. Environment (`DATASTUDIO_LOG` for the log filter)
//! 4. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order, first existing file wins:
//! 1. `$DATASTUDIO_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/datastudio/config.toml`
//! 3. `~/.datastudio/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use datastudio::core::config::Config;
//!
//! let loaded = Config::load().unwrap();
//! println!("log level: {}", loaded.config.log_level());
//! if let Some(path) = loaded.path {
//!     println!("loaded from {}", path.display());
//! }
//! ```

pub mod schema;

pub use schema::{Config, LoggingConfig, MetadataConfig, LOG_LEVELS};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "DATASTUDIO_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Result of loading configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// The file it came from, if any.
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed
    /// or validated. A missing config file is not an error.
    pub fn load() -> Result<ConfigLoadResult, ConfigError> {
        let candidates = Self::candidates(|var| std::env::var(var).ok(), dirs::home_dir());
        match candidates.into_iter().find(|p| p.exists()) {
            Some(path) => {
                let config = Self::load_from(&path)?;
                Ok(ConfigLoadResult {
                    config,
                    path: Some(path),
                })
            }
            None => Ok(ConfigLoadResult::default()),
        }
    }

    /// Read, parse and validate one config file.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Candidate config paths in search order.
    fn candidates(env: impl Fn(&str) -> Option<String>, home: Option<PathBuf>) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(explicit) = env(CONFIG_ENV).filter(|v| !v.is_empty()) {
            paths.push(PathBuf::from(explicit));
        }
        if let Some(xdg) = env("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
            paths.push(PathBuf::from(xdg).join("datastudio/config.toml"));
        }
        if let Some(home) = home {
            paths.push(home.join(".datastudio/config.toml"));
        }
        paths
    }
}

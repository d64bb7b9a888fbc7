//! io::registry
//!
//! Extension to strategy lookup.
//!
//! # Design
//!
//! The registry is the single place that knows which strategy handles
//! which extension. Callers go through [`StrategyRegistry::global`] (or the
//! [`FileIo`](super::FileIo) dispatcher built on it) instead of naming
//! strategy types directly.
//!
//! The global registry is built once, on first use, and is read-only
//! afterwards. Every lookup of the same extension returns the same shared
//! instance.
//!
//! # Registered formats
//!
//! | Extension | Strategy |
//! |-----------|----------|
//! | `.csv`    | [`CsvStrategy::plain`] |
//! | `.gz`     | [`CsvStrategy::gzip`] |
//! | `.txt`    | [`TextStrategy`] |
//! | `.npy`    | [`NpyStrategy`] |
//!
//! # Example
//!
//! ```
//! use datastudio::core::types::Extension;
//! use datastudio::io::StrategyRegistry;
//!
//! let registry = StrategyRegistry::global();
//! let csv = registry.get(&Extension::new("csv").unwrap()).unwrap();
//! assert_eq!(csv.name(), "csv");
//!
//! assert!(registry.get(&Extension::new("xlsx").unwrap()).is_err());
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use super::npy::NpyStrategy;
use super::tabular::CsvStrategy;
use super::text::TextStrategy;
use super::traits::{FileIoError, IoStrategy};
use crate::core::types::Extension;

static GLOBAL: OnceLock<StrategyRegistry> = OnceLock::new();

/// Mapping from extension to the strategy that handles it.
#[derive(Debug, Clone)]
pub struct StrategyRegistry {
    strategies: BTreeMap<Extension, Arc<dyn IoStrategy>>,
}

impl StrategyRegistry {
    /// Build a registry with the built-in formats.
    pub fn with_defaults() -> Self {
        let strategies: [Arc<dyn IoStrategy>; 4] = [
            Arc::new(CsvStrategy::plain()),
            Arc::new(CsvStrategy::gzip()),
            Arc::new(TextStrategy::new()),
            Arc::new(NpyStrategy::new()),
        ];
        Self {
            strategies: strategies
                .into_iter()
                .map(|s| (s.extension(), s))
                .collect(),
        }
    }

    /// The process-wide registry, created on first use.
    pub fn global() -> &'static StrategyRegistry {
        GLOBAL.get_or_init(|| {
            let registry = Self::with_defaults();
            tracing::debug!(formats = registry.len(), "strategy registry initialised");
            registry
        })
    }

    /// Look up the strategy for an extension.
    ///
    /// # Errors
    ///
    /// Returns [`FileIoError::UnsupportedFormat`] if no strategy is
    /// registered for `ext`.
    pub fn get(&self, ext: &Extension) -> Result<Arc<dyn IoStrategy>, FileIoError> {
        self.strategies
            .get(ext)
            .cloned()
            .ok_or_else(|| FileIoError::UnsupportedFormat {
                extension: ext.to_string(),
            })
    }

    /// Whether a strategy is registered for `ext`.
    pub fn supports(&self, ext: &Extension) -> bool {
        self.strategies.contains_key(ext)
    }

    /// Registered extensions in sorted order.
    pub fn extensions(&self) -> impl Iterator<Item = &Extension> {
        self.strategies.keys()
    }

    /// Registered `(extension, strategy)` pairs in extension order.
    pub fn iter(&self) -> impl Iterator<Item = (&Extension, &Arc<dyn IoStrategy>)> {
        self.strategies.iter()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

/// Comma-separated list of supported extensions, for messages.
pub fn supported_extensions() -> String {
    StrategyRegistry::global()
        .extensions()
        .map(Extension::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

//! core::types
//!
//! Strong types used across the crate.
//!
//! # Types
//!
//! - [`Extension`] - Normalized file extension (`.csv`, `.gz`, ...)
//! - [`EntityId`] - Identifier assigned once to an entity's metadata
//! - [`UtcTimestamp`] - RFC3339 timestamp
//! - [`Fingerprint`] - SHA-256 content hash
//!
//! # Validation
//!
//! These types enforce validity at construction time. An `Extension`
//! is always lower-case, dot-prefixed and a single suffix.
//!
//! # Examples
//!
//! ```
//! use datastudio::core::types::Extension;
//! use std::path::Path;
//!
//! let ext = Extension::from_path(Path::new("listings.CSV")).unwrap();
//! assert_eq!(ext.as_str(), ".csv");
//!
//! // Chained extensions resolve to the final suffix
//! let ext = Extension::from_path(Path::new("listings.csv.gz")).unwrap();
//! assert_eq!(ext.as_str(), ".gz");
//!
//! assert!(Extension::new("csv.gz").is_err());
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid file extension: {0}")]
    InvalidExtension(String),

    #[error("invalid entity id: {0}")]
    InvalidEntityId(String),
}

/// A normalized file extension.
///
/// Stored lower-case with a leading dot. Only the final dotted suffix of
/// a path is ever considered, so `data.csv.gz` has extension `.gz`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Extension(String);

impl Extension {
    /// Create a validated extension.
    ///
    /// A missing leading dot is added. The value is lower-cased.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::InvalidExtension`] if the extension is empty,
    /// contains a path separator, whitespace, or more than one dot.
    pub fn new(ext: impl Into<String>) -> Result<Self, TypeError> {
        let raw = ext.into();
        let body = raw.strip_prefix('.').unwrap_or(&raw);

        if body.is_empty()
            || body.contains('.')
            || body.contains('/')
            || body.contains('\\')
            || body.chars().any(char::is_whitespace)
        {
            return Err(TypeError::InvalidExtension(raw));
        }

        Ok(Self(format!(".{}", body.to_lowercase())))
    }

    /// Wrap an extension literal already in normalized form.
    pub(crate) fn from_static(ext: &'static str) -> Self {
        debug_assert!(Self::new(ext).map(|e| e.0 == ext).unwrap_or(false));
        Self(ext.to_string())
    }

    /// Derive the extension of a path from its final dotted suffix.
    ///
    /// Returns `None` for paths without an extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| Self::new(e).ok())
    }

    /// Get the extension as a string slice, including the dot.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Extension {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Extension> for String {
    fn from(ext: Extension) -> Self {
        ext.0
    }
}

impl AsRef<str> for Extension {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Extension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier assigned once to an entity's administrative metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(uuid::Uuid);

impl EntityId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Parse an identifier from its hyphenated string form.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| TypeError::InvalidEntityId(s.to_string()))
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// A UTC timestamp in RFC3339 format.
///
/// # Example
///
/// ```
/// use datastudio::core::types::UtcTimestamp;
///
/// let now = UtcTimestamp::now();
/// println!("Current time: {}", now);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UtcTimestamp(chrono::DateTime<chrono::Utc>);

impl UtcTimestamp {
    /// Create a timestamp for the current moment.
    pub fn now() -> Self {
        Self(chrono::Utc::now())
    }
}

impl std::fmt::Display for UtcTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// A SHA-256 hash over file content.
///
/// # Example
///
/// ```
/// use datastudio::core::types::Fingerprint;
///
/// let fp = Fingerprint::compute(b"id,price\n1,100\n");
/// assert_eq!(fp.as_str().len(), 64);
///
/// // Same bytes produce the same fingerprint
/// assert_eq!(fp, Fingerprint::compute(b"id,price\n1,100\n"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute a fingerprint over a byte slice.
    pub fn compute(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    /// Compute a fingerprint over the contents of a file.
    pub fn of_file(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::compute(&bytes))
    }

    /// Get the fingerprint as a hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod extension {
        use super::*;

        #[test]
        fn adds_missing_dot() {
            assert_eq!(Extension::new("csv").unwrap().as_str(), ".csv");
            assert_eq!(Extension::new(".csv").unwrap().as_str(), ".csv");
        }

        #[test]
        fn lowercases() {
            assert_eq!(Extension::new(".NPY").unwrap().as_str(), ".npy");
        }

        #[test]
        fn empty_rejected() {
            assert!(Extension::new("").is_err());
            assert!(Extension::new(".").is_err());
        }

        #[test]
        fn chained_rejected() {
            assert!(Extension::new(".csv.gz").is_err());
        }

        #[test]
        fn separators_rejected() {
            assert!(Extension::new("a/b").is_err());
            assert!(Extension::new("a\\b").is_err());
            assert!(Extension::new("c sv").is_err());
        }

        #[test]
        fn from_path_uses_final_suffix() {
            let ext = Extension::from_path(Path::new("./data/sf.csv.gz")).unwrap();
            assert_eq!(ext.as_str(), ".gz");
        }

        #[test]
        fn from_path_without_extension() {
            assert!(Extension::from_path(Path::new("./data/README")).is_none());
        }

        #[test]
        fn serde_roundtrip() {
            let ext = Extension::new("txt").unwrap();
            let json = serde_json::to_string(&ext).unwrap();
            assert_eq!(json, "\".txt\"");
            let parsed: Extension = serde_json::from_str(&json).unwrap();
            assert_eq!(ext, parsed);
        }
    }

    mod entity_id {
        use super::*;

        #[test]
        fn generated_ids_differ() {
            assert_ne!(EntityId::generate(), EntityId::generate());
        }

        #[test]
        fn parse_display_roundtrip() {
            let id = EntityId::generate();
            let parsed = EntityId::parse(&id.to_string()).unwrap();
            assert_eq!(id, parsed);
        }

        #[test]
        fn parse_rejects_garbage() {
            assert!(matches!(
                EntityId::parse("not-a-uuid"),
                Err(TypeError::InvalidEntityId(_))
            ));
        }
    }

    mod fingerprint {
        use super::*;

        #[test]
        fn known_digest() {
            let fp = Fingerprint::compute(b"");
            assert_eq!(
                fp.as_str(),
                "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
            );
        }

        #[test]
        fn differs_on_content() {
            assert_ne!(Fingerprint::compute(b"a"), Fingerprint::compute(b"b"));
        }
    }
}

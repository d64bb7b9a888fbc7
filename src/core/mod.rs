//! core
//!
//! Core domain types, tables, metadata and configuration.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Extension, EntityId, Fingerprint, etc.
//! - [`table`] - In-memory tabular data
//! - [`metadata`] - Metadata records, builder and composite
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at construction time
//! - Metadata mutations are counted, never silent
//! - Configuration is strict: unknown fields are rejected

pub mod config;
pub mod metadata;
pub mod table;
pub mod types;

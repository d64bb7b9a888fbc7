//! datastudio - file-format dispatch and metadata for data projects
//!
//! datastudio reads and writes data files through one dispatcher that
//! picks a format strategy from the file extension, and attaches a
//! four-part metadata record (administrative, descriptive, technical,
//! process) to every dataset, file and collection it manages.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to io and entities)
//! - [`entity`] - Datasets, file-backed stores and sources, collections
//! - [`io`] - Format strategies, their registry and the dispatcher
//! - [`core`] - Domain types, tables, metadata and configuration
//! - [`logging`] - Diagnostic subscriber setup
//! - [`ui`] - User-facing output
//!
//! # Failure Model
//!
//! 1. An unsupported extension is always an error
//! 2. Other read and write failures are logged and yield `None`
//! 3. Metadata edits that would lose data (duplicate add, missing change)
//!    are errors and leave the record unchanged
//!
//! # Example
//!
//! ```no_run
//! use datastudio::io::FileIo;
//!
//! let io = FileIo::new();
//! if let Some(content) = io.read("data/raw/sf_listings.csv.gz", None)? {
//!     io.write("data/interim/sf_listings.csv", &content)?;
//! }
//! # Ok::<(), datastudio::io::FileIoError>(())
//! ```

pub mod cli;
pub mod core;
pub mod entity;
pub mod io;
pub mod logging;
pub mod ui;

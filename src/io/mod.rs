//! io
//!
//! File format dispatch for tabular, text and array data.
//!
//! # Architecture
//!
//! The [`IoStrategy`] trait defines how one file format is read and
//! written. Callers do not pick a strategy themselves: [`FileIo`] looks at
//! the file's extension and asks the [`StrategyRegistry`] for the strategy
//! registered under it.
//!
//! - Strategies are stateless and shared
//! - An unsupported extension is always an error
//! - Other failures become a logged warning and `None` through [`FileIo`]
//!
//! # Modules
//!
//! - `traits`: `IoStrategy`, `Content`, `ReadFilter` and `FileIoError`
//! - `tabular`: CSV and gzip CSV
//! - `text`: plain text
//! - `npy`: NumPy arrays
//! - `registry`: extension to strategy lookup
//! - `dispatch`: the `FileIo` dispatcher
//! - `handle`: `FileHandle`, a path-tracking handle with move/rename/lock
//!
//! # Example
//!
//! ```no_run
//! use datastudio::io::{Content, FileIo};
//!
//! let io = FileIo::new();
//! if let Some(content) = io.read("./data/raw/sf_listings.csv.gz", None)? {
//!     io.write("./data/interim/sf_listings.csv", &content)?;
//! }
//! # Ok::<(), datastudio::io::FileIoError>(())
//! ```

mod dispatch;
mod handle;
mod npy;
mod registry;
mod tabular;
mod text;
mod traits;

pub use dispatch::FileIo;
pub use handle::{FileError, FileHandle};
pub use npy::NpyStrategy;
pub use registry::{supported_extensions, StrategyRegistry};
pub use tabular::CsvStrategy;
pub use text::TextStrategy;
pub use traits::{Content, FileIoError, IoStrategy, ReadFilter};

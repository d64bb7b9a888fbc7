//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Turns its arguments into dispatcher or entity calls
//! 2. Adds context to any error
//! 3. Formats and displays output through [`crate::ui::output`]

mod completion;
mod convert;
mod formats;
mod info;
mod read;

pub use completion::completion;
pub use convert::convert;
pub use formats::formats;
pub use info::info;
pub use read::read;

use crate::cli::args::Command;
use crate::cli::Context;
use crate::io::ReadFilter;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Read {
            path,
            columns,
            bytes,
            head,
        } => read::read(ctx, &path, &columns, bytes, head),
        Command::Convert { src, dst, columns } => convert::convert(ctx, &src, &dst, &columns),
        Command::Info { path, json } => info::info(ctx, &path, json),
        Command::Formats => formats::formats(ctx),
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// The filter implied by `--columns` / `--bytes`, if any.
fn filter_from(columns: &[String], bytes: Option<usize>) -> Option<ReadFilter> {
    if !columns.is_empty() {
        Some(ReadFilter::Columns(columns.to_vec()))
    } else {
        bytes.map(ReadFilter::Bytes)
    }
}

//! info command - Show file facts and metadata
//!
//! Describes a file by loading it as a [`DataStoreFile`], which records
//! size and fingerprint in the technical metadata.

use crate::cli::Context;
use crate::entity::{DataStoreFile, Entity};
use crate::io::{Content, FileHandle};
use crate::ui::output;
use anyhow::{bail, Context as _, Result};
use serde_json::json;
use std::path::Path;

/// Print what `path` holds followed by its metadata records.
pub fn info(ctx: &Context, path: &Path, json: bool) -> Result<()> {
    if !path.is_file() {
        bail!("'{}' is not a file", path.display());
    }

    let format = ctx
        .io
        .resolve(path)
        .with_context(|| format!("cannot describe '{}'", path.display()))?
        .name();
    let owner = ctx.owner(FileHandle::new(path).name(), "DataStoreFile");
    let mut store = DataStoreFile::with_owner(path, owner);
    let content = store
        .load()
        .with_context(|| format!("cannot read '{}'", path.display()))?;
    let Some(content) = content else {
        bail!("nothing could be read from '{}'", path.display());
    };

    if json {
        let value = json!({
            "path": path.display().to_string(),
            "format": format,
            "content": summary(&content),
            "metadata": store.metadata().to_value(),
        });
        let text = serde_json::to_string_pretty(&value).context("failed to serialize metadata")?;
        output::print(text, ctx.verbosity);
        return Ok(());
    }

    output::print(format!("Path: {}", path.display()), ctx.verbosity);
    output::print(format!("Format: {}", format), ctx.verbosity);
    output::print(format!("Content: {}", summary(&content)), ctx.verbosity);
    output::print("", ctx.verbosity);
    store.metadata().print(ctx.verbosity);
    Ok(())
}

fn summary(content: &Content) -> String {
    match content {
        Content::Table(table) => format!(
            "table, {} rows x {} columns",
            table.n_rows(),
            table.n_cols()
        ),
        Content::Text(text) => format!("text, {} lines", text.lines().count()),
        Content::Lines(lines) => format!("lines, {}", lines.len()),
        Content::Array(array) => format!("array, shape {:?}", array.shape()),
    }
}

//! read command - Print a preview of a file

use crate::cli::Context;
use crate::ui::output;
use anyhow::{bail, Context as _, Result};
use std::path::Path;

/// Read `path` and print its first `head` rows or lines.
pub fn read(
    ctx: &Context,
    path: &Path,
    columns: &[String],
    bytes: Option<usize>,
    head: usize,
) -> Result<()> {
    let filter = super::filter_from(columns, bytes);
    let content = ctx
        .io
        .read(path, filter.as_ref())
        .with_context(|| format!("cannot read '{}'", path.display()))?;

    let Some(content) = content else {
        bail!("nothing could be read from '{}'", path.display());
    };
    output::print(output::preview(&content, head), ctx.verbosity);
    Ok(())
}

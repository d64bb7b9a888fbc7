//! convert command - Rewrite a file in another format

use crate::cli::Context;
use crate::ui::output;
use anyhow::{bail, Context as _, Result};
use std::path::Path;

/// Read `src`, optionally keeping only `columns`, and write it to `dst`.
///
/// The formats are picked from each path's extension, so converting
/// `a.csv` to `a.csv.gz` compresses it.
pub fn convert(ctx: &Context, src: &Path, dst: &Path, columns: &[String]) -> Result<()> {
    let filter = super::filter_from(columns, None);
    let content = ctx
        .io
        .read(src, filter.as_ref())
        .with_context(|| format!("cannot read '{}'", src.display()))?;
    let Some(content) = content else {
        bail!("nothing could be read from '{}'", src.display());
    };

    let written = ctx
        .io
        .write(dst, &content)
        .with_context(|| format!("cannot write '{}'", dst.display()))?;
    let Some(written) = written else {
        bail!(
            "could not write {} content to '{}'",
            content.kind(),
            dst.display()
        );
    };

    output::debug(format!("{} -> {}", src.display(), written.display()), ctx.verbosity);
    output::print(format!("Wrote {}", written.display()), ctx.verbosity);
    Ok(())
}

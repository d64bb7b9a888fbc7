//! formats command - List supported file formats

use crate::cli::Context;
use crate::io::StrategyRegistry;
use crate::ui::output;
use anyhow::Result;

/// Print each registered extension and the strategy that handles it.
pub fn formats(ctx: &Context) -> Result<()> {
    let rows: Vec<String> = StrategyRegistry::global()
        .iter()
        .map(|(ext, strategy)| format!("{:<6} {}", ext.as_str(), strategy.name()))
        .collect();
    output::print(output::format_list(&rows, "  "), ctx.verbosity);
    Ok(())
}

//! ui::output
//!
//! User-facing output for the command line.
//!
//! # Design
//!
//! Command results go to stdout and respect the quiet flag. Diagnostics
//! from library code go through `tracing` instead and never pass through
//! here.

use std::fmt::Display;

use crate::core::table::Table;
use crate::io::Content;

/// How much the command line prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only
    Quiet,
    #[default]
    Normal,
    /// Also echo internal steps to stderr
    Debug,
}

impl Verbosity {
    /// Pick a verbosity from the global flags. `--quiet` beats `--debug`.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        match (quiet, debug) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Debug,
            (false, false) => Verbosity::Normal,
        }
    }

    /// The log level matching this verbosity, if it forces one.
    pub fn log_level(&self) -> Option<&'static str> {
        match self {
            Verbosity::Quiet => Some("error"),
            Verbosity::Debug => Some("debug"),
            Verbosity::Normal => None,
        }
    }

    fn shows_results(&self) -> bool {
        *self != Verbosity::Quiet
    }
}

/// Write a command result to stdout unless quiet.
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity.shows_results() {
        println!("{message}");
    }
}

/// Echo an internal step to stderr in debug mode.
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[ds] {message}");
    }
}

/// Report a failed command. Always shown.
pub fn error(message: impl Display) {
    eprintln!("error: {message}");
}

/// Join items one per line, each behind `prefix`.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    let lines: Vec<String> = items.iter().map(|item| format!("{prefix}{item}")).collect();
    lines.join("\n")
}

/// Render a short preview of read content.
///
/// Tables show their first `head` rows, text its first `head` lines,
/// arrays their shape.
pub fn preview(content: &Content, head: usize) -> String {
    match content {
        Content::Table(table) => preview_table(table, head),
        Content::Text(text) => {
            let more = text.lines().count().saturating_sub(head);
            let mut out = text.lines().take(head).collect::<Vec<_>>().join("\n");
            if more > 0 {
                out.push_str(&format!("\n... {} more lines", more));
            }
            out
        }
        Content::Lines(lines) => format_list(&lines[..lines.len().min(head)], ""),
        Content::Array(array) => format!(
            "array shape {:?}, {} values",
            array.shape(),
            array.len()
        ),
    }
}

fn preview_table(table: &Table, head: usize) -> String {
    let mut out = table.head(head).to_string();
    out.push_str(&format!("[{} rows x {} columns]", table.n_rows(), table.n_cols()));
    out
}

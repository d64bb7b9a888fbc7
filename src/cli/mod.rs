//! cli
//!
//! Command-line interface layer for datastudio.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and install logging
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Handlers read and write through
//! [`crate::io::FileIo`] and the entities in [`crate::entity`]; they only
//! add argument handling, error context and output formatting.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::{Context as _, Result};

use crate::core::config::Config;
use crate::core::metadata::Owner;
use crate::io::FileIo;
use crate::logging;
use crate::ui::output::Verbosity;

/// Everything a command handler needs besides its arguments.
#[derive(Debug, Clone)]
pub struct Context {
    pub verbosity: Verbosity,
    pub config: Config,
    pub io: FileIo,
}

impl Context {
    /// An owner for a new entity, with the configured creator and version.
    pub fn owner(&self, name: &str, class: &str) -> Owner {
        let owner = Owner::new(name, class).with_version(self.config.version());
        match self.config.creator() {
            Some(creator) => owner.with_creator(creator),
            None => owner,
        }
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);

    let loaded = Config::load().context("failed to load configuration")?;
    let level = verbosity
        .log_level()
        .unwrap_or_else(|| loaded.config.log_level())
        .to_string();
    let _guard = logging::init(&level);

    if let Some(path) = &loaded.path {
        tracing::debug!(path = %path.display(), "loaded config");
    }

    let ctx = Context {
        verbosity,
        config: loaded.config,
        io: FileIo::new(),
    };

    commands::dispatch(cli.command, &ctx)
}

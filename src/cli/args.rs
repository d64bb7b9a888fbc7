//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Errors only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// datastudio - read, convert and describe data files
#[derive(Parser, Debug)]
#[command(name = "ds")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Errors only; overrides --debug
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read a file and print a preview
    #[command(
        name = "read",
        long_about = "Read a file through the format dispatcher and print a preview.\n\n\
            The format is chosen from the final extension: .csv, .gz (gzip CSV), \
            .txt or .npy. Tables show their first rows, text its first lines, \
            arrays their shape.",
        after_help = "\
EXAMPLES:
    # First ten rows of a compressed table
    ds read data/raw/sf_listings.csv.gz

    # Only two columns, first three rows
    ds read listings.csv --columns id,price --head 3

    # First kilobyte of a text file
    ds read notes.txt --bytes 1024"
    )]
    Read {
        /// File to read
        path: PathBuf,

        /// Keep only these columns (tabular formats)
        #[arg(long, value_delimiter = ',', conflicts_with = "bytes")]
        columns: Vec<String>,

        /// Read at most this many bytes (text)
        #[arg(long)]
        bytes: Option<usize>,

        /// Number of rows or lines to show
        #[arg(long, default_value_t = 10)]
        head: usize,
    },

    /// Convert a file to another format or compression
    #[command(
        name = "convert",
        after_help = "\
EXAMPLES:
    # Compress a table
    ds convert listings.csv listings.csv.gz

    # Keep a subset of columns
    ds convert listings.csv.gz prices.csv --columns id,price"
    )]
    Convert {
        /// File to read
        src: PathBuf,

        /// File to write; its extension picks the format
        dst: PathBuf,

        /// Keep only these columns
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
    },

    /// Show file facts and metadata
    #[command(
        name = "info",
        long_about = "Describe a file as a data store.\n\n\
            Loads the file, records its size and SHA-256 fingerprint in the \
            technical metadata, and prints every metadata record."
    )]
    Info {
        /// File to describe
        path: PathBuf,

        /// Print metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// List supported file formats
    #[command(name = "formats")]
    Formats,

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash (add to ~/.bashrc)
    ds completion bash >> ~/.bashrc

    # Fish
    ds completion fish > ~/.config/fish/completions/ds.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

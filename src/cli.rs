use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Package a plotting block and its data into a standalone, re-runnable
/// script.
#[derive(Debug, Parser)]
#[command(name = "plotis", version, about)]
pub struct Cli {
    /// TOML config file (defaults to ./plotis.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Capture a block: write its data and a standalone run script
    Capture {
        /// Source file holding the `with` block
        source: PathBuf,

        /// Output directory for the data and script
        #[arg(long)]
        figpath: PathBuf,

        /// Data file(s) (.csv, .json, .parquet) in binding order
        #[arg(long = "data", required = true)]
        data: Vec<PathBuf>,

        /// Line of the `with` statement (default: the only one in the file)
        #[arg(long)]
        line: Option<usize>,

        /// Treat a single data file as a one-element sequence
        #[arg(long)]
        many: bool,
    },

    /// List the capture blocks in a source file
    List {
        source: PathBuf,
    },

    /// Print the last line of the block opened at a line
    Extent {
        source: PathBuf,

        #[arg(long)]
        line: usize,

        /// Take the base indentation from the opening line itself
        #[arg(long)]
        include_opening_line: bool,
    },
}

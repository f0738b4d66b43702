//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::commands::Commands;

/// Command-line interface for the waitboard demo host.
///
/// Global options shape the board settings and output; subcommands choose
/// what to run.
#[derive(Parser, Debug)]
#[command(name = "waitboard")]
#[command(about = "Track many concurrent progress streams on one board")]
#[command(version)]
pub struct Cli {
    /// JSON settings file (missing fields fall back to defaults)
    #[arg(long, global = true, env = "WAITBOARD_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Override the rate smoothing window (ms)
    #[arg(long, global = true)]
    pub smoothing_window_ms: Option<u64>,

    /// Override the per-stream update interval (ms, 0 disables throttling)
    #[arg(long, global = true)]
    pub update_interval_ms: Option<u64>,

    /// Where new streams join the active block
    #[arg(long, global = true, value_enum)]
    pub insert_at: Option<InsertAt>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub format: OutputFormat,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// How board events are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Progress bars on a terminal, plain lines otherwise
    Auto,
    /// Progress bars
    Terminal,
    /// One line per event
    Plain,
    /// One JSON object per event
    Json,
}

/// CLI spelling of the insertion edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InsertAt {
    /// Bottom of the active block
    Tail,
    /// Directly below the completed block
    Head,
}

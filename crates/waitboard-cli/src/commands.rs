//! Available subcommands.

use clap::{Args, Subcommand};

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Simulate parallel downloads and render the board live
    Demo(DemoArgs),

    /// Print the effective settings as JSON
    Settings,
}

/// Options for the simulated workload.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct DemoArgs {
    /// Number of concurrent streams
    #[arg(short = 'n', long, default_value_t = 6)]
    pub streams: usize,

    /// Base stream size in KiB (streams are 1-3x this)
    #[arg(long, default_value_t = 2048)]
    pub size_kib: u64,

    /// Delay between producer samples (ms)
    #[arg(long, default_value_t = 50)]
    pub tick_ms: u64,

    /// Make every Nth stream report an unknown total until it finishes
    #[arg(long)]
    pub unknown_every: Option<usize>,

    /// Cancel every Nth stream halfway and remove it from the board
    #[arg(long)]
    pub cancel_every: Option<usize>,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            streams: 6,
            size_kib: 2048,
            tick_ms: 50,
            unknown_every: None,
            cancel_every: None,
        }
    }
}

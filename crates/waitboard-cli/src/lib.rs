//! Command-line demo host for waitboard.
//!
//! Wires a `BoardRunner` to a renderer and drives it with simulated
//! producers. Everything here is presentation and composition; board
//! semantics live in `waitboard-engine`.

#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

// Used only by the binary's composition root
use anyhow as _;
use tracing_subscriber as _;

pub mod commands;
pub mod config;
pub mod error;
pub mod parser;
pub mod render;
pub mod simulate;

// Re-export primary types for convenient access
pub use commands::{Commands, DemoArgs};
pub use config::{load_settings_file, resolve_settings};
pub use error::CliError;
pub use parser::{Cli, InsertAt, OutputFormat};
pub use render::{EventRenderer, JsonRenderer, PlainRenderer, TerminalRenderer, drain_events};
pub use simulate::{DemoOutcome, DemoPlan, run_demo};

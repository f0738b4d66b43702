//! CLI-specific error types and exit codes.

use thiserror::Error;
use waitboard_core::{BoardError, SettingsError};

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Settings file could not be read.
    #[error("Failed to read settings file {path}: {reason}")]
    SettingsRead { path: String, reason: String },

    /// Settings file is not valid JSON for `BoardSettings`.
    #[error("Failed to parse settings file {path}: {reason}")]
    SettingsParse { path: String, reason: String },

    /// Settings failed validation.
    #[error("Invalid settings: {0}")]
    Settings(#[from] SettingsError),

    /// Board runtime error.
    #[error("{0}")]
    Board(#[from] BoardError),

    /// Output could not be written.
    #[error("IO error: {0}")]
    Io(String),
}

impl CliError {
    /// Map error to an exit code (sysexits.h conventions).
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::SettingsRead { .. } => 66, // EX_NOINPUT
            Self::SettingsParse { .. } | Self::Settings(_) => 78, // EX_CONFIG
            Self::Board(_) => 70,            // EX_SOFTWARE
            Self::Io(_) => 74,               // EX_IOERR
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

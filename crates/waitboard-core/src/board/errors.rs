//! Board error types.
//!
//! Producers never see these: progress reports degrade to "no visual change"
//! instead of failing. Errors only surface on host-side operations such as
//! building a board from invalid settings or querying a stopped runner.

use thiserror::Error;

use crate::settings::SettingsError;

/// Error type for host-side board operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardError {
    /// Settings failed validation.
    #[error("Invalid board settings: {0}")]
    InvalidSettings(#[from] SettingsError),

    /// The board runner task is no longer accepting commands.
    #[error("Board runner has stopped")]
    RunnerStopped,
}

/// Result type alias for board operations.
pub type BoardResult<T> = Result<T, BoardError>;

//! Settings resolution for the CLI.
//!
//! Precedence: command-line flags, then the settings file, then defaults.

use std::path::Path;

use waitboard_core::{BoardSettings, InsertionEdge, validate_settings};

use crate::error::CliError;
use crate::parser::{Cli, InsertAt};

/// Read a JSON settings file.
pub fn load_settings_file(path: &Path) -> Result<BoardSettings, CliError> {
    let display = path.display().to_string();
    let contents = std::fs::read_to_string(path).map_err(|e| CliError::SettingsRead {
        path: display.clone(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&contents).map_err(|e| CliError::SettingsParse {
        path: display,
        reason: e.to_string(),
    })
}

/// Build validated settings from the settings file and flag overrides.
pub fn resolve_settings(cli: &Cli) -> Result<BoardSettings, CliError> {
    let mut settings = match &cli.settings {
        Some(path) => load_settings_file(path)?,
        None => BoardSettings::with_defaults(),
    };

    if let Some(ms) = cli.smoothing_window_ms {
        settings.smoothing_window_ms = Some(ms);
    }
    if let Some(ms) = cli.update_interval_ms {
        settings.update_interval_ms = Some(ms);
    }
    if let Some(edge) = cli.insert_at {
        settings.insertion_edge = Some(match edge {
            InsertAt::Tail => InsertionEdge::ActiveTail,
            InsertAt::Head => InsertionEdge::ActiveHead,
        });
    }

    validate_settings(&settings)?;
    tracing::debug!(?settings, "Resolved board settings");
    Ok(settings)
}

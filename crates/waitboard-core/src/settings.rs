//! Board settings types and validation.
//!
//! Pure domain types with no infrastructure dependencies. Hosts load them
//! however they like (the CLI reads JSON) and validate before building a board.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::board::{DEFAULT_DONE_TEXT, DEFAULT_WAIT_TEXT};

/// Default smoothing window for rate estimation, in milliseconds.
pub const DEFAULT_SMOOTHING_WINDOW_MS: u64 = 3_000;

/// Default minimum interval between non-structural row updates, in milliseconds.
pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 100;

/// Where newly observed streams join the active block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertionEdge {
    /// Append after the last row (bottom of the active block).
    #[default]
    ActiveTail,
    /// Insert directly after the last completed row (top of the active block).
    ActiveHead,
}

/// Board settings.
///
/// All fields are optional to support partial configuration files and
/// graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BoardSettings {
    /// Smoothing window for rate estimation in milliseconds (100 - 60,000).
    pub smoothing_window_ms: Option<u64>,

    /// Minimum interval between non-structural row updates per stream, in
    /// milliseconds (0 disables throttling, max 10,000).
    pub update_interval_ms: Option<u64>,

    /// Where new streams are inserted.
    pub insertion_edge: Option<InsertionEdge>,

    /// Status text while the batch runs.
    pub wait_text: Option<String>,

    /// Status text once the batch is finished.
    pub done_text: Option<String>,
}

impl BoardSettings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub const fn with_defaults() -> Self {
        Self {
            smoothing_window_ms: Some(DEFAULT_SMOOTHING_WINDOW_MS),
            update_interval_ms: Some(DEFAULT_UPDATE_INTERVAL_MS),
            insertion_edge: Some(InsertionEdge::ActiveTail),
            wait_text: None,
            done_text: None,
        }
    }

    /// Get the effective smoothing window.
    #[must_use]
    pub const fn effective_smoothing_window(&self) -> Duration {
        match self.smoothing_window_ms {
            Some(ms) => Duration::from_millis(ms),
            None => Duration::from_millis(DEFAULT_SMOOTHING_WINDOW_MS),
        }
    }

    /// Get the effective update interval (zero = unthrottled).
    #[must_use]
    pub const fn effective_update_interval(&self) -> Duration {
        match self.update_interval_ms {
            Some(ms) => Duration::from_millis(ms),
            None => Duration::from_millis(DEFAULT_UPDATE_INTERVAL_MS),
        }
    }

    /// Get the effective insertion edge.
    #[must_use]
    pub fn effective_insertion_edge(&self) -> InsertionEdge {
        self.insertion_edge.unwrap_or_default()
    }

    /// Get the effective "please wait" text.
    #[must_use]
    pub fn effective_wait_text(&self) -> &str {
        self.wait_text.as_deref().unwrap_or(DEFAULT_WAIT_TEXT)
    }

    /// Get the effective "done" text.
    #[must_use]
    pub fn effective_done_text(&self) -> &str {
        self.done_text.as_deref().unwrap_or(DEFAULT_DONE_TEXT)
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Smoothing window must be between 100 and 60,000 ms, got {0}")]
    InvalidSmoothingWindow(u64),

    #[error("Update interval must be at most 10,000 ms, got {0}")]
    InvalidUpdateInterval(u64),

    #[error("Status text cannot be empty")]
    EmptyStatusText,
}

/// Validate board settings.
pub fn validate_settings(settings: &BoardSettings) -> Result<(), SettingsError> {
    if let Some(window) = settings.smoothing_window_ms {
        if !(100..=60_000).contains(&window) {
            return Err(SettingsError::InvalidSmoothingWindow(window));
        }
    }

    if let Some(interval) = settings.update_interval_ms {
        if interval > 10_000 {
            return Err(SettingsError::InvalidUpdateInterval(interval));
        }
    }

    if [&settings.wait_text, &settings.done_text]
        .into_iter()
        .any(|text| text.as_ref().is_some_and(|t| t.trim().is_empty()))
    {
        return Err(SettingsError::EmptyStatusText);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = BoardSettings::with_defaults();
        assert_eq!(settings.smoothing_window_ms, Some(DEFAULT_SMOOTHING_WINDOW_MS));
        assert_eq!(settings.update_interval_ms, Some(DEFAULT_UPDATE_INTERVAL_MS));
        assert_eq!(settings.effective_insertion_edge(), InsertionEdge::ActiveTail);
        assert_eq!(settings.effective_wait_text(), DEFAULT_WAIT_TEXT);
        assert_eq!(settings.effective_done_text(), DEFAULT_DONE_TEXT);
    }

    #[test]
    fn test_empty_settings_fall_back_to_defaults() {
        let settings = BoardSettings::default();
        assert_eq!(settings.effective_smoothing_window(), Duration::from_secs(3));
        assert_eq!(settings.effective_update_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_validate_settings_valid() {
        assert!(validate_settings(&BoardSettings::with_defaults()).is_ok());
        assert!(validate_settings(&BoardSettings::default()).is_ok());
    }

    #[test]
    fn test_validate_smoothing_window_out_of_range() {
        let settings = BoardSettings {
            smoothing_window_ms: Some(10),
            ..Default::default()
        };
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::InvalidSmoothingWindow(10))
        );
    }

    #[test]
    fn test_validate_update_interval_too_large() {
        let settings = BoardSettings {
            update_interval_ms: Some(60_000),
            ..Default::default()
        };
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::InvalidUpdateInterval(60_000))
        );
    }

    #[test]
    fn test_validate_empty_text() {
        let settings = BoardSettings {
            done_text: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(validate_settings(&settings), Err(SettingsError::EmptyStatusText));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: BoardSettings =
            serde_json::from_str(r#"{ "insertion_edge": "active_head" }"#).unwrap();
        assert_eq!(settings.effective_insertion_edge(), InsertionEdge::ActiveHead);
        assert_eq!(settings.smoothing_window_ms, None);
    }
}

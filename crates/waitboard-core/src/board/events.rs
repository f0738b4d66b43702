//! Board events - discriminated union for everything the host must render.

use serde::{Deserialize, Serialize};

/// Render-ready data for one row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowView {
    /// Stream label.
    pub label: String,
    /// Completion percentage (0 - 100).
    pub percent: u8,
    /// Rate and ETA text.
    pub summary: String,
}

/// What a single board mutation changed.
///
/// Positions are zero-based display ranks. A move from `old_position` to
/// `new_position` has "remove at old, insert at new" semantics: every row
/// in between shifts by one toward the vacated slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderDelta {
    /// A new row appeared.
    Inserted {
        /// The new row.
        row: RowView,
        /// Where to insert it.
        position: usize,
    },
    /// An existing row changed and possibly moved.
    Updated {
        /// The row's new contents.
        row: RowView,
        /// Position before the update.
        old_position: usize,
        /// Position after the update (equal to `old_position` if unmoved).
        new_position: usize,
    },
    /// A row was dropped.
    Removed {
        /// Label of the dropped row.
        label: String,
        /// Position it occupied.
        position: usize,
    },
}

impl RenderDelta {
    /// Label of the affected row.
    pub fn label(&self) -> &str {
        match self {
            Self::Inserted { row, .. } | Self::Updated { row, .. } => &row.label,
            Self::Removed { label, .. } => label,
        }
    }

    /// Whether the delta changes the row layout (insert, removal or move).
    pub const fn is_structural(&self) -> bool {
        match self {
            Self::Inserted { .. } | Self::Removed { .. } => true,
            Self::Updated {
                old_position,
                new_position,
                ..
            } => *old_position != *new_position,
        }
    }
}

/// Single discriminated union for all board events.
///
/// Serialized with a `type` tag:
///
/// ```json
/// { "type": "row_updated", "label": "a.zip", "percent": 40, "summary": "...",
///   "old_position": 2, "new_position": 2 }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardEvent {
    /// A stream was seen for the first time.
    RowInserted {
        /// Stream label.
        label: String,
        /// Initial completion percentage.
        percent: u8,
        /// Initial rate summary.
        summary: String,
        /// Display position.
        position: usize,
    },

    /// A stream's progress changed.
    RowUpdated {
        /// Stream label.
        label: String,
        /// Completion percentage.
        percent: u8,
        /// Rate summary.
        summary: String,
        /// Position before this update.
        old_position: usize,
        /// Position after this update.
        new_position: usize,
    },

    /// A stream was removed from the board.
    RowRemoved {
        /// Stream label.
        label: String,
        /// Position the row occupied.
        position: usize,
    },

    /// All rows must be discarded.
    BoardReset,

    /// The batch is done; rows stay visible.
    BoardFinished,

    /// The overall status line changed.
    MainProgress {
        /// Status text.
        text: String,
        /// Overall percentage, `None` while indeterminate.
        #[serde(skip_serializing_if = "Option::is_none")]
        percent: Option<u8>,
    },

    /// A line was appended to the log.
    LogMessage {
        /// The log line.
        message: String,
    },
}

impl BoardEvent {
    /// Create a main progress event.
    pub fn main_progress(text: impl Into<String>, percent: Option<u8>) -> Self {
        Self::MainProgress {
            text: text.into(),
            percent,
        }
    }

    /// Create a log message event.
    pub fn log_message(message: impl Into<String>) -> Self {
        Self::LogMessage {
            message: message.into(),
        }
    }

    /// Get the row label from row events.
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::RowInserted { label, .. }
            | Self::RowUpdated { label, .. }
            | Self::RowRemoved { label, .. } => Some(label),
            Self::BoardReset
            | Self::BoardFinished
            | Self::MainProgress { .. }
            | Self::LogMessage { .. } => None,
        }
    }

    /// Get the event name for wire protocols.
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::RowInserted { .. } => "board:row_inserted",
            Self::RowUpdated { .. } => "board:row_updated",
            Self::RowRemoved { .. } => "board:row_removed",
            Self::BoardReset => "board:reset",
            Self::BoardFinished => "board:finished",
            Self::MainProgress { .. } => "board:main_progress",
            Self::LogMessage { .. } => "board:log",
        }
    }
}

impl From<RenderDelta> for BoardEvent {
    fn from(delta: RenderDelta) -> Self {
        match delta {
            RenderDelta::Inserted { row, position } => Self::RowInserted {
                label: row.label,
                percent: row.percent,
                summary: row.summary,
                position,
            },
            RenderDelta::Updated {
                row,
                old_position,
                new_position,
            } => Self::RowUpdated {
                label: row.label,
                percent: row.percent,
                summary: row.summary,
                old_position,
                new_position,
            },
            RenderDelta::Removed { label, position } => Self::RowRemoved { label, position },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &str, percent: u8) -> RowView {
        RowView {
            label: label.to_string(),
            percent,
            summary: String::new(),
        }
    }

    #[test]
    fn test_delta_structural() {
        let inserted = RenderDelta::Inserted {
            row: row("a", 0),
            position: 0,
        };
        let unmoved = RenderDelta::Updated {
            row: row("a", 10),
            old_position: 1,
            new_position: 1,
        };
        let moved = RenderDelta::Updated {
            row: row("a", 100),
            old_position: 1,
            new_position: 0,
        };
        assert!(inserted.is_structural());
        assert!(!unmoved.is_structural());
        assert!(moved.is_structural());
        assert_eq!(moved.label(), "a");
    }

    #[test]
    fn test_delta_into_event() {
        let event: BoardEvent = RenderDelta::Updated {
            row: row("a", 100),
            old_position: 2,
            new_position: 0,
        }
        .into();

        assert_eq!(
            event,
            BoardEvent::RowUpdated {
                label: "a".to_string(),
                percent: 100,
                summary: String::new(),
                old_position: 2,
                new_position: 0,
            }
        );
        assert_eq!(event.event_name(), "board:row_updated");
    }

    #[test]
    fn test_event_label_extraction() {
        let removed = BoardEvent::RowRemoved {
            label: "x".to_string(),
            position: 0,
        };
        assert_eq!(removed.label(), Some("x"));
        assert!(BoardEvent::BoardReset.label().is_none());
        assert!(BoardEvent::log_message("hi").label().is_none());
    }

    #[test]
    fn test_event_wire_format() {
        let json = serde_json::to_value(BoardEvent::main_progress("Please wait...", None)).unwrap();
        assert_eq!(json["type"], "main_progress");
        assert_eq!(json["text"], "Please wait...");
        assert!(json.get("percent").is_none());

        let json = serde_json::to_value(BoardEvent::BoardFinished).unwrap();
        assert_eq!(json["type"], "board_finished");
    }
}

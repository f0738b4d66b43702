//! Board snapshot DTOs.
//!
//! These types are "UI safe" - Clone + Debug + Serialize + Deserialize with no
//! runtime dependencies. Hosts use them for a full redraw or a final summary.

use serde::{Deserialize, Serialize};

use super::events::RowView;

/// Default status text while a batch is running.
pub const DEFAULT_WAIT_TEXT: &str = "Please wait...";

/// Default status text once a batch is finished.
pub const DEFAULT_DONE_TEXT: &str = "Done";

/// Overall status line and log for a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainStatus {
    /// Status text.
    pub text: String,
    /// Overall percentage, `None` while indeterminate.
    pub percent: Option<u8>,
    /// Log lines in arrival order.
    pub log: Vec<String>,
    /// Whether the batch was marked finished.
    pub finished: bool,
    /// Last message passed to `set_progress`, used to avoid duplicate log lines.
    #[serde(skip)]
    last_progress_message: Option<String>,
}

impl MainStatus {
    /// Fresh, indeterminate status with the given text.
    pub fn waiting(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            percent: None,
            log: Vec::new(),
            finished: false,
            last_progress_message: None,
        }
    }

    /// Replace the status text with a parenthesised description.
    pub fn set_description(&mut self, message: &str) {
        self.text = format!("({message})");
    }

    /// Set text and percentage together.
    ///
    /// The message is appended to the log when it differs from the previous
    /// progress message. Returns `true` if a log line was added.
    pub fn set_progress(&mut self, message: &str, percent: u8) -> bool {
        let percent = percent.min(100);
        self.text = format!("{message} - {percent}%");
        self.percent = Some(percent);

        if self.last_progress_message.as_deref() == Some(message) {
            return false;
        }
        self.last_progress_message = Some(message.to_string());
        self.log.push(message.to_string());
        true
    }

    /// Set text and percentage without touching the log.
    pub fn set_status(&mut self, text: impl Into<String>, percent: Option<u8>) {
        self.text = text.into();
        self.percent = percent.map(|p| p.min(100));
    }

    /// Switch to indeterminate progress, keeping the text.
    pub const fn set_indeterminate(&mut self) {
        self.percent = None;
    }

    /// Append a log line.
    pub fn push_log(&mut self, message: impl Into<String>) {
        self.log.push(message.into());
    }

    /// Mark the batch finished.
    pub fn finish(&mut self, done_text: impl Into<String>) {
        self.text = done_text.into();
        self.percent = Some(100);
        self.finished = true;
    }
}

impl Default for MainStatus {
    fn default() -> Self {
        Self::waiting(DEFAULT_WAIT_TEXT)
    }
}

/// Full, ordered view of the board.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Rows in display order.
    pub rows: Vec<RowView>,
    /// Overall status.
    pub main: MainStatus,
}

impl BoardSnapshot {
    /// Check if there are no rows.
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows.
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Get a row by label.
    pub fn get(&self, label: &str) -> Option<&RowView> {
        self.rows.iter().find(|row| row.label == label)
    }

    /// Position of a row by label.
    pub fn position_of(&self, label: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.label == label)
    }

    /// Labels in display order.
    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.label.as_str()).collect()
    }

    /// Number of rows at 100%.
    pub fn completed_count(&self) -> usize {
        self.rows.iter().filter(|row| row.percent >= 100).count()
    }
}

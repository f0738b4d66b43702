//! Board commands.
//!
//! Every mutation a producer can request, as data. Commands let the runtime
//! queue work from many tasks and apply it on one owner.

use std::time::Instant;

use waitboard_core::{BoardEvent, ProgressSample};

use super::ProgressBoard;

/// A single mutation of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardCommand {
    /// Progress sample for a stream.
    Progress {
        label: String,
        sample: ProgressSample,
    },
    /// Drop a stream.
    Remove { label: String },
    /// Clear every stream and the status line.
    Reset,
    /// Mark the batch finished.
    Finish,
    /// Parenthesised status description.
    Description { message: String },
    /// Status line with a message and percentage.
    MainProgress { message: String, percent: u8 },
    /// Status line driven by overall byte counts.
    MainBytes { sample: ProgressSample },
    /// Append a log line.
    Log { message: String },
    /// Switch the status line to indeterminate.
    Indeterminate,
}

impl BoardCommand {
    /// Progress for `label`, clamped the same way as `ProgressBoard::update`.
    pub fn progress(label: impl Into<String>, remaining: u64, total: u64) -> Self {
        Self::Progress {
            label: label.into(),
            sample: ProgressSample::new(remaining, total),
        }
    }
}

impl ProgressBoard {
    /// Apply a command and return the host events it produces.
    ///
    /// Removing an unknown label produces nothing.
    pub fn apply(&mut self, command: BoardCommand, now: Instant) -> Vec<BoardEvent> {
        match command {
            BoardCommand::Progress { label, sample } => {
                vec![self.apply_sample(&label, sample, now).into()]
            }
            BoardCommand::Remove { label } => {
                self.remove(&label).map(Into::into).into_iter().collect()
            }
            BoardCommand::Reset => {
                self.reset();
                vec![BoardEvent::BoardReset, self.main_event()]
            }
            BoardCommand::Finish => {
                self.finish();
                vec![BoardEvent::BoardFinished, self.main_event()]
            }
            BoardCommand::Description { message } => {
                self.set_description(&message);
                vec![self.main_event()]
            }
            BoardCommand::MainProgress { message, percent } => {
                let logged = self.set_main_progress(&message, percent);
                let mut events = vec![self.main_event()];
                if logged {
                    events.push(BoardEvent::log_message(message));
                }
                events
            }
            BoardCommand::MainBytes { sample } => {
                self.set_main_bytes(sample, now);
                vec![self.main_event()]
            }
            BoardCommand::Log { message } => {
                self.add_log_message(&message);
                vec![BoardEvent::log_message(message)]
            }
            BoardCommand::Indeterminate => {
                self.set_indeterminate();
                vec![self.main_event()]
            }
        }
    }

    fn main_event(&self) -> BoardEvent {
        let main = self.main_status();
        BoardEvent::main_progress(main.text.clone(), main.percent)
    }
}

//! Terminal rendering with `indicatif`.
//!
//! One status bar sits above one bar per row. Row bars are kept in the same
//! order as the board, so a row event's position maps directly to a slot in
//! the `MultiProgress` (offset by the status bar).

use std::io;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use waitboard_core::BoardEvent;

use super::{EventRenderer, truncate_label};

const MAX_LABEL: usize = 32;

/// Live progress bars mirroring the board.
pub struct TerminalRenderer {
    multi: MultiProgress,
    status: ProgressBar,
    /// Row bars in display order, paired with their labels.
    rows: Vec<(String, ProgressBar)>,
}

impl TerminalRenderer {
    /// Draw to stdout.
    pub fn stdout() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stdout())
    }

    /// Draw to an arbitrary target (hidden in tests).
    pub fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let multi = MultiProgress::with_draw_target(target);
        let status = multi.add(ProgressBar::new(100));
        status.set_style(Self::spinner_style());
        status.enable_steady_tick(Duration::from_millis(120));
        Self {
            multi,
            status,
            rows: Vec::new(),
        }
    }

    /// Labels in display order.
    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|(label, _)| label.as_str()).collect()
    }

    fn insert_row(&mut self, position: usize, label: &str, percent: u8, summary: &str) {
        let position = position.min(self.rows.len());
        let bar = self.multi.insert(position + 1, ProgressBar::new(100));
        bar.set_style(Self::row_style());
        bar.set_prefix(truncate_label(label, MAX_LABEL));
        bar.set_position(u64::from(percent));
        bar.set_message(summary.to_string());
        self.rows.insert(position, (label.to_string(), bar));
    }

    fn update_row(&mut self, label: &str, percent: u8, summary: &str, old: usize, new: usize) {
        let Some(mut slot) = self.slot_of(label, old) else {
            tracing::warn!(label = %label, "Update for a row that is not displayed");
            self.insert_row(new, label, percent, summary);
            return;
        };

        if slot != new {
            // Remove at old, insert at new
            let (label, bar) = self.rows.remove(slot);
            self.multi.remove(&bar);
            slot = new.min(self.rows.len());
            let bar = self.multi.insert(slot + 1, bar);
            self.rows.insert(slot, (label, bar));
        }

        if let Some((_, bar)) = self.rows.get(slot) {
            bar.set_position(u64::from(percent));
            bar.set_message(summary.to_string());
            if percent >= 100 {
                bar.set_style(Self::done_style());
            }
        }
    }

    fn remove_row(&mut self, label: &str, position: usize) {
        if let Some(slot) = self.slot_of(label, position) {
            let (_, bar) = self.rows.remove(slot);
            bar.finish_and_clear();
            self.multi.remove(&bar);
        }
    }

    fn clear_rows(&mut self) {
        for (_, bar) in self.rows.drain(..) {
            bar.finish_and_clear();
            self.multi.remove(&bar);
        }
    }

    /// Locate a row, trusting the event's position first.
    fn slot_of(&self, label: &str, hint: usize) -> Option<usize> {
        match self.rows.get(hint) {
            Some((at_hint, _)) if at_hint == label => Some(hint),
            _ => self.rows.iter().position(|(l, _)| l == label),
        }
    }

    fn set_status(&self, text: &str, percent: Option<u8>) {
        match percent {
            Some(percent) => {
                self.status.set_style(Self::status_style());
                self.status.set_position(u64::from(percent));
            }
            None => self.status.set_style(Self::spinner_style()),
        }
        self.status.set_message(text.to_string());
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn status_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner} {msg} {bar:20.green/white} {pos:>3}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }

    fn row_style() -> ProgressStyle {
        ProgressStyle::with_template("  {prefix:<32} {bar:28.cyan/blue} {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }

    fn done_style() -> ProgressStyle {
        ProgressStyle::with_template("  {prefix:<32} {bar:28.green/green} {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }
}

impl EventRenderer for TerminalRenderer {
    fn render(&mut self, event: &BoardEvent) -> io::Result<()> {
        match event {
            BoardEvent::RowInserted {
                label,
                percent,
                summary,
                position,
            } => self.insert_row(*position, label, *percent, summary),
            BoardEvent::RowUpdated {
                label,
                percent,
                summary,
                old_position,
                new_position,
            } => self.update_row(label, *percent, summary, *old_position, *new_position),
            BoardEvent::RowRemoved { label, position } => self.remove_row(label, *position),
            BoardEvent::BoardReset => self.clear_rows(),
            BoardEvent::BoardFinished => self.status.disable_steady_tick(),
            BoardEvent::MainProgress { text, percent } => self.set_status(text, *percent),
            BoardEvent::LogMessage { message } => self.multi.println(message)?,
        }
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        for (_, bar) in &self.rows {
            bar.abandon();
        }
        self.status.abandon();
        Ok(())
    }
}

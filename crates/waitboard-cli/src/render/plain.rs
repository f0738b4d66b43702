//! Line-per-event output for pipes and log files.

use std::io::{self, Write};

use waitboard_core::BoardEvent;

use super::{EventRenderer, truncate_label};

const MAX_LABEL: usize = 40;

/// Writes one human-readable line per event.
pub struct PlainRenderer<W> {
    out: W,
}

impl<W: Write + Send> PlainRenderer<W> {
    /// Render to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the renderer and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> EventRenderer for PlainRenderer<W> {
    fn render(&mut self, event: &BoardEvent) -> io::Result<()> {
        match event {
            BoardEvent::RowInserted {
                label,
                percent,
                summary,
                position,
            } => writeln!(
                self.out,
                "[+{position}] {} {percent:>3}% {summary}",
                truncate_label(label, MAX_LABEL)
            ),
            BoardEvent::RowUpdated {
                label,
                percent,
                summary,
                old_position,
                new_position,
            } if old_position != new_position => writeln!(
                self.out,
                "[{old_position}->{new_position}] {} {percent:>3}% {summary}",
                truncate_label(label, MAX_LABEL)
            ),
            BoardEvent::RowUpdated {
                label,
                percent,
                summary,
                new_position,
                ..
            } => writeln!(
                self.out,
                "[{new_position}] {} {percent:>3}% {summary}",
                truncate_label(label, MAX_LABEL)
            ),
            BoardEvent::RowRemoved { label, position } => writeln!(
                self.out,
                "[-{position}] {} removed",
                truncate_label(label, MAX_LABEL)
            ),
            BoardEvent::BoardReset => writeln!(self.out, "== reset =="),
            BoardEvent::BoardFinished => writeln!(self.out, "== finished =="),
            BoardEvent::MainProgress {
                text,
                percent: Some(percent),
            } => writeln!(self.out, "status: {text} ({percent}%)"),
            BoardEvent::MainProgress { text, percent: None } => {
                writeln!(self.out, "status: {text}")
            }
            BoardEvent::LogMessage { message } => writeln!(self.out, "log: {message}"),
        }
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

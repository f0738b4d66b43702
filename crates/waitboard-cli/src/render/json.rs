//! JSON-lines output for machine consumers.

use std::io::{self, Write};

use waitboard_core::BoardEvent;

use super::EventRenderer;

/// Writes each event as one JSON object per line.
pub struct JsonRenderer<W> {
    out: W,
}

impl<W: Write + Send> JsonRenderer<W> {
    /// Render to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the renderer and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> EventRenderer for JsonRenderer<W> {
    fn render(&mut self, event: &BoardEvent) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        self.out.write_all(b"\n")
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

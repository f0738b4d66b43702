//! Board event renderers.
//!
//! Presentation-only: renderers consume `BoardEvent`s in emission order and
//! mirror the board's row positions on their output. They never query the
//! board.

mod json;
mod plain;
mod terminal;

use std::io::{self, IsTerminal};

use tokio::sync::mpsc;
use waitboard_core::BoardEvent;

pub use json::JsonRenderer;
pub use plain::PlainRenderer;
pub use terminal::TerminalRenderer;

use crate::parser::OutputFormat;

/// Sink for board events.
pub trait EventRenderer: Send {
    /// Render one event.
    fn render(&mut self, event: &BoardEvent) -> io::Result<()>;

    /// Flush and release the output.
    fn finish(&mut self) -> io::Result<()>;
}

/// Pick a stdout renderer, auto-detecting terminal capability.
pub fn renderer_for(format: OutputFormat) -> Box<dyn EventRenderer> {
    match format {
        OutputFormat::Auto if io::stdout().is_terminal() => Box::new(TerminalRenderer::stdout()),
        OutputFormat::Terminal => Box::new(TerminalRenderer::stdout()),
        OutputFormat::Auto | OutputFormat::Plain => Box::new(PlainRenderer::new(io::stdout())),
        OutputFormat::Json => Box::new(JsonRenderer::new(io::stdout())),
    }
}

/// Render events until the channel closes.
///
/// A write failure (e.g. a closed pipe) stops rendering but keeps draining
/// so producers are unaffected.
pub async fn drain_events(
    mut events: mpsc::UnboundedReceiver<BoardEvent>,
    mut renderer: Box<dyn EventRenderer>,
) {
    let mut failed = false;
    while let Some(event) = events.recv().await {
        if failed {
            continue;
        }
        if let Err(e) = renderer.render(&event) {
            tracing::warn!(error = %e, event = event.event_name(), "Rendering failed, discarding output");
            failed = true;
        }
    }
    if !failed {
        if let Err(e) = renderer.finish() {
            tracing::warn!(error = %e, "Failed to finish rendering");
        }
    }
}

/// Shorten a label to `max` characters with a trailing ellipsis.
pub fn truncate_label(raw: &str, max: usize) -> String {
    if raw.chars().count() <= max {
        return raw.to_string();
    }
    let mut buf: String = raw.chars().take(max.saturating_sub(1)).collect();
    buf.push('…');
    buf
}

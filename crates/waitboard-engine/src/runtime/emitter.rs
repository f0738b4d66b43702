//! Channel-backed event emitter.

use tokio::sync::mpsc;

use waitboard_core::{BoardEvent, BoardEventEmitterPort};

/// Forwards board events into an unbounded channel.
///
/// Lets an async host (renderer, websocket, test) consume events on its own
/// task. Events sent after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelBoardEmitter {
    tx: mpsc::UnboundedSender<BoardEvent>,
}

impl ChannelBoardEmitter {
    /// Create an emitter and the receiver for its events.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<BoardEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl BoardEventEmitterPort for ChannelBoardEmitter {
    fn emit(&self, event: BoardEvent) {
        if let Err(e) = self.tx.send(event) {
            tracing::trace!(event = e.0.event_name(), "Event receiver dropped");
        }
    }

    fn clone_box(&self) -> Box<dyn BoardEventEmitterPort> {
        Box::new(self.clone())
    }
}

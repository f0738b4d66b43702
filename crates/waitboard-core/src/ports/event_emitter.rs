//! Board event emitter port.
//!
//! This port abstracts board event emission, allowing the tracking engine to
//! hand events to the host without coupling to its transport or its UI thread.

use crate::board::BoardEvent;

/// Port for emitting board events.
///
/// Implementations handle the actual event delivery (channels, UI dispatch
/// queues, logging). The engine only ever calls `emit`.
///
/// # Example
///
/// ```ignore
/// fn on_delta(&self, emitter: &dyn BoardEventEmitterPort, delta: RenderDelta) {
///     emitter.emit(delta.into());
/// }
/// ```
pub trait BoardEventEmitterPort: Send + Sync {
    /// Emit a board event.
    ///
    /// Implementations should hand the event off or buffer it.
    /// This method must not block.
    fn emit(&self, event: BoardEvent);

    /// Clone this emitter into a boxed trait object.
    ///
    /// This enables cloning of `Arc<dyn BoardEventEmitterPort>` without
    /// requiring the underlying type to implement Clone.
    fn clone_box(&self) -> Box<dyn BoardEventEmitterPort>;
}

/// A no-op board event emitter for tests and headless contexts.
#[derive(Debug, Clone, Default)]
pub struct NoopBoardEmitter;

impl NoopBoardEmitter {
    /// Create a new no-op emitter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl BoardEventEmitterPort for NoopBoardEmitter {
    fn emit(&self, _event: BoardEvent) {
        // Intentionally do nothing
    }

    fn clone_box(&self) -> Box<dyn BoardEventEmitterPort> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_noop_emitter() {
        let emitter = NoopBoardEmitter::new();

        // Should not panic
        emitter.emit(BoardEvent::BoardReset);
    }

    #[test]
    fn test_noop_emitter_clone_box() {
        let emitter = NoopBoardEmitter::new();
        let _boxed: Box<dyn BoardEventEmitterPort> = emitter.clone_box();
    }

    #[test]
    fn test_arc_emitter() {
        let emitter: Arc<dyn BoardEventEmitterPort> = Arc::new(NoopBoardEmitter::new());
        emitter.emit(BoardEvent::BoardFinished);
    }
}

//! Callback-style host port.
//!
//! Some hosts prefer one method per event kind over matching on
//! `BoardEvent`. `BoardObserver` provides that shape and `ObserverBridge`
//! adapts it to `BoardEventEmitterPort`, so the engine keeps a single
//! emission path.

use std::sync::Arc;

use crate::board::BoardEvent;

use super::BoardEventEmitterPort;

/// Host callbacks for board changes.
///
/// - **Object-safe**: used through `Arc<dyn BoardObserver>`
/// - **Fire-and-forget**: no `Result`s; hosts handle their own failures
///
/// # Example
///
/// ```rust
/// use waitboard_core::ports::BoardObserver;
///
/// struct Printer;
///
/// impl BoardObserver for Printer {
///     fn on_row_inserted(&self, label: &str, percent: u8, summary: &str, position: usize) {
///         println!("+{position} {label} {percent}% {summary}");
///     }
///     fn on_row_updated(&self, label: &str, percent: u8, summary: &str, old: usize, new: usize) {
///         println!("{old}->{new} {label} {percent}% {summary}");
///     }
///     fn on_board_reset(&self) {}
///     fn on_board_finished(&self) {}
/// }
/// ```
pub trait BoardObserver: Send + Sync {
    /// A row was inserted at `position`.
    fn on_row_inserted(&self, label: &str, percent: u8, summary: &str, position: usize);

    /// A row changed; `old_position == new_position` when it did not move.
    fn on_row_updated(
        &self,
        label: &str,
        percent: u8,
        summary: &str,
        old_position: usize,
        new_position: usize,
    );

    /// All rows must be discarded.
    fn on_board_reset(&self);

    /// The batch is done; rows stay.
    fn on_board_finished(&self);

    /// A row was removed.
    fn on_row_removed(&self, _label: &str, _position: usize) {}

    /// The overall status line changed.
    fn on_main_progress(&self, _text: &str, _percent: Option<u8>) {}

    /// A log line was appended.
    fn on_log_message(&self, _message: &str) {}
}

/// No-op observer for tests and headless contexts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBoardObserver;

impl BoardObserver for NoopBoardObserver {
    fn on_row_inserted(&self, _label: &str, _percent: u8, _summary: &str, _position: usize) {}
    fn on_row_updated(&self, _: &str, _: u8, _: &str, _: usize, _: usize) {}
    fn on_board_reset(&self) {}
    fn on_board_finished(&self) {}
}

/// Adapter that dispatches `BoardEvent`s to a `BoardObserver`.
#[derive(Clone)]
pub struct ObserverBridge {
    inner: Arc<dyn BoardObserver>,
}

impl ObserverBridge {
    /// Wrap an observer.
    pub fn new(observer: Arc<dyn BoardObserver>) -> Self {
        Self { inner: observer }
    }
}

impl BoardEventEmitterPort for ObserverBridge {
    fn emit(&self, event: BoardEvent) {
        match event {
            BoardEvent::RowInserted {
                label,
                percent,
                summary,
                position,
            } => self.inner.on_row_inserted(&label, percent, &summary, position),
            BoardEvent::RowUpdated {
                label,
                percent,
                summary,
                old_position,
                new_position,
            } => self
                .inner
                .on_row_updated(&label, percent, &summary, old_position, new_position),
            BoardEvent::RowRemoved { label, position } => {
                self.inner.on_row_removed(&label, position);
            }
            BoardEvent::BoardReset => self.inner.on_board_reset(),
            BoardEvent::BoardFinished => self.inner.on_board_finished(),
            BoardEvent::MainProgress { text, percent } => {
                self.inner.on_main_progress(&text, percent);
            }
            BoardEvent::LogMessage { message } => self.inner.on_log_message(&message),
        }
    }

    fn clone_box(&self) -> Box<dyn BoardEventEmitterPort> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        Observer {}

        impl BoardObserver for Observer {
            fn on_row_inserted(&self, label: &str, percent: u8, summary: &str, position: usize);
            fn on_row_updated(
                &self,
                label: &str,
                percent: u8,
                summary: &str,
                old_position: usize,
                new_position: usize,
            );
            fn on_board_reset(&self);
            fn on_board_finished(&self);
            fn on_row_removed(&self, label: &str, position: usize);
            fn on_main_progress(&self, text: &str, percent: Option<u8>);
            fn on_log_message(&self, message: &str);
        }
    }

    #[test]
    fn test_bridge_dispatches_row_events() {
        let mut observer = MockObserver::new();
        observer
            .expect_on_row_inserted()
            .with(eq("a"), eq(0u8), eq("0 B/s"), eq(0usize))
            .times(1)
            .return_const(());
        observer
            .expect_on_row_updated()
            .with(eq("a"), eq(100u8), eq("done"), eq(2usize), eq(0usize))
            .times(1)
            .return_const(());
        observer
            .expect_on_row_removed()
            .with(eq("a"), eq(0usize))
            .times(1)
            .return_const(());

        let bridge = ObserverBridge::new(Arc::new(observer));
        bridge.emit(BoardEvent::RowInserted {
            label: "a".to_string(),
            percent: 0,
            summary: "0 B/s".to_string(),
            position: 0,
        });
        bridge.emit(BoardEvent::RowUpdated {
            label: "a".to_string(),
            percent: 100,
            summary: "done".to_string(),
            old_position: 2,
            new_position: 0,
        });
        bridge.emit(BoardEvent::RowRemoved {
            label: "a".to_string(),
            position: 0,
        });
    }

    #[test]
    fn test_bridge_dispatches_lifecycle_events() {
        let mut observer = MockObserver::new();
        observer.expect_on_board_reset().times(1).return_const(());
        observer.expect_on_board_finished().times(1).return_const(());
        observer
            .expect_on_main_progress()
            .with(eq("Done"), eq(Some(100u8)))
            .times(1)
            .return_const(());
        observer
            .expect_on_log_message()
            .with(eq("fetched a"))
            .times(1)
            .return_const(());

        let bridge = ObserverBridge::new(Arc::new(observer));
        bridge.emit(BoardEvent::BoardReset);
        bridge.emit(BoardEvent::main_progress("Done", Some(100)));
        bridge.emit(BoardEvent::log_message("fetched a"));
        bridge.emit(BoardEvent::BoardFinished);
    }

    #[test]
    fn test_noop_observer_through_bridge() {
        let bridge = ObserverBridge::new(Arc::new(NoopBoardObserver));
        bridge.emit(BoardEvent::BoardReset);
        let _boxed = bridge.clone_box();
    }
}

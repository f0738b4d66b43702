//! Thread-safe board handle for synchronous hosts.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use waitboard_core::{
    BoardEventEmitterPort, BoardResult, BoardSettings, BoardSnapshot, ProgressSample,
};

use super::{BoardCommand, ProgressBoard};

/// A `ProgressBoard` behind a mutex, emitting to a host port.
///
/// Each call locks the board, applies one command and emits the resulting
/// events before unlocking, so hosts observe events in the order the board
/// applied them. Cloning shares the same board.
#[derive(Clone)]
pub struct SharedBoard {
    board: Arc<Mutex<ProgressBoard>>,
    emitter: Arc<dyn BoardEventEmitterPort>,
}

impl SharedBoard {
    /// Validate settings and create an empty shared board.
    pub fn new(
        settings: &BoardSettings,
        emitter: Arc<dyn BoardEventEmitterPort>,
    ) -> BoardResult<Self> {
        Ok(Self {
            board: Arc::new(Mutex::new(ProgressBoard::try_new(settings)?)),
            emitter,
        })
    }

    /// Apply a command and emit its events.
    pub fn apply(&self, command: BoardCommand) {
        let mut board = self.lock();
        for event in board.apply(command, Instant::now()) {
            self.emitter.emit(event);
        }
    }

    /// Record progress for `label`.
    pub fn update(&self, label: &str, remaining: u64, total: u64) {
        self.apply(BoardCommand::progress(label, remaining, total));
    }

    /// Record progress from signed counts.
    pub fn update_signed(&self, label: &str, remaining: i64, total: i64) {
        self.apply(BoardCommand::Progress {
            label: label.to_string(),
            sample: ProgressSample::from_signed(remaining, total),
        });
    }

    /// Drop a stream.
    pub fn remove(&self, label: &str) {
        self.apply(BoardCommand::Remove {
            label: label.to_string(),
        });
    }

    /// Clear every stream.
    pub fn reset(&self) {
        self.apply(BoardCommand::Reset);
    }

    /// Mark the batch finished.
    pub fn finish(&self) {
        self.apply(BoardCommand::Finish);
    }

    /// Current ordered view.
    pub fn snapshot(&self) -> BoardSnapshot {
        self.lock().snapshot()
    }

    fn lock(&self) -> MutexGuard<'_, ProgressBoard> {
        // Commands apply atomically; a poisoned board is still consistent
        self.board.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Board mutex poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }
}

impl std::fmt::Debug for SharedBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedBoard").finish_non_exhaustive()
    }
}

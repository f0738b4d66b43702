//! Serialized board runtime.
//!
//! Producers on any task send commands through a `ProgressReporter`; a
//! single runner task owns the `ProgressBoard`, applies commands in arrival
//! order, throttles row updates per label and forwards events to the host
//! port. Nothing outside the runner ever touches the board, so no locking is
//! needed.

mod emitter;

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use waitboard_core::{
    BoardError, BoardEvent, BoardEventEmitterPort, BoardResult, BoardSettings, BoardSnapshot,
    ProgressSample, RenderDelta,
};

use crate::board::{BoardCommand, ProgressBoard};
use crate::progress::LabelThrottle;

pub use emitter::ChannelBoardEmitter;

enum Message {
    Command(BoardCommand),
    Snapshot(oneshot::Sender<BoardSnapshot>),
    Shutdown,
}

/// Cloneable producer handle.
///
/// Sends never block and never fail from the producer's point of view: once
/// the runner has stopped, commands are dropped with a debug log.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    tx: mpsc::UnboundedSender<Message>,
}

impl ProgressReporter {
    /// Report progress for `label`.
    pub fn report_progress(&self, label: impl Into<String>, remaining: u64, total: u64) {
        self.send_command(BoardCommand::progress(label, remaining, total));
    }

    /// Report progress from signed counts (negative values clamp to zero).
    pub fn report_signed(&self, label: impl Into<String>, remaining: i64, total: i64) {
        self.send_command(BoardCommand::Progress {
            label: label.into(),
            sample: ProgressSample::from_signed(remaining, total),
        });
    }

    /// Drop a stream.
    pub fn remove(&self, label: impl Into<String>) {
        self.send_command(BoardCommand::Remove {
            label: label.into(),
        });
    }

    /// Clear every stream and the status line.
    pub fn reset(&self) {
        self.send_command(BoardCommand::Reset);
    }

    /// Mark the batch finished.
    pub fn finish(&self) {
        self.send_command(BoardCommand::Finish);
    }

    /// Show a parenthesised description in the status line.
    pub fn set_description(&self, message: impl Into<String>) {
        self.send_command(BoardCommand::Description {
            message: message.into(),
        });
    }

    /// Set the status line to a message and percentage.
    pub fn set_main_progress(&self, message: impl Into<String>, percent: u8) {
        self.send_command(BoardCommand::MainProgress {
            message: message.into(),
            percent,
        });
    }

    /// Drive the status line from overall byte counts.
    pub fn set_main_bytes(&self, remaining: u64, total: u64) {
        self.send_command(BoardCommand::MainBytes {
            sample: ProgressSample::new(remaining, total),
        });
    }

    /// Append a log line.
    pub fn add_log_message(&self, message: impl Into<String>) {
        self.send_command(BoardCommand::Log {
            message: message.into(),
        });
    }

    /// Switch the status line to indeterminate.
    pub fn set_indeterminate(&self) {
        self.send_command(BoardCommand::Indeterminate);
    }

    /// Queue an arbitrary command.
    pub fn send_command(&self, command: BoardCommand) {
        if self.tx.send(Message::Command(command)).is_err() {
            tracing::debug!("Board runner stopped, dropping command");
        }
    }

    /// Ordered view of the board after every previously sent command.
    pub async fn snapshot(&self) -> BoardResult<BoardSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Message::Snapshot(reply))
            .map_err(|_| BoardError::RunnerStopped)?;
        rx.await.map_err(|_| BoardError::RunnerStopped)
    }

    /// Whether the runner has stopped accepting commands.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Owner of a running board task.
#[derive(Debug)]
pub struct BoardHandle {
    reporter: ProgressReporter,
    task: JoinHandle<BoardSnapshot>,
}

impl BoardHandle {
    /// A new producer handle.
    pub fn reporter(&self) -> ProgressReporter {
        self.reporter.clone()
    }

    /// Stop the runner after it drains queued commands.
    ///
    /// Suppressed updates are flushed to the host first. Returns the final
    /// snapshot.
    pub async fn shutdown(self) -> BoardResult<BoardSnapshot> {
        if self.reporter.tx.send(Message::Shutdown).is_err() {
            tracing::debug!("Board runner already stopped");
        }
        drop(self.reporter);

        self.task.await.map_err(|e| {
            tracing::error!(error = %e, "Board runner task failed");
            BoardError::RunnerStopped
        })
    }
}

/// Spawns the task that owns a `ProgressBoard`.
pub struct BoardRunner {
    board: ProgressBoard,
    throttle: LabelThrottle,
    emitter: Arc<dyn BoardEventEmitterPort>,
    update_interval: Duration,
}

impl BoardRunner {
    /// Validate settings and spawn the runner on the current tokio runtime.
    pub fn spawn(
        settings: &BoardSettings,
        emitter: Arc<dyn BoardEventEmitterPort>,
    ) -> BoardResult<BoardHandle> {
        let board = ProgressBoard::try_new(settings)?;
        let update_interval = settings.effective_update_interval();
        let runner = Self {
            board,
            throttle: LabelThrottle::new(update_interval),
            emitter,
            update_interval,
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(runner.run(rx));

        tracing::debug!(?update_interval, "Board runner started");

        Ok(BoardHandle {
            reporter: ProgressReporter { tx },
            task,
        })
    }

    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Message>) -> BoardSnapshot {
        // Periodic flush so a producer that stalls after a suppressed update
        // does not leave a stale row on screen.
        let mut ticker = (!self.update_interval.is_zero()).then(|| {
            let mut ticker = interval(self.update_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });

        loop {
            tokio::select! {
                message = rx.recv() => match message {
                    Some(Message::Command(command)) => self.handle(command),
                    Some(Message::Snapshot(reply)) => {
                        let _ = reply.send(self.board.snapshot());
                    }
                    Some(Message::Shutdown) => {
                        tracing::debug!("Board runner shutting down");
                        break;
                    }
                    None => {
                        tracing::debug!("All reporters dropped, board runner exiting");
                        break;
                    }
                },
                () = tick(ticker.as_mut()) => self.flush_pending(),
            }
        }

        self.flush_pending();
        self.board.snapshot()
    }

    fn handle(&mut self, command: BoardCommand) {
        if matches!(command, BoardCommand::Finish) {
            self.flush_pending();
        }

        let now = Instant::now();
        for event in self.board.apply(command, now) {
            if self.throttle.admit(&event, now) {
                self.emitter.emit(event);
            }
        }
    }

    /// Emit the current state of every row with a suppressed update.
    ///
    /// Rows are re-read from the board so positions are current even if other
    /// rows moved since the update was suppressed.
    fn flush_pending(&mut self) {
        for pending in self.throttle.drain_pending() {
            let Some(label) = pending.label() else {
                continue;
            };
            let (Some(stream), Some(position)) =
                (self.board.stream(label), self.board.position_of(label))
            else {
                continue;
            };
            let event: BoardEvent = RenderDelta::Updated {
                row: stream.row(),
                old_position: position,
                new_position: position,
            }
            .into();
            self.emitter.emit(event);
        }
    }
}

async fn tick(ticker: Option<&mut tokio::time::Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

//! Ordering engine, progress board and runtime for waitboard.
//!
//! # Modules
//!
//! - `ordering` - Display order state machine (`OrderingEngine`)
//! - `board` - The `ProgressBoard` facade, commands and `SharedBoard`
//! - `progress` - Per-label update throttling
//! - `runtime` - Single-owner async runner (`BoardRunner`, `ProgressReporter`)
//!
//! # Example
//!
//! ```rust
//! use waitboard_engine::{ProgressBoard, RenderDelta};
//!
//! let mut board = ProgressBoard::default();
//! board.update("a.bin", 100, 100);
//! board.update("b.bin", 50, 100);
//!
//! let delta = board.update("b.bin", 0, 100);
//! assert!(matches!(delta, RenderDelta::Updated { old_position: 1, new_position: 0, .. }));
//! ```

#![deny(unused_crate_dependencies)]

// Re-export core types for convenience
pub use waitboard_core::{
    BoardError, BoardEvent, BoardEventEmitterPort, BoardObserver, BoardResult, BoardSettings,
    BoardSnapshot, InsertionEdge, MainStatus, NoopBoardEmitter, ObserverBridge, ProgressSample,
    RenderDelta, RowView,
};

pub mod ordering;
pub use ordering::{Direction, Move, OrderingEngine};

mod board;
pub use board::{BoardCommand, ProgressBoard, SharedBoard};

// Re-export the throttle for hosts that drive a board themselves
pub(crate) mod progress;
pub use progress::{LabelThrottle, ProgressThrottle};

mod runtime;
pub use runtime::{BoardHandle, BoardRunner, ChannelBoardEmitter, ProgressReporter};

#[cfg(test)]
use mockall as _;

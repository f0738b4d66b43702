//! Core domain types and ports for waitboard.
//!
//! waitboard tracks many concurrently progressing streams (downloads,
//! installs, copies), estimates their throughput and keeps a display order in
//! which completed streams collect at the top and active streams stay
//! together below them.
//!
//! This crate holds the pure pieces: rate estimation, per-stream state,
//! events and snapshots handed to hosts, the host ports, and settings. The
//! ordering engine and board runtime live in `waitboard-engine`.

#![deny(unused_crate_dependencies)]

pub mod board;
pub mod ports;
pub mod rate;
pub mod settings;

// Re-export commonly used types for convenience
pub use board::{
    BoardError, BoardEvent, BoardResult, BoardSnapshot, Crossing, MainStatus, ProgressSample,
    RenderDelta, RowView, StreamState, completion_percent,
};
pub use ports::{
    BoardEventEmitterPort, BoardObserver, NoopBoardEmitter, NoopBoardObserver, ObserverBridge,
};
pub use rate::{DEFAULT_SMOOTHING_WINDOW, RateEstimator, format_bytes, format_eta, format_rate};
pub use settings::{
    BoardSettings, DEFAULT_SMOOTHING_WINDOW_MS, DEFAULT_UPDATE_INTERVAL_MS, InsertionEdge,
    SettingsError, validate_settings,
};

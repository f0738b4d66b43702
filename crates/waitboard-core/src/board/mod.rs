//! Board domain types, events, errors and per-stream state.
//!
//! Pure data types with no I/O or runtime dependencies.
//!
//! # Structure
//!
//! - `sample` - Clamped progress samples (`ProgressSample`)
//! - `stream` - Per-stream state (`StreamState`, `Crossing`)
//! - `events` - Render deltas and host events (`RenderDelta`, `BoardEvent`)
//! - `snapshot` - Snapshot DTOs (`BoardSnapshot`, `MainStatus`)
//! - `errors` - Error types for host-side operations

pub mod errors;
pub mod events;
pub mod sample;
pub mod snapshot;
pub mod stream;

pub use errors::{BoardError, BoardResult};
pub use events::{BoardEvent, RenderDelta, RowView};
pub use sample::{ProgressSample, completion_percent};
pub use snapshot::{BoardSnapshot, DEFAULT_DONE_TEXT, DEFAULT_WAIT_TEXT, MainStatus};
pub use stream::{Crossing, StreamState};

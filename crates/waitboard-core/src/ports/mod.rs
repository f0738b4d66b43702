//! Ports between the tracking engine and its host.
//!
//! The engine never renders; it hands `BoardEvent`s to a port and the host
//! applies them on whatever context owns its visible surface.

mod event_emitter;
mod observer;

pub use event_emitter::{BoardEventEmitterPort, NoopBoardEmitter};
pub use observer::{BoardObserver, NoopBoardObserver, ObserverBridge};

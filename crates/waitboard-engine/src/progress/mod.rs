//! Progress throttling.
//!
//! This module handles rate-limiting of row update events before they reach
//! the host.

mod throttle;

pub use throttle::{LabelThrottle, ProgressThrottle};

//! Progress samples reported by producers.

use serde::{Deserialize, Serialize};

/// Compute an integer completion percentage in `[0, 100]`.
///
/// A `total` of zero means "unknown size" and always yields 0.
#[allow(clippy::cast_possible_truncation)]
pub fn completion_percent(remaining: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let done = u128::from(total.saturating_sub(remaining));
    // done <= total, so the quotient is at most 100
    ((done * 100) / u128::from(total)).min(100) as u8
}

/// One `(bytes_remaining, total_bytes)` observation for a stream.
///
/// Construction clamps `remaining` into `[0, total]` whenever the total is
/// known, so every sample held by the board is internally consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSample {
    /// Bytes still to transfer.
    pub remaining: u64,
    /// Total bytes, or 0 when the size is unknown.
    pub total: u64,
}

impl ProgressSample {
    /// Create a sample, clamping `remaining` to `total` when the total is known.
    pub fn new(remaining: u64, total: u64) -> Self {
        let clamped = if total > 0 && remaining > total {
            tracing::trace!(remaining, total, "Clamping remaining bytes to total");
            total
        } else {
            remaining
        };
        Self {
            remaining: clamped,
            total,
        }
    }

    /// Create a sample from signed producer counters.
    ///
    /// Negative values are clamped to zero before the usual clamping applies.
    #[allow(clippy::cast_sign_loss)]
    pub fn from_signed(remaining: i64, total: i64) -> Self {
        Self::new(remaining.max(0) as u64, total.max(0) as u64)
    }

    /// Whether the producer did not know the total size.
    pub const fn is_unknown_size(&self) -> bool {
        self.total == 0
    }

    /// Bytes already transferred (0 for unknown sizes).
    pub const fn transferred(&self) -> u64 {
        self.total.saturating_sub(self.remaining)
    }

    /// Completion percentage in `[0, 100]`.
    pub fn percent(&self) -> u8 {
        completion_percent(self.remaining, self.total)
    }
}

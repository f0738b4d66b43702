//! Byte-rate estimation for a single stream.
//!
//! The estimator keeps a smoothed bytes-per-second figure fed by successive
//! `(remaining, total, instant)` samples. Smoothing is time-weighted: a sample
//! taken `elapsed` after the previous one contributes
//! `min(1, elapsed / smoothing_window)` of the new instantaneous rate, so the
//! estimate reacts the same way whether producers report every few
//! milliseconds or every few seconds.

mod format;

use std::time::{Duration, Instant};

pub use format::{format_bytes, format_eta, format_rate};

use crate::board::completion_percent;

/// Default smoothing window for rate estimation.
pub const DEFAULT_SMOOTHING_WINDOW: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy)]
struct LastSample {
    at: Instant,
    remaining: u64,
}

/// Smoothed byte-rate and ETA estimator for one stream.
///
/// Lifecycle: created stopped, `start()`ed when the stream is registered and
/// `stop()`ped once the stream reaches 100%. A stopped estimator ignores
/// samples and keeps its last values.
#[derive(Debug, Clone)]
pub struct RateEstimator {
    bytes_remaining: u64,
    total_bytes: u64,
    bytes_per_second: f64,
    last_sample: Option<LastSample>,
    smoothing_window: Duration,
    running: bool,
}

impl RateEstimator {
    /// Create a stopped estimator with the given smoothing window.
    pub const fn new(smoothing_window: Duration) -> Self {
        Self {
            bytes_remaining: 0,
            total_bytes: 0,
            bytes_per_second: 0.0,
            last_sample: None,
            smoothing_window,
            running: false,
        }
    }

    /// Start accepting samples. Calling this on a running estimator does nothing.
    pub const fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.last_sample = None;
            self.bytes_per_second = 0.0;
        }
    }

    /// Freeze the estimator; further samples are ignored.
    pub const fn stop(&mut self) {
        self.running = false;
    }

    /// Whether samples are currently accepted.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Record a new observation.
    ///
    /// The first sample after `start()` establishes the baseline with zero
    /// throughput. Bytes consumed are clamped at zero, so retried or
    /// out-of-order samples never produce a negative rate.
    #[allow(clippy::cast_precision_loss)]
    pub fn sample(&mut self, remaining: u64, total: u64, now: Instant) {
        if !self.running {
            return;
        }

        let remaining = if total > 0 { remaining.min(total) } else { remaining };
        self.bytes_remaining = remaining;
        self.total_bytes = total;

        let Some(last) = self.last_sample else {
            self.bytes_per_second = 0.0;
            self.last_sample = Some(LastSample { at: now, remaining });
            return;
        };

        let elapsed = now.saturating_duration_since(last.at);
        if elapsed.is_zero() {
            // Keep the previous baseline; the bytes count toward the next sample
            return;
        }

        let consumed = last.remaining.saturating_sub(remaining);
        let elapsed_secs = elapsed.as_secs_f64();
        let instant_rate = consumed as f64 / elapsed_secs;
        let weight = if self.smoothing_window.is_zero() {
            1.0
        } else {
            (elapsed_secs / self.smoothing_window.as_secs_f64()).min(1.0)
        };

        self.bytes_per_second = weight.mul_add(instant_rate, (1.0 - weight) * self.bytes_per_second);
        self.last_sample = Some(LastSample { at: now, remaining });
    }

    /// Last known remaining bytes.
    pub const fn bytes_remaining(&self) -> u64 {
        self.bytes_remaining
    }

    /// Last known total bytes (0 = unknown).
    pub const fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Smoothed throughput in bytes per second.
    pub const fn bytes_per_second(&self) -> f64 {
        self.bytes_per_second
    }

    /// Completion percentage from the last accepted sample.
    pub fn percent(&self) -> u8 {
        completion_percent(self.bytes_remaining, self.total_bytes)
    }

    /// Estimated time until `bytes_remaining` reaches zero.
    ///
    /// `None` when the size is unknown or no throughput has been observed.
    #[allow(clippy::cast_precision_loss)]
    pub fn eta(&self) -> Option<Duration> {
        if self.total_bytes == 0 {
            return None;
        }
        if self.bytes_remaining == 0 {
            return Some(Duration::ZERO);
        }
        if self.bytes_per_second <= 0.0 || !self.bytes_per_second.is_finite() {
            return None;
        }
        Duration::try_from_secs_f64(self.bytes_remaining as f64 / self.bytes_per_second).ok()
    }

    /// Human-readable rate and ETA, e.g. `"1.5 MiB/s - 2:10 left"`.
    pub fn summary(&self) -> String {
        if !self.running && self.total_bytes > 0 && self.percent() >= 100 {
            return format!("{} - complete", format_bytes(self.total_bytes));
        }

        let rate = format_rate(self.bytes_per_second);
        if self.total_bytes == 0 {
            return format!("{rate} - unknown size");
        }
        self.eta().map_or_else(
            || format!("{rate} - time left unknown"),
            |eta| format!("{rate} - {} left", format_eta(eta)),
        )
    }
}

impl Default for RateEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(window: Duration) -> RateEstimator {
        let mut estimator = RateEstimator::new(window);
        estimator.start();
        estimator
    }

    #[test]
    fn test_new_estimator_is_stopped() {
        let mut estimator = RateEstimator::default();
        assert!(!estimator.is_running());

        estimator.sample(10, 100, Instant::now());
        assert_eq!(estimator.total_bytes(), 0);
    }

    #[test]
    fn test_first_sample_has_zero_rate() {
        let mut estimator = started(Duration::from_secs(1));
        estimator.sample(900, 1000, Instant::now());

        assert!(estimator.bytes_per_second().abs() < f64::EPSILON);
        assert_eq!(estimator.percent(), 10);
        assert_eq!(estimator.summary(), "0 B/s - time left unknown");
    }

    #[test]
    fn test_full_weight_after_window_elapsed() {
        let t0 = Instant::now();
        let mut estimator = started(Duration::from_secs(1));
        estimator.sample(1000, 1000, t0);
        estimator.sample(0, 1000, t0 + Duration::from_secs(2));

        // 1000 bytes over 2 s with weight clamped to 1
        assert!((estimator.bytes_per_second() - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_weight_blends_previous_rate() {
        let t0 = Instant::now();
        let mut estimator = started(Duration::from_secs(4));
        estimator.sample(10_000, 10_000, t0);
        estimator.sample(6_000, 10_000, t0 + Duration::from_secs(4)); // 1000 B/s, weight 1
        estimator.sample(4_000, 10_000, t0 + Duration::from_secs(5)); // 2000 B/s, weight 0.25

        let expected = 0.25f64.mul_add(2000.0, 0.75 * 1000.0);
        assert!((estimator.bytes_per_second() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_remaining_increase_is_clamped_to_zero_consumption() {
        let t0 = Instant::now();
        let mut estimator = started(Duration::from_secs(1));
        estimator.sample(100, 1000, t0);
        estimator.sample(500, 1000, t0 + Duration::from_secs(1));

        assert!(estimator.bytes_per_second().abs() < f64::EPSILON);
        assert_eq!(estimator.bytes_remaining(), 500);
    }

    #[test]
    fn test_zero_elapsed_defers_rate_update() {
        let t0 = Instant::now();
        let mut estimator = started(Duration::from_secs(1));
        estimator.sample(1000, 1000, t0);
        estimator.sample(800, 1000, t0);
        assert_eq!(estimator.bytes_remaining(), 800);
        assert!(estimator.bytes_per_second().abs() < f64::EPSILON);

        estimator.sample(600, 1000, t0 + Duration::from_secs(1));
        // Both the 200 bytes of the zero-elapsed sample and the next 200 count
        assert!((estimator.bytes_per_second() - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_eta_and_summary() {
        let t0 = Instant::now();
        let mut estimator = started(Duration::from_secs(1));
        estimator.sample(3072, 4096, t0);
        estimator.sample(2048, 4096, t0 + Duration::from_secs(1));

        assert_eq!(estimator.eta(), Some(Duration::from_secs(2)));
        assert_eq!(estimator.summary(), "1.0 KiB/s - 0:02 left");
    }

    #[test]
    fn test_unknown_size_summary() {
        let t0 = Instant::now();
        let mut estimator = started(Duration::from_secs(1));
        estimator.sample(10, 0, t0);

        assert_eq!(estimator.percent(), 0);
        assert_eq!(estimator.eta(), None);
        assert!(estimator.summary().contains("unknown size"));
    }

    #[test]
    fn test_stop_freezes_samples() {
        let t0 = Instant::now();
        let mut estimator = started(Duration::from_secs(1));
        estimator.sample(0, 2048, t0);
        estimator.stop();
        estimator.sample(1024, 2048, t0 + Duration::from_secs(1));

        assert_eq!(estimator.bytes_remaining(), 0);
        assert_eq!(estimator.percent(), 100);
        assert_eq!(estimator.summary(), "2.0 KiB - complete");
    }

    #[test]
    fn test_start_is_idempotent() {
        let t0 = Instant::now();
        let mut estimator = started(Duration::from_secs(1));
        estimator.sample(1000, 1000, t0);
        estimator.sample(0, 1000, t0 + Duration::from_secs(1));
        let rate = estimator.bytes_per_second();

        estimator.start();
        assert!(estimator.is_running());
        assert!((estimator.bytes_per_second() - rate).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_smoothing_window_uses_instant_rate() {
        let t0 = Instant::now();
        let mut estimator = started(Duration::ZERO);
        estimator.sample(1000, 1000, t0);
        estimator.sample(900, 1000, t0 + Duration::from_millis(100));

        assert!((estimator.bytes_per_second() - 1000.0).abs() < 1e-6);
    }
}

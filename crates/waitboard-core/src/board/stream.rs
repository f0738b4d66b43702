//! Per-stream progress state.

use std::time::{Duration, Instant};

use super::events::RowView;
use super::sample::ProgressSample;
use crate::rate::{RateEstimator, format_rate};

/// How a sample moved a stream relative to the 100% boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    /// Completion stayed on the same side of 100%.
    None,
    /// The stream just reached 100%.
    Completed,
    /// The stream dropped back below 100% (should not normally happen).
    Reopened,
}

/// Mutable record for one tracked stream.
///
/// The stream owns its `RateEstimator` exclusively. Its display position is
/// not stored here; that belongs to the ordering engine.
#[derive(Debug, Clone)]
pub struct StreamState {
    label: String,
    completion_percent: u8,
    rate: RateEstimator,
}

impl StreamState {
    /// Create a stream with a fresh, started estimator.
    pub fn new(label: impl Into<String>, smoothing_window: Duration) -> Self {
        let mut rate = RateEstimator::new(smoothing_window);
        rate.start();
        Self {
            label: label.into(),
            completion_percent: 0,
            rate,
        }
    }

    /// Apply a sample and report whether the 100% boundary was crossed.
    ///
    /// Unknown-size samples feed the estimator (so the summary stays live)
    /// but leave the completion percentage untouched: without a total there
    /// is no completion signal to reorder on.
    pub fn apply(&mut self, sample: ProgressSample, now: Instant) -> Crossing {
        self.rate.sample(sample.remaining, sample.total, now);

        if sample.is_unknown_size() {
            return Crossing::None;
        }

        let was_complete = self.is_complete();
        self.completion_percent = sample.percent();
        let is_complete = self.is_complete();

        if is_complete {
            self.rate.stop();
        }

        match (was_complete, is_complete) {
            (false, true) => Crossing::Completed,
            (true, false) => Crossing::Reopened,
            _ => Crossing::None,
        }
    }

    /// Stop the estimator (board reset or teardown).
    pub const fn stop(&mut self) {
        self.rate.stop();
    }

    /// The stream's label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Last known completion percentage in `[0, 100]`.
    ///
    /// Unknown-size samples do not change it, so after a `total == 0` sample
    /// this is the percentage from the last sample that carried a total.
    pub const fn percent(&self) -> u8 {
        self.completion_percent
    }

    /// Whether the stream has reached 100%.
    pub const fn is_complete(&self) -> bool {
        self.completion_percent >= 100
    }

    /// The stream's rate estimator.
    pub const fn rate(&self) -> &RateEstimator {
        &self.rate
    }

    /// Rate and ETA text for display.
    ///
    /// A reopened stream keeps its frozen estimator; its text reports the
    /// last rate with an unknown time left instead of "complete".
    pub fn summary(&self) -> String {
        if !self.is_complete() && !self.rate.is_running() {
            return format!(
                "{} - time left unknown",
                format_rate(self.rate.bytes_per_second())
            );
        }
        self.rate.summary()
    }

    /// Render-ready view of this stream.
    pub fn row(&self) -> RowView {
        RowView {
            label: self.label.clone(),
            percent: self.completion_percent,
            summary: self.summary(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream() -> StreamState {
        StreamState::new("file.bin", Duration::from_secs(1))
    }

    #[test]
    fn test_new_stream_is_running_and_empty() {
        let s = stream();
        assert_eq!(s.label(), "file.bin");
        assert_eq!(s.percent(), 0);
        assert!(s.rate().is_running());
    }

    #[test]
    fn test_reaching_full_completes_and_stops() {
        let mut s = stream();
        let t0 = Instant::now();
        assert_eq!(s.apply(ProgressSample::new(50, 100), t0), Crossing::None);
        assert_eq!(
            s.apply(ProgressSample::new(0, 100), t0 + Duration::from_secs(1)),
            Crossing::Completed
        );
        assert!(s.is_complete());
        assert!(!s.rate().is_running());
    }

    #[test]
    fn test_repeated_full_sample_is_not_a_new_crossing() {
        let mut s = stream();
        let t0 = Instant::now();
        s.apply(ProgressSample::new(0, 100), t0);
        assert_eq!(s.apply(ProgressSample::new(0, 100), t0), Crossing::None);
    }

    #[test]
    fn test_dropping_below_full_reopens() {
        let mut s = stream();
        let t0 = Instant::now();
        s.apply(ProgressSample::new(0, 100), t0);
        assert_eq!(s.apply(ProgressSample::new(40, 100), t0), Crossing::Reopened);
        assert_eq!(s.percent(), 60);
        // Estimator stays frozen once completed
        assert!(!s.rate().is_running());
    }

    #[test]
    fn test_reopened_row_does_not_claim_complete() {
        let mut s = stream();
        let t0 = Instant::now();
        s.apply(ProgressSample::new(100, 100), t0);
        s.apply(ProgressSample::new(0, 100), t0 + Duration::from_secs(1));
        assert!(s.summary().ends_with("complete"));

        s.apply(ProgressSample::new(40, 100), t0 + Duration::from_secs(2));
        let row = s.row();
        assert_eq!(row.percent, 60);
        assert!(!row.summary.contains("complete"), "{}", row.summary);
        assert!(row.summary.ends_with("time left unknown"), "{}", row.summary);
    }

    #[test]
    fn test_unknown_size_keeps_percent() {
        let mut s = stream();
        let t0 = Instant::now();
        s.apply(ProgressSample::new(30, 100), t0);
        assert_eq!(s.apply(ProgressSample::new(10, 0), t0), Crossing::None);
        assert_eq!(s.percent(), 70);
        assert!(s.summary().contains("unknown size"));
    }

    #[test]
    fn test_unknown_size_only_stream_reports_zero() {
        let mut s = stream();
        s.apply(ProgressSample::new(10, 0), Instant::now());
        let row = s.row();
        assert_eq!(row.percent, 0);
        assert!(row.summary.contains("unknown size"));
    }
}

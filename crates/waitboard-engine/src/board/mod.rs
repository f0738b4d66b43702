//! The progress board facade.
//!
//! `ProgressBoard` owns every `StreamState`, keeps them in bijection with
//! the `OrderingEngine`, and turns each mutation into a `RenderDelta` for the
//! host. It is a sync type with no internal locking: wrap it in `SharedBoard`
//! or drive it from a `BoardRunner` to serialize access.

mod command;
mod shared;

use std::time::{Duration, Instant};

use indexmap::IndexMap;

use waitboard_core::{
    BoardResult, BoardSettings, BoardSnapshot, Crossing, InsertionEdge, MainStatus,
    ProgressSample, RateEstimator, RenderDelta, RowView, StreamState, validate_settings,
};

use crate::ordering::{Direction, OrderingEngine};

pub use command::BoardCommand;
pub use shared::SharedBoard;

/// Live state of all streams in one batch of work.
#[derive(Debug)]
pub struct ProgressBoard {
    smoothing_window: Duration,
    insertion_edge: InsertionEdge,
    wait_text: String,
    done_text: String,
    /// INVARIANT: keys are exactly the labels held by `ordering`.
    streams: IndexMap<String, StreamState>,
    ordering: OrderingEngine,
    main: MainStatus,
    main_rate: Option<RateEstimator>,
}

impl ProgressBoard {
    /// Create an empty board from settings (assumed valid).
    pub fn new(settings: &BoardSettings) -> Self {
        let wait_text = settings.effective_wait_text().to_string();
        Self {
            smoothing_window: settings.effective_smoothing_window(),
            insertion_edge: settings.effective_insertion_edge(),
            done_text: settings.effective_done_text().to_string(),
            streams: IndexMap::new(),
            ordering: OrderingEngine::new(),
            main: MainStatus::waiting(wait_text.clone()),
            main_rate: None,
            wait_text,
        }
    }

    /// Validate settings, then create an empty board.
    pub fn try_new(settings: &BoardSettings) -> BoardResult<Self> {
        validate_settings(settings)?;
        Ok(Self::new(settings))
    }

    /// Record progress for `label` at the current time.
    pub fn update(&mut self, label: &str, remaining: u64, total: u64) -> RenderDelta {
        self.update_at(label, remaining, total, Instant::now())
    }

    /// Record progress for `label` at an explicit instant.
    pub fn update_at(
        &mut self,
        label: &str,
        remaining: u64,
        total: u64,
        now: Instant,
    ) -> RenderDelta {
        self.apply_sample(label, ProgressSample::new(remaining, total), now)
    }

    /// Record an already-clamped sample.
    ///
    /// Unknown labels are registered on the fly; this is the normal way
    /// streams join the board.
    pub fn apply_sample(&mut self, label: &str, sample: ProgressSample, now: Instant) -> RenderDelta {
        if self.streams.contains_key(label) {
            self.update_existing(label, sample, now)
        } else {
            self.insert_new(label, sample, now)
        }
    }

    fn insert_new(&mut self, label: &str, sample: ProgressSample, now: Instant) -> RenderDelta {
        let mut stream = StreamState::new(label, self.smoothing_window);
        let crossing = stream.apply(sample, now);
        self.streams.insert(label.to_string(), stream);

        let streams = &self.streams;
        let is_complete = |l: &str| streams.get(l).is_some_and(StreamState::is_complete);

        // Completed rows occupy the top of the order, so the active block
        // starts right after the completed prefix.
        let mut position = match self.insertion_edge {
            InsertionEdge::ActiveTail => self.ordering.push_back(label),
            InsertionEdge::ActiveHead => {
                let head = self.ordering.completed_prefix_len(is_complete);
                self.ordering.insert_at(label, head)
            }
        };
        if crossing == Crossing::Completed {
            position = self
                .ordering
                .reposition(label, Direction::TowardCompleted, is_complete)
                .to;
        }

        tracing::debug!(label = %label, position, percent = sample.percent(), "Stream registered");

        RenderDelta::Inserted {
            row: self.row_for(label),
            position,
        }
    }

    fn update_existing(&mut self, label: &str, sample: ProgressSample, now: Instant) -> RenderDelta {
        let Some(old_position) = self.ordering.position_of(label) else {
            // Bijection violated: re-register rather than lose the row
            debug_assert!(false, "stream {label:?} missing from ordering");
            tracing::error!(label = %label, "BUG: tracked stream missing from ordering");
            self.streams.shift_remove(label);
            return self.insert_new(label, sample, now);
        };

        let crossing = self
            .streams
            .get_mut(label)
            .map_or(Crossing::None, |stream| stream.apply(sample, now));

        let direction = match crossing {
            Crossing::None => None,
            Crossing::Completed => Some(Direction::TowardCompleted),
            Crossing::Reopened => Some(Direction::TowardActive),
        };

        let new_position = direction.map_or(old_position, |direction| {
            let streams = &self.streams;
            let mv = self.ordering.reposition(label, direction, |l| {
                streams.get(l).is_some_and(StreamState::is_complete)
            });
            tracing::debug!(
                label = %label,
                from = mv.from,
                to = mv.to,
                ?direction,
                "Stream repositioned"
            );
            mv.to
        });

        RenderDelta::Updated {
            row: self.row_for(label),
            old_position,
            new_position,
        }
    }

    /// Drop a stream. Returns `None` for unknown labels.
    pub fn remove(&mut self, label: &str) -> Option<RenderDelta> {
        let mut stream = self.streams.shift_remove(label)?;
        stream.stop();
        let Some(position) = self.ordering.remove(label) else {
            debug_assert!(false, "stream {label:?} missing from ordering");
            tracing::error!(label = %label, "BUG: removed stream missing from ordering");
            return None;
        };

        tracing::debug!(label = %label, position, "Stream removed");
        Some(RenderDelta::Removed {
            label: label.to_string(),
            position,
        })
    }

    /// Stop every estimator and clear all rows and status. Idempotent.
    pub fn reset(&mut self) {
        let count = self.streams.len();
        for stream in self.streams.values_mut() {
            stream.stop();
        }
        self.streams.clear();
        self.ordering.clear();
        self.main = MainStatus::waiting(self.wait_text.clone());
        self.main_rate = None;
        tracing::info!(streams = count, "Board reset");
    }

    /// Mark the batch finished without clearing rows.
    pub fn finish(&mut self) {
        self.main.finish(self.done_text.clone());
        if let Some(rate) = self.main_rate.as_mut() {
            rate.stop();
        }
        tracing::info!(
            streams = self.streams.len(),
            completed = self.completed_count(),
            "Board finished"
        );
    }

    /// Whether `finish` was called since the last reset.
    pub const fn is_finished(&self) -> bool {
        self.main.finished
    }

    // ---- Main status ----

    /// Show a parenthesised description in the status line.
    pub fn set_description(&mut self, message: &str) {
        self.main.set_description(message);
    }

    /// Set the status line to `"{message} - {percent}%"`.
    ///
    /// Returns `true` when the message was new and appended to the log.
    pub fn set_main_progress(&mut self, message: &str, percent: u8) -> bool {
        self.main.set_progress(message, percent)
    }

    /// Drive the status line from overall byte counts.
    pub fn set_main_bytes(&mut self, sample: ProgressSample, now: Instant) {
        let smoothing_window = self.smoothing_window;
        let rate = self.main_rate.get_or_insert_with(|| {
            let mut rate = RateEstimator::new(smoothing_window);
            rate.start();
            rate
        });
        rate.sample(sample.remaining, sample.total, now);
        let percent = (!sample.is_unknown_size()).then(|| rate.percent());
        self.main.set_status(rate.summary(), percent);
    }

    /// Append a log line.
    pub fn add_log_message(&mut self, message: &str) {
        self.main.push_log(message);
    }

    /// Switch the status line to indeterminate progress.
    pub const fn set_indeterminate(&mut self) {
        self.main.set_indeterminate();
    }

    /// Overall status.
    pub const fn main_status(&self) -> &MainStatus {
        &self.main
    }

    // ---- Queries ----

    /// Number of tracked streams.
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// Check if no streams are tracked.
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Check if a label is tracked.
    pub fn contains(&self, label: &str) -> bool {
        self.streams.contains_key(label)
    }

    /// Display position of a label.
    pub fn position_of(&self, label: &str) -> Option<usize> {
        self.ordering.position_of(label)
    }

    /// Get a stream by label.
    pub fn stream(&self, label: &str) -> Option<&StreamState> {
        self.streams.get(label)
    }

    /// Labels in display order.
    pub fn labels(&self) -> &[String] {
        self.ordering.labels()
    }

    /// Labels in first-seen order.
    pub fn labels_by_arrival(&self) -> impl Iterator<Item = &str> {
        self.streams.keys().map(String::as_str)
    }

    /// Number of streams at 100%.
    pub fn completed_count(&self) -> usize {
        self.streams.values().filter(|s| s.is_complete()).count()
    }

    /// Rows in display order.
    pub fn rows(&self) -> impl Iterator<Item = RowView> + '_ {
        self.ordering
            .labels()
            .iter()
            .filter_map(|label| self.streams.get(label).map(StreamState::row))
    }

    /// Full ordered view of the board.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            rows: self.rows().collect(),
            main: self.main.clone(),
        }
    }

    fn row_for(&self, label: &str) -> RowView {
        self.streams.get(label).map_or_else(
            || RowView {
                label: label.to_string(),
                percent: 0,
                summary: String::new(),
            },
            StreamState::row,
        )
    }

    /// Check bijection, contiguity and the completed-prefix layout.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        self.ordering.assert_consistent();
        assert_eq!(self.ordering.len(), self.streams.len());
        for label in self.ordering.labels() {
            assert!(self.streams.contains_key(label), "{label} has no stream");
        }
        let completed = self.completed_count();
        for (i, label) in self.ordering.labels().iter().enumerate() {
            let complete = self.streams[label].is_complete();
            assert_eq!(complete, i < completed, "{label} at {i} breaks the completed block");
        }
    }
}

impl Default for ProgressBoard {
    fn default() -> Self {
        Self::new(&BoardSettings::with_defaults())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> ProgressBoard {
        ProgressBoard::default()
    }

    fn order(board: &ProgressBoard) -> Vec<&str> {
        board.labels().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_first_update_inserts_row() {
        let mut b = board();
        let delta = b.update("a", 100, 100);

        match delta {
            RenderDelta::Inserted { row, position } => {
                assert_eq!(row.label, "a");
                assert_eq!(row.percent, 0);
                assert_eq!(position, 0);
            }
            other => panic!("Expected Inserted, got {other:?}"),
        }
        b.assert_invariants();
    }

    #[test]
    fn test_second_update_routes_to_update_path() {
        let mut b = board();
        b.update("a", 100, 100);
        let delta = b.update("a", 40, 100);

        assert_eq!(
            delta,
            RenderDelta::Updated {
                row: b.stream("a").unwrap().row(),
                old_position: 0,
                new_position: 0,
            }
        );
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_completed_stream_moves_to_top() {
        let mut b = board();
        let t0 = Instant::now();
        b.update_at("a", 100, 100, t0);
        b.update_at("b", 50, 100, t0);
        let delta = b.update_at("b", 0, 100, t0 + Duration::from_secs(1));

        assert!(matches!(
            delta,
            RenderDelta::Updated {
                old_position: 1,
                new_position: 0,
                ..
            }
        ));
        assert_eq!(order(&b), ["b", "a"]);
        b.assert_invariants();
    }

    #[test]
    fn test_new_stream_appended_after_active_rows() {
        let mut b = board();
        b.update("a", 0, 100);
        b.update("b", 50, 100);
        let delta = b.update("c", 90, 100);

        assert!(matches!(delta, RenderDelta::Inserted { position: 2, .. }));
        assert_eq!(order(&b), ["a", "b", "c"]);
        b.assert_invariants();
    }

    #[test]
    fn test_active_head_insertion() {
        let settings = BoardSettings {
            insertion_edge: Some(InsertionEdge::ActiveHead),
            ..BoardSettings::with_defaults()
        };
        let mut b = ProgressBoard::new(&settings);
        b.update("a", 0, 100);
        b.update("b", 50, 100);
        let delta = b.update("c", 90, 100);

        assert!(matches!(delta, RenderDelta::Inserted { position: 1, .. }));
        assert_eq!(order(&b), ["a", "c", "b"]);
        b.assert_invariants();
    }

    #[test]
    fn test_already_complete_new_stream_joins_completed_block() {
        let mut b = board();
        b.update("a", 0, 100);
        b.update("b", 50, 100);
        let delta = b.update("c", 0, 100);

        assert!(matches!(delta, RenderDelta::Inserted { position: 1, .. }));
        assert_eq!(order(&b), ["a", "c", "b"]);
        assert!(!b.stream("c").unwrap().rate().is_running());
        b.assert_invariants();
    }

    #[test]
    fn test_reopened_stream_moves_below_completed_block() {
        let mut b = board();
        b.update("a", 0, 100);
        b.update("b", 0, 100);
        b.update("c", 50, 100);
        let delta = b.update("a", 20, 100);

        assert!(matches!(
            delta,
            RenderDelta::Updated {
                old_position: 0,
                new_position: 1,
                ..
            }
        ));
        assert_eq!(order(&b), ["b", "a", "c"]);
        b.assert_invariants();
    }

    #[test]
    fn test_reopened_row_pairs_percent_with_live_summary() {
        let mut b = board();
        b.update("a", 0, 100);
        let RenderDelta::Updated { row, .. } = b.update("a", 40, 100) else {
            panic!("expected an update delta");
        };

        assert_eq!(row.percent, 60);
        assert!(!row.summary.contains("complete"), "{}", row.summary);
    }

    #[test]
    fn test_unknown_size_never_reorders() {
        let mut b = board();
        b.update("x", 10, 0);
        b.update("y", 50, 100);
        for remaining in [8, 5, 0] {
            let delta = b.update("x", remaining, 0);
            assert!(!delta.is_structural());
        }
        b.update("y", 0, 100);

        assert_eq!(order(&b), ["y", "x"]);
        assert_eq!(b.stream("x").unwrap().percent(), 0);
        b.assert_invariants();
    }

    #[test]
    fn test_remove_keeps_bijection() {
        let mut b = board();
        b.update("a", 0, 100);
        b.update("b", 50, 100);
        b.update("c", 50, 100);

        let delta = b.remove("b");
        assert_eq!(
            delta,
            Some(RenderDelta::Removed {
                label: "b".to_string(),
                position: 1,
            })
        );
        assert_eq!(order(&b), ["a", "c"]);
        assert!(b.remove("b").is_none());
        b.assert_invariants();
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut b = board();
        b.update("a", 0, 100);
        b.set_main_progress("Downloading", 50);

        b.reset();
        assert!(b.is_empty());
        assert!(b.snapshot().is_empty());
        assert_eq!(b.main_status().percent, None);
        assert!(b.main_status().log.is_empty());

        b.reset();
        assert!(b.is_empty());
        b.assert_invariants();
    }

    #[test]
    fn test_finish_keeps_rows() {
        let mut b = board();
        b.update("a", 10, 100);
        b.finish();

        assert!(b.is_finished());
        assert_eq!(b.len(), 1);
        assert_eq!(b.main_status().text, "Done");
        assert_eq!(b.main_status().percent, Some(100));

        // Updates after finish are still applied
        b.update("a", 0, 100);
        assert_eq!(b.stream("a").unwrap().percent(), 100);
    }

    #[test]
    fn test_main_bytes_drive_status_line() {
        let mut b = board();
        let t0 = Instant::now();
        b.set_main_bytes(ProgressSample::new(1000, 1000), t0);
        b.set_main_bytes(ProgressSample::new(500, 1000), t0 + Duration::from_secs(5));

        assert_eq!(b.main_status().percent, Some(50));
        assert!(b.main_status().text.ends_with("left"));

        b.set_main_bytes(ProgressSample::new(10, 0), t0 + Duration::from_secs(6));
        assert_eq!(b.main_status().percent, None);
    }

    #[test]
    fn test_try_new_rejects_invalid_settings() {
        let settings = BoardSettings {
            smoothing_window_ms: Some(1),
            ..Default::default()
        };
        assert!(ProgressBoard::try_new(&settings).is_err());
    }

    #[test]
    fn test_labels_by_arrival_differs_from_display_order() {
        let mut b = board();
        b.update("a", 50, 100);
        b.update("b", 0, 100);

        assert_eq!(order(&b), ["b", "a"]);
        assert_eq!(b.labels_by_arrival().collect::<Vec<_>>(), ["a", "b"]);
    }
}

//! Progress throttling.
//!
//! Rate-limits row updates so hosts are not flooded with redraws when
//! producers report every few kilobytes.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use waitboard_core::BoardEvent;

/// Rate-limiter for a single stream's updates.
///
/// Ensures updates are not emitted more frequently than the configured interval.
#[derive(Debug, Clone)]
pub struct ProgressThrottle {
    last_emit: Option<Instant>,
    min_interval: Duration,
}

impl ProgressThrottle {
    /// Create a new throttle with the specified minimum interval.
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            last_emit: None,
            min_interval,
        }
    }

    /// Check if enough time has passed since `now` to emit another update.
    pub fn should_emit_at(&mut self, now: Instant) -> bool {
        match self.last_emit {
            Some(last) if now.saturating_duration_since(last) < self.min_interval => false,
            _ => {
                self.last_emit = Some(now);
                true
            }
        }
    }

    /// Check against the current time.
    pub fn should_emit(&mut self) -> bool {
        self.should_emit_at(Instant::now())
    }

    /// Record an emission that bypassed the check.
    pub const fn mark_emitted(&mut self, now: Instant) {
        self.last_emit = Some(now);
    }

    /// Force the next check to return true.
    pub const fn reset(&mut self) {
        self.last_emit = None;
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

/// Per-label throttle for board events.
///
/// Structural events (inserts, removals, moves) and the update that first
/// reaches 100% always pass. Other `RowUpdated` events, including repeats of
/// an already complete row, pass at most once per interval per label; the
/// latest suppressed update is kept so it can be flushed before the batch
/// ends and the host never keeps a stale row.
#[derive(Debug)]
pub struct LabelThrottle {
    interval: Duration,
    throttles: HashMap<String, ProgressThrottle>,
    pending: HashMap<String, BoardEvent>,
    /// Latest percent seen per label, admitted or not.
    last_percent: HashMap<String, u8>,
}

impl LabelThrottle {
    /// Create a throttle; a zero interval admits everything.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            throttles: HashMap::new(),
            pending: HashMap::new(),
            last_percent: HashMap::new(),
        }
    }

    /// Decide whether `event` should reach the host now.
    pub fn admit(&mut self, event: &BoardEvent, now: Instant) -> bool {
        match event {
            BoardEvent::RowInserted { label, percent, .. } => {
                self.last_percent.insert(label.clone(), *percent);
                self.throttle_for(label).mark_emitted(now);
                true
            }
            BoardEvent::RowUpdated {
                label,
                percent,
                old_position,
                new_position,
                ..
            } => {
                let previous = self.last_percent.insert(label.clone(), *percent);
                let completes = *percent >= 100 && previous.is_none_or(|p| p < 100);
                let always =
                    self.interval.is_zero() || old_position != new_position || completes;
                let throttle = self.throttle_for(label);
                let admitted = if always {
                    throttle.mark_emitted(now);
                    true
                } else {
                    throttle.should_emit_at(now)
                };

                if admitted {
                    self.pending.remove(label.as_str());
                } else {
                    self.pending.insert(label.clone(), event.clone());
                }
                admitted
            }
            BoardEvent::RowRemoved { label, .. } => {
                self.forget(label);
                true
            }
            BoardEvent::BoardReset => {
                self.clear();
                true
            }
            BoardEvent::BoardFinished
            | BoardEvent::MainProgress { .. }
            | BoardEvent::LogMessage { .. } => true,
        }
    }

    /// Take every suppressed update, ordered by label for determinism.
    pub fn drain_pending(&mut self) -> Vec<BoardEvent> {
        let mut pending: Vec<(String, BoardEvent)> = self.pending.drain().collect();
        pending.sort_by(|a, b| a.0.cmp(&b.0));
        pending.into_iter().map(|(_, event)| event).collect()
    }

    /// Number of labels with a suppressed update.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn throttle_for(&mut self, label: &str) -> &mut ProgressThrottle {
        let interval = self.interval;
        self.throttles
            .entry(label.to_string())
            .or_insert_with(|| ProgressThrottle::new(interval))
    }

    fn forget(&mut self, label: &str) {
        self.throttles.remove(label);
        self.pending.remove(label);
        self.last_percent.remove(label);
    }

    fn clear(&mut self) {
        self.throttles.clear();
        self.pending.clear();
        self.last_percent.clear();
    }
}

//! Display ordering for tracked streams.
//!
//! This module provides a pure state machine over an index array of labels.
//! No I/O and no knowledge of rendering; the board turns its results into
//! render deltas.
//!
//! # Ordering Semantics
//!
//! - Position 0 is the completed edge: streams that reach 100% bubble up
//!   toward it and settle directly below the last completed stream.
//! - Active streams stay contiguous below the completed block.
//! - Movement happens one adjacent swap at a time, so a reposition costs
//!   O(distance moved) and never disturbs the relative order of other rows.

use std::collections::HashMap;

/// Direction a stream travels when it crosses the 100% boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward index 0 (the stream just completed).
    TowardCompleted,
    /// Toward the tail (the stream dropped back below 100%).
    TowardActive,
}

/// Result of a reposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    /// Position before the move.
    pub from: usize,
    /// Position after the move.
    pub to: usize,
}

impl Move {
    /// Whether the stream changed position.
    pub const fn moved(&self) -> bool {
        self.from != self.to
    }
}

/// Maintains the display order of all tracked streams.
///
/// This is a sync type with no internal locking; the owning board is
/// responsible for synchronization.
///
/// INVARIANT: `positions[order[i]] == i` for every `i`, so positions are
/// always a contiguous permutation of `[0, len)`.
#[derive(Debug, Default, Clone)]
pub struct OrderingEngine {
    order: Vec<String>,
    positions: HashMap<String, usize>,
}

impl OrderingEngine {
    /// Create an empty ordering.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ordered streams.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if no streams are ordered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Check if a label is ordered.
    pub fn contains(&self, label: &str) -> bool {
        self.positions.contains_key(label)
    }

    /// Current position of a label.
    pub fn position_of(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    /// Label at a position.
    pub fn label_at(&self, position: usize) -> Option<&str> {
        self.order.get(position).map(String::as_str)
    }

    /// Labels in display order.
    pub fn labels(&self) -> &[String] {
        &self.order
    }

    /// Append a label at the tail. Returns its position.
    pub fn push_back(&mut self, label: impl Into<String>) -> usize {
        let label = label.into();
        debug_assert!(!self.contains(&label), "label {label:?} already ordered");
        let position = self.order.len();
        self.positions.insert(label.clone(), position);
        self.order.push(label);
        position
    }

    /// Insert a label at `position` (clamped to the tail), shifting later rows down.
    pub fn insert_at(&mut self, label: impl Into<String>, position: usize) -> usize {
        let label = label.into();
        debug_assert!(!self.contains(&label), "label {label:?} already ordered");
        let position = position.min(self.order.len());
        self.order.insert(position, label);
        self.reindex_from(position);
        position
    }

    /// Remove a label, shifting later rows up. Returns the position it held.
    pub fn remove(&mut self, label: &str) -> Option<usize> {
        let position = self.positions.remove(label)?;
        self.order.remove(position);
        self.reindex_from(position);
        Some(position)
    }

    /// Drop every label.
    pub fn clear(&mut self) {
        self.order.clear();
        self.positions.clear();
    }

    /// Length of the completed block at the top of the order.
    pub fn completed_prefix_len(&self, is_complete: impl Fn(&str) -> bool) -> usize {
        self.order
            .iter()
            .take_while(|label| is_complete(label))
            .count()
    }

    /// Move a stream toward its resting place after a threshold crossing.
    ///
    /// Walks one adjacent slot at a time in `direction`, stopping at the
    /// array boundary or when the neighbour already belongs where it is:
    /// a completed neighbour when moving toward the completed edge, an
    /// active neighbour when moving toward the tail.
    ///
    /// A label that is not ordered is a bug in the caller (the board keeps
    /// ordering and streams in bijection); it is reported and ignored.
    pub fn reposition(
        &mut self,
        label: &str,
        direction: Direction,
        is_complete: impl Fn(&str) -> bool,
    ) -> Move {
        let Some(from) = self.position_of(label) else {
            debug_assert!(false, "reposition of unknown label {label:?}");
            tracing::error!(label = %label, "BUG: reposition requested for unknown stream");
            return Move { from: 0, to: 0 };
        };

        let mut current = from;
        loop {
            let neighbour = match direction {
                Direction::TowardCompleted => current.checked_sub(1),
                Direction::TowardActive => Some(current + 1).filter(|&n| n < self.order.len()),
            };
            let Some(neighbour) = neighbour else {
                break;
            };

            let neighbour_complete = is_complete(&self.order[neighbour]);
            let settled = match direction {
                Direction::TowardCompleted => neighbour_complete,
                Direction::TowardActive => !neighbour_complete,
            };
            if settled {
                break;
            }

            self.swap(current, neighbour);
            current = neighbour;
        }

        Move { from, to: current }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.order.swap(a, b);
        self.positions.insert(self.order[a].clone(), a);
        self.positions.insert(self.order[b].clone(), b);
    }

    fn reindex_from(&mut self, start: usize) {
        for (offset, label) in self.order[start..].iter().enumerate() {
            self.positions.insert(label.clone(), start + offset);
        }
    }

    /// Verify the position index matches the order array.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.order.len(), self.positions.len());
        for (i, label) in self.order.iter().enumerate() {
            assert_eq!(self.positions.get(label), Some(&i), "position of {label}");
        }
    }
}

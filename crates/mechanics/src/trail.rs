//! Rewindable trail of end-effector positions.
//!
//! The buffer is a sample log plus a cursor. Samples before the cursor are the
//! visible trail. Samples at or after it are left over from a rewind and are
//! only ever overwritten, never shown.
//!
//! Two kinds of moves change the cursor:
//! - commit ([`Trail::advance`]): write the live point at the cursor and move
//!   it forward, reusing a stale slot when one exists
//! - seek ([`Trail::step_back`]): move the cursor back one sample and pin the
//!   new last visible sample to the live point
//!
//! Nothing else moves the cursor, so pausing and resuming cannot shrink the
//! visible trail.

use simcore::Point2;

#[derive(Debug, Clone, Default)]
pub struct Trail {
    samples: Vec<Point2>,
    index: usize,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    /// A trail holding only `point`.
    pub fn starting_at(point: Point2) -> Self {
        let mut trail = Trail::new();
        trail.reset_with(point);
        trail
    }

    /// Drop all history and restart from `point`.
    pub fn reset_with(&mut self, point: Point2) {
        self.samples.clear();
        self.samples.push(point);
        self.index = 1;
    }

    /// Commit `point` at the cursor and move forward. Returns the new cursor.
    pub fn advance(&mut self, point: Point2) -> usize {
        match self.samples.get_mut(self.index) {
            Some(stale) => *stale = point,
            None => self.samples.push(point),
        }
        self.index += 1;
        self.index
    }

    /// Seek back one sample (never past the first) and overwrite the new last
    /// visible sample with `current`. Returns the new cursor.
    pub fn step_back(&mut self, current: Point2) -> usize {
        if self.samples.is_empty() {
            return 0;
        }
        self.index = self.index.saturating_sub(1).max(1);
        self.samples[self.index - 1] = current;
        self.index
    }

    /// The visible trail, oldest first.
    pub fn visible(&self) -> &[Point2] {
        &self.samples[..self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Total stored samples, stale ones included.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Stale samples waiting ahead of the cursor.
    pub fn redo_len(&self) -> usize {
        self.samples.len() - self.index
    }

    pub fn is_rewound(&self) -> bool {
        self.redo_len() > 0
    }
}

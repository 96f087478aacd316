// Tue Jan 20 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;

pub type TargetId = i32;

/// Reserved target for time that belongs to no output.
pub const NO_TARGET: TargetId = -1;

/// Half-open `[start, stop)` span of time, in nanoseconds, routed to `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: i64,
    pub stop: i64,
    pub target: TargetId,
}

impl Interval {
    pub fn new(start: i64, stop: i64, target: TargetId) -> Self {
        Self { start, stop, target }
    }

    pub fn unfiltered(start: i64, stop: i64) -> Self {
        Self::new(start, stop, NO_TARGET)
    }

    pub fn width(&self) -> i64 {
        self.stop - self.start
    }

    pub fn is_unfiltered(&self) -> bool {
        self.target == NO_TARGET
    }

    /// True when `next` starts exactly where this one stops and routes to the same target.
    pub fn joins(&self, next: &Interval) -> bool {
        self.stop == next.start && self.target == next.target
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unfiltered() {
            write!(f, "[{}, {}) -> unfiltered", self.start, self.stop)
        } else {
            write!(f, "[{}, {}) -> {}", self.start, self.stop, self.target)
        }
    }
}

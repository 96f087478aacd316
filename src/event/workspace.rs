// Mon Jan 19 2026 - Alex

use crate::event::Channel;
use serde::{Deserialize, Serialize};

/// Half-open time range `[start, stop)` in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: i64,
    pub stop: i64,
}

impl TimeRange {
    pub fn new(start: i64, stop: i64) -> Self {
        Self { start, stop }
    }

    pub fn is_empty(&self) -> bool {
        self.stop <= self.start
    }

    pub fn contains(&self, time: i64) -> bool {
        time >= self.start && time < self.stop
    }

    pub fn intersect(&self, other: &TimeRange) -> Option<TimeRange> {
        let range = TimeRange::new(self.start.max(other.start), self.stop.min(other.stop));
        if range.is_empty() {
            None
        } else {
            Some(range)
        }
    }

    /// Smallest range holding every event's pulse time, or `None` if there are no events.
    pub fn of_channels(channels: &[Channel]) -> Option<TimeRange> {
        let mut bounds: Option<(i64, i64)> = None;
        for event in channels.iter().flat_map(|c| c.events.iter()) {
            bounds = Some(match bounds {
                Some((lo, hi)) => (lo.min(event.pulse_time), hi.max(event.pulse_time)),
                None => (event.pulse_time, event.pulse_time),
            });
        }
        bounds.map(|(lo, hi)| TimeRange::new(lo, hi.saturating_add(1)))
    }
}

/// Input handed to the engine. Only event streams can be split event by event;
/// histograms are rejected once at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputWorkspace {
    EventStream { channels: Vec<Channel> },
    Histogram { channel_count: usize, bin_count: usize },
}

impl InputWorkspace {
    pub fn events(channels: Vec<Channel>) -> Self {
        InputWorkspace::EventStream { channels }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            InputWorkspace::EventStream { .. } => "event_stream",
            InputWorkspace::Histogram { .. } => "histogram",
        }
    }

    pub fn total_events(&self) -> usize {
        match self {
            InputWorkspace::EventStream { channels } => channels.iter().map(Channel::len).sum(),
            InputWorkspace::Histogram { .. } => 0,
        }
    }
}

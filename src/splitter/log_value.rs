// Wed Jan 21 2026 - Alex

use crate::splitter::merge::push_merged;
use crate::splitter::{merge_partials, Interval, SplitterError, TargetId, TimeSplitter, NO_TARGET};
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

const SAMPLES_PER_CHUNK: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogSample {
    pub time: i64,
    pub value: f64,
}

impl LogSample {
    pub fn new(time: i64, value: f64) -> Self {
        Self { time, value }
    }
}

/// Samples with `low <= value < high` route to `target`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub low: f64,
    pub high: f64,
    pub target: TargetId,
}

impl ValueRange {
    pub fn new(low: f64, high: f64, target: TargetId) -> Self {
        Self { low, high, target }
    }

    fn contains(&self, value: f64) -> bool {
        value >= self.low && value < self.high
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeDirection {
    Increasing,
    Decreasing,
    #[default]
    Both,
}

/// Where a sample's timestamp sits inside the span it represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleTimeConvention {
    Centre,
    #[default]
    Start,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trend {
    Rising,
    Falling,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogValueFilter {
    pub samples: Vec<LogSample>,
    pub ranges: Vec<ValueRange>,
    #[serde(default)]
    pub direction: ChangeDirection,
    #[serde(default)]
    pub convention: SampleTimeConvention,
    /// End of the run; the last sample's span stops here.
    pub run_stop: i64,
}

impl LogValueFilter {
    pub fn validate(&self) -> Result<(), SplitterError> {
        if self.samples.is_empty() || self.ranges.is_empty() {
            return Err(SplitterError::EmptyTable);
        }

        for (index, sample) in self.samples.iter().enumerate() {
            if !sample.value.is_finite() {
                return Err(SplitterError::InvalidSample { index });
            }
            if index > 0 && sample.time <= self.samples[index - 1].time {
                return Err(SplitterError::NonMonotonicBoundary {
                    index,
                    previous: self.samples[index - 1].time,
                    value: sample.time,
                });
            }
        }

        let last = self.samples[self.samples.len() - 1].time;
        if self.run_stop <= last {
            return Err(SplitterError::NonMonotonicBoundary {
                index: self.samples.len(),
                previous: last,
                value: self.run_stop,
            });
        }

        for (index, range) in self.ranges.iter().enumerate() {
            if !range.low.is_finite() || !range.high.is_finite() || range.low >= range.high {
                return Err(SplitterError::InvalidValueRange {
                    index,
                    low: range.low,
                    high: range.high,
                });
            }
            if range.target <= NO_TARGET {
                return Err(SplitterError::InvalidTarget {
                    row: index,
                    target: range.target,
                });
            }
        }

        let mut order: Vec<usize> = (0..self.ranges.len()).collect();
        order.sort_by(|&a, &b| self.ranges[a].low.total_cmp(&self.ranges[b].low));
        for pair in order.windows(2) {
            if self.ranges[pair[1]].low < self.ranges[pair[0]].high {
                return Err(SplitterError::OverlappingValueRanges {
                    first: pair[0].min(pair[1]),
                    second: pair[0].max(pair[1]),
                });
            }
        }

        Ok(())
    }

    /// Trend at every sample; `None` until the signal first changes.
    fn trends(&self) -> Vec<Option<Trend>> {
        let mut trends = Vec::with_capacity(self.samples.len());
        let mut current = None;
        for (index, sample) in self.samples.iter().enumerate() {
            if index > 0 {
                let previous = self.samples[index - 1].value;
                if sample.value > previous {
                    current = Some(Trend::Rising);
                } else if sample.value < previous {
                    current = Some(Trend::Falling);
                }
            }
            trends.push(current);
        }
        trends
    }

    fn span(&self, index: usize) -> (i64, i64) {
        let time = self.samples[index].time;
        let next = self.samples.get(index + 1).map(|s| s.time);
        match self.convention {
            SampleTimeConvention::Start => (time, next.unwrap_or(self.run_stop)),
            SampleTimeConvention::Centre => {
                let start = if index == 0 {
                    time
                } else {
                    midpoint(self.samples[index - 1].time, time)
                };
                let stop = next.map(|n| midpoint(time, n)).unwrap_or(self.run_stop);
                (start, stop)
            }
        }
    }

    fn classify(&self, value: f64, trend: Option<Trend>) -> TargetId {
        let direction_ok = match (self.direction, trend) {
            (ChangeDirection::Both, _) | (_, None) => true,
            (ChangeDirection::Increasing, Some(t)) => t == Trend::Rising,
            (ChangeDirection::Decreasing, Some(t)) => t == Trend::Falling,
        };
        if !direction_ok {
            return NO_TARGET;
        }
        self.ranges
            .iter()
            .find(|range| range.contains(value))
            .map(|range| range.target)
            .unwrap_or(NO_TARGET)
    }

    fn classify_chunk(&self, trends: &[Option<Trend>], indices: std::ops::Range<usize>) -> Vec<Interval> {
        let mut local = Vec::new();
        for index in indices {
            let (start, stop) = self.span(index);
            if stop <= start {
                continue;
            }
            let target = self.classify(self.samples[index].value, trends[index]);
            push_merged(&mut local, Interval::new(start, stop, target));
        }
        local
    }
}

fn midpoint(a: i64, b: i64) -> i64 {
    let (a, b) = (i128::from(a), i128::from(b));
    // Lies between `a` and `b`, so it fits back into i64.
    (a + (b - a) / 2) as i64
}

impl TimeSplitter {
    /// Derives a splitter from a monitored signal: each sample's span goes to the
    /// target of the value range holding the sample, provided the signal is
    /// moving in the requested direction.
    pub fn from_log_value(filter: &LogValueFilter) -> Result<Self, SplitterError> {
        filter.validate()?;

        let trends = filter.trends();
        let sample_count = filter.samples.len();
        let chunk_count = sample_count.div_ceil(SAMPLES_PER_CHUNK);

        let partials: Vec<Vec<Interval>> = (0..chunk_count)
            .into_par_iter()
            .map(|chunk| {
                let start = chunk * SAMPLES_PER_CHUNK;
                let stop = (start + SAMPLES_PER_CHUNK).min(sample_count);
                filter.classify_chunk(&trends, start..stop)
            })
            .collect();

        let merged = merge_partials(partials)?;
        debug!(
            "Derived {} intervals from {} log samples in {} chunks",
            merged.len(),
            sample_count,
            chunk_count
        );
        Ok(TimeSplitter::from_covering(merged))
    }
}

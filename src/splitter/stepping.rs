// Wed Jan 21 2026 - Alex

use crate::splitter::{Interval, SplitterError, TargetId, TimeSplitter};
use log::debug;
use serde::{Deserialize, Serialize};

pub const MAX_STEPS: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepPolicy {
    Linear { width: i64 },
    /// Step `k` is `first_width * factor^k` wide.
    Logarithmic { first_width: i64, factor: f64 },
}

impl StepPolicy {
    fn width(&self, step: usize) -> i64 {
        match *self {
            StepPolicy::Linear { width } => width,
            StepPolicy::Logarithmic { first_width, factor } => {
                let width = first_width as f64 * factor.powi(step.min(i32::MAX as usize) as i32);
                if width >= i64::MAX as f64 {
                    i64::MAX
                } else {
                    (width.round() as i64).max(1)
                }
            }
        }
    }
}

/// What happens to the step cut short by the end of the range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LastStepPolicy {
    #[default]
    Keep,
    /// Fold the truncated step into its neighbour when it is narrower than
    /// `fraction` of its nominal width.
    MergeShorterThan { fraction: f64 },
}

/// Consecutive time bins over `[start, stop)`, targets numbered from 0 in time order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeStepLayout {
    pub start: i64,
    pub stop: i64,
    pub policy: StepPolicy,
    /// Lay the steps out backward from `stop`, so the truncated step lands at `start`.
    #[serde(default)]
    pub reverse: bool,
    #[serde(default)]
    pub last_step: LastStepPolicy,
}

impl TimeStepLayout {
    pub fn validate(&self) -> Result<(), SplitterError> {
        if self.start >= self.stop {
            return Err(SplitterError::InvalidStep(format!(
                "start {} must be before stop {}",
                self.start, self.stop
            )));
        }
        if self.stop.checked_sub(self.start).is_none() {
            return Err(SplitterError::InvalidStep(format!(
                "range [{}, {}) is wider than the time axis",
                self.start, self.stop
            )));
        }
        match self.policy {
            StepPolicy::Linear { width } if width <= 0 => {
                return Err(SplitterError::InvalidStep(format!("width {} must be positive", width)));
            }
            StepPolicy::Logarithmic { first_width, factor } => {
                if first_width <= 0 {
                    return Err(SplitterError::InvalidStep(format!(
                        "first width {} must be positive",
                        first_width
                    )));
                }
                if !factor.is_finite() || factor <= 1.0 {
                    return Err(SplitterError::InvalidStep(format!(
                        "logarithmic factor {} must be greater than 1",
                        factor
                    )));
                }
            }
            _ => {}
        }
        if let LastStepPolicy::MergeShorterThan { fraction } = self.last_step {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(SplitterError::InvalidStep(format!(
                    "merge fraction {} must be in (0, 1]",
                    fraction
                )));
            }
        }
        Ok(())
    }

    /// Step edges walking away from the anchor (`start`, or `stop` when reversed),
    /// as distances from it. The final edge is the full span.
    fn offsets(&self) -> Result<Vec<i64>, SplitterError> {
        let span = self.stop.checked_sub(self.start).ok_or_else(|| {
            SplitterError::InvalidStep(format!("range [{}, {}) is wider than the time axis", self.start, self.stop))
        })?;
        let mut offsets = vec![0i64];
        let mut nominal_last = 0i64;
        let mut step = 0usize;

        while let Some(&reached) = offsets.last() {
            if reached >= span {
                break;
            }
            if step >= MAX_STEPS {
                return Err(SplitterError::TooManySteps { limit: MAX_STEPS });
            }
            nominal_last = self.policy.width(step);
            offsets.push(reached.saturating_add(nominal_last).min(span));
            step += 1;
        }

        if let LastStepPolicy::MergeShorterThan { fraction } = self.last_step {
            let count = offsets.len();
            if count > 2 {
                let truncated = offsets[count - 1] - offsets[count - 2];
                if (truncated as f64) < fraction * nominal_last as f64 {
                    offsets.remove(count - 2);
                }
            }
        }

        Ok(offsets)
    }
}

impl TimeSplitter {
    pub fn from_time_steps(layout: &TimeStepLayout) -> Result<Self, SplitterError> {
        layout.validate()?;

        let offsets = layout.offsets()?;
        let mut edges: Vec<i64> = if layout.reverse {
            offsets.iter().rev().map(|offset| layout.stop - offset).collect()
        } else {
            offsets.iter().map(|offset| layout.start + offset).collect()
        };
        edges.dedup();

        let intervals: Vec<Interval> = edges
            .windows(2)
            .enumerate()
            .map(|(index, edge)| Interval::new(edge[0], edge[1], index as TargetId))
            .collect();

        debug!(
            "Generated {} time steps over [{}, {}){}",
            intervals.len(),
            layout.start,
            layout.stop,
            if layout.reverse { " in reverse" } else { "" }
        );
        TimeSplitter::from_rows(&intervals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(layout: &TimeStepLayout) -> Vec<i64> {
        TimeSplitter::from_time_steps(layout).unwrap().boundaries().to_vec()
    }

    #[test]
    fn test_linear_steps_keep_truncated_tail() {
        let layout = TimeStepLayout {
            start: 0,
            stop: 25,
            policy: StepPolicy::Linear { width: 10 },
            reverse: false,
            last_step: LastStepPolicy::Keep,
        };
        assert_eq!(edges(&layout), vec![0, 10, 20, 25]);
        let splitter = TimeSplitter::from_time_steps(&layout).unwrap();
        assert_eq!(splitter.targets(), &[0, 1, 2]);
    }

    #[test]
    fn test_linear_steps_merge_short_tail() {
        let layout = TimeStepLayout {
            start: 0,
            stop: 25,
            policy: StepPolicy::Linear { width: 10 },
            reverse: false,
            last_step: LastStepPolicy::MergeShorterThan { fraction: 0.6 },
        };
        assert_eq!(edges(&layout), vec![0, 10, 25]);
    }

    #[test]
    fn test_logarithmic_steps() {
        let layout = TimeStepLayout {
            start: 100,
            stop: 200,
            policy: StepPolicy::Logarithmic { first_width: 10, factor: 2.0 },
            reverse: false,
            last_step: LastStepPolicy::Keep,
        };
        assert_eq!(edges(&layout), vec![100, 110, 130, 170, 200]);
    }

    #[test]
    fn test_reverse_logarithmic_steps() {
        let layout = TimeStepLayout {
            start: 100,
            stop: 200,
            policy: StepPolicy::Logarithmic { first_width: 10, factor: 2.0 },
            reverse: true,
            last_step: LastStepPolicy::MergeShorterThan { fraction: 0.5 },
        };
        // Tail of 30 against a nominal 80 is merged into the 40-wide step.
        assert_eq!(edges(&layout), vec![100, 170, 190, 200]);
        let splitter = TimeSplitter::from_time_steps(&layout).unwrap();
        assert_eq!(splitter.lookup(100), 0);
        assert_eq!(splitter.lookup(195), 2);
    }

    #[test]
    fn test_invalid_step_configuration() {
        let mut layout = TimeStepLayout {
            start: 0,
            stop: 10,
            policy: StepPolicy::Linear { width: 0 },
            reverse: false,
            last_step: LastStepPolicy::Keep,
        };
        assert!(matches!(
            TimeSplitter::from_time_steps(&layout),
            Err(SplitterError::InvalidStep(_))
        ));

        layout.policy = StepPolicy::Logarithmic { first_width: 1, factor: 1.0 };
        assert!(TimeSplitter::from_time_steps(&layout).is_err());

        layout.policy = StepPolicy::Linear { width: 1 };
        layout.stop = 0;
        assert!(TimeSplitter::from_time_steps(&layout).is_err());
    }

    #[test]
    fn test_range_wider_than_time_axis_is_rejected() {
        let layout = TimeStepLayout {
            start: i64::MIN,
            stop: i64::MAX,
            policy: StepPolicy::Linear { width: i64::MAX },
            reverse: false,
            last_step: LastStepPolicy::Keep,
        };
        assert!(matches!(
            TimeSplitter::from_time_steps(&layout),
            Err(SplitterError::InvalidStep(_))
        ));
    }

    #[test]
    fn test_step_limit() {
        let layout = TimeStepLayout {
            start: 0,
            stop: i64::MAX,
            policy: StepPolicy::Linear { width: 1 },
            reverse: false,
            last_step: LastStepPolicy::Keep,
        };
        assert!(matches!(
            TimeSplitter::from_time_steps(&layout),
            Err(SplitterError::TooManySteps { .. })
        ));
    }
}

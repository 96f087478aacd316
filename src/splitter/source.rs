// Wed Jan 21 2026 - Alex

use crate::splitter::{Interval, LogValueFilter, SplitterError, TargetId, TimeSplitter, TimeStepLayout};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The encodings a splitter can be supplied in. Matched once in [`SplitterSource::build`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SplitterSource {
    /// Table of `(start, stop, target)` rows.
    Rows { rows: Vec<Interval> },
    /// Histogram-shaped: `targets[i]` on `[boundaries[i], boundaries[i + 1])`.
    Boundaries { boundaries: Vec<i64>, targets: Vec<TargetId> },
    LogValue(LogValueFilter),
    TimeSteps(TimeStepLayout),
}

impl SplitterSource {
    pub fn build(&self) -> Result<TimeSplitter, SplitterError> {
        match self {
            SplitterSource::Rows { rows } => TimeSplitter::from_rows(rows),
            SplitterSource::Boundaries { boundaries, targets } => {
                TimeSplitter::from_boundaries(boundaries, targets)
            }
            SplitterSource::LogValue(config) => TimeSplitter::from_log_value(config),
            SplitterSource::TimeSteps(config) => TimeSplitter::from_time_steps(config),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SplitterSource::Rows { .. } => "rows",
            SplitterSource::Boundaries { .. } => "boundaries",
            SplitterSource::LogValue(_) => "log_value",
            SplitterSource::TimeSteps(_) => "time_steps",
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self, SplitterError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SplitterError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splitter::NO_TARGET;

    #[test]
    fn test_rows_document() {
        let source = SplitterSource::from_json_str(
            r#"{"kind": "rows", "rows": [{"start": 0, "stop": 10, "target": 0}, {"start": 10, "stop": 20, "target": 1}]}"#,
        )
        .unwrap();
        assert_eq!(source.kind(), "rows");
        let splitter = source.build().unwrap();
        assert_eq!(splitter.lookup(10), 1);
    }

    #[test]
    fn test_boundaries_document() {
        let source = SplitterSource::from_json_str(
            r#"{"kind": "boundaries", "boundaries": [0, 5, 15], "targets": [1, -1]}"#,
        )
        .unwrap();
        let splitter = source.build().unwrap();
        assert_eq!(splitter.lookup(3), 1);
        assert_eq!(splitter.lookup(9), NO_TARGET);
    }

    #[test]
    fn test_log_value_document() {
        let source = SplitterSource::from_json_str(
            r#"{
                "kind": "log_value",
                "samples": [{"time": 0, "value": 1.0}, {"time": 50, "value": 7.0}],
                "ranges": [{"low": 5.0, "high": 10.0, "target": 3}],
                "direction": "increasing",
                "convention": "start",
                "run_stop": 100
            }"#,
        )
        .unwrap();
        let splitter = source.build().unwrap();
        assert_eq!(splitter.lookup(10), NO_TARGET);
        assert_eq!(splitter.lookup(60), 3);
    }

    #[test]
    fn test_time_steps_document() {
        let source = SplitterSource::from_json_str(
            r#"{"kind": "time_steps", "start": 0, "stop": 30, "policy": {"kind": "linear", "width": 10}}"#,
        )
        .unwrap();
        let splitter = source.build().unwrap();
        assert_eq!(splitter.targets(), &[0, 1, 2]);
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(
            SplitterSource::from_json_str(r#"{"kind": "nope"}"#),
            Err(SplitterError::Parse(_))
        ));
    }
}

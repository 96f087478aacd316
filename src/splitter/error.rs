// Tue Jan 20 2026 - Alex

use crate::splitter::TargetId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitterError {
    #[error("Splitter table is empty")]
    EmptyTable,
    #[error("Row {row}: interval [{start}, {stop}) has zero or negative width")]
    ZeroWidthInterval { row: usize, start: i64, stop: i64 },
    #[error("Rows {first} and {second} overlap at {at}")]
    OverlappingRows { first: usize, second: usize, at: i64 },
    #[error("Boundary {index} ({value}) does not increase past the previous boundary ({previous})")]
    NonMonotonicBoundary { index: usize, previous: i64, value: i64 },
    #[error("Expected {expected} targets for {boundaries} boundaries, found {targets}")]
    LengthMismatch { boundaries: usize, expected: usize, targets: usize },
    #[error("Row {row}: invalid target id {target}")]
    InvalidTarget { row: usize, target: TargetId },
    #[error("Value range {index}: [{low}, {high}) is not a valid range")]
    InvalidValueRange { index: usize, low: f64, high: f64 },
    #[error("Value ranges {first} and {second} overlap")]
    OverlappingValueRanges { first: usize, second: usize },
    #[error("Signal sample {index} has a non-finite value")]
    InvalidSample { index: usize },
    #[error("Invalid time step configuration: {0}")]
    InvalidStep(String),
    #[error("Time stepping would produce more than {limit} steps")]
    TooManySteps { limit: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

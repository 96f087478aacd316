// Tue Jan 20 2026 - Alex

pub mod interval;
pub mod error;
pub mod merge;
pub mod splitter;
pub mod builder;
pub mod log_value;
pub mod stepping;
pub mod source;

pub use interval::{Interval, TargetId, NO_TARGET};
pub use error::SplitterError;
pub use merge::merge_partials;
pub use splitter::TimeSplitter;
pub use log_value::{ChangeDirection, LogSample, LogValueFilter, SampleTimeConvention, ValueRange};
pub use stepping::{LastStepPolicy, StepPolicy, TimeStepLayout};
pub use source::SplitterSource;

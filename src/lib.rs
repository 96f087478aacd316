// Mon Jan 19 2026 - Alex

pub mod config;
pub mod error;
pub mod event;
pub mod splitter;
pub mod correction;
pub mod partition;
pub mod router;
pub mod orchestrator;

pub use config::Config;
pub use error::EngineError;
pub use event::{Channel, ChannelId, Event, InputWorkspace};
pub use splitter::{Interval, SplitterSource, TimeSplitter, NO_TARGET};
pub use correction::{CorrectionConfig, CorrectionKind, CorrectionStrategy};
pub use partition::{Destination, PartitionBuilder};
pub use router::{EventRouter, RoutingMode};
pub use orchestrator::{CancellationToken, Orchestrator, RunOutput, RunStatus};

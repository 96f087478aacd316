// Wed Jan 28 2026 - Alex

pub mod cancel;
pub mod aggregator;
pub mod coordinator;

pub use cancel::CancellationToken;
pub use aggregator::{ChannelOutcome, ChannelState, RunAggregator, RunCounters, RunOutput, RunStatus, RunSummary};
pub use coordinator::{Orchestrator, ProgressCallback};

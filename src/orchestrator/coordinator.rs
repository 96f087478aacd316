// Wed Jan 28 2026 - Alex

use crate::config::Config;
use crate::correction::{ChannelCorrection, CorrectionStrategy};
use crate::error::{EngineError, Result};
use crate::event::{Channel, ChannelInfo, InputWorkspace, TimeRange};
use crate::orchestrator::{CancellationToken, ChannelOutcome, ChannelState, RunAggregator, RunOutput, RunStatus};
use crate::partition::{ChannelLanes, DestinationSet, PartitionBuilder};
use crate::router::EventRouter;
use crate::splitter::{SplitterSource, TimeSplitter};
use log::{debug, info, warn};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Called from a worker thread as each channel task settles.
pub type ProgressCallback = Arc<dyn Fn(&ChannelOutcome) + Send + Sync>;

/// Runs one routing task per channel over a bounded worker pool.
pub struct Orchestrator {
    config: Config,
    cancel: CancellationToken,
    progress: Option<ProgressCallback>,
}

impl Orchestrator {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
            progress: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds everything from configuration and routes `input`.
    pub fn run(&self, input: InputWorkspace, source: &SplitterSource) -> Result<RunOutput> {
        debug!("Received {} input with {} events", input.kind(), input.total_events());
        let channels = match input {
            InputWorkspace::EventStream { channels } => channels,
            other @ InputWorkspace::Histogram { .. } => {
                return Err(EngineError::UnsupportedInput(other.kind()));
            }
        };

        let (splitter, strategy, destinations) = self.prepare(&channels, source)?;
        self.route(&channels, &splitter, &strategy, destinations)
    }

    /// Validates the configuration and builds the splitter, the correction
    /// strategy and the destinations. Nothing is routed.
    pub fn prepare(
        &self,
        channels: &[Channel],
        source: &SplitterSource,
    ) -> Result<(TimeSplitter, CorrectionStrategy, DestinationSet)> {
        self.config.validate().map_err(EngineError::InvalidConfig)?;

        let splitter = source.build()?;
        debug!(
            "Built {} splitter with {} intervals and {} targets",
            source.kind(),
            splitter.interval_count(),
            splitter.output_targets().len()
        );

        let infos: Vec<ChannelInfo> = channels.iter().map(Channel::info).collect();
        let strategy = CorrectionStrategy::build(&self.config.correction, &infos)?;

        let destinations = PartitionBuilder::new(&splitter)
            .include_unfiltered(self.config.include_unfiltered)
            .base_name(&self.config.base_name)
            .build(channels, TimeRange::of_channels(channels));

        Ok((splitter, strategy, destinations))
    }

    /// Routes every channel into `destinations`. The splitter and strategy are
    /// shared read-only; each task writes only its own channel's buffers.
    pub fn route(
        &self,
        channels: &[Channel],
        splitter: &TimeSplitter,
        strategy: &CorrectionStrategy,
        mut destinations: DestinationSet,
    ) -> Result<RunOutput> {
        self.config.validate().map_err(EngineError::InvalidConfig)?;
        if destinations.channel_count() != channels.len() {
            return Err(EngineError::ChannelCountMismatch {
                expected: channels.len(),
                found: destinations.channel_count(),
            });
        }
        if strategy.channel_count() != channels.len() {
            return Err(EngineError::ChannelCountMismatch {
                expected: channels.len(),
                found: strategy.channel_count(),
            });
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.config.max_threads)
            .build()?;

        info!(
            "Routing {} channels into {} destinations on {} threads",
            channels.len(),
            destinations.len(),
            self.config.max_threads
        );

        let abort = AtomicBool::new(false);
        let outcomes: Vec<ChannelOutcome> = {
            let (slots, lanes) = destinations.split_for_routing();
            let router = EventRouter::new(splitter, slots, self.config.routing_mode)
                .validate_payload(self.config.validate_payload);

            pool.install(|| {
                lanes
                    .into_par_iter()
                    .zip(channels.par_iter())
                    .enumerate()
                    .map(|(index, (mut lanes, channel))| {
                        let outcome = self.route_channel(index, channel, strategy, &router, &mut lanes, &abort);
                        if let Some(ref progress) = self.progress {
                            progress(&outcome);
                        }
                        outcome
                    })
                    .collect()
            })
        };

        let mut aggregator = RunAggregator::with_capacity(outcomes.len());
        for outcome in outcomes {
            aggregator.add(outcome);
        }
        let summary = aggregator.aggregate();

        if summary.counters.skipped_channels > 0 {
            warn!(
                "Skipped {} channels without geometry: {:?}",
                summary.counters.skipped_channels,
                summary.counters.skipped_channel_ids
            );
        }
        if summary.counters.discarded_events > 0 {
            info!(
                "Discarded {} unfiltered events",
                summary.counters.discarded_events
            );
        }

        let output = RunOutput {
            destinations: destinations.into_materialized(),
            counters: summary.counters,
            channel_states: summary.channel_states,
            status: summary.status,
        };

        match summary.failure {
            Some((channel, source)) => {
                warn!("Channel {} failed, returning partial result: {}", channel, source);
                Err(EngineError::Processing {
                    channel,
                    source,
                    partial: Box::new(output),
                })
            }
            None => {
                if output.status == RunStatus::Cancelled {
                    warn!("Run cancelled, returning partial result");
                }
                info!(
                    "Routed {} of {} events ({} discarded, {} in skipped channels)",
                    output.counters.routed_events,
                    output.counters.total_events,
                    output.counters.discarded_events,
                    output.counters.skipped_events
                );
                Ok(output)
            }
        }
    }

    fn route_channel(
        &self,
        index: usize,
        channel: &Channel,
        strategy: &CorrectionStrategy,
        router: &EventRouter<'_>,
        lanes: &mut ChannelLanes<'_>,
        abort: &AtomicBool,
    ) -> ChannelOutcome {
        let mut outcome = ChannelOutcome::new(channel);

        let correction = match strategy.correction(index) {
            ChannelCorrection::Skip(reason) => {
                debug!("Skipping channel {}: {:?}", channel.id, reason);
                outcome.state = ChannelState::Skipped;
                return outcome;
            }
            ChannelCorrection::Apply(correction) => correction,
        };

        if self.cancel.is_cancelled() {
            outcome.state = ChannelState::Cancelled;
            return outcome;
        }
        if abort.load(Ordering::Acquire) {
            outcome.state = ChannelState::Aborted;
            return outcome;
        }

        match router.route(channel, correction, lanes) {
            Ok(tally) => {
                outcome.state = ChannelState::Done;
                outcome.tally = tally;
            }
            Err(error) => {
                lanes.clear();
                abort.store(true, Ordering::Release);
                outcome.state = ChannelState::Failed;
                outcome.error = Some(error);
            }
        }

        outcome
    }
}

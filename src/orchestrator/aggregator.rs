// Wed Jan 28 2026 - Alex

use crate::event::{Channel, ChannelId};
use crate::partition::Destination;
use crate::router::{ChannelTally, RouterError};
use crate::splitter::TargetId;
use serde::Serialize;

/// Where a channel ended up after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelState {
    Ready,
    /// Excluded before routing: the channel lacks geometry the correction needs.
    Skipped,
    Done,
    /// Not routed because cancellation was requested.
    Cancelled,
    /// Not routed because another channel failed.
    Aborted,
    Failed,
}

#[derive(Debug, Clone)]
pub struct ChannelOutcome {
    pub channel: ChannelId,
    pub events: usize,
    pub state: ChannelState,
    pub tally: ChannelTally,
    pub error: Option<RouterError>,
}

impl ChannelOutcome {
    pub fn new(channel: &Channel) -> Self {
        Self {
            channel: channel.id,
            events: channel.len(),
            state: ChannelState::Ready,
            tally: ChannelTally::default(),
            error: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunCounters {
    pub skipped_channels: usize,
    pub skipped_channel_ids: Vec<ChannelId>,
    pub skipped_events: u64,
    pub routed_events: u64,
    pub discarded_events: u64,
    pub total_events: u64,
}

impl RunCounters {
    /// Every input event is accounted for as routed, discarded or skipped.
    pub fn is_conserved(&self) -> bool {
        self.routed_events + self.discarded_events + self.skipped_events == self.total_events
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Complete,
    Cancelled,
    Failed,
}

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub destinations: Vec<Destination>,
    pub counters: RunCounters,
    pub channel_states: Vec<ChannelState>,
    pub status: RunStatus,
}

impl RunOutput {
    pub fn is_partial(&self) -> bool {
        self.status != RunStatus::Complete
    }

    pub fn destination(&self, target: TargetId) -> Option<&Destination> {
        self.destinations.iter().find(|d| d.target() == target)
    }

    pub fn destination_by_name(&self, name: &str) -> Option<&Destination> {
        self.destinations.iter().find(|d| d.name() == name)
    }

    pub fn routed_events(&self) -> usize {
        self.destinations.iter().map(Destination::event_count).sum()
    }
}

pub struct RunAggregator {
    outcomes: Vec<ChannelOutcome>,
}

pub struct RunSummary {
    pub counters: RunCounters,
    pub channel_states: Vec<ChannelState>,
    pub status: RunStatus,
    pub failure: Option<(ChannelId, RouterError)>,
}

impl RunAggregator {
    pub fn new() -> Self {
        Self { outcomes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            outcomes: Vec::with_capacity(capacity),
        }
    }

    pub fn add(&mut self, outcome: ChannelOutcome) {
        self.outcomes.push(outcome);
    }

    /// Merges per-channel outcomes in channel order. The first failed channel, by
    /// position, is reported as the run's failure.
    pub fn aggregate(self) -> RunSummary {
        let mut counters = RunCounters::default();
        let mut channel_states = Vec::with_capacity(self.outcomes.len());
        let mut failure = None;
        let mut cancelled = false;

        for outcome in self.outcomes {
            counters.total_events += outcome.events as u64;
            counters.routed_events += outcome.tally.routed;
            counters.discarded_events += outcome.tally.discarded;

            match outcome.state {
                ChannelState::Skipped => {
                    counters.skipped_channels += 1;
                    counters.skipped_channel_ids.push(outcome.channel);
                    counters.skipped_events += outcome.events as u64;
                }
                ChannelState::Cancelled => cancelled = true,
                ChannelState::Failed => {
                    if failure.is_none() {
                        if let Some(error) = outcome.error {
                            failure = Some((outcome.channel, error));
                        }
                    }
                }
                _ => {}
            }
            channel_states.push(outcome.state);
        }

        let status = if failure.is_some() {
            RunStatus::Failed
        } else if cancelled {
            RunStatus::Cancelled
        } else {
            RunStatus::Complete
        };

        RunSummary {
            counters,
            channel_states,
            status,
            failure,
        }
    }
}

impl Default for RunAggregator {
    fn default() -> Self {
        Self::new()
    }
}

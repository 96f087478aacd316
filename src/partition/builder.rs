// Fri Jan 23 2026 - Alex

use crate::event::{Channel, ChannelId, TimeRange};
use crate::partition::{Destination, DestinationSet, TargetSlots};
use crate::splitter::{TargetId, TimeSplitter, NO_TARGET};
use indexmap::IndexMap;
use log::debug;

/// External name of the destination for `target`.
pub fn destination_name(base: &str, target: TargetId) -> String {
    if target == NO_TARGET {
        format!("{}_unfiltered", base)
    } else {
        format!("{}_{}", base, target)
    }
}

/// Creates one destination per target of a splitter.
pub struct PartitionBuilder<'a> {
    splitter: &'a TimeSplitter,
    include_unfiltered: bool,
    base_name: String,
}

impl<'a> PartitionBuilder<'a> {
    pub fn new(splitter: &'a TimeSplitter) -> Self {
        Self {
            splitter,
            include_unfiltered: true,
            base_name: "split".to_string(),
        }
    }

    pub fn include_unfiltered(mut self, include: bool) -> Self {
        self.include_unfiltered = include;
        self
    }

    pub fn base_name(mut self, base: &str) -> Self {
        self.base_name = base.to_string();
        self
    }

    /// Builds destinations for `channels`, each pre-sized with an empty buffer
    /// per channel. Validity regions are clipped to `input_range`; with no input
    /// range every region is empty.
    pub fn build(&self, channels: &[Channel], input_range: Option<TimeRange>) -> DestinationSet {
        let channel_ids: Vec<ChannelId> = channels.iter().map(|c| c.id).collect();
        self.build_for(&channel_ids, input_range)
    }

    pub fn build_for(&self, channel_ids: &[ChannelId], input_range: Option<TimeRange>) -> DestinationSet {
        // BTreeSet order puts NO_TARGET first, so dense indices follow ascending target ids.
        let dense: IndexMap<TargetId, usize> = self
            .splitter
            .output_targets()
            .into_iter()
            .enumerate()
            .map(|(index, target)| (target, index))
            .collect();

        let interval_slots: Vec<usize> = self
            .splitter
            .targets()
            .iter()
            .map(|target| dense[target])
            .collect();
        let unfiltered = dense[&NO_TARGET];

        let destinations: Vec<Destination> = dense
            .iter()
            .map(|(&target, &index)| {
                let materialized = target != NO_TARGET || self.include_unfiltered;
                let buffers = if materialized {
                    vec![Vec::new(); channel_ids.len()]
                } else {
                    Vec::new()
                };
                Destination {
                    index,
                    target,
                    name: destination_name(&self.base_name, target),
                    materialized,
                    validity: self.validity(target, input_range),
                    channel_ids: channel_ids.to_vec(),
                    buffers,
                }
            })
            .collect();

        debug!(
            "Created {} destinations for {} channels (unfiltered {})",
            destinations.iter().filter(|d| d.materialized).count(),
            channel_ids.len(),
            if self.include_unfiltered { "kept" } else { "discarded" }
        );

        DestinationSet {
            destinations,
            slots: TargetSlots {
                interval_slots,
                unfiltered,
            },
            channel_count: channel_ids.len(),
        }
    }

    fn validity(&self, target: TargetId, input_range: Option<TimeRange>) -> Vec<TimeRange> {
        let Some(input) = input_range else {
            return Vec::new();
        };

        let mut region: Vec<TimeRange> = self
            .splitter
            .validity_region(target)
            .iter()
            .filter_map(|interval| TimeRange::new(interval.start, interval.stop).intersect(&input))
            .collect();

        if target == NO_TARGET {
            // Time outside the splitter's span also routes to the unfiltered destination.
            let span = self.splitter.time_range();
            if input.start < span.start {
                region.insert(0, TimeRange::new(input.start, span.start.min(input.stop)));
            }
            if input.stop > span.stop {
                region.push(TimeRange::new(span.stop.max(input.start), input.stop));
            }
            region.dedup_by(|next, prev| {
                if prev.stop == next.start {
                    prev.stop = next.stop;
                    true
                } else {
                    false
                }
            });
        }

        region
    }
}

// Fri Jan 23 2026 - Alex

use crate::event::{ChannelId, Event, TimeRange};
use crate::splitter::{TargetId, NO_TARGET};

/// Output container for one target. Holds one event buffer per input channel.
#[derive(Debug, Clone)]
pub struct Destination {
    pub(crate) index: usize,
    pub(crate) target: TargetId,
    pub(crate) name: String,
    pub(crate) materialized: bool,
    pub(crate) validity: Vec<TimeRange>,
    pub(crate) channel_ids: Vec<ChannelId>,
    pub(crate) buffers: Vec<Vec<Event>>,
}

impl Destination {
    /// Dense index assigned at build time, stable for a given splitter.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn target(&self) -> TargetId {
        self.target
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_unfiltered(&self) -> bool {
        self.target == NO_TARGET
    }

    pub fn is_materialized(&self) -> bool {
        self.materialized
    }

    pub fn validity_region(&self) -> &[TimeRange] {
        &self.validity
    }

    pub fn channel_count(&self) -> usize {
        self.buffers.len()
    }

    /// Events routed here from the channel at `channel` in input order.
    pub fn channel_events(&self, channel: usize) -> &[Event] {
        self.buffers.get(channel).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn channel_id(&self, channel: usize) -> Option<ChannelId> {
        self.channel_ids.get(channel).copied()
    }

    pub fn event_count(&self) -> usize {
        self.buffers.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.iter().all(Vec::is_empty)
    }
}

/// Maps each splitter interval to the dense index of its destination, so routing
/// never looks targets up by value.
#[derive(Debug, Clone)]
pub struct TargetSlots {
    pub(crate) interval_slots: Vec<usize>,
    pub(crate) unfiltered: usize,
}

impl TargetSlots {
    #[inline]
    pub fn slot(&self, interval: Option<usize>) -> usize {
        match interval {
            Some(position) => self.interval_slots[position],
            None => self.unfiltered,
        }
    }

    pub fn unfiltered(&self) -> usize {
        self.unfiltered
    }

    /// Lanes a channel needs so that every slot is addressable.
    pub fn required_lanes(&self) -> usize {
        self.interval_slots
            .iter()
            .copied()
            .max()
            .unwrap_or(0)
            .max(self.unfiltered)
            + 1
    }
}

/// One channel's view of every destination: a mutable handle on its own buffer
/// in each, or `None` for a destination that is not kept.
pub struct ChannelLanes<'a> {
    lanes: Vec<Option<&'a mut Vec<Event>>>,
}

impl<'a> ChannelLanes<'a> {
    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Appends `event` to destination `slot`. Returns `false` when the destination
    /// is not materialized and the event was discarded.
    #[inline]
    pub fn push(&mut self, slot: usize, event: Event) -> bool {
        match self.lanes.get_mut(slot) {
            Some(Some(buffer)) => {
                buffer.push(event);
                true
            }
            _ => false,
        }
    }

    /// Drops everything this channel has appended so far.
    pub fn clear(&mut self) {
        for buffer in self.lanes.iter_mut().flatten() {
            buffer.clear();
        }
    }
}

#[derive(Debug, Clone)]
pub struct DestinationSet {
    pub(crate) destinations: Vec<Destination>,
    pub(crate) slots: TargetSlots,
    pub(crate) channel_count: usize,
}

impl DestinationSet {
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    pub fn slots(&self) -> &TargetSlots {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    pub fn by_target(&self, target: TargetId) -> Option<&Destination> {
        self.destinations.iter().find(|d| d.target == target)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Destination> {
        self.destinations.iter()
    }

    /// Splits the per-channel buffers into one disjoint set of lanes per channel.
    pub fn split_for_routing(&mut self) -> (&TargetSlots, Vec<ChannelLanes<'_>>) {
        let mut lanes: Vec<ChannelLanes<'_>> = (0..self.channel_count)
            .map(|_| ChannelLanes {
                lanes: Vec::with_capacity(self.destinations.len()),
            })
            .collect();

        for destination in self.destinations.iter_mut() {
            if destination.materialized {
                for (lane, buffer) in lanes.iter_mut().zip(destination.buffers.iter_mut()) {
                    lane.lanes.push(Some(buffer));
                }
            } else {
                for lane in lanes.iter_mut() {
                    lane.lanes.push(None);
                }
            }
        }

        (&self.slots, lanes)
    }

    /// The destinations handed to the caller, in dense-index order.
    pub fn into_materialized(self) -> Vec<Destination> {
        self.destinations.into_iter().filter(|d| d.materialized).collect()
    }
}

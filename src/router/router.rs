// Mon Jan 26 2026 - Alex

use crate::correction::Correction;
use crate::event::Channel;
use crate::partition::{ChannelLanes, TargetSlots};
use crate::router::{RouterError, RoutingMode};
use crate::splitter::TimeSplitter;

/// Per-channel result of a routing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelTally {
    pub routed: u64,
    pub discarded: u64,
}

impl ChannelTally {
    pub fn total(&self) -> u64 {
        self.routed + self.discarded
    }
}

/// Routes the events of one channel into that channel's lanes. Shared across
/// worker threads; holds only read-only state.
pub struct EventRouter<'a> {
    splitter: &'a TimeSplitter,
    slots: &'a TargetSlots,
    mode: RoutingMode,
    validate_payload: bool,
}

impl<'a> EventRouter<'a> {
    pub fn new(splitter: &'a TimeSplitter, slots: &'a TargetSlots, mode: RoutingMode) -> Self {
        Self {
            splitter,
            slots,
            mode,
            validate_payload: true,
        }
    }

    pub fn validate_payload(mut self, validate: bool) -> Self {
        self.validate_payload = validate;
        self
    }

    pub fn mode(&self) -> RoutingMode {
        self.mode
    }

    /// Appends every event of `channel`, in order and unmodified, to the lane of
    /// the destination its routing key falls in.
    pub fn route(
        &self,
        channel: &Channel,
        correction: Correction,
        lanes: &mut ChannelLanes<'_>,
    ) -> Result<ChannelTally, RouterError> {
        let expected = self.slots.required_lanes();
        if lanes.len() < expected {
            return Err(RouterError::LaneMismatch {
                channel: channel.id,
                expected,
                found: lanes.len(),
            });
        }

        let mut tally = ChannelTally::default();
        for (position, event) in channel.events.iter().enumerate() {
            if self.validate_payload && !event.payload_is_valid() {
                return Err(RouterError::CorruptedPayload {
                    channel: channel.id,
                    position,
                });
            }

            let key = self
                .mode
                .key(event, &correction)
                .ok_or(RouterError::TimeOutOfRange {
                    channel: channel.id,
                    position,
                })?;
            let slot = self.slots.slot(self.splitter.locate(key));
            if lanes.push(slot, *event) {
                tally.routed += 1;
            } else {
                tally.discarded += 1;
            }
        }

        Ok(tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, TimeRange};
    use crate::partition::PartitionBuilder;
    use crate::splitter::{Interval, NO_TARGET};

    fn splitter() -> TimeSplitter {
        TimeSplitter::from_rows(&[Interval::new(0, 10, 0), Interval::new(10, 20, 1)]).unwrap()
    }

    fn channel() -> Channel {
        Channel::new(0).with_events(vec![
            Event::new(12, 0.0),
            Event::new(3, 0.0),
            Event::new(10, 0.0),
            Event::new(25, 0.0),
            Event::new(9, 0.0),
        ])
    }

    #[test]
    fn test_routes_in_stream_order() {
        let splitter = splitter();
        let channel = channel();
        let mut set = PartitionBuilder::new(&splitter).build(std::slice::from_ref(&channel), Some(TimeRange::new(0, 30)));
        let tally = {
            let (slots, mut lanes) = set.split_for_routing();
            let router = EventRouter::new(&splitter, slots, RoutingMode::PulseTime);
            router.route(&channel, Correction::IDENTITY, &mut lanes[0]).unwrap()
        };
        assert_eq!(tally, ChannelTally { routed: 5, discarded: 0 });

        let times = |target| -> Vec<i64> {
            set.by_target(target)
                .unwrap()
                .channel_events(0)
                .iter()
                .map(|e| e.pulse_time)
                .collect()
        };
        assert_eq!(times(0), vec![3, 9]);
        assert_eq!(times(1), vec![12, 10]);
        assert_eq!(times(NO_TARGET), vec![25]);
    }

    #[test]
    fn test_tof_shifts_routing_key_but_not_event() {
        let splitter = splitter();
        let channel = Channel::new(0).with_events(vec![Event::new(5, 0.004)]);
        let mut set = PartitionBuilder::new(&splitter).build(std::slice::from_ref(&channel), None);
        {
            let (slots, mut lanes) = set.split_for_routing();
            let router = EventRouter::new(&splitter, slots, RoutingMode::PulseTimeWithTof);
            // 5 ns + round(0.004 us * 1.0 + 0.001 us) = 10 ns
            router
                .route(&channel, Correction::new(1.0, 0.001), &mut lanes[0])
                .unwrap();
        }
        let routed = set.by_target(1).unwrap().channel_events(0);
        assert_eq!(routed, &[Event::new(5, 0.004)]);
    }

    #[test]
    fn test_discards_into_omitted_unfiltered() {
        let splitter = splitter();
        let channel = channel();
        let mut set = PartitionBuilder::new(&splitter)
            .include_unfiltered(false)
            .build(std::slice::from_ref(&channel), None);
        let (slots, mut lanes) = set.split_for_routing();
        let router = EventRouter::new(&splitter, slots, RoutingMode::PulseTime);
        let tally = router.route(&channel, Correction::IDENTITY, &mut lanes[0]).unwrap();
        assert_eq!(tally, ChannelTally { routed: 4, discarded: 1 });
        assert_eq!(tally.total(), channel.len() as u64);
    }

    #[test]
    fn test_corrupted_payload_fails() {
        let splitter = splitter();
        let channel = Channel::new(4).with_events(vec![Event::new(1, 0.0), Event::new(2, f64::NAN)]);
        let mut set = PartitionBuilder::new(&splitter).build(std::slice::from_ref(&channel), None);
        let (slots, mut lanes) = set.split_for_routing();
        let router = EventRouter::new(&splitter, slots, RoutingMode::PulseTime);
        let err = router.route(&channel, Correction::IDENTITY, &mut lanes[0]).unwrap_err();
        assert_eq!(
            err,
            RouterError::CorruptedPayload {
                channel: channel.id,
                position: 1
            }
        );

        let lenient = EventRouter::new(&splitter, slots, RoutingMode::PulseTime).validate_payload(false);
        lanes[0].clear();
        assert_eq!(lenient.route(&channel, Correction::IDENTITY, &mut lanes[0]).unwrap().routed, 2);
    }

    #[test]
    fn test_routing_time_overflow_fails() {
        let splitter = splitter();
        let channel = Channel::new(2).with_events(vec![Event::new(1, 0.0), Event::new(i64::MAX - 1, 5.0)]);
        let mut set = PartitionBuilder::new(&splitter).build(std::slice::from_ref(&channel), None);
        let (slots, mut lanes) = set.split_for_routing();
        let router = EventRouter::new(&splitter, slots, RoutingMode::PulseTimeWithTof);
        let err = router.route(&channel, Correction::IDENTITY, &mut lanes[0]).unwrap_err();
        assert_eq!(
            err,
            RouterError::TimeOutOfRange {
                channel: channel.id,
                position: 1
            }
        );

        let pulse_only = EventRouter::new(&splitter, slots, RoutingMode::PulseTime);
        lanes[0].clear();
        assert_eq!(pulse_only.route(&channel, Correction::IDENTITY, &mut lanes[0]).unwrap().routed, 2);

        let lenient = EventRouter::new(&splitter, slots, RoutingMode::PulseTimeWithTof).validate_payload(false);
        let infinite = Channel::new(2).with_events(vec![Event::new(1, f64::INFINITY)]);
        lanes[0].clear();
        assert!(matches!(
            lenient.route(&infinite, Correction::IDENTITY, &mut lanes[0]),
            Err(RouterError::TimeOutOfRange { position: 0, .. })
        ));
    }

    #[test]
    fn test_routing_is_deterministic() {
        let splitter = splitter();
        let channel = Channel::new(0).with_events((0..200).map(|i| Event::new((i * 7919) % 31, (i % 5) as f64)).collect());
        let run = || {
            let mut set = PartitionBuilder::new(&splitter).build(std::slice::from_ref(&channel), None);
            {
                let (slots, mut lanes) = set.split_for_routing();
                EventRouter::new(&splitter, slots, RoutingMode::PulseTimeWithTof)
                    .route(&channel, Correction::new(0.5, 1.0), &mut lanes[0])
                    .unwrap();
            }
            set.into_materialized()
                .into_iter()
                .map(|d| d.channel_events(0).to_vec())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}

// Mon Jan 26 2026 - Alex

use crate::correction::Correction;
use crate::event::Event;
use serde::{Deserialize, Serialize};

/// Which time an event is routed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingMode {
    /// Pulse time only; corrections are not applied to the key.
    PulseTime,
    /// Pulse time plus the channel's corrected time-of-flight.
    #[default]
    PulseTimeWithTof,
}

impl RoutingMode {
    #[inline]
    pub fn key(&self, event: &Event, correction: &Correction) -> Option<i64> {
        match self {
            RoutingMode::PulseTime => Some(event.pulse_time),
            RoutingMode::PulseTimeWithTof => correction.effective_time(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_time_ignores_correction() {
        let event = Event::new(1_000, 50.0);
        let correction = Correction::new(0.5, 10.0);
        assert_eq!(RoutingMode::PulseTime.key(&event, &correction), Some(1_000));
        assert_eq!(RoutingMode::PulseTimeWithTof.key(&event, &correction), Some(1_000 + 35_000));
    }
}

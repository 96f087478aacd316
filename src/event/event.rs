// Mon Jan 19 2026 - Alex

use serde::{Deserialize, Serialize};

/// A single neutron event.
///
/// `pulse_time` is the absolute timestamp in nanoseconds, `tof` the time-of-flight
/// in microseconds relative to that pulse. Weight and error are carried through
/// routing untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub pulse_time: i64,
    pub tof: f64,
    pub weight: f32,
    pub error_squared: f32,
}

impl Event {
    pub fn new(pulse_time: i64, tof: f64) -> Self {
        Self {
            pulse_time,
            tof,
            weight: 1.0,
            error_squared: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f32, error_squared: f32) -> Self {
        self.weight = weight;
        self.error_squared = error_squared;
        self
    }

    /// Pulse time shifted by the corrected time-of-flight, in nanoseconds.
    /// `None` when the shift is not finite or the sum leaves the `i64` range.
    pub fn effective_time(&self, scale: f64, offset: f64) -> Option<i64> {
        let shift_ns = ((self.tof * scale + offset) * 1000.0).round();
        if shift_ns.is_nan() || shift_ns.abs() >= i64::MAX as f64 {
            return None;
        }
        self.pulse_time.checked_add(shift_ns as i64)
    }

    pub fn payload_is_valid(&self) -> bool {
        self.tof.is_finite()
            && self.weight.is_finite()
            && self.error_squared.is_finite()
            && self.error_squared >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_time_identity() {
        let event = Event::new(1_000, 2.5);
        assert_eq!(event.effective_time(1.0, 0.0), Some(3_500));
    }

    #[test]
    fn test_effective_time_rounds_to_nearest_nanosecond() {
        let event = Event::new(0, 0.0014);
        assert_eq!(event.effective_time(1.0, 0.0), Some(1));
        assert_eq!(event.effective_time(0.0, 0.0), Some(0));
        assert_eq!(event.effective_time(0.5, 10.0), Some(10_001));
    }

    #[test]
    fn test_effective_time_out_of_range() {
        assert_eq!(Event::new(5, 1.0).effective_time(1.0, 1.0e16), None);
        assert_eq!(Event::new(5, 1.0).effective_time(1.0, -1.0e16), None);
        assert_eq!(Event::new(i64::MAX - 10, 1.0).effective_time(1.0, 0.0), None);
        assert_eq!(Event::new(i64::MIN + 10, -1.0).effective_time(1.0, 0.0), None);
        assert_eq!(Event::new(0, f64::INFINITY).effective_time(1.0, 0.0), None);
        assert_eq!(Event::new(0, f64::NAN).effective_time(1.0, 0.0), None);
        assert_eq!(Event::new(i64::MAX - 10, 0.005).effective_time(1.0, 0.0), Some(i64::MAX - 5));
    }

    #[test]
    fn test_payload_validation() {
        assert!(Event::new(0, 10.0).payload_is_valid());
        assert!(!Event::new(0, f64::NAN).payload_is_valid());
        assert!(!Event::new(0, 1.0).with_weight(1.0, -1.0).payload_is_valid());
        assert!(!Event::new(0, 1.0).with_weight(f32::INFINITY, 1.0).payload_is_valid());
    }
}

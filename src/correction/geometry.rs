// Thu Jan 22 2026 - Alex

use serde::{Deserialize, Serialize};

const NEUTRON_MASS_KG: f64 = 1.674_927_498_04e-27;
const JOULES_PER_MEV: f64 = 1.602_176_634e-22;

/// Flight path lengths in metres and, for indirect instruments, the
/// analyser energy in meV.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelGeometry {
    pub l1: f64,
    pub l2: f64,
    #[serde(default)]
    pub efixed: Option<f64>,
}

impl ChannelGeometry {
    pub fn new(l1: f64, l2: f64) -> Self {
        Self { l1, l2, efixed: None }
    }

    pub fn with_efixed(mut self, efixed: f64) -> Self {
        self.efixed = Some(efixed);
        self
    }

    pub fn check(&self) -> Result<(), String> {
        if !self.l1.is_finite() || self.l1 <= 0.0 {
            return Err(format!("l1 {} must be positive", self.l1));
        }
        if !self.l2.is_finite() || self.l2 < 0.0 {
            return Err(format!("l2 {} must not be negative", self.l2));
        }
        Ok(())
    }

    pub fn total_path(&self) -> f64 {
        self.l1 + self.l2
    }
}

/// Neutron speed in m/s for a kinetic energy in meV.
pub fn neutron_velocity(energy_mev: f64) -> f64 {
    (2.0 * energy_mev * JOULES_PER_MEV / NEUTRON_MASS_KG).sqrt()
}

/// Flight time in microseconds over `distance` metres at `energy_mev`.
pub fn flight_time_us(distance: f64, energy_mev: f64) -> f64 {
    distance / neutron_velocity(energy_mev) * 1.0e6
}

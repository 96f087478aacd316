// Thu Jan 22 2026 - Alex

use crate::correction::geometry::flight_time_us;
use crate::correction::{CorrectionError, CorrectionTable};
use crate::event::{ChannelInfo, Event};
use log::debug;
use serde::{Deserialize, Serialize};

/// Affine time-of-flight correction `tof * scale + offset`, offset in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub scale: f64,
    pub offset: f64,
}

impl Correction {
    pub const IDENTITY: Correction = Correction { scale: 1.0, offset: 0.0 };

    pub fn new(scale: f64, offset: f64) -> Self {
        Self { scale, offset }
    }

    #[inline]
    pub fn effective_time(&self, event: &Event) -> Option<i64> {
        event.effective_time(self.scale, self.offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionKind {
    #[default]
    None,
    Direct,
    Indirect,
    Elastic,
    Customized,
}

impl CorrectionKind {
    pub fn requires_geometry(&self) -> bool {
        matches!(
            self,
            CorrectionKind::Direct | CorrectionKind::Indirect | CorrectionKind::Elastic
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CorrectionConfig {
    #[serde(default)]
    pub kind: CorrectionKind,
    /// Incident (direct) or final (indirect) energy in meV.
    #[serde(default)]
    pub energy: Option<f64>,
    /// Value of the energy sample log, used when `energy` is unset.
    #[serde(default)]
    pub energy_log_value: Option<f64>,
    #[serde(default)]
    pub table: Option<CorrectionTable>,
}

impl CorrectionConfig {
    pub fn new(kind: CorrectionKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn with_energy(mut self, energy: f64) -> Self {
        self.energy = Some(energy);
        self
    }

    pub fn with_energy_log_value(mut self, value: f64) -> Self {
        self.energy_log_value = Some(value);
        self
    }

    pub fn with_table(mut self, table: CorrectionTable) -> Self {
        self.table = Some(table);
        self
    }

    fn run_energy(&self) -> Result<Option<f64>, CorrectionError> {
        match self.energy.or(self.energy_log_value) {
            Some(energy) if !energy.is_finite() || energy <= 0.0 => Err(CorrectionError::InvalidEnergy(energy)),
            other => Ok(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingGeometry,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChannelCorrection {
    Apply(Correction),
    Skip(SkipReason),
}

/// Per-channel corrections, resolved once before routing and read-only afterwards.
#[derive(Debug, Clone)]
pub struct CorrectionStrategy {
    kind: CorrectionKind,
    corrections: Vec<ChannelCorrection>,
}

impl CorrectionStrategy {
    /// Resolves a correction for every channel, in channel order. Any channel that
    /// cannot be resolved fails the whole build.
    pub fn build(config: &CorrectionConfig, channels: &[ChannelInfo]) -> Result<Self, CorrectionError> {
        let corrections = match config.kind {
            CorrectionKind::None => vec![ChannelCorrection::Apply(Correction::IDENTITY); channels.len()],
            CorrectionKind::Elastic => resolve_geometric(channels, |_, geometry| {
                Ok(Correction::new(geometry.l1 / geometry.total_path(), 0.0))
            })?,
            CorrectionKind::Direct => {
                let ei = config
                    .run_energy()?
                    .ok_or(CorrectionError::MissingEnergyParameter { channel: None })?;
                resolve_geometric(channels, |_, geometry| {
                    Ok(Correction::new(0.0, flight_time_us(geometry.l1, ei)))
                })?
            }
            CorrectionKind::Indirect => {
                let run_energy = config.run_energy()?;
                resolve_geometric(channels, |channel, geometry| {
                    let ef = geometry
                        .efixed
                        .or(run_energy)
                        .ok_or(CorrectionError::MissingEnergyParameter {
                            channel: Some(channel.id),
                        })?;
                    if !ef.is_finite() || ef <= 0.0 {
                        return Err(CorrectionError::InvalidEnergy(ef));
                    }
                    Ok(Correction::new(1.0, -flight_time_us(geometry.l2, ef)))
                })?
            }
            CorrectionKind::Customized => {
                let table = config.table.as_ref().ok_or(CorrectionError::MissingTable)?;
                let entries = table.index()?;
                channels
                    .iter()
                    .enumerate()
                    .map(|(index, channel)| {
                        table
                            .lookup(&entries, index, channel)?
                            .map(ChannelCorrection::Apply)
                            .ok_or(CorrectionError::MissingChannelData { channel: channel.id })
                    })
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        let skipped = corrections
            .iter()
            .filter(|c| matches!(c, ChannelCorrection::Skip(_)))
            .count();
        debug!(
            "Resolved {:?} correction for {} channels ({} without geometry)",
            config.kind,
            channels.len(),
            skipped
        );

        Ok(Self {
            kind: config.kind,
            corrections,
        })
    }

    pub fn kind(&self) -> CorrectionKind {
        self.kind
    }

    /// Correction for the channel at `index` in the list the strategy was built from.
    #[inline]
    pub fn correction(&self, index: usize) -> ChannelCorrection {
        self.corrections
            .get(index)
            .copied()
            .unwrap_or(ChannelCorrection::Skip(SkipReason::MissingGeometry))
    }

    pub fn channel_count(&self) -> usize {
        self.corrections.len()
    }
}

fn resolve_geometric<F>(channels: &[ChannelInfo], f: F) -> Result<Vec<ChannelCorrection>, CorrectionError>
where
    F: Fn(&ChannelInfo, &crate::correction::ChannelGeometry) -> Result<Correction, CorrectionError>,
{
    channels
        .iter()
        .map(|channel| match &channel.geometry {
            None => Ok(ChannelCorrection::Skip(SkipReason::MissingGeometry)),
            Some(geometry) => {
                geometry.check().map_err(|reason| CorrectionError::InvalidGeometry {
                    channel: channel.id,
                    reason,
                })?;
                f(channel, geometry).map(ChannelCorrection::Apply)
            }
        })
        .collect()
}

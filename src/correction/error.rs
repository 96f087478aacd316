// Thu Jan 22 2026 - Alex

use crate::event::ChannelId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CorrectionError {
    #[error("No correction entry for channel {channel}")]
    MissingChannelData { channel: ChannelId },
    #[error("Customized correction requires a correction table")]
    MissingTable,
    #[error("No energy parameter available{}", .channel.as_ref().map(|c| format!(" for channel {}", c)).unwrap_or_default())]
    MissingEnergyParameter { channel: Option<ChannelId> },
    #[error("Energy {0} meV must be positive and finite")]
    InvalidEnergy(f64),
    #[error("Row {row}: scale {scale} for channel {key} is outside [0, 1]")]
    InvalidCorrectionValue { row: usize, key: i64, scale: f64 },
    #[error("Row {row}: offset {offset} for channel {key} is not finite")]
    InvalidOffset { row: usize, key: i64, offset: f64 },
    #[error("Row {row}: channel {key} already has a correction entry")]
    DuplicateChannel { row: usize, key: i64 },
    #[error("Channel {channel} matches table rows for detectors {first} and {second}")]
    ConflictingDetectorRows { channel: ChannelId, first: i64, second: i64 },
    #[error("Channel {channel} has invalid geometry: {reason}")]
    InvalidGeometry { channel: ChannelId, reason: String },
}

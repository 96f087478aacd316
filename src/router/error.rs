// Mon Jan 26 2026 - Alex

use crate::event::ChannelId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error("Channel {channel}: event {position} has a corrupted payload")]
    CorruptedPayload { channel: ChannelId, position: usize },
    #[error("Channel {channel}: event {position} has a routing time outside the representable range")]
    TimeOutOfRange { channel: ChannelId, position: usize },
    #[error("Channel {channel}: expected {expected} destination lanes, found {found}")]
    LaneMismatch {
        channel: ChannelId,
        expected: usize,
        found: usize,
    },
}

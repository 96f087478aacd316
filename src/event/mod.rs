// Mon Jan 19 2026 - Alex

pub mod event;
pub mod channel;
pub mod workspace;

pub use event::Event;
pub use channel::{Channel, ChannelId, ChannelInfo, DetectorId};
pub use workspace::{InputWorkspace, TimeRange};

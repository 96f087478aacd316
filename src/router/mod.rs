// Mon Jan 26 2026 - Alex

pub mod error;
pub mod routing;
pub mod router;

pub use error::RouterError;
pub use routing::RoutingMode;
pub use router::{ChannelTally, EventRouter};

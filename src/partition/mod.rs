// Fri Jan 23 2026 - Alex

pub mod destination;
pub mod builder;

pub use destination::{ChannelLanes, Destination, DestinationSet, TargetSlots};
pub use builder::{destination_name, PartitionBuilder};

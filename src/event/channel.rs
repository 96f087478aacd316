// Mon Jan 19 2026 - Alex

use crate::correction::ChannelGeometry;
use crate::event::Event;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChannelId(pub u32);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DetectorId(pub i32);

impl fmt::Display for DetectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One independent event stream, e.g. a single detector spectrum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    #[serde(default)]
    pub detector_ids: Vec<DetectorId>,
    #[serde(default)]
    pub geometry: Option<ChannelGeometry>,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Channel {
    pub fn new(id: u32) -> Self {
        Self {
            id: ChannelId(id),
            detector_ids: Vec::new(),
            geometry: None,
            events: Vec::new(),
        }
    }

    pub fn with_detector(mut self, detector: i32) -> Self {
        self.detector_ids.push(DetectorId(detector));
        self
    }

    pub fn with_geometry(mut self, geometry: ChannelGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_events(mut self, events: Vec<Event>) -> Self {
        self.events = events;
        self
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn info(&self) -> ChannelInfo {
        ChannelInfo {
            id: self.id,
            detector_ids: self.detector_ids.clone(),
            geometry: self.geometry,
        }
    }
}

/// The part of a channel a correction strategy needs: identity and geometry, no events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub id: ChannelId,
    #[serde(default)]
    pub detector_ids: Vec<DetectorId>,
    #[serde(default)]
    pub geometry: Option<ChannelGeometry>,
}

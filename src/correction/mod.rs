// Thu Jan 22 2026 - Alex

pub mod error;
pub mod geometry;
pub mod table;
pub mod strategy;

pub use error::CorrectionError;
pub use geometry::ChannelGeometry;
pub use table::{CorrectionRow, CorrectionTable, TableKey};
pub use strategy::{
    ChannelCorrection, Correction, CorrectionConfig, CorrectionKind, CorrectionStrategy, SkipReason,
};

// Tue Jan 27 2026 - Alex

use crate::config::ConfigError;
use crate::correction::CorrectionError;
use crate::event::ChannelId;
use crate::orchestrator::RunOutput;
use crate::router::RouterError;
use crate::splitter::SplitterError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Splitter validation failed: {0}")]
    Splitter(#[from] SplitterError),
    #[error("Correction setup failed: {0}")]
    Correction(#[from] CorrectionError),
    #[error("Unsupported input: {0} workspaces cannot be split event by event")]
    UnsupportedInput(&'static str),
    #[error("Expected {expected} channels, found {found}")]
    ChannelCountMismatch { expected: usize, found: usize },
    #[error("Failed to create worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("Processing failed for channel {channel}: {source}")]
    Processing {
        channel: ChannelId,
        source: RouterError,
        partial: Box<RunOutput>,
    },
}

impl EngineError {
    /// Destinations of the channels that finished before a processing failure.
    pub fn partial(&self) -> Option<&RunOutput> {
        match self {
            EngineError::Processing { partial, .. } => Some(partial),
            _ => None,
        }
    }

    pub fn into_partial(self) -> Option<RunOutput> {
        match self {
            EngineError::Processing { partial, .. } => Some(*partial),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

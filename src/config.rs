// Tue Jan 27 2026 - Alex

use crate::correction::CorrectionConfig;
use crate::router::RoutingMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_threads: usize,
    pub routing_mode: RoutingMode,
    pub correction: CorrectionConfig,
    pub include_unfiltered: bool,
    pub base_name: String,
    pub validate_payload: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_threads: num_cpus::get(),
            routing_mode: RoutingMode::PulseTimeWithTof,
            correction: CorrectionConfig::default(),
            include_unfiltered: true,
            base_name: "split".to_string(),
            validate_payload: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_threads(mut self, threads: usize) -> Self {
        self.max_threads = threads;
        self
    }

    pub fn with_routing_mode(mut self, mode: RoutingMode) -> Self {
        self.routing_mode = mode;
        self
    }

    pub fn with_correction(mut self, correction: CorrectionConfig) -> Self {
        self.correction = correction;
        self
    }

    pub fn with_include_unfiltered(mut self, include: bool) -> Self {
        self.include_unfiltered = include;
        self
    }

    pub fn with_base_name(mut self, base: &str) -> Self {
        self.base_name = base.to_string();
        self
    }

    pub fn with_validate_payload(mut self, validate: bool) -> Self {
        self.validate_payload = validate;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_threads == 0 {
            return Err("max_threads must be greater than 0".to_string());
        }
        if self.base_name.is_empty() {
            return Err("base_name must not be empty".to_string());
        }
        if self.base_name.chars().any(char::is_whitespace) {
            return Err(format!("base_name '{}' must not contain whitespace", self.base_name));
        }
        Ok(())
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate().map_err(ConfigError::ValidationError)?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_json_str(&content)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
            }
        }
        fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }
}

#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Config file not found: {0:?}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Serialize error: {0}")]
    SerializeError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

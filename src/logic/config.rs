//! Service Configuration
//!
//! Defaults come from `constants`, then an optional JSON file, then env.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;
use crate::logic::alert::AlertConfig;
use crate::logic::classifier::AssetPaths;
use crate::logic::events::EventFilter;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Worker queue / timeout settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub queue_capacity: usize,
    pub inference_timeout_ms: u64,
    /// Blocking threads available to inference
    pub inference_threads: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: constants::DEFAULT_QUEUE_CAPACITY,
            inference_timeout_ms: constants::DEFAULT_INFERENCE_TIMEOUT_MS,
            inference_threads: 2,
        }
    }
}

impl WorkerConfig {
    pub fn inference_timeout(&self) -> Duration {
        Duration::from_millis(self.inference_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub assets_dir: PathBuf,
    pub alert: AlertConfig,
    pub filter: EventFilter,
    pub worker: WorkerConfig,
    /// Write alerts here in addition to the log
    pub alert_file: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            assets_dir: constants::get_assets_dir(),
            alert: AlertConfig::default(),
            filter: EventFilter::default(),
            worker: WorkerConfig::default(),
            alert_file: None,
        }
    }
}

impl ServiceConfig {
    /// Parse a JSON config; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// `$SCAM_DETECTOR_CONFIG` file (or defaults) + env overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(constants::get_config_path().as_deref(), Self::apply_env_overrides)
    }

    /// File (or defaults), then `overrides`, validated once at the end
    fn resolve(path: Option<&Path>, overrides: impl FnOnce(&mut Self)) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                log::info!("Loading config from {:?}", path);
                Self::read_file(path)?
            }
            None => Self::default(),
        };
        overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(threshold) = constants::get_alert_threshold() {
            self.alert.thresholds.alert_threshold = threshold;
        }
        if let Some(secs) = constants::get_debounce_secs() {
            self.alert.debounce_secs = secs;
        }
        if let Some(ms) = constants::get_inference_timeout_ms() {
            self.worker.inference_timeout_ms = ms;
        }
        if let Some(path) = constants::get_alert_file() {
            self.alert_file = Some(path);
        }
        if let Some(enabled) = constants::is_window_content_enabled() {
            self.filter.monitor_window_content = enabled;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.alert.thresholds.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "alert_threshold {} must be within [{}, 1.0]",
                self.alert.thresholds.alert_threshold,
                constants::LABEL_CUTOFF
            )));
        }
        if self.alert.debounce_capacity == 0 {
            return Err(ConfigError::Invalid("debounce_capacity must be > 0".to_string()));
        }
        if self.alert.key_prefix_chars == 0 {
            return Err(ConfigError::Invalid("key_prefix_chars must be > 0".to_string()));
        }
        if self.worker.queue_capacity == 0 {
            return Err(ConfigError::Invalid("queue_capacity must be > 0".to_string()));
        }
        if self.worker.inference_timeout_ms == 0 {
            return Err(ConfigError::Invalid("inference_timeout_ms must be > 0".to_string()));
        }
        if self.worker.inference_threads == 0 {
            return Err(ConfigError::Invalid("inference_threads must be > 0".to_string()));
        }
        Ok(())
    }

    pub fn asset_paths(&self) -> AssetPaths {
        AssetPaths::in_dir(&self.assets_dir)
    }
}

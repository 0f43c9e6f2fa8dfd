//! Configuration management for color-detector.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::camera::{CameraConstraints, Facing};
use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "color-detector";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "store.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `COLOR_DETECTOR_`)
/// 2. TOML config file at `~/.config/color-detector/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Camera configuration.
    pub camera: CameraConfig,
    /// Sampler configuration.
    pub sampler: SamplerConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Offline cache configuration.
    pub offline: OfflineConfig,
}

/// Camera-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Index of the capture device to open.
    pub device_index: u32,
    /// Preferred frame width.
    pub ideal_width: u32,
    /// Preferred frame height.
    pub ideal_height: u32,
    /// Preferred facing mode.
    pub facing: Facing,
}

/// Sampler-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Interval between samples in milliseconds.
    pub interval_ms: u64,
    /// Number of recent samples kept in history.
    pub history_len: usize,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/color-detector/store.db`
    pub database_path: Option<PathBuf>,
}

/// Offline cache configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfflineConfig {
    /// Prefix shared by every cache generation.
    pub cache_prefix: String,
    /// Version suffix of the current cache generation.
    pub cache_version: String,
    /// The app's own origin; other origins pass through.
    pub origin: String,
    /// Root-relative paths stored at install time.
    pub precache: Vec<String>,
    /// URL substrings that always pass through.
    pub passthrough_markers: Vec<String>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let constraints = CameraConstraints::default();
        Self {
            device_index: constraints.device_index,
            ideal_width: constraints.ideal_width,
            ideal_height: constraints.ideal_height,
            facing: constraints.facing,
        }
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 500,
            history_len: crate::history::DEFAULT_CAPACITY,
        }
    }
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            cache_prefix: "color-detector-cache-".to_string(),
            cache_version: "v1.2.1".to_string(),
            origin: "http://localhost:3000".to_string(),
            precache: default_precache(),
            passthrough_markers: vec!["getUserMedia".to_string()],
        }
    }
}

/// Default static assets stored at install time.
fn default_precache() -> Vec<String> {
    [
        "/",
        "/index.html",
        "/manifest.json",
        "/icons.png",
        "/icon-512.png",
        "/icon-maskable.png",
        "/apple-icon.png",
        "/splash.png",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

impl OfflineConfig {
    /// Name of the current cache generation.
    #[must_use]
    pub fn cache_name(&self) -> String {
        format!("{}{}", self.cache_prefix, self.cache_version)
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("COLOR_DETECTOR_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.sampler.interval_ms == 0 {
            return Err(invalid("sampler.interval_ms must be greater than 0"));
        }

        if self.sampler.history_len == 0 {
            return Err(invalid("sampler.history_len must be greater than 0"));
        }

        if self.camera.ideal_width == 0 || self.camera.ideal_height == 0 {
            return Err(invalid(format!(
                "camera resolution must be non-zero (got {}x{})",
                self.camera.ideal_width, self.camera.ideal_height
            )));
        }

        if self.offline.cache_prefix.is_empty() || self.offline.cache_version.is_empty() {
            return Err(invalid(
                "offline.cache_prefix and offline.cache_version must not be empty",
            ));
        }

        if let Err(e) = url::Url::parse(&self.offline.origin) {
            return Err(invalid(format!(
                "offline.origin '{}' is not a URL: {e}",
                self.offline.origin
            )));
        }

        for path in &self.offline.precache {
            if !path.starts_with('/') {
                return Err(invalid(format!(
                    "precache entry must be root-relative: {path}"
                )));
            }
        }

        if self.offline.passthrough_markers.iter().any(String::is_empty) {
            return Err(invalid("offline.passthrough_markers must not contain empty strings"));
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the sample interval as a Duration.
    #[must_use]
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sampler.interval_ms)
    }

    /// Build camera acquisition constraints.
    #[must_use]
    pub fn camera_constraints(&self) -> CameraConstraints {
        CameraConstraints {
            facing: self.camera.facing,
            ideal_width: self.camera.ideal_width,
            ideal_height: self.camera.ideal_height,
            device_index: self.camera.device_index,
        }
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::ConfigValidation {
        message: message.into(),
    }
}

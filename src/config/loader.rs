use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/streakstore/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("streakstore").join("config.toml")
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns `Config::default()` if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Config::default());
        }

        Self::load_from(&path)
    }

    /// Reads, parses and validates the file at `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - Timer intervals are non-zero
    /// - The multiplier period is non-zero
    /// - The zoom range is not inverted
    pub fn validate(&self) -> Result<(), ConfigError> {
        let streak = &self.streak;

        if streak.debounce_ms == 0 || streak.decay_interval_ms == 0 {
            return Err(ConfigError::ValidationError {
                message: "debounce_ms and decay_interval_ms must be greater than zero"
                    .to_string(),
            });
        }

        if streak.multiplier_period == 0 {
            return Err(ConfigError::ValidationError {
                message: "multiplier_period must be greater than zero".to_string(),
            });
        }

        if streak.min_zoom > streak.max_zoom {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "min_zoom ({}) is greater than max_zoom ({})",
                    streak.min_zoom, streak.max_zoom
                ),
            });
        }

        Ok(())
    }
}

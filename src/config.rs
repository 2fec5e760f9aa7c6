use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const APP_NAME: &str = "reminder-tui";

const DEFAULT_WEEKS: u32 = 6;
const DEFAULT_MAX_WEEKS: u32 = 52;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// JSON document published by the backend.
    pub data_file: PathBuf,
    /// Horizon shown at startup, in weeks.
    pub default_weeks: u32,
    pub max_weeks: u32,
    pub log_file: PathBuf,
    pub fetch_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        FileConfig::default().into_config()
    }
}

impl Config {
    /// Load `config.toml` from the user config directory. A missing file
    /// yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match config_path() {
            Some(path) if path.exists() => Self::from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FileConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        file.validate().map_err(|reason| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(file.into_config())
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let file: FileConfig = toml::from_str(content)?;
        Ok(file.into_config())
    }

    /// Set the startup horizon, keeping it within `max_weeks`.
    pub fn set_weeks(&mut self, weeks: u32) {
        self.default_weeks = weeks.min(self.max_weeks);
    }
}

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

// ── TOML config types ──

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    data_file: Option<PathBuf>,
    default_weeks: Option<u32>,
    max_weeks: Option<u32>,
    log_file: Option<PathBuf>,
    fetch_timeout_secs: Option<u64>,
}

impl FileConfig {
    fn validate(&self) -> Result<(), String> {
        if self.fetch_timeout_secs == Some(0) {
            return Err("fetch_timeout_secs must be at least 1".to_string());
        }
        Ok(())
    }

    fn into_config(self) -> Config {
        let max_weeks = self.max_weeks.unwrap_or(DEFAULT_MAX_WEEKS);
        Config {
            data_file: self
                .data_file
                .unwrap_or_else(|| data_dir().join("data.json")),
            default_weeks: self.default_weeks.unwrap_or(DEFAULT_WEEKS).min(max_weeks),
            max_weeks,
            log_file: self
                .log_file
                .unwrap_or_else(|| data_dir().join(format!("{APP_NAME}.log"))),
            fetch_timeout: Duration::from_secs(
                self.fetch_timeout_secs
                    .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS)
                    .max(1),
            ),
        }
    }
}

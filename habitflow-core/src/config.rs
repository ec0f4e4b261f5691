//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/habitflow/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/habitflow/` (~/.config/habitflow/)
//! - Data: `$XDG_DATA_HOME/habitflow/` (~/.local/share/habitflow/)
//! - State/Logs: `$XDG_STATE_HOME/habitflow/` (~/.local/state/habitflow/)

use crate::analytics::AnalyticsPolicy;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Scoring and streak constants
    #[serde(default)]
    pub analytics: AnalyticsPolicy,

    /// Habit store location
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Habit store configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct StoreConfig {
    /// Override path for the habits JSON file
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// Configured path, or the default under the data directory
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(Config::habits_path)
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        Self::parse(&content)
    }

    /// Parse and validate configuration text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.analytics.validate()?;
        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/habitflow/config.toml` (~/.config/habitflow/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("habitflow").join("config.toml")
    }

    /// Returns the data directory path (for the habit store)
    ///
    /// `$XDG_DATA_HOME/habitflow/` (~/.local/share/habitflow/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("habitflow")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/habitflow/` (~/.local/state/habitflow/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("habitflow")
    }

    /// Returns the default habit store path
    ///
    /// `$XDG_DATA_HOME/habitflow/habits.json` (~/.local/share/habitflow/habits.json)
    pub fn habits_path() -> PathBuf {
        Self::data_dir().join("habits.json")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/habitflow/habitflow.log` (~/.local/state/habitflow/habitflow.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("habitflow.log")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_DATA_HOME").is_err() {
            std::env::set_var("XDG_DATA_HOME", home.join(".local/share"));
        }

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}

//! Configuration management for wealthweb
//!
//! This module handles loading, validation, and management of
//! wealthweb configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigResult};

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

/// Where the ledger state blob lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the state file
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// State file name
    #[serde(default = "default_state_file")]
    pub state_file: String,
    /// Write indented JSON
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            state_file: default_state_file(),
            pretty: true,
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_state_file() -> String {
    "wealth_tracker_data_v1.json".to_string()
}

fn default_true() -> bool {
    true
}

/// Profile used when seeding a fresh ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default = "default_user_name")]
    pub name: String,
    /// Currency symbol shown next to amounts
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            name: default_user_name(),
            currency: default_currency(),
        }
    }
}

fn default_user_name() -> String {
    "User".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Bulk import behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Accept TRANSFER rows without a destination account
    #[serde(default)]
    pub allow_one_sided_transfers: bool,
    /// Note given to imported rows that carry none
    #[serde(default = "default_note")]
    pub default_note: String,
    /// Icon for categories created during import
    #[serde(default = "default_auto_icon")]
    pub auto_created_icon: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            allow_one_sided_transfers: false,
            default_note: default_note(),
            auto_created_icon: default_auto_icon(),
        }
    }
}

fn default_note() -> String {
    "Imported".to_string()
}

fn default_auto_icon() -> String {
    "❓".to_string()
}

/// Analytics settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Lookback used by the trend endpoint when none is given
    #[serde(default)]
    pub default_lookback: Lookback,
    /// Months averaged when judging whether a goal is on track
    #[serde(default = "default_savings_window")]
    pub savings_window_months: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            default_lookback: Lookback::default(),
            savings_window_months: default_savings_window(),
        }
    }
}

fn default_savings_window() -> u32 {
    3
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Trend lookback window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lookback {
    /// Every transaction on record
    All,
    /// Last 12 months
    #[serde(rename = "1y")]
    OneYear,
    /// Last 6 months
    #[serde(rename = "6m")]
    SixMonths,
    /// Last 3 months
    #[serde(rename = "3m")]
    ThreeMonths,
}

impl Default for Lookback {
    fn default() -> Self {
        Lookback::SixMonths
    }
}

impl Lookback {
    /// Window length in months, `None` for `All`
    pub fn months(&self) -> Option<u32> {
        match self {
            Lookback::All => None,
            Lookback::OneYear => Some(12),
            Lookback::SixMonths => Some(6),
            Lookback::ThreeMonths => Some(3),
        }
    }
}

impl std::str::FromStr for Lookback {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Lookback::All),
            "1y" => Ok(Lookback::OneYear),
            "6m" => Ok(Lookback::SixMonths),
            "3m" => Ok(Lookback::ThreeMonths),
            _ => Err(format!("Invalid lookback: {}", s)),
        }
    }
}

impl std::fmt::Display for Lookback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lookback::All => write!(f, "all"),
            Lookback::OneYear => write!(f, "1y"),
            Lookback::SixMonths => write!(f, "6m"),
            Lookback::ThreeMonths => write!(f, "3m"),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// State file settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Seed profile
    #[serde(default)]
    pub user: UserConfig,
    /// Bulk import settings
    #[serde(default)]
    pub import: ImportConfig,
    /// Analytics settings
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?;

        config.validate()?;
        log::debug!(target: "wealthweb::config", "configuration loaded: {:?}", config);
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.storage.state_file.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "storage.state_file".to_string(),
                reason: "State file name must not be empty".to_string(),
            });
        }

        if self.analytics.savings_window_months == 0 || self.analytics.savings_window_months > 24 {
            return Err(ConfigError::InvalidValue {
                field: "analytics.savings_window_months".to_string(),
                reason: "Savings window must be between 1 and 24 months".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Full path of the persisted state file
    pub fn state_path(&self) -> PathBuf {
        self.storage.path.join(&self.storage.state_file)
    }
}

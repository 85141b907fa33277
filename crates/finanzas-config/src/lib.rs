//! Configuration management for finanzas
//!
//! Loads and validates the YAML configuration shared by the API server
//! and the command line reports.

pub mod error;

use finanzas_utils::NumberFormat;
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

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding one JSON document per user
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// User whose document is loaded
    #[serde(default = "default_user")]
    pub user: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            user: default_user(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_user() -> String {
    "default".to_string()
}

/// Report thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Spending execution percentage above which a month is near its limit
    #[serde(default = "default_near_limit")]
    pub near_limit_threshold: f64,
    /// Number of concepts listed by "largest deviation" views
    #[serde(default = "default_top_deviations")]
    pub top_deviations: usize,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            near_limit_threshold: default_near_limit(),
            top_deviations: default_top_deviations(),
        }
    }
}

fn default_near_limit() -> f64 {
    80.0
}

fn default_top_deviations() -> usize {
    5
}

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default)]
    pub decimal_places: u32,
    #[serde(default = "default_thousands_sep")]
    pub thousands_separator: String,
    #[serde(default = "default_decimal_sep")]
    pub decimal_separator: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            decimal_places: 0,
            thousands_separator: default_thousands_sep(),
            decimal_separator: default_decimal_sep(),
        }
    }
}

impl CurrencyConfig {
    /// Display settings for text output
    pub fn number_format(&self) -> NumberFormat {
        NumberFormat {
            symbol: self.symbol.clone(),
            decimal_places: self.decimal_places,
            thousands_separator: self.thousands_separator.clone(),
            decimal_separator: self.decimal_separator.clone(),
        }
    }
}

fn default_symbol() -> String {
    "$".to_string()
}

fn default_thousands_sep() -> String {
    ".".to_string()
}

fn default_decimal_sep() -> String {
    ",".to_string()
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

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub reports: ReportsConfig,
    #[serde(default)]
    pub currency: CurrencyConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
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
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(invalid("server.port", "Port must be greater than 0"));
        }

        if self.data.user.trim().is_empty() {
            return Err(invalid("data.user", "User must not be empty"));
        }

        let threshold = self.reports.near_limit_threshold;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(invalid(
                "reports.near_limit_threshold",
                "Threshold must be between 0 and 100",
            ));
        }

        if self.currency.decimal_places > 6 {
            return Err(invalid(
                "currency.decimal_places",
                "Decimal places must be between 0 and 6",
            ));
        }

        if self.currency.thousands_separator == self.currency.decimal_separator {
            return Err(invalid(
                "currency.decimal_separator",
                "Thousands and decimal separators must differ",
            ));
        }

        Ok(())
    }

    /// The bundled default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Path of the JSON document for the configured user
    pub fn state_path(&self) -> PathBuf {
        self.data.path.join(format!("{}.json", self.data.user))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; the Telegram bot token comes from
//! the `TELEGRAM_BOT_TOKEN` environment variable instead.
//!
//! # Example
//!
//! ```no_run
//! use pricehound::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use url::Url;

use super::catalog::CatalogConfig;
use super::filter::FilterConfig;
use super::logging::LoggingConfig;
use super::monitor::MonitorConfig;
use super::telegram::TelegramAppConfig;
use crate::domain::command::MAX_RECENT_LIMIT;
use crate::domain::AlertFilter;
use crate::error::{ConfigError, Result};

/// Main application configuration.
///
/// Static for the lifetime of the process. Load from a TOML file using
/// [`Config::load`] or parse directly with [`Config::parse_toml`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Catalog endpoint and HTTP settings.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Telegram transport settings.
    #[serde(default)]
    pub telegram: TelegramAppConfig,

    /// Poll and summary cadence, state file location.
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Alert filters.
    #[serde(default)]
    pub filters: FilterConfig,

    /// Logging and tracing configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("api_url", &self.catalog.api_url),
            ("web_origin", &self.catalog.web_origin),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField { field }.into());
            }
            Url::parse(value).map_err(|e| ConfigError::InvalidValue {
                field,
                reason: e.to_string(),
            })?;
        }
        if self.catalog.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.catalog.max_pages == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_pages",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.monitor.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.monitor.summary_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "summary_interval_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.monitor.state_file.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "state_file",
            }
            .into());
        }
        if !(1..=MAX_RECENT_LIMIT).contains(&self.monitor.recent_limit) {
            return Err(ConfigError::InvalidValue {
                field: "recent_limit",
                reason: format!("must be between 1 and {MAX_RECENT_LIMIT}"),
            }
            .into());
        }
        if self.telegram.send_timeout_ms == 0 || self.telegram.poll_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "telegram_timeouts",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if let (Some(min), Some(max)) = (self.filters.min_price, self.filters.max_price) {
            if min > max {
                return Err(ConfigError::InvalidValue {
                    field: "min_price",
                    reason: format!("must be <= max_price ({max})"),
                }
                .into());
            }
        }
        self.logging.validate()
    }

    /// Immutable alert filter built from `[filters]`.
    #[must_use]
    pub fn alert_filter(&self) -> AlertFilter {
        self.filters.to_filter()
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

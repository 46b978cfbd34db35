//! Telegram transport configuration.

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Environment variable holding the bot token.
pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

const fn default_true() -> bool {
    true
}

/// Telegram transport configuration.
///
/// The bot token is never read from the config file; see [`bot_token_from_env`].
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramAppConfig {
    /// Per-recipient delivery timeout in milliseconds (default: 5000).
    #[serde(default = "default_send_timeout_ms")]
    pub send_timeout_ms: u64,
    /// Timeout for one inbound update retrieval in milliseconds (default: 10000).
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,
    /// Publish the command menu at startup.
    #[serde(default = "default_true")]
    pub register_commands: bool,
}

const fn default_send_timeout_ms() -> u64 {
    5_000
}

const fn default_poll_timeout_ms() -> u64 {
    10_000
}

impl Default for TelegramAppConfig {
    fn default() -> Self {
        Self {
            send_timeout_ms: default_send_timeout_ms(),
            poll_timeout_ms: default_poll_timeout_ms(),
            register_commands: default_true(),
        }
    }
}

/// Read the bot token from `TELEGRAM_BOT_TOKEN`.
///
/// # Errors
///
/// Returns [`ConfigError::MissingField`] when the variable is unset or blank.
pub fn bot_token_from_env() -> Result<String> {
    match std::env::var(BOT_TOKEN_ENV) {
        Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(ConfigError::MissingField {
            field: BOT_TOKEN_ENV,
        }
        .into()),
    }
}

//! Composition root: turns a validated [`Config`] into a ready [`Monitor`].

use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "telegram")]
use tracing::info;

#[cfg(feature = "telegram")]
use crate::adapter::outbound::catalog::CatalogClient;
#[cfg(feature = "telegram")]
use crate::adapter::outbound::store::JsonFileStore;
#[cfg(feature = "telegram")]
use crate::adapter::outbound::telegram::TelegramMessenger;
use crate::application::monitor::{Monitor, MonitorPorts, MonitorSettings};
use crate::domain::Normalizer;
#[cfg(feature = "telegram")]
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
#[cfg(feature = "telegram")]
use crate::infrastructure::config::telegram::bot_token_from_env;
use crate::port::{CatalogSource, Messenger, StateStore};

/// Resolve the monitor's runtime knobs from configuration.
#[must_use]
pub fn monitor_settings(config: &Config) -> MonitorSettings {
    MonitorSettings {
        poll_interval: config.monitor.poll_interval(),
        summary_interval: config.monitor.summary_interval(),
        max_pages: config.catalog.max_pages,
        recent_limit: config.monitor.recent_limit,
        announce_startup: config.monitor.announce_startup,
        register_commands: config.telegram.register_commands,
        send_timeout: Duration::from_millis(config.telegram.send_timeout_ms),
        poll_timeout: Duration::from_millis(config.telegram.poll_timeout_ms),
    }
}

/// Wire a monitor around arbitrary port implementations.
#[must_use]
pub fn build_monitor(
    config: &Config,
    catalog: Arc<dyn CatalogSource>,
    messenger: Arc<dyn Messenger>,
    store: Arc<dyn StateStore>,
) -> Monitor {
    Monitor::new(
        MonitorPorts {
            catalog,
            messenger,
            store,
        },
        Normalizer::new(config.catalog.web_origin.as_str()),
        config.alert_filter(),
        monitor_settings(config),
    )
}

/// Wire the production adapters: HTTP catalog, Telegram, JSON state file.
///
/// # Errors
///
/// Returns an error if `TELEGRAM_BOT_TOKEN` is unset or the catalog URL is
/// invalid.
#[cfg(feature = "telegram")]
pub fn build_production_monitor(config: &Config) -> Result<Monitor> {
    let token = bot_token_from_env()?;
    let catalog = CatalogClient::from_config(&config.catalog)?;
    let store = JsonFileStore::new(&config.monitor.state_file);

    info!(
        api_url = %catalog.api_url(),
        state_file = %store.path().display(),
        filters = %config.alert_filter().describe(),
        "Adapters ready"
    );

    Ok(build_monitor(
        config,
        Arc::new(catalog),
        Arc::new(TelegramMessenger::new(token)),
        Arc::new(store),
    ))
}

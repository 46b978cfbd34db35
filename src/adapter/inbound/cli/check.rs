//! Handler for the `check` command.

use crate::adapter::inbound::cli::command::CheckArgs;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::config::telegram::{bot_token_from_env, BOT_TOKEN_ENV};

/// Validate the configuration file without starting the monitor.
pub fn execute(args: &CheckArgs) -> Result<()> {
    let config = Config::load(&args.config)?;

    output::section("Configuration Check");
    output::field("Config", args.config.display());
    output::success("Configuration file is valid");

    output::section("Catalog");
    output::field("Endpoint", &config.catalog.api_url);
    output::field("Query", &config.catalog.query);
    output::field("Max pages", config.catalog.max_pages);

    output::section("Monitor");
    output::field("Poll interval", format!("{}s", config.monitor.poll_interval_secs));
    output::field(
        "Summary interval",
        format!("{}s", config.monitor.summary_interval_secs),
    );
    output::field("State file", &config.monitor.state_file);
    output::field("Alert filters", config.alert_filter().describe());

    if bot_token_from_env().is_ok() {
        output::success("Telegram bot token detected");
    } else {
        output::warning(&format!("{BOT_TOKEN_ENV} is not set; `run` will refuse to start"));
    }

    Ok(())
}

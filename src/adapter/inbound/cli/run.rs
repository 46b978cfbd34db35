//! Handler for the `run` command.

use tracing::info;

use crate::adapter::inbound::cli::command::RunArgs;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::runtime;

/// Load configuration, wire the adapters and run until interrupted.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = Config::load(&args.config)?;
    if let Some(level) = &args.log_level {
        config.logging.level.clone_from(level);
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }
    config.init_logging();

    info!(
        config = %args.config.display(),
        poll_interval_secs = config.monitor.poll_interval_secs,
        "pricehound starting"
    );

    let monitor = bootstrap::build_production_monitor(&config)?;
    let state = monitor.load_state();

    let state = if args.once {
        runtime::run_once(monitor, state).await
    } else {
        runtime::run_until_interrupted(monitor, state).await?
    };

    info!(
        products = state.seen_products.len(),
        subscribers = state.subscribers.len(),
        "pricehound stopped"
    );
    Ok(())
}

//! Process-level run loop with Ctrl+C handling.

use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

use crate::application::monitor::Monitor;
use crate::domain::MonitorState;
use crate::error::{Error, Result};

fn map_task_result(
    result: std::result::Result<MonitorState, tokio::task::JoinError>,
) -> Result<MonitorState> {
    result.map_err(|e| {
        error!(error = %e, "Monitor task join failed");
        Error::Task(e.to_string())
    })
}

/// Run the monitor until Ctrl+C.
///
/// The interrupt is forwarded through a watch channel; the monitor finishes
/// the cycle in progress (including persistence) before this returns.
pub async fn run_until_interrupted(monitor: Monitor, state: MonitorState) -> Result<MonitorState> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut handle = tokio::spawn(monitor.run(state, shutdown_rx));

    tokio::select! {
        result = &mut handle => {
            return map_task_result(result);
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received (Ctrl+C)");
            let _ = shutdown_tx.send(true);
        }
    }

    map_task_result(handle.await)
}

/// Run exactly one cycle, after the startup steps.
pub async fn run_once(mut monitor: Monitor, mut state: MonitorState) -> MonitorState {
    monitor.start(&state).await;
    let report = monitor.run_cycle(&mut state, chrono::Utc::now()).await;
    info!(?report, "Single cycle complete");
    state
}

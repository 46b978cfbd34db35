//! Scheduler loop configuration.

use std::time::Duration;

use serde::Deserialize;

const fn default_true() -> bool {
    true
}

/// Polling cadence, summary cadence and state location.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Seconds to sleep between cycles (default: 10).
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Seconds between periodic summaries (default: 1200).
    #[serde(default = "default_summary_interval_secs")]
    pub summary_interval_secs: u64,
    /// Path of the JSON state document.
    #[serde(default = "default_state_file")]
    pub state_file: String,
    /// Default item count for the recent-items command (default: 10).
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    /// Broadcast a startup message to existing subscribers.
    #[serde(default = "default_true")]
    pub announce_startup: bool,
}

const fn default_poll_interval_secs() -> u64 {
    10
}

const fn default_summary_interval_secs() -> u64 {
    1_200
}

fn default_state_file() -> String {
    "pricehound_state.json".to_string()
}

const fn default_recent_limit() -> usize {
    10
}

impl MonitorConfig {
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    #[must_use]
    pub fn summary_interval(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.summary_interval_secs).unwrap_or(i64::MAX))
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            summary_interval_secs: default_summary_interval_secs(),
            state_file: default_state_file(),
            recent_limit: default_recent_limit(),
            announce_startup: default_true(),
        }
    }
}

//! The scheduler cycle and loop.
//!
//! # Cycle
//!
//! ```text
//! fetch pages -> normalize -> diff baseline -> price-drop alerts
//!     -> new-product alerts -> commands -> periodic summary -> persist
//! ```
//!
//! [`Monitor::run_cycle`] runs exactly one cycle against a caller-owned
//! [`MonitorState`] and never sleeps, so tests drive it directly.
//! [`Monitor::run`] repeats it until the shutdown signal flips, always
//! finishing (and persisting) the cycle in progress first.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{error, info, warn};

use super::catalog::collect_catalog;
use super::commands::{CommandContext, CommandProcessor};
use super::format;
use super::notifier::Broadcaster;
use crate::domain::command::bot_commands;
use crate::domain::{
    apply_observations, AlertFilter, MonitorState, NormalizedProduct, Normalizer,
};
use crate::port::{CatalogSource, Messenger, StateStore};

/// Runtime knobs for the monitor, resolved from configuration.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub poll_interval: Duration,
    pub summary_interval: chrono::Duration,
    pub max_pages: u32,
    pub recent_limit: usize,
    pub announce_startup: bool,
    pub register_commands: bool,
    pub send_timeout: Duration,
    pub poll_timeout: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            summary_interval: chrono::Duration::seconds(1_200),
            max_pages: 50,
            recent_limit: 10,
            announce_startup: true,
            register_commands: true,
            send_timeout: Duration::from_secs(5),
            poll_timeout: Duration::from_secs(10),
        }
    }
}

/// What one cycle did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Page 0 failed; diff, alerts and summary were skipped.
    pub fetch_failed: bool,
    pub products_seen: usize,
    pub new_detected: usize,
    pub new_alerted: usize,
    pub drops_detected: usize,
    pub drops_alerted: usize,
    pub commands_handled: usize,
    pub summary_sent: bool,
    pub persisted: bool,
}

/// Collaborators the monitor drives.
pub struct MonitorPorts {
    pub catalog: Arc<dyn CatalogSource>,
    pub messenger: Arc<dyn Messenger>,
    pub store: Arc<dyn StateStore>,
}

/// Single-writer scheduler over the catalog, messenger and state store.
pub struct Monitor {
    catalog: Arc<dyn CatalogSource>,
    messenger: Arc<dyn Messenger>,
    store: Arc<dyn StateStore>,
    normalizer: Normalizer,
    filter: AlertFilter,
    settings: MonitorSettings,
    broadcaster: Broadcaster,
    commands: CommandProcessor,
    /// Latest successfully fetched batch; commands render from it when a
    /// fetch fails.
    last_batch: Vec<NormalizedProduct>,
}

impl Monitor {
    pub fn new(
        ports: MonitorPorts,
        normalizer: Normalizer,
        filter: AlertFilter,
        settings: MonitorSettings,
    ) -> Self {
        let broadcaster = Broadcaster::new(ports.messenger.clone(), settings.send_timeout);
        let commands = CommandProcessor::new(
            ports.messenger.clone(),
            settings.send_timeout,
            settings.poll_timeout,
        );

        Self {
            catalog: ports.catalog,
            messenger: ports.messenger,
            store: ports.store,
            normalizer,
            filter,
            settings,
            broadcaster,
            commands,
            last_batch: Vec::new(),
        }
    }

    /// Load the persisted state through the store.
    #[must_use]
    pub fn load_state(&self) -> MonitorState {
        self.store.load()
    }

    /// Register the command menu and announce the start to subscribers.
    pub async fn start(&self, state: &MonitorState) {
        if self.settings.register_commands {
            if let Err(e) = self.messenger.register_commands(&bot_commands()).await {
                warn!(error = %e, "Failed to register bot commands");
            }
        }

        if self.settings.announce_startup && !state.subscribers.is_empty() {
            let text = format::startup_text(
                self.settings.poll_interval.as_secs(),
                u64::try_from(self.settings.summary_interval.num_seconds()).unwrap_or(0),
            );
            let report = self
                .broadcaster
                .broadcast(&state.subscriber_ids(), &text)
                .await;
            info!(delivered = report.delivered, "Startup announcement sent");
        }
    }

    /// Run one full cycle and persist the result.
    pub async fn run_cycle(
        &mut self,
        state: &mut MonitorState,
        now: DateTime<Utc>,
    ) -> CycleReport {
        let mut report = CycleReport::default();

        let fetched =
            collect_catalog(self.catalog.as_ref(), &self.normalizer, self.settings.max_pages).await;
        match fetched {
            Ok(batch) => {
                state.last_total_results = batch.total_results;
                self.last_batch = batch.products;
                report.products_seen = self.last_batch.len();
                self.alert(state, now, &mut report).await;
            }
            Err(e) => {
                error!(error = %e, "Catalog fetch failed, skipping diff");
                report.fetch_failed = true;
            }
        }

        let ctx = CommandContext {
            batch: &self.last_batch,
            filter: &self.filter,
            recent_limit: self.settings.recent_limit,
            now,
        };
        report.commands_handled = self.commands.process(state, &ctx).await.handled;

        if !report.fetch_failed && state.summary_due(now, self.settings.summary_interval) {
            let text = format::summary_report(&self.last_batch, state, now);
            self.broadcaster
                .broadcast(&state.subscriber_ids(), &text)
                .await;
            state.last_summary_time = Some(now);
            report.summary_sent = true;
            info!("Periodic summary sent");
        }

        match self.store.save(state) {
            Ok(()) => report.persisted = true,
            Err(e) => error!(error = %e, "Failed to persist state"),
        }

        report
    }

    /// Diff the current batch and broadcast eligible alerts.
    async fn alert(
        &self,
        state: &mut MonitorState,
        now: DateTime<Utc>,
        report: &mut CycleReport,
    ) {
        let diff = apply_observations(state, &self.last_batch, now);
        report.new_detected = diff.new_products.len();
        report.drops_detected = diff.price_drops.len();

        let plan = diff.eligible(&self.filter);
        let recipients = state.subscriber_ids();

        for drop in &plan.price_drops {
            self.broadcaster
                .broadcast(&recipients, &format::price_drop_alert(drop))
                .await;
            report.drops_alerted += 1;
            info!(key = %drop.product.key, amount = %drop.amount, "Price drop alert sent");
        }

        for product in &plan.new_products {
            self.broadcaster
                .broadcast(&recipients, &format::new_product_alert(product))
                .await;
            state.total_new_alerted += 1;
            report.new_alerted += 1;
            info!(key = %product.key, "New product alert sent");
        }

        if plan.suppressed_new + plan.suppressed_drops > 0 {
            info!(
                new = plan.suppressed_new,
                drops = plan.suppressed_drops,
                "Alerts suppressed by filter"
            );
        }
    }

    /// Repeat cycles until `shutdown` turns true, then return the final state.
    ///
    /// The signal is only observed between cycles, so the cycle in progress
    /// always completes its persistence step.
    pub async fn run(
        mut self,
        mut state: MonitorState,
        mut shutdown: watch::Receiver<bool>,
    ) -> MonitorState {
        self.start(&state).await;
        info!(
            interval_secs = self.settings.poll_interval.as_secs(),
            subscribers = state.subscribers.len(),
            "Monitor started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            let report = self.run_cycle(&mut state, Utc::now()).await;
            info!(
                products = report.products_seen,
                new = report.new_detected,
                alerted = report.new_alerted,
                drops = report.drops_detected,
                commands = report.commands_handled,
                subscribers = state.subscribers.len(),
                persisted = report.persisted,
                "Cycle complete"
            );

            tokio::select! {
                () = tokio::time::sleep(self.settings.poll_interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Monitor stopped");
        state
    }
}

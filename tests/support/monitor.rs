use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use pricehound::application::monitor::{Monitor, MonitorPorts, MonitorSettings};
use pricehound::domain::{AlertFilter, MonitorState, Normalizer};
use pricehound::testkit::{MemoryStore, RecordingMessenger, ScriptedCatalog};

pub const WEB_ORIGIN: &str = "https://shop.example";

/// A monitor wired to in-memory ports, plus handles to inspect them.
pub struct TestMonitor {
    pub catalog: Arc<ScriptedCatalog>,
    pub messenger: Arc<RecordingMessenger>,
    pub store: Arc<MemoryStore>,
    pub monitor: Monitor,
}

pub fn fast_settings() -> MonitorSettings {
    MonitorSettings {
        poll_interval: Duration::from_millis(10),
        send_timeout: Duration::from_millis(200),
        poll_timeout: Duration::from_millis(200),
        ..MonitorSettings::default()
    }
}

pub fn monitor_with(
    catalog: ScriptedCatalog,
    filter: AlertFilter,
    settings: MonitorSettings,
) -> TestMonitor {
    let catalog = Arc::new(catalog);
    let messenger = Arc::new(RecordingMessenger::new());
    let store = Arc::new(MemoryStore::new());
    let monitor = Monitor::new(
        MonitorPorts {
            catalog: catalog.clone(),
            messenger: messenger.clone(),
            store: store.clone(),
        },
        Normalizer::new(WEB_ORIGIN),
        filter,
        settings,
    );

    TestMonitor {
        catalog,
        messenger,
        store,
        monitor,
    }
}

pub fn monitor_for(catalog: ScriptedCatalog) -> TestMonitor {
    monitor_with(catalog, AlertFilter::accept_all(), fast_settings())
}

pub fn subscribed(ids: &[i64]) -> MonitorState {
    let mut state = MonitorState::default();
    for id in ids {
        state.subscribe(*id);
    }
    state
}

/// Fixed clock: 2025-03-01 12:00:00 UTC plus `minutes`.
pub fn at_minute(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap() + chrono::Duration::minutes(minutes)
}

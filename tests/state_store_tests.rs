//! Baseline persistence through the JSON state file.

mod support;

use std::fs;
use std::sync::Arc;

use pricehound::adapter::outbound::store::JsonFileStore;
use pricehound::application::monitor::{Monitor, MonitorPorts};
use pricehound::domain::{AlertFilter, Normalizer};
use pricehound::port::StateStore;
use pricehound::testkit::{raw_product, RecordingMessenger, ScriptedCatalog};
use rust_decimal_macros::dec;
use serde_json::Value;
use tempfile::tempdir;

use support::monitor::{at_minute, fast_settings, subscribed, WEB_ORIGIN};

fn file_backed_monitor(
    store: &JsonFileStore,
    catalog: ScriptedCatalog,
) -> (Monitor, Arc<RecordingMessenger>) {
    let messenger = Arc::new(RecordingMessenger::new());
    let monitor = Monitor::new(
        MonitorPorts {
            catalog: Arc::new(catalog),
            messenger: messenger.clone(),
            store: Arc::new(store.clone()),
        },
        Normalizer::new(WEB_ORIGIN),
        AlertFilter::accept_all(),
        fast_settings(),
    );
    (monitor, messenger)
}

#[tokio::test]
async fn baseline_survives_restart() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("state.json"));

    let (mut first, _) =
        file_backed_monitor(&store, ScriptedCatalog::single(vec![raw_product("A", "₹1,000")]));
    let mut state = subscribed(&[42]);
    assert!(first.run_cycle(&mut state, at_minute(0)).await.persisted);

    let (mut second, messenger) =
        file_backed_monitor(&store, ScriptedCatalog::single(vec![raw_product("A", "₹800")]));
    let mut restored = second.load_state();
    assert_eq!(restored, state);

    let report = second.run_cycle(&mut restored, at_minute(1)).await;
    assert_eq!(report.new_detected, 0);
    assert_eq!(report.drops_detected, 1);
    assert!(messenger.sent_to(42)[0].contains("Price drop"));
    assert_eq!(store.load().seen_products["A"].last_price, Some(dec!(800)));
}

#[test]
fn saved_document_uses_plain_json_types() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    let store = JsonFileStore::new(&path);

    let mut state = subscribed(&[-1001, 7]);
    state.last_update_id = 99;
    state.total_new_detected = 3;
    store.save(&state).unwrap();

    let doc: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["last_update_id"], 99);
    assert_eq!(doc["total_new_detected"], 3);
    assert_eq!(doc["subscribers"], serde_json::json!([-1001, 7]));
    assert!(doc["seen_products"].is_object());
}

#[test]
fn legacy_document_on_disk_loads_and_keeps_unknown_keys() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(
        &path,
        r#"{
  "seen_products": {
    "443321": {
      "first_seen": 1700000000.25,
      "name": "Ribbed Tee",
      "last_price": 499.0,
      "last_price_str": "₹499",
      "url": "https://shop.example/p/443321",
      "last_stock_label": "In stock",
      "in_stock": true
    }
  },
  "last_total_results": 1,
  "last_summary_time": 0,
  "total_new_detected": 1,
  "total_new_alerted": 1,
  "last_update_id": 17,
  "subscribers": [5, "6"],
  "operator_note": "migrated"
}"#,
    )
    .unwrap();

    let store = JsonFileStore::new(&path);
    let state = store.load();

    assert_eq!(state.seen_products["443321"].last_price, Some(dec!(499)));
    assert_eq!(state.seen_products["443321"].last_price_display, "₹499");
    assert_eq!(state.last_summary_time, None);
    assert_eq!(state.subscriber_ids(), vec![5, 6]);
    assert_eq!(state.last_update_id, 17);

    store.save(&state).unwrap();
    let doc: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["operator_note"], "migrated");
    assert_eq!(doc["seen_products"]["443321"]["last_price_display"], "₹499");
}

#[test]
fn corrupt_document_starts_fresh_and_is_overwritten() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, "[1, 2,").unwrap();

    let store = JsonFileStore::new(&path);
    let mut state = store.load();
    assert!(state.seen_products.is_empty());

    state.subscribe(3);
    store.save(&state).unwrap();
    assert!(store.load().is_subscribed(3));
}

//! End-to-end scheduler cycles against in-memory ports.

mod support;

use std::time::Duration;

use pricehound::domain::AlertFilter;
use pricehound::port::InboundMessage;
use pricehound::testkit::{raw_from, raw_product, ScriptedCatalog};
use rust_decimal_macros::dec;
use serde_json::json;
use tokio::sync::watch;

use support::monitor::{at_minute, fast_settings, monitor_for, monitor_with, subscribed};

#[tokio::test]
async fn new_product_is_alerted_and_recorded() {
    let mut h = monitor_for(ScriptedCatalog::single(vec![raw_product("A", "₹1,000")]));
    let mut state = subscribed(&[42]);

    let report = h.monitor.run_cycle(&mut state, at_minute(0)).await;

    assert!(!report.fetch_failed);
    assert_eq!(report.new_detected, 1);
    assert_eq!(report.new_alerted, 1);
    assert!(report.persisted);
    assert_eq!(state.total_new_detected, 1);
    assert_eq!(state.total_new_alerted, 1);

    let entry = &state.seen_products["A"];
    assert_eq!(entry.first_seen, at_minute(0));
    assert_eq!(entry.last_price, Some(dec!(1000)));
    assert_eq!(entry.last_price_display, "₹1,000");
    assert_eq!(entry.url, "https://shop.example/p/A");

    let sent = h.messenger.sent_to(42);
    let alert = sent
        .iter()
        .find(|text| text.contains("<b>New product</b>"))
        .expect("new product alert");
    assert!(alert.contains("Product A"));
    assert!(alert.contains("₹1,000"));
    assert!(alert.contains("https://shop.example/p/A"));

    assert_eq!(h.store.saved(), Some(state));
}

#[tokio::test]
async fn known_product_is_not_alerted_twice() {
    let mut h = monitor_for(ScriptedCatalog::single(vec![raw_product("A", "₹500")]));
    let mut state = subscribed(&[1]);

    h.monitor.run_cycle(&mut state, at_minute(0)).await;
    h.messenger.clear_sent();
    let report = h.monitor.run_cycle(&mut state, at_minute(1)).await;

    assert_eq!(report.new_detected, 0);
    assert_eq!(report.drops_detected, 0);
    assert!(h.messenger.sent().is_empty());
    assert_eq!(state.total_new_detected, 1);
}

#[tokio::test]
async fn price_drop_is_alerted_with_amount_and_percentage() {
    let mut h = monitor_for(ScriptedCatalog::single(vec![raw_product("A", "₹1,000")]));
    let mut state = subscribed(&[42]);
    h.monitor.run_cycle(&mut state, at_minute(0)).await;

    h.catalog.set_pages(vec![vec![raw_product("A", "₹800")]]);
    h.messenger.clear_sent();
    let report = h.monitor.run_cycle(&mut state, at_minute(1)).await;

    assert_eq!(report.drops_detected, 1);
    assert_eq!(report.drops_alerted, 1);
    assert_eq!(report.new_detected, 0);

    let sent = h.messenger.sent_to(42);
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("Price drop"));
    assert!(sent[0].contains("₹1,000"));
    assert!(sent[0].contains("₹800"));
    assert!(sent[0].contains("200.00 (20.0%)"));

    assert_eq!(state.seen_products["A"].last_price, Some(dec!(800)));
    assert_eq!(state.seen_products["A"].first_seen, at_minute(0));
}

#[tokio::test]
async fn price_rise_updates_baseline_silently() {
    let mut h = monitor_for(ScriptedCatalog::single(vec![raw_product("A", "₹800")]));
    let mut state = subscribed(&[1]);
    h.monitor.run_cycle(&mut state, at_minute(0)).await;

    h.catalog.set_pages(vec![vec![raw_product("A", "₹900")]]);
    h.messenger.clear_sent();
    let report = h.monitor.run_cycle(&mut state, at_minute(1)).await;

    assert_eq!(report.drops_detected, 0);
    assert!(h.messenger.sent().is_empty());
    assert_eq!(state.seen_products["A"].last_price, Some(dec!(900)));
}

#[tokio::test]
async fn unparsable_price_is_stored_as_unknown() {
    let mut h = monitor_for(ScriptedCatalog::single(vec![raw_product("B", "N/A")]));
    let mut state = subscribed(&[1]);

    let report = h.monitor.run_cycle(&mut state, at_minute(0)).await;

    assert_eq!(report.new_alerted, 1);
    let entry = &state.seen_products["B"];
    assert_eq!(entry.last_price, None);
    assert_eq!(entry.last_price_display, "N/A");
}

#[tokio::test]
async fn filtered_product_is_recorded_but_not_alerted() {
    let catalog = ScriptedCatalog::single(vec![
        raw_from(json!({
            "code": "H",
            "name": "Cozy Hoodie",
            "price": "₹1,299",
            "url": "/p/H",
            "inStock": true,
        })),
        raw_product("T", "₹399"),
    ]);
    let filter = AlertFilter::new(&["hoodie".to_string()], &[], None, None);
    let mut h = monitor_with(catalog, filter, fast_settings());
    let mut state = subscribed(&[1]);

    let report = h.monitor.run_cycle(&mut state, at_minute(0)).await;

    assert_eq!(report.new_detected, 2);
    assert_eq!(report.new_alerted, 1);
    assert_eq!(state.total_new_detected, 2);
    assert_eq!(state.total_new_alerted, 1);
    assert!(state.seen_products.contains_key("T"));

    let alerts: Vec<_> = h
        .messenger
        .sent_to(1)
        .into_iter()
        .filter(|text| text.contains("<b>New product</b>"))
        .collect();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].contains("Cozy Hoodie"));
    // The first cycle also broadcasts the summary; it must not count as an alert.
    assert!(report.summary_sent);
    assert!(h
        .messenger
        .sent_to(1)
        .iter()
        .any(|text| text.contains("Catalog summary")));
}

#[tokio::test]
async fn records_without_code_are_dropped() {
    let catalog = ScriptedCatalog::single(vec![
        raw_from(json!({"name": "Nameless", "price": "₹10"})),
        raw_product("K", "₹10"),
    ]);
    let mut h = monitor_for(catalog);
    let mut state = subscribed(&[]);

    let report = h.monitor.run_cycle(&mut state, at_minute(0)).await;

    assert_eq!(report.products_seen, 1);
    assert_eq!(state.seen_products.len(), 1);
    assert_eq!(state.last_total_results, 2);
}

#[tokio::test]
async fn start_command_subscribes_and_advances_cursor() {
    let mut h = monitor_for(ScriptedCatalog::single(vec![]));
    h.messenger.push_update(InboundMessage::text(5, 77, "/start"));
    let mut state = subscribed(&[]);

    let report = h.monitor.run_cycle(&mut state, at_minute(0)).await;

    assert_eq!(report.commands_handled, 1);
    assert!(state.is_subscribed(77));
    assert_eq!(state.last_update_id, 5);
    let sent = h.messenger.sent_to(77);
    assert!(sent[0].contains("Subscribed"));

    h.messenger.clear_sent();
    let report = h.monitor.run_cycle(&mut state, at_minute(1)).await;
    assert_eq!(report.commands_handled, 0);
    assert!(h.messenger.sent_to(77).is_empty());
}

#[tokio::test]
async fn stop_command_removes_subscriber() {
    let mut h = monitor_for(ScriptedCatalog::single(vec![]));
    h.messenger.push_update(InboundMessage::text(3, 77, "/stop"));
    let mut state = subscribed(&[77, 78]);

    h.monitor.run_cycle(&mut state, at_minute(0)).await;

    assert!(!state.is_subscribed(77));
    assert!(state.is_subscribed(78));
    assert!(h.messenger.sent_to(77)[0].contains("Unsubscribed"));
}

#[tokio::test]
async fn non_commands_and_unknown_commands_only_move_the_cursor() {
    let mut h = monitor_for(ScriptedCatalog::single(vec![]));
    h.messenger.push_update(InboundMessage::text(10, 5, "hello there"));
    h.messenger.push_update(InboundMessage::text(11, 5, "/buy"));
    h.messenger.push_update(InboundMessage {
        update_id: 12,
        chat_id: None,
        text: None,
    });
    let mut state = subscribed(&[]);
    state.last_summary_time = Some(at_minute(0));

    let report = h.monitor.run_cycle(&mut state, at_minute(1)).await;

    assert_eq!(report.commands_handled, 0);
    assert_eq!(state.last_update_id, 12);
    assert!(h.messenger.sent().is_empty());
}

#[tokio::test]
async fn latest_command_lists_recent_products() {
    let mut h = monitor_for(ScriptedCatalog::single(vec![raw_product("A", "₹100")]));
    let mut state = subscribed(&[]);
    h.monitor.run_cycle(&mut state, at_minute(0)).await;

    h.catalog
        .set_pages(vec![vec![raw_product("A", "₹100"), raw_product("B", "₹200")]]);
    h.messenger.push_update(InboundMessage::text(1, 9, "/new 1"));
    h.monitor.run_cycle(&mut state, at_minute(1)).await;

    let reply = &h.messenger.sent_to(9)[0];
    assert!(reply.contains("Product B"));
    assert!(!reply.contains("Product A"));
}

#[tokio::test]
async fn poll_failure_leaves_cursor_for_next_cycle() {
    let mut h = monitor_for(ScriptedCatalog::single(vec![]));
    h.messenger.push_update(InboundMessage::text(4, 9, "/ping"));
    h.messenger.fail_polls(true);
    let mut state = subscribed(&[]);

    let report = h.monitor.run_cycle(&mut state, at_minute(0)).await;
    assert_eq!(report.commands_handled, 0);
    assert_eq!(state.last_update_id, 0);
    assert!(report.persisted);

    h.messenger.fail_polls(false);
    let report = h.monitor.run_cycle(&mut state, at_minute(1)).await;
    assert_eq!(report.commands_handled, 1);
    assert_eq!(state.last_update_id, 4);
    assert!(h.messenger.sent_to(9)[0].contains("running"));
}

#[tokio::test]
async fn page_zero_failure_skips_diff_but_serves_commands() {
    let mut h = monitor_for(ScriptedCatalog::single(vec![raw_product("A", "₹100")]));
    let mut state = subscribed(&[1]);
    h.monitor.run_cycle(&mut state, at_minute(0)).await;
    let detected = state.total_new_detected;

    h.catalog.set_pages(vec![vec![
        raw_product("A", "₹100"),
        raw_product("B", "₹200"),
    ]]);
    h.catalog.fail_page(0);
    h.messenger.push_update(InboundMessage::text(1, 9, "/summary"));
    h.messenger.clear_sent();

    let report = h.monitor.run_cycle(&mut state, at_minute(30)).await;

    assert!(report.fetch_failed);
    assert!(!report.summary_sent);
    assert_eq!(report.commands_handled, 1);
    assert!(report.persisted);
    assert_eq!(h.store.save_count(), 2);
    assert_eq!(state.total_new_detected, detected);
    assert!(!state.seen_products.contains_key("B"));
    assert_eq!(state.last_summary_time, Some(at_minute(0)));

    // The reply renders from the last successful fetch.
    let reply = &h.messenger.sent_to(9)[0];
    assert!(reply.contains("<b>Total products:</b> 1"));
    assert!(h.messenger.sent_to(1).is_empty());
}

#[tokio::test]
async fn later_page_failure_truncates_batch() {
    let catalog = ScriptedCatalog::new(vec![
        vec![raw_product("A", "₹100")],
        vec![raw_product("B", "₹200")],
        vec![raw_product("C", "₹300")],
    ]);
    catalog.fail_page(1);
    let mut h = monitor_for(catalog);
    let mut state = subscribed(&[]);

    let report = h.monitor.run_cycle(&mut state, at_minute(0)).await;

    assert!(!report.fetch_failed);
    assert_eq!(report.products_seen, 1);
    assert!(state.seen_products.contains_key("A"));
    assert!(!state.seen_products.contains_key("C"));
    assert_eq!(h.catalog.requested_pages(), vec![0, 1]);
}

#[tokio::test]
async fn summary_follows_its_interval() {
    let mut h = monitor_for(ScriptedCatalog::single(vec![raw_product("A", "₹100")]));
    let mut state = subscribed(&[1]);

    assert!(h.monitor.run_cycle(&mut state, at_minute(0)).await.summary_sent);
    assert!(!h.monitor.run_cycle(&mut state, at_minute(10)).await.summary_sent);
    assert!(h.monitor.run_cycle(&mut state, at_minute(20)).await.summary_sent);
    assert_eq!(state.last_summary_time, Some(at_minute(20)));

    let summaries = h
        .messenger
        .sent_to(1)
        .into_iter()
        .filter(|text| text.contains("Catalog summary"))
        .count();
    assert_eq!(summaries, 2);
}

#[tokio::test]
async fn summary_is_stamped_without_subscribers() {
    let mut h = monitor_for(ScriptedCatalog::single(vec![]));
    let mut state = subscribed(&[]);

    let report = h.monitor.run_cycle(&mut state, at_minute(0)).await;

    assert!(report.summary_sent);
    assert_eq!(state.last_summary_time, Some(at_minute(0)));
    assert!(h.messenger.sent().is_empty());
}

#[tokio::test]
async fn failing_and_stalled_recipients_do_not_block_others() {
    let mut h = monitor_for(ScriptedCatalog::single(vec![raw_product("A", "₹100")]));
    h.messenger.fail_chat(2);
    h.messenger.stall_chat(3);
    let mut state = subscribed(&[1, 2, 3, 4]);

    let report = tokio::time::timeout(
        Duration::from_secs(5),
        h.monitor.run_cycle(&mut state, at_minute(0)),
    )
    .await
    .expect("cycle finished despite a stalled recipient");

    assert_eq!(report.new_alerted, 1);
    assert!(h.messenger.sent_to(1).iter().any(|t| t.contains("<b>New product</b>")));
    assert!(h.messenger.sent_to(4).iter().any(|t| t.contains("<b>New product</b>")));
    assert!(h.messenger.sent_to(2).is_empty());
    assert!(h.messenger.sent_to(3).is_empty());
    assert!(state.is_subscribed(2));
}

#[tokio::test]
async fn save_failure_is_reported_and_cycle_completes() {
    let mut h = monitor_for(ScriptedCatalog::single(vec![raw_product("A", "₹100")]));
    h.store.fail_saves(true);
    let mut state = subscribed(&[]);

    let report = h.monitor.run_cycle(&mut state, at_minute(0)).await;

    assert!(!report.persisted);
    assert!(state.seen_products.contains_key("A"));
    assert_eq!(h.store.saved(), None);

    h.store.fail_saves(false);
    assert!(h.monitor.run_cycle(&mut state, at_minute(1)).await.persisted);
    assert_eq!(h.store.saved(), Some(state));
}

#[tokio::test]
async fn start_registers_commands_and_announces() {
    let h = monitor_for(ScriptedCatalog::single(vec![]));
    let state = subscribed(&[1, 2]);

    h.monitor.start(&state).await;

    let registered = h.messenger.registered_commands();
    assert!(registered.iter().any(|(cmd, _)| cmd == "start"));
    assert!(registered.iter().any(|(cmd, _)| cmd == "new"));
    for chat in [1, 2] {
        let sent = h.messenger.sent_to(chat);
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("pricehound online"));
    }
}

#[tokio::test]
async fn start_respects_disabled_announcement_and_menu() {
    let settings = pricehound::application::monitor::MonitorSettings {
        announce_startup: false,
        register_commands: false,
        ..fast_settings()
    };
    let h = monitor_with(
        ScriptedCatalog::single(vec![]),
        AlertFilter::accept_all(),
        settings,
    );

    h.monitor.start(&subscribed(&[1])).await;

    assert!(h.messenger.sent().is_empty());
    assert!(h.messenger.registered_commands().is_empty());
}

#[tokio::test]
async fn run_loop_stops_on_shutdown_signal() {
    let h = monitor_for(ScriptedCatalog::single(vec![raw_product("A", "₹100")]));
    let store = h.store.clone();
    let (tx, rx) = watch::channel(false);

    let handle = tokio::spawn(h.monitor.run(subscribed(&[1]), rx));
    tokio::time::sleep(Duration::from_millis(50)).await;
    tx.send(true).unwrap();

    let state = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("monitor stopped")
        .unwrap();

    assert!(state.seen_products.contains_key("A"));
    assert_eq!(state.total_new_detected, 1);
    assert!(store.save_count() >= 1);
    assert_eq!(store.saved().map(|s| s.total_new_detected), Some(1));
}

//! Message rendering.
//!
//! Every outbound text is HTML (Telegram `parse_mode=HTML`). Catalog and
//! configuration text is escaped with [`escape_html`]; only the fixed markup
//! in this module is emitted raw.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::command::COMMANDS;
use crate::domain::money::percentage_of;
use crate::domain::{AlertFilter, MonitorState, NormalizedProduct, PriceDrop, StockStatus};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";
const MISSING_PRICE: &str = "N/A";

/// Escape text for HTML parse mode.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn price_or_na(display: &str) -> String {
    if display.trim().is_empty() {
        MISSING_PRICE.to_string()
    } else {
        escape_html(display)
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.format(TIME_FORMAT).to_string()
}

fn interval(secs: u64) -> String {
    if secs >= 60 && secs % 60 == 0 {
        format!("every {} min", secs / 60)
    } else {
        format!("every {secs}s")
    }
}

/// Alert for a product seen for the first time.
#[must_use]
pub fn new_product_alert(product: &NormalizedProduct) -> String {
    format!(
        "🆕 <b>New product</b>\n\
        \n\
        🧥 <b>Name:</b> {}\n\
        💰 <b>Price:</b> {}\n\
        📦 <b>Stock:</b> {}\n\
        \n\
        🔗 {}",
        escape_html(&product.name),
        price_or_na(&product.display_price),
        product.stock,
        escape_html(&product.link),
    )
}

/// Alert for a price decrease on a known product.
#[must_use]
pub fn price_drop_alert(drop: &PriceDrop) -> String {
    format!(
        "📉 <b>Price drop</b>\n\
        \n\
        🧥 <b>Name:</b> {}\n\
        💰 <b>Old price:</b> {}\n\
        💰 <b>New price:</b> {}\n\
        📉 <b>Drop:</b> {:.2} ({:.1}%)\n\
        📦 <b>Stock:</b> {}\n\
        \n\
        🔗 {}",
        escape_html(&drop.product.name),
        price_or_na(&drop.old_display),
        price_or_na(&drop.product.display_price),
        drop.amount,
        drop.percentage.round_dp(1),
        drop.product.stock,
        escape_html(&drop.product.link),
    )
}

/// Product count per category, largest first.
///
/// Equal counts keep the order in which the categories first appeared.
#[must_use]
pub fn category_breakdown(products: &[NormalizedProduct]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for product in products {
        match counts.iter_mut().find(|(name, _)| *name == product.category) {
            Some((_, count)) => *count += 1,
            None => counts.push((product.category.clone(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// In-stock, out-of-stock and unknown counts across a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StockTally {
    pub in_stock: usize,
    pub out_of_stock: usize,
    pub unknown: usize,
}

impl StockTally {
    #[must_use]
    pub fn of(products: &[NormalizedProduct]) -> Self {
        products
            .iter()
            .fold(Self::default(), |mut tally, product| {
                match product.stock {
                    StockStatus::InStock => tally.in_stock += 1,
                    StockStatus::OutOfStock => tally.out_of_stock += 1,
                    StockStatus::Unknown => tally.unknown += 1,
                }
                tally
            })
    }
}

/// Categorical and stock breakdown of `products` plus lifetime counters.
#[must_use]
pub fn summary_report(
    products: &[NormalizedProduct],
    state: &MonitorState,
    now: DateTime<Utc>,
) -> String {
    let total = products.len();
    let mut msg = format!(
        "📊 <b>Catalog summary</b>\n\
        \n\
        🕐 <b>Time:</b> {}\n\
        \n\
        📦 <b>Total products:</b> {total}\n",
        timestamp(now),
    );

    let breakdown = category_breakdown(products);
    if !breakdown.is_empty() {
        msg.push_str("\n<b>By category:</b>\n");
        for (category, count) in &breakdown {
            let share = percentage_of(Decimal::from(*count), Decimal::from(total));
            msg.push_str(&format!(
                "  • {}: {count} ({:.1}%)\n",
                escape_html(category),
                share.round_dp(1)
            ));
        }
    }

    let tally = StockTally::of(products);
    msg.push_str("\n<b>Stock:</b>\n");
    msg.push_str(&format!("  • In stock: {}\n", tally.in_stock));
    msg.push_str(&format!("  • Out of stock: {}\n", tally.out_of_stock));
    if tally.unknown > 0 {
        msg.push_str(&format!("  • Unknown: {}\n", tally.unknown));
    }

    msg.push_str(&format!(
        "\n🆕 <b>New products (all time):</b> {}\n\
        📣 <b>Alerts sent (all time):</b> {}",
        state.total_new_detected, state.total_new_alerted
    ));
    msg
}

/// Aggregate counters, subscriber count, last summary time and filters.
#[must_use]
pub fn status_report(state: &MonitorState, filter: &AlertFilter, now: DateTime<Utc>) -> String {
    let last_summary = state
        .last_summary_time
        .map_or_else(|| "never".to_string(), timestamp);

    format!(
        "ℹ️ <b>Status</b>\n\
        \n\
        🕐 <b>Time:</b> {}\n\
        🌐 <b>Products in latest fetch:</b> {}\n\
        👁 <b>Distinct products seen:</b> {}\n\
        🆕 <b>New products detected:</b> {}\n\
        📣 <b>Alerts sent:</b> {}\n\
        👥 <b>Subscribers:</b> {}\n\
        📊 <b>Last summary:</b> {}\n\
        \n\
        🔍 <b>Filters:</b> {}",
        timestamp(now),
        state.last_total_results,
        state.seen_products.len(),
        state.total_new_detected,
        state.total_new_alerted,
        state.subscribers.len(),
        last_summary,
        escape_html(&filter.describe()),
    )
}

/// The `limit` most recently first-seen products.
#[must_use]
pub fn recent_listing(state: &MonitorState, limit: usize) -> String {
    let entries = state.recent_entries(limit);
    if entries.is_empty() {
        return "No products have been seen yet.".to_string();
    }

    let mut lines = vec![format!("🆕 <b>Last {} new products</b>\n", entries.len())];
    for (i, (_, entry)) in entries.iter().enumerate() {
        let first_seen = if entry.first_seen.timestamp() == 0 {
            "unknown time".to_string()
        } else {
            timestamp(entry.first_seen)
        };
        lines.push(format!(
            "{}. <b>{}</b>\n   📦 Stock: {}\n   🕐 First seen: {}\n   🔗 {}\n",
            i + 1,
            escape_html(&entry.name),
            escape_html(&entry.last_stock_label),
            first_seen,
            escape_html(&entry.url),
        ));
    }
    lines.join("\n")
}

fn command_list() -> String {
    COMMANDS
        .iter()
        .map(|spec| format!("{} - {}", escape_html(spec.usage), spec.description))
        .collect::<Vec<_>>()
        .join("\n")
}

#[must_use]
pub fn help_text() -> String {
    format!("❓ <b>Commands</b>\n\n{}", command_list())
}

#[must_use]
pub fn welcome_text() -> String {
    format!(
        "👋 <b>Subscribed</b>\n\
        \n\
        You will get a message when new products appear or prices drop.\n\
        \n\
        {}",
        command_list()
    )
}

#[must_use]
pub fn farewell_text() -> String {
    "👋 <b>Unsubscribed</b>\n\
    \n\
    Alerts will no longer reach this chat.\n\
    Send /start to subscribe again."
        .to_string()
}

#[must_use]
pub fn pong_text() -> String {
    "🏓 Watcher is running.".to_string()
}

/// Broadcast to existing subscribers when the monitor starts.
#[must_use]
pub fn startup_text(poll_interval_secs: u64, summary_interval_secs: u64) -> String {
    format!(
        "🚀 <b>pricehound online</b>\n\
        \n\
        Watching the catalog for new products and price drops.\n\
        ⏱ Poll: {}\n\
        📊 Summary: {}\n\
        \n\
        Send /start to subscribe.",
        interval(poll_interval_secs),
        interval(summary_interval_secs),
    )
}

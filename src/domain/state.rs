//! Persisted monitor state.
//!
//! [`MonitorState`] is the single durable document: the baseline of every
//! product ever seen, lifetime counters, the inbound command cursor and the
//! subscriber set. It is owned by the scheduler loop and rewritten in full
//! at the end of each cycle.
//!
//! Loading is lenient. Missing keys fall back to their identity values,
//! unknown keys are carried through untouched, and timestamps written as
//! Unix epoch seconds by older versions of the document are still accepted.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Duration, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::money::Price;
use super::product::{NormalizedProduct, NO_LINK};

/// Baseline record for one product key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeenEntry {
    /// When the key was first observed.
    #[serde(default, deserialize_with = "timestamp::required")]
    pub first_seen: DateTime<Utc>,
    #[serde(default)]
    pub name: String,
    /// Most recent numeric price; the baseline for the next drop check.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub last_price: Option<Price>,
    #[serde(default, alias = "last_price_str")]
    pub last_price_display: String,
    #[serde(default = "no_link")]
    pub url: String,
    #[serde(default = "unknown_label")]
    pub last_stock_label: String,
    #[serde(default)]
    pub in_stock: Option<bool>,
}

fn no_link() -> String {
    NO_LINK.to_string()
}

fn unknown_label() -> String {
    "Unknown".to_string()
}

impl SeenEntry {
    /// Create the entry for a first observation.
    #[must_use]
    pub fn first_observation(product: &NormalizedProduct, now: DateTime<Utc>) -> Self {
        Self {
            first_seen: now,
            name: product.name.clone(),
            last_price: product.price,
            last_price_display: product.display_price.clone(),
            url: product.link.clone(),
            last_stock_label: product.stock.label().to_string(),
            in_stock: product.stock.as_flag(),
        }
    }

    /// Overwrite price, link and stock with the latest sighting.
    pub fn observe(&mut self, product: &NormalizedProduct) {
        self.last_price = product.price;
        self.last_price_display.clone_from(&product.display_price);
        self.url.clone_from(&product.link);
        self.last_stock_label = product.stock.label().to_string();
        self.in_stock = product.stock.as_flag();
    }
}

/// The durable state document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorState {
    /// Baseline keyed by product code. Entries are never removed.
    pub seen_products: BTreeMap<String, SeenEntry>,
    /// Total result count reported by the latest successful fetch.
    pub last_total_results: u64,
    #[serde(deserialize_with = "timestamp::optional")]
    pub last_summary_time: Option<DateTime<Utc>>,
    /// Every first-time key ever observed.
    pub total_new_detected: u64,
    /// First-time keys that passed the alert filter and were broadcast.
    pub total_new_alerted: u64,
    /// Highest inbound update identifier already processed.
    pub last_update_id: i64,
    #[serde(deserialize_with = "subscriber_ids")]
    pub subscribers: BTreeSet<i64>,
    /// Keys this version does not know about, preserved on save.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MonitorState {
    /// Add a subscriber. Returns `true` if it was not already present.
    pub fn subscribe(&mut self, chat_id: i64) -> bool {
        self.subscribers.insert(chat_id)
    }

    /// Remove a subscriber. Returns `true` if it was present.
    pub fn unsubscribe(&mut self, chat_id: i64) -> bool {
        self.subscribers.remove(&chat_id)
    }

    #[must_use]
    pub fn is_subscribed(&self, chat_id: i64) -> bool {
        self.subscribers.contains(&chat_id)
    }

    #[must_use]
    pub fn subscriber_ids(&self) -> Vec<i64> {
        self.subscribers.iter().copied().collect()
    }

    /// Move the inbound cursor forward. Never moves it backwards.
    pub fn advance_cursor(&mut self, update_id: i64) {
        self.last_update_id = self.last_update_id.max(update_id);
    }

    /// Entries ordered by most recent `first_seen`, at most `limit` of them.
    #[must_use]
    pub fn recent_entries(&self, limit: usize) -> Vec<(&str, &SeenEntry)> {
        let mut entries: Vec<_> = self
            .seen_products
            .iter()
            .map(|(key, entry)| (key.as_str(), entry))
            .collect();
        entries.sort_by(|a, b| b.1.first_seen.cmp(&a.1.first_seen).then(a.0.cmp(b.0)));
        entries.truncate(limit);
        entries
    }

    /// Whether a periodic summary is due at `now`.
    #[must_use]
    pub fn summary_due(&self, now: DateTime<Utc>, interval: Duration) -> bool {
        self.last_summary_time
            .map_or(true, |last| now - last >= interval)
    }
}

fn subscriber_ids<'de, D>(deserializer: D) -> Result<BTreeSet<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Int(i64),
        Text(String),
        Other(IgnoredAny),
    }

    let ids = Option::<Vec<Id>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(ids
        .into_iter()
        .filter_map(|id| match id {
            Id::Int(id) => Some(id),
            Id::Text(text) => text.trim().parse().ok(),
            Id::Other(_) => None,
        })
        .collect())
}

/// Timestamps stored either as RFC 3339 strings or Unix epoch seconds.
mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(DateTime<Utc>),
        Epoch(f64),
    }

    fn from_epoch(secs: f64) -> Option<DateTime<Utc>> {
        if secs <= 0.0 || !secs.is_finite() {
            return None;
        }
        let nanos = (secs.fract() * 1e9) as u32;
        DateTime::from_timestamp(secs.trunc() as i64, nanos)
    }

    fn resolve(repr: Option<Repr>) -> Option<DateTime<Utc>> {
        match repr? {
            Repr::Text(at) => Some(at),
            Repr::Epoch(secs) => from_epoch(secs),
        }
    }

    pub(super) fn required<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(resolve(Option::<Repr>::deserialize(deserializer)?).unwrap_or_default())
    }

    /// Epoch `0` and `null` both mean "never".
    pub(super) fn optional<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(resolve(Option::<Repr>::deserialize(deserializer)?))
    }
}

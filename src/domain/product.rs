//! Catalog product records and the normalizer.
//!
//! The catalog API does not use one schema for every product type, so raw
//! records stay loosely typed ([`RawProduct`]) until a [`Normalizer`] turns
//! them into a [`NormalizedProduct`]. Every optional-field fallback (price
//! shapes, stock signals, category fields) is resolved here and nowhere else.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use super::money::Price;

/// A product record exactly as the catalog returned it.
pub type RawProduct = Map<String, Value>;

/// Link value used when a record carries no usable URL.
pub const NO_LINK: &str = "N/A";

/// Summary bucket for products without a category field.
pub const OTHER_CATEGORY: &str = "Other";

/// Name used when a record has no product name.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Fields probed for the display price when `price` is an object.
const PRICE_FIELDS: &[&str] = &["displayformattedValue", "formattedValue", "value"];

/// Fields probed for a category name, in priority order.
const CATEGORY_FIELDS: &[&str] = &["category", "categoryName"];

/// Stock signals in priority order. The first one present decides, even when
/// its value cannot be interpreted.
const STOCK_SIGNALS: &[(&str, StockSignal)] = &[
    ("inStock", StockSignal::InStockFlag),
    ("isInStock", StockSignal::InStockFlag),
    ("soldOut", StockSignal::SoldOutFlag),
    ("isSoldOut", StockSignal::SoldOutFlag),
    ("stock", StockSignal::Quantity),
    ("stockQuantity", StockSignal::Quantity),
    ("availableStock", StockSignal::Quantity),
    ("availability", StockSignal::Availability),
];

/// Stock classification of a product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    OutOfStock,
    #[default]
    Unknown,
}

impl StockStatus {
    #[must_use]
    pub const fn from_flag(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => Self::InStock,
            Some(false) => Self::OutOfStock,
            None => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn as_flag(self) -> Option<bool> {
        match self {
            Self::InStock => Some(true),
            Self::OutOfStock => Some(false),
            Self::Unknown => None,
        }
    }

    /// Human-readable label, also stored in the baseline.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InStock => "In stock",
            Self::OutOfStock => "Out of stock",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StockSignal {
    InStockFlag,
    SoldOutFlag,
    Quantity,
    Availability,
}

impl StockSignal {
    fn resolve(self, value: &Value) -> Option<bool> {
        match self {
            Self::InStockFlag => Some(flag_of(value)),
            Self::SoldOutFlag => Some(!flag_of(value)),
            Self::Quantity => quantity_of(value).map(|qty| qty > 0),
            Self::Availability => {
                let text = value.as_str()?.to_lowercase();
                if text.contains("in") && text.contains("stock") {
                    Some(true)
                } else if text.contains("out") && text.contains("stock") {
                    Some(false)
                } else {
                    None
                }
            }
        }
    }
}

/// A product after normalization, derived fresh every cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedProduct {
    /// Stable identity key (never empty).
    pub key: String,
    pub name: String,
    /// Parsed numeric price; `None` means unknown, never zero.
    pub price: Option<Price>,
    /// Price string as the catalog displays it.
    pub display_price: String,
    /// Absolute product URL or [`NO_LINK`].
    pub link: String,
    pub stock: StockStatus,
    /// Best-effort category, [`OTHER_CATEGORY`] when absent.
    pub category: String,
}

/// Converts raw catalog records into [`NormalizedProduct`]s.
#[derive(Debug, Clone)]
pub struct Normalizer {
    /// Web origin used to absolutize relative product paths (no trailing slash).
    web_origin: String,
}

impl Normalizer {
    #[must_use]
    pub fn new(web_origin: impl Into<String>) -> Self {
        let web_origin = web_origin.into().trim_end_matches('/').to_string();
        Self { web_origin }
    }

    /// Normalize one record. Returns `None` when the record has no identity key.
    #[must_use]
    pub fn normalize(&self, raw: &RawProduct) -> Option<NormalizedProduct> {
        let key = product_key(raw)?;
        let display_price = display_price(raw);
        let link = raw
            .get("url")
            .and_then(text_of)
            .map_or_else(|| NO_LINK.to_string(), |path| self.resolve_link(&path));

        Some(NormalizedProduct {
            key,
            name: raw
                .get("name")
                .and_then(text_of)
                .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            price: parse_price(&display_price),
            display_price,
            link,
            stock: classify_stock(raw),
            category: category_of(raw),
        })
    }

    /// Normalize a whole batch, silently dropping records without a key.
    #[must_use]
    pub fn normalize_all(&self, raws: &[RawProduct]) -> Vec<NormalizedProduct> {
        let products: Vec<_> = raws.iter().filter_map(|raw| self.normalize(raw)).collect();
        let skipped = raws.len() - products.len();
        if skipped > 0 {
            debug!(skipped, "Dropped catalog records without a product code");
        }
        products
    }

    /// Resolve a raw product path into an absolute link.
    #[must_use]
    pub fn resolve_link(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.web_origin, path)
        } else if Url::parse(path).is_ok() {
            path.to_string()
        } else {
            NO_LINK.to_string()
        }
    }
}

/// Identity key of a raw record, `None` when missing or empty.
#[must_use]
pub fn product_key(raw: &RawProduct) -> Option<String> {
    raw.get("code").and_then(text_of)
}

/// Display price string of a raw record, empty when absent.
#[must_use]
pub fn display_price(raw: &RawProduct) -> String {
    let text = match raw.get("price") {
        Some(Value::Object(fields)) => PRICE_FIELDS
            .iter()
            .find_map(|field| fields.get(*field).and_then(text_of)),
        Some(other) => text_of(other),
        None => None,
    };
    text.unwrap_or_default()
}

/// Parse a display price such as `₹1,234.00`.
///
/// Keeps only digits and periods (commas are thousands separators) and
/// parses the remainder. Anything unparsable yields `None`.
#[must_use]
pub fn parse_price(display: &str) -> Option<Price> {
    let cleaned: String = display
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Classify stock from the first stock signal present in the record.
#[must_use]
pub fn classify_stock(raw: &RawProduct) -> StockStatus {
    let flag = STOCK_SIGNALS
        .iter()
        .find_map(|(field, signal)| raw.get(*field).map(|value| (signal, value)))
        .and_then(|(signal, value)| signal.resolve(value));
    StockStatus::from_flag(flag)
}

/// Best-effort category: `category`, `categoryName`, first of `categories`, else `Other`.
#[must_use]
pub fn category_of(raw: &RawProduct) -> String {
    CATEGORY_FIELDS
        .iter()
        .find_map(|field| raw.get(*field).and_then(category_text))
        .or_else(|| match raw.get("categories") {
            Some(Value::Array(items)) => items.first().and_then(category_text),
            Some(other) => category_text(other),
            None => None,
        })
        .unwrap_or_else(|| OTHER_CATEGORY.to_string())
}

fn category_text(value: &Value) -> Option<String> {
    match value {
        Value::Object(fields) => fields.get("name").and_then(text_of),
        other => text_of(other),
    }
}

fn text_of(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Truthiness of a boolean stock flag. `null`, zero, empty values and the
/// words `false`/`no`/`0` are false; anything else is true.
fn flag_of(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "" | "false" | "no" | "0"
        ),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn quantity_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|v| v.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

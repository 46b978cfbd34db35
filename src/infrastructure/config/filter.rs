//! Alert filter configuration.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::AlertFilter;

/// Keyword and price-bound filters. Empty or unset means inactive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterConfig {
    /// Alert only when the name contains one of these (case-insensitive).
    #[serde(default)]
    pub include_keywords: Vec<String>,
    /// Never alert when the name contains one of these (case-insensitive).
    #[serde(default)]
    pub exclude_keywords: Vec<String>,
    #[serde(default)]
    pub min_price: Option<Decimal>,
    #[serde(default)]
    pub max_price: Option<Decimal>,
}

impl FilterConfig {
    /// Build the immutable filter handed to the monitor.
    #[must_use]
    pub fn to_filter(&self) -> AlertFilter {
        AlertFilter::new(
            &self.include_keywords,
            &self.exclude_keywords,
            self.min_price,
            self.max_price,
        )
    }
}

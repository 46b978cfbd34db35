//! Alert eligibility filter.
//!
//! A pure predicate over a product name and price. It gates alerts only;
//! filtered products are still recorded in the baseline.

use super::money::Price;
use super::product::NormalizedProduct;

/// Keyword and price-bound criteria for alerts.
///
/// Every criterion is inactive when empty or unset, and an inactive
/// criterion never rejects. Active criteria combine with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertFilter {
    include: Vec<Keyword>,
    exclude: Vec<Keyword>,
    min_price: Option<Price>,
    max_price: Option<Price>,
}

#[derive(Debug, Clone, PartialEq)]
struct Keyword {
    original: String,
    lowered: String,
}

impl Keyword {
    fn new(raw: &str) -> Option<Self> {
        let original = raw.trim();
        if original.is_empty() {
            return None;
        }
        Some(Self {
            original: original.to_string(),
            lowered: original.to_lowercase(),
        })
    }
}

fn keywords(raw: &[String]) -> Vec<Keyword> {
    raw.iter().filter_map(|kw| Keyword::new(kw)).collect()
}

impl AlertFilter {
    #[must_use]
    pub fn new(
        include: &[String],
        exclude: &[String],
        min_price: Option<Price>,
        max_price: Option<Price>,
    ) -> Self {
        Self {
            include: keywords(include),
            exclude: keywords(exclude),
            min_price,
            max_price,
        }
    }

    /// Filter with every criterion inactive.
    #[must_use]
    pub fn accept_all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.include.is_empty()
            || !self.exclude.is_empty()
            || self.min_price.is_some()
            || self.max_price.is_some()
    }

    /// Check a product against every active criterion.
    #[must_use]
    pub fn matches(&self, name: &str, price: Option<Price>) -> bool {
        let name = name.to_lowercase();

        if !self.include.is_empty() && !self.include.iter().any(|kw| name.contains(&kw.lowered)) {
            return false;
        }
        if self.exclude.iter().any(|kw| name.contains(&kw.lowered)) {
            return false;
        }
        if let Some(min) = self.min_price {
            if !price.is_some_and(|p| p >= min) {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if !price.is_some_and(|p| p <= max) {
                return false;
            }
        }
        true
    }

    #[must_use]
    pub fn accepts(&self, product: &NormalizedProduct) -> bool {
        self.matches(&product.name, product.price)
    }

    /// One-line description of the active criteria, `none` when inactive.
    #[must_use]
    pub fn describe(&self) -> String {
        let join = |list: &[Keyword]| {
            list.iter()
                .map(|kw| kw.original.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut parts = Vec::new();
        if !self.include.is_empty() {
            parts.push(format!("include: {}", join(&self.include)));
        }
        if !self.exclude.is_empty() {
            parts.push(format!("exclude: {}", join(&self.exclude)));
        }
        if let Some(min) = self.min_price {
            parts.push(format!("min price: {min}"));
        }
        if let Some(max) = self.max_price {
            parts.push(format!("max price: {max}"));
        }

        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join("; ")
        }
    }
}

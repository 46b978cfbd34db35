//! Catalog diff against the persisted baseline.
//!
//! [`apply_observations`] classifies every product of the current fetch as
//! new or existing, records price drops, and brings the baseline up to date.
//! Alert eligibility is decided afterwards by [`CatalogDiff::eligible`], so a
//! product rejected by the filter is still recorded.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::filter::AlertFilter;
use super::money::{percentage_of, Price};
use super::product::NormalizedProduct;
use super::state::{MonitorState, SeenEntry};

/// A price decrease between the baseline and the current observation.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceDrop {
    /// Current product state.
    pub product: NormalizedProduct,
    pub old_price: Price,
    /// Display string stored with the old price.
    pub old_display: String,
    pub new_price: Price,
    /// `old_price - new_price`.
    pub amount: Price,
    /// `amount / old_price * 100`, zero when the old price is zero.
    pub percentage: Decimal,
}

impl PriceDrop {
    /// Detect a drop. Both prices must be known and the new one strictly lower.
    #[must_use]
    pub fn detect(entry: &SeenEntry, product: &NormalizedProduct) -> Option<Self> {
        let old_price = entry.last_price?;
        let new_price = product.price?;
        if new_price >= old_price {
            return None;
        }

        let amount = old_price - new_price;
        Some(Self {
            product: product.clone(),
            old_price,
            old_display: entry.last_price_display.clone(),
            new_price,
            amount,
            percentage: percentage_of(amount, old_price),
        })
    }
}

/// Result of diffing one fetch against the baseline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogDiff {
    /// Products whose key was not in the baseline, in fetch order.
    pub new_products: Vec<NormalizedProduct>,
    /// Price drops on already-known products, in fetch order.
    pub price_drops: Vec<PriceDrop>,
    /// Number of products observed (including repeats).
    pub observed: usize,
}

/// The alert-eligible part of a [`CatalogDiff`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertPlan {
    pub new_products: Vec<NormalizedProduct>,
    pub price_drops: Vec<PriceDrop>,
    /// New products rejected by the filter.
    pub suppressed_new: usize,
    /// Price drops rejected by the filter.
    pub suppressed_drops: usize,
}

impl CatalogDiff {
    /// Keep only the entries accepted by `filter`, judged on the current state.
    #[must_use]
    pub fn eligible(&self, filter: &AlertFilter) -> AlertPlan {
        let new_products: Vec<_> = self
            .new_products
            .iter()
            .filter(|p| filter.accepts(p))
            .cloned()
            .collect();
        let price_drops: Vec<_> = self
            .price_drops
            .iter()
            .filter(|d| filter.accepts(&d.product))
            .cloned()
            .collect();

        AlertPlan {
            suppressed_new: self.new_products.len() - new_products.len(),
            suppressed_drops: self.price_drops.len() - price_drops.len(),
            new_products,
            price_drops,
        }
    }
}

/// Diff `products` against the baseline in `state` and update it.
///
/// New keys get a fresh [`SeenEntry`] stamped `now` and bump
/// `total_new_detected`. Known keys are checked for a price drop and then
/// overwritten with the current observation. Keys absent from `products`
/// are left untouched.
pub fn apply_observations(
    state: &mut MonitorState,
    products: &[NormalizedProduct],
    now: DateTime<Utc>,
) -> CatalogDiff {
    let mut diff = CatalogDiff {
        observed: products.len(),
        ..CatalogDiff::default()
    };

    for product in products {
        match state.seen_products.get_mut(&product.key) {
            Some(entry) => {
                if let Some(drop) = PriceDrop::detect(entry, product) {
                    diff.price_drops.push(drop);
                }
                entry.observe(product);
            }
            None => {
                state.seen_products.insert(
                    product.key.clone(),
                    SeenEntry::first_observation(product, now),
                );
                state.total_new_detected += 1;
                diff.new_products.push(product.clone());
            }
        }
    }

    diff
}

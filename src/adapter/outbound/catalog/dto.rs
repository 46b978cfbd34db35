//! Catalog API response types.
//!
//! Example response:
//! ```json
//! {"products":[{"code":"A1","name":"Hoodie","price":{"formattedValue":"₹999"}}],
//!  "pagination":{"totalResults":1,"totalPages":1}}
//! ```
//!
//! Product records are kept as untyped JSON objects; the normalizer owns
//! every field lookup.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::domain::RawProduct;
use crate::port::CatalogPage;

/// Body of one category listing page.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryResponse {
    #[serde(default)]
    pub products: Vec<Value>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Pagination block. Counts may arrive as numbers or numeric strings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_results: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_pages: Option<u64>,
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

impl CategoryResponse {
    /// Convert into the port type.
    ///
    /// Records that are not JSON objects are dropped. A missing page count
    /// means a single page.
    #[must_use]
    pub fn into_page(self) -> CatalogPage {
        let products: Vec<RawProduct> = self
            .products
            .into_iter()
            .filter_map(|value| match value {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();

        CatalogPage {
            products,
            total_results: self.pagination.total_results.unwrap_or(0),
            total_pages: self
                .pagination
                .total_pages
                .map_or(1, |pages| u32::try_from(pages).unwrap_or(u32::MAX)),
        }
    }
}

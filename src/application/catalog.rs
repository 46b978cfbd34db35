//! Paged catalog collection.
//!
//! Walks every page of the listing for one cycle and normalizes the result.
//! Page 0 is mandatory; a later page failing only truncates the batch.

use tracing::{debug, warn};

use crate::domain::{NormalizedProduct, Normalizer, RawProduct};
use crate::error::Result;
use crate::port::CatalogSource;

/// All products collected in one cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogBatch {
    /// Normalized products in fetch order. Records without a key are dropped.
    pub products: Vec<NormalizedProduct>,
    /// Total result count reported by page 0.
    pub total_results: u64,
    /// Pages successfully fetched.
    pub pages_fetched: u32,
    /// Whether a later page failed and the remaining pages were skipped.
    pub truncated: bool,
}

/// Fetch up to `max_pages` pages and normalize the concatenated records.
///
/// # Errors
///
/// Returns the page 0 error; nothing is collected in that case.
pub async fn collect_catalog(
    source: &dyn CatalogSource,
    normalizer: &Normalizer,
    max_pages: u32,
) -> Result<CatalogBatch> {
    let first = source.fetch_page(0).await?;
    let total_results = first.total_results;
    let page_count = first.total_pages.clamp(1, max_pages.max(1));

    let mut raws: Vec<RawProduct> = first.products;
    let mut pages_fetched = 1;
    let mut truncated = false;

    for page in 1..page_count {
        match source.fetch_page(page).await {
            Ok(next) => {
                raws.extend(next.products);
                pages_fetched += 1;
            }
            Err(e) => {
                warn!(page, error = %e, "Catalog page failed, truncating batch");
                truncated = true;
                break;
            }
        }
    }

    if first.total_pages > page_count {
        debug!(
            reported = first.total_pages,
            max_pages, "Catalog page count capped"
        );
    }

    Ok(CatalogBatch {
        products: normalizer.normalize_all(&raws),
        total_results,
        pages_fetched,
        truncated,
    })
}

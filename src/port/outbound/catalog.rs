//! Catalog source port.

use async_trait::async_trait;

use crate::domain::RawProduct;
use crate::error::Result;

/// One page of catalog results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogPage {
    /// Raw product records on this page.
    pub products: Vec<RawProduct>,
    /// Total result count reported by the API.
    pub total_results: u64,
    /// Total page count reported by the API.
    pub total_pages: u32,
}

/// Source of paged catalog data.
///
/// Pages are zero-based. Implementations apply their own request timeout
/// and report any transport or decoding failure as an error.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch a single page.
    async fn fetch_page(&self, page: u32) -> Result<CatalogPage>;
}

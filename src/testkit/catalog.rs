//! Scripted catalog source.

use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::RawProduct;
use crate::error::{CatalogError, Result};
use crate::port::{CatalogPage, CatalogSource};

/// Serves a fixed list of pages. Page `n` of the script answers
/// `fetch_page(n)`; `total_pages` is the script length.
///
/// Pages marked with [`fail_page`](Self::fail_page) answer with a 503.
#[derive(Default)]
pub struct ScriptedCatalog {
    pages: Mutex<Vec<Vec<RawProduct>>>,
    failing: Mutex<HashSet<u32>>,
    requested: Mutex<Vec<u32>>,
}

impl ScriptedCatalog {
    pub fn new(pages: Vec<Vec<RawProduct>>) -> Self {
        Self {
            pages: Mutex::new(pages),
            ..Self::default()
        }
    }

    /// A catalog with a single page.
    pub fn single(products: Vec<RawProduct>) -> Self {
        Self::new(vec![products])
    }

    /// Replace the script, e.g. between cycles.
    pub fn set_pages(&self, pages: Vec<Vec<RawProduct>>) {
        *self.pages.lock() = pages;
    }

    pub fn fail_page(&self, page: u32) {
        self.failing.lock().insert(page);
    }

    /// Clear every scripted failure.
    pub fn heal(&self) {
        self.failing.lock().clear();
    }

    /// Pages requested so far, in call order.
    pub fn requested_pages(&self) -> Vec<u32> {
        self.requested.lock().clone()
    }
}

#[async_trait]
impl CatalogSource for ScriptedCatalog {
    async fn fetch_page(&self, page: u32) -> Result<CatalogPage> {
        self.requested.lock().push(page);
        if self.failing.lock().contains(&page) {
            return Err(CatalogError::Status { page, status: 503 }.into());
        }

        let pages = self.pages.lock();
        let total_results = pages.iter().map(Vec::len).sum::<usize>() as u64;
        Ok(CatalogPage {
            products: pages.get(page as usize).cloned().unwrap_or_default(),
            total_results,
            total_pages: u32::try_from(pages.len()).unwrap_or(u32::MAX).max(1),
        })
    }
}

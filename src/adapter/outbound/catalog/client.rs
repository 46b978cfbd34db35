//! Catalog REST API client.
//!
//! Fetches one listing page per request with the fixed scope selector
//! (`query`) and a zero-based `currentPage` parameter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::{debug, warn};
use url::Url;

use super::dto::CategoryResponse;
use crate::error::{CatalogError, Result};
use crate::infrastructure::config::catalog::CatalogConfig;
use crate::port::{CatalogPage, CatalogSource};

/// HTTP client for the category listing endpoint.
pub struct CatalogClient {
    http: HttpClient,
    api_url: Url,
    query: String,
}

impl CatalogClient {
    /// Build a client with the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_url` is not a valid URL.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let api_url = Url::parse(&config.api_url)?;
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Ok(Self {
            http,
            api_url,
            query: config.query.clone(),
        })
    }

    /// Endpoint this client queries.
    #[must_use]
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch_page(&self, page: u32) -> Result<CatalogPage> {
        let current_page = page.to_string();
        let response = self
            .http
            .get(self.api_url.clone())
            .query(&[
                ("query", self.query.as_str()),
                ("currentPage", current_page.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                page,
                status: status.as_u16(),
            }
            .into());
        }

        let body: CategoryResponse =
            response
                .json()
                .await
                .map_err(|err| CatalogError::Decode {
                    page,
                    reason: err.to_string(),
                })?;
        let page_data = body.into_page();

        debug!(
            page,
            products = page_data.products.len(),
            total_pages = page_data.total_pages,
            "Fetched catalog page"
        );
        Ok(page_data)
    }
}

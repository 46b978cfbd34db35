//! Catalog API configuration.

use serde::Deserialize;

/// Catalog API endpoint and HTTP settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Category listing endpoint.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Origin prefixed to relative product paths.
    #[serde(default = "default_web_origin")]
    pub web_origin: String,
    /// Fixed scope selector sent as the `query` parameter.
    #[serde(default = "default_query")]
    pub query: String,
    /// Request timeout in milliseconds (default: 10000).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds (default: 5000).
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Upper bound on pages fetched per cycle (default: 50).
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

fn default_api_url() -> String {
    "https://www.sheinindia.in/api/category/sverse-5939-37961".to_string()
}

fn default_web_origin() -> String {
    "https://www.sheinindia.in".to_string()
}

fn default_query() -> String {
    ":newn".to_string()
}

const fn default_timeout_ms() -> u64 {
    10_000
}

const fn default_connect_timeout_ms() -> u64 {
    5_000
}

const fn default_max_pages() -> u32 {
    50
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            web_origin: default_web_origin(),
            query: default_query(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            max_pages: default_max_pages(),
        }
    }
}

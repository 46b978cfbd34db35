//! Storefront catalog integration.

pub mod client;
pub mod dto;

pub use client::CatalogClient;

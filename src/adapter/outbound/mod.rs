//! Outbound adapters (driven side).

pub mod catalog;
pub mod store;
#[cfg(feature = "telegram")]
pub mod telegram;

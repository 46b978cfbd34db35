//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`catalog`]: `ScriptedCatalog`, a page-scripted [`CatalogSource`](crate::port::CatalogSource).
//! - [`messenger`]: `RecordingMessenger`, records sends and serves queued updates.
//! - [`store`]: `MemoryStore`, an in-memory [`StateStore`](crate::port::StateStore).
//! - [`domain`]: builders for raw records and normalized products.

pub mod catalog;
pub mod domain;
pub mod messenger;
pub mod store;

pub use catalog::ScriptedCatalog;
pub use domain::{normalized, raw_from, raw_product};
pub use messenger::RecordingMessenger;
pub use store::MemoryStore;

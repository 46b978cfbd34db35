//! pricehound - catalog watcher with Telegram alerts.
//!
//! Polls a paginated storefront listing, keeps a persisted baseline of every
//! product it has seen, and notifies Telegram subscribers about new listings
//! and price drops. Subscribers manage themselves through bot commands.
//!
//! # Architecture
//!
//! - **`domain`** - Normalizer, alert filter, baseline state, diff engine,
//!   command table. No I/O.
//! - **`port`** - Traits for the catalog, the messenger and the state store.
//! - **`adapter`** - reqwest catalog client, teloxide messenger, JSON file
//!   store, clap CLI.
//! - **`application`** - One scheduler cycle plus message rendering,
//!   broadcasting and command processing.
//! - **`infrastructure`** - Configuration, logging setup, wiring and the
//!   signal-aware run loop.
//!
//! # Features
//!
//! - `telegram` (default) - Telegram transport and the `pricehound` binary
//! - `testkit` - In-memory test doubles for integration tests
//!
//! # Example
//!
//! ```no_run
//! use pricehound::domain::{AlertFilter, Normalizer};
//!
//! let normalizer = Normalizer::new("https://www.sheinindia.in");
//! let filter = AlertFilter::accept_all();
//! assert!(!filter.is_active());
//! # let _ = normalizer;
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

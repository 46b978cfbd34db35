//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the monitor cycle.

pub mod catalog;
pub mod commands;
pub mod format;
pub mod monitor;
pub mod notifier;

//! Configuration loading, sections and logging setup.

pub mod catalog;
pub mod filter;
pub mod logging;
pub mod monitor;
pub mod settings;
pub mod telegram;

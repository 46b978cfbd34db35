//! CLI module graph.

pub mod check;
pub mod command;
pub mod output;
#[cfg(feature = "telegram")]
pub mod run;

//! State persistence adapters.

pub mod json;

pub use json::JsonFileStore;

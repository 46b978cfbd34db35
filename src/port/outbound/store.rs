//! State persistence port.

use crate::domain::MonitorState;
use crate::error::Result;

/// Durable storage for the [`MonitorState`] document.
pub trait StateStore: Send + Sync {
    /// Load the stored document.
    ///
    /// A missing or unreadable document yields [`MonitorState::default`];
    /// loading never fails.
    fn load(&self) -> MonitorState;

    /// Replace the stored document with `state`.
    fn save(&self, state: &MonitorState) -> Result<()>;
}

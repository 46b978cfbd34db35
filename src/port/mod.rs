//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams between the monitor and its external collaborators.
//! Adapters implement them; the application layer only sees the traits.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!     ┌──────────────┤   (monitor, commands)   ├──────────────┐
//!     │              └────────────┬────────────┘              │
//!     ▼                           ▼                           ▼
//! ┌─────────┐              ┌─────────────┐             ┌───────────┐
//! │ Catalog │              │  Messenger  │             │   State   │
//! │ Source  │              │ (Telegram)  │             │   Store   │
//! └─────────┘              └─────────────┘             └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`CatalogSource`] - Paged catalog fetches
//! - [`Messenger`] - Outbound delivery and inbound updates
//! - [`StateStore`] - Durable state document

pub mod outbound;

pub use outbound::catalog::{CatalogPage, CatalogSource};
pub use outbound::messenger::{InboundMessage, Messenger};
pub use outbound::store::StateStore;

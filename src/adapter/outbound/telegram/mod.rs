//! Telegram Bot API transport.
//!
//! Requires the `telegram` feature to be enabled.

pub mod messenger;

pub use messenger::TelegramMessenger;

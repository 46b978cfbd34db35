//! Push-messaging port.

use async_trait::async_trait;

use crate::error::Result;

/// An inbound update from the messaging transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Monotonic update identifier used as the processing cursor.
    pub update_id: i64,
    /// Sender chat, absent for updates that carry no message.
    pub chat_id: Option<i64>,
    /// Message text, absent for non-text messages.
    pub text: Option<String>,
}

impl InboundMessage {
    /// A text message from `chat_id`.
    #[must_use]
    pub fn text(update_id: i64, chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            update_id,
            chat_id: Some(chat_id),
            text: Some(text.into()),
        }
    }
}

/// Messaging transport used for alerts and the command channel.
///
/// Delivery is best-effort: a successful `send` only means the transport
/// accepted the message.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Deliver rich text to one chat.
    async fn send(&self, chat_id: i64, text: &str) -> Result<()>;

    /// Retrieve updates with an identifier strictly greater than `after`,
    /// in ascending order.
    async fn poll_updates(&self, after: i64) -> Result<Vec<InboundMessage>>;

    /// Publish the command menu. Transports without a menu do nothing.
    async fn register_commands(&self, _commands: &[(&'static str, &'static str)]) -> Result<()> {
        Ok(())
    }
}

//! Telegram implementation of the [`Messenger`] port.
//!
//! Outbound text is sent with HTML parse mode. Inbound updates are fetched
//! with a short `getUpdates` poll (timeout 0) so the scheduler loop never
//! parks on the transport; the cycle interval is the real poll cadence.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, ParseMode, Update, UpdateKind};
use tracing::{debug, info};

use crate::error::Result;
use crate::port::{InboundMessage, Messenger};

/// Bot-backed messenger.
#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            bot: Bot::new(token),
        }
    }
}

/// Flatten an update into the port type. Only plain and edited messages
/// carry commands; every other kind keeps its id so the cursor still moves.
fn to_inbound(update: Update) -> InboundMessage {
    let update_id = i64::from(update.id.0);
    match update.kind {
        UpdateKind::Message(msg) | UpdateKind::EditedMessage(msg) => InboundMessage {
            update_id,
            chat_id: Some(msg.chat.id.0),
            text: msg.text().map(str::to_string),
        },
        _ => InboundMessage {
            update_id,
            chat_id: None,
            text: None,
        },
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn poll_updates(&self, after: i64) -> Result<Vec<InboundMessage>> {
        let mut request = self.bot.get_updates().timeout(0);
        if after > 0 {
            let offset = i32::try_from(after.saturating_add(1)).unwrap_or(i32::MAX);
            request = request.offset(offset);
        }

        let updates = request.await?;
        let mut messages: Vec<InboundMessage> = updates
            .into_iter()
            .map(to_inbound)
            .filter(|msg| msg.update_id > after)
            .collect();
        messages.sort_by_key(|msg| msg.update_id);

        debug!(count = messages.len(), after, "Fetched Telegram updates");
        Ok(messages)
    }

    async fn register_commands(&self, commands: &[(&'static str, &'static str)]) -> Result<()> {
        let commands: Vec<BotCommand> = commands
            .iter()
            .map(|(cmd, desc)| BotCommand::new(*cmd, *desc))
            .collect();

        self.bot.set_my_commands(commands).await?;
        info!("Registered bot commands with Telegram");
        Ok(())
    }
}

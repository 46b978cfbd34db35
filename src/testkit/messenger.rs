//! Recording messenger.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::port::{InboundMessage, Messenger};

/// Records every delivery and serves queued inbound updates.
///
/// Updates stay queued after being served; [`poll_updates`](Messenger::poll_updates)
/// filters by the cursor like the real transport does.
#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<(i64, String)>>,
    updates: Mutex<Vec<InboundMessage>>,
    failing_chats: Mutex<HashSet<i64>>,
    stalled_chats: Mutex<HashSet<i64>>,
    fail_polls: AtomicBool,
    registered: Mutex<Vec<(String, String)>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_update(&self, message: InboundMessage) {
        self.updates.lock().push(message);
    }

    /// Make every send to `chat_id` fail.
    pub fn fail_chat(&self, chat_id: i64) {
        self.failing_chats.lock().insert(chat_id);
    }

    /// Make every send to `chat_id` hang.
    pub fn stall_chat(&self, chat_id: i64) {
        self.stalled_chats.lock().insert(chat_id);
    }

    pub fn fail_polls(&self, fail: bool) {
        self.fail_polls.store(fail, Ordering::SeqCst);
    }

    /// Every accepted delivery as `(chat_id, text)`.
    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().clone()
    }

    pub fn sent_to(&self, chat_id: i64) -> Vec<String> {
        self.sent
            .lock()
            .iter()
            .filter(|(chat, _)| *chat == chat_id)
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn clear_sent(&self) {
        self.sent.lock().clear();
    }

    pub fn registered_commands(&self) -> Vec<(String, String)> {
        self.registered.lock().clone()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send(&self, chat_id: i64, text: &str) -> Result<()> {
        let stalled = self.stalled_chats.lock().contains(&chat_id);
        if stalled {
            tokio::time::sleep(Duration::from_secs(3_600)).await;
        }
        if self.failing_chats.lock().contains(&chat_id) {
            return Err(Error::Messaging(format!("chat {chat_id} unreachable")));
        }
        self.sent.lock().push((chat_id, text.to_string()));
        Ok(())
    }

    async fn poll_updates(&self, after: i64) -> Result<Vec<InboundMessage>> {
        if self.fail_polls.load(Ordering::SeqCst) {
            return Err(Error::Messaging("getUpdates failed".into()));
        }
        let mut updates: Vec<_> = self
            .updates
            .lock()
            .iter()
            .filter(|m| m.update_id > after)
            .cloned()
            .collect();
        updates.sort_by_key(|m| m.update_id);
        Ok(updates)
    }

    async fn register_commands(&self, commands: &[(&'static str, &'static str)]) -> Result<()> {
        *self.registered.lock() = commands
            .iter()
            .map(|(cmd, desc)| ((*cmd).to_string(), (*desc).to_string()))
            .collect();
        Ok(())
    }
}

//! Subscriber broadcast.
//!
//! Deliveries fan out concurrently and each one is bounded by the send
//! timeout. A failing recipient is logged and never blocks the others.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::port::Messenger;

/// Outcome of one broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub recipients: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// Sends rendered messages through a [`Messenger`].
#[derive(Clone)]
pub struct Broadcaster {
    messenger: Arc<dyn Messenger>,
    send_timeout: Duration,
}

impl Broadcaster {
    pub fn new(messenger: Arc<dyn Messenger>, send_timeout: Duration) -> Self {
        Self {
            messenger,
            send_timeout,
        }
    }

    /// Deliver to a single chat within the send timeout.
    ///
    /// # Errors
    ///
    /// Returns the transport error, or [`Error::Timeout`] if the send did not
    /// finish in time.
    pub async fn send_to(&self, chat_id: i64, text: &str) -> Result<()> {
        match tokio::time::timeout(self.send_timeout, self.messenger.send(chat_id, text)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(
                u64::try_from(self.send_timeout.as_millis()).unwrap_or(u64::MAX),
            )),
        }
    }

    /// Deliver `text` to every recipient independently.
    pub async fn broadcast(&self, recipients: &[i64], text: &str) -> BroadcastReport {
        if recipients.is_empty() {
            debug!("No subscribers, nothing to broadcast");
            return BroadcastReport::default();
        }

        let results = join_all(
            recipients
                .iter()
                .map(|&chat_id| async move { (chat_id, self.send_to(chat_id, text).await) }),
        )
        .await;

        let mut report = BroadcastReport {
            recipients: recipients.len(),
            ..BroadcastReport::default()
        };
        for (chat_id, result) in results {
            match result {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!(chat_id, error = %e, "Failed to deliver message");
                    report.failed += 1;
                }
            }
        }
        report
    }
}

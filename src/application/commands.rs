//! Inbound command processing.
//!
//! Each cycle pulls the updates newer than the processing cursor, runs
//! every recognized command against the state and replies to the sender.
//! Handlers are pure over (command, sender, state); only [`CommandProcessor`]
//! talks to the transport.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::format;
use super::notifier::Broadcaster;
use crate::domain::{parse_command, AlertFilter, Command, MonitorState, NormalizedProduct};
use crate::port::{InboundMessage, Messenger};

/// Read-only inputs the handlers render from.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    /// Latest successfully fetched batch.
    pub batch: &'a [NormalizedProduct],
    pub filter: &'a AlertFilter,
    /// Default item count for the recent-items command.
    pub recent_limit: usize,
    pub now: DateTime<Utc>,
}

/// A reply produced by a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    pub chat_id: i64,
    pub text: String,
}

/// Apply `command` from `chat_id` to `state` and render the reply.
pub fn handle_command(
    command: Command,
    chat_id: i64,
    state: &mut MonitorState,
    ctx: &CommandContext<'_>,
) -> String {
    match command {
        Command::Start => {
            if state.subscribe(chat_id) {
                info!(chat_id, "Subscriber joined");
            }
            format::welcome_text()
        }
        Command::Stop => {
            if state.unsubscribe(chat_id) {
                info!(chat_id, "Subscriber left");
            }
            format::farewell_text()
        }
        Command::Ping => format::pong_text(),
        Command::Status => format::status_report(state, ctx.filter, ctx.now),
        Command::Summary => format::summary_report(ctx.batch, state, ctx.now),
        Command::Latest { limit } => {
            format::recent_listing(state, limit.unwrap_or(ctx.recent_limit))
        }
        Command::Help => format::help_text(),
    }
}

/// Handle one inbound message and advance the cursor past it.
///
/// Returns `None` for messages without a sender, non-command text and
/// unrecognized commands.
pub fn handle_message(
    message: &InboundMessage,
    state: &mut MonitorState,
    ctx: &CommandContext<'_>,
) -> Option<CommandReply> {
    state.advance_cursor(message.update_id);

    let chat_id = message.chat_id?;
    let text = message.text.as_deref()?;
    let command = match parse_command(text) {
        Ok(command) => command,
        Err(e) => {
            debug!(chat_id, error = %e, "Ignoring message");
            return None;
        }
    };

    debug!(chat_id, ?command, "Handling command");
    Some(CommandReply {
        chat_id,
        text: handle_command(command, chat_id, state, ctx),
    })
}

/// Outcome of one processing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Updates retrieved from the transport.
    pub received: usize,
    /// Recognized commands.
    pub handled: usize,
    /// Replies the transport did not accept.
    pub failed_replies: usize,
    /// Retrieval failed; state was left untouched.
    pub poll_failed: bool,
}

/// Pulls inbound updates and answers them.
pub struct CommandProcessor {
    messenger: Arc<dyn Messenger>,
    outbox: Broadcaster,
    poll_timeout: Duration,
}

impl CommandProcessor {
    pub fn new(
        messenger: Arc<dyn Messenger>,
        send_timeout: Duration,
        poll_timeout: Duration,
    ) -> Self {
        Self {
            outbox: Broadcaster::new(messenger.clone(), send_timeout),
            messenger,
            poll_timeout,
        }
    }

    /// Process every update newer than `state.last_update_id`.
    ///
    /// A retrieval failure or timeout leaves the cursor and subscriber set
    /// unchanged; the same updates are retried next cycle.
    pub async fn process(
        &self,
        state: &mut MonitorState,
        ctx: &CommandContext<'_>,
    ) -> CommandOutcome {
        let after = state.last_update_id;
        let poll = self.messenger.poll_updates(after);
        let updates = match tokio::time::timeout(self.poll_timeout, poll).await {
            Ok(Ok(updates)) => updates,
            Ok(Err(e)) => {
                warn!(error = %e, "Failed to retrieve inbound updates");
                return CommandOutcome {
                    poll_failed: true,
                    ..CommandOutcome::default()
                };
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.poll_timeout.as_millis() as u64,
                    "Timed out retrieving inbound updates"
                );
                return CommandOutcome {
                    poll_failed: true,
                    ..CommandOutcome::default()
                };
            }
        };

        let mut outcome = CommandOutcome {
            received: updates.len(),
            ..CommandOutcome::default()
        };

        for message in updates.iter().filter(|m| m.update_id > after) {
            let Some(reply) = handle_message(message, state, ctx) else {
                continue;
            };
            outcome.handled += 1;

            if let Err(e) = self.outbox.send_to(reply.chat_id, &reply.text).await {
                warn!(chat_id = reply.chat_id, error = %e, "Failed to send command reply");
                outcome.failed_replies += 1;
            }
        }

        outcome
    }
}

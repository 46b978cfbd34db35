//! Inbound bot command table and parser.

use std::fmt;

/// Upper bound for the `/new <n>` argument.
pub const MAX_RECENT_LIMIT: usize = 50;

/// Command kinds, one per entry of [`COMMANDS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Start,
    Stop,
    Ping,
    Status,
    Summary,
    Latest,
    Help,
}

/// A parsed inbound command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Join the subscriber set.
    Start,
    /// Leave the subscriber set.
    Stop,
    Ping,
    Status,
    Summary,
    /// Most recently first-seen products; `None` uses the configured default.
    Latest { limit: Option<usize> },
    Help,
}

impl Command {
    #[must_use]
    pub const fn kind(self) -> CommandKind {
        match self {
            Self::Start => CommandKind::Start,
            Self::Stop => CommandKind::Stop,
            Self::Ping => CommandKind::Ping,
            Self::Status => CommandKind::Status,
            Self::Summary => CommandKind::Summary,
            Self::Latest { .. } => CommandKind::Latest,
            Self::Help => CommandKind::Help,
        }
    }
}

/// One row of the command table.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    /// Tags matched after the `/` prefix, the first one is canonical.
    pub tags: &'static [&'static str],
    pub kind: CommandKind,
    pub usage: &'static str,
    pub description: &'static str,
}

/// The fixed command table.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        tags: &["start"],
        kind: CommandKind::Start,
        usage: "/start",
        description: "Subscribe to new-item and price-drop alerts",
    },
    CommandSpec {
        tags: &["stop"],
        kind: CommandKind::Stop,
        usage: "/stop",
        description: "Unsubscribe from alerts",
    },
    CommandSpec {
        tags: &["ping"],
        kind: CommandKind::Ping,
        usage: "/ping",
        description: "Check that the watcher is running",
    },
    CommandSpec {
        tags: &["status"],
        kind: CommandKind::Status,
        usage: "/status",
        description: "Counters, subscribers and active filters",
    },
    CommandSpec {
        tags: &["summary"],
        kind: CommandKind::Summary,
        usage: "/summary",
        description: "Category and stock breakdown of the catalog",
    },
    CommandSpec {
        tags: &["new", "latest"],
        kind: CommandKind::Latest,
        usage: "/new [n]",
        description: "Most recently listed products",
    },
    CommandSpec {
        tags: &["help"],
        kind: CommandKind::Help,
        usage: "/help",
        description: "Show all commands",
    },
];

/// Parse error for inbound messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    NotACommand,
    UnknownCommand(String),
}

impl fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotACommand => write!(f, "message is not a command"),
            Self::UnknownCommand(cmd) => write!(f, "unknown command `{cmd}`"),
        }
    }
}

impl std::error::Error for CommandParseError {}

/// Look up the table row for a tag (without the `/` prefix).
#[must_use]
pub fn lookup(tag: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.tags.contains(&tag))
}

/// Parse message text into a command.
///
/// The first token must start with `/`. A `@botname` routing suffix is
/// stripped and the tag is matched case-insensitively.
pub fn parse_command(text: &str) -> Result<Command, CommandParseError> {
    let mut parts = text.split_whitespace();
    let Some(raw_command) = parts.next() else {
        return Err(CommandParseError::NotACommand);
    };
    let Some(tagged) = raw_command.strip_prefix('/') else {
        return Err(CommandParseError::NotACommand);
    };

    let tag = tagged
        .split_once('@')
        .map_or(tagged, |(head, _)| head)
        .to_lowercase();

    let spec = lookup(&tag).ok_or_else(|| CommandParseError::UnknownCommand(format!("/{tag}")))?;

    Ok(match spec.kind {
        CommandKind::Start => Command::Start,
        CommandKind::Stop => Command::Stop,
        CommandKind::Ping => Command::Ping,
        CommandKind::Status => Command::Status,
        CommandKind::Summary => Command::Summary,
        CommandKind::Latest => Command::Latest {
            limit: parts.next().and_then(parse_limit),
        },
        CommandKind::Help => Command::Help,
    })
}

fn parse_limit(raw: &str) -> Option<usize> {
    let n: usize = raw.parse().ok()?;
    (n > 0).then(|| n.min(MAX_RECENT_LIMIT))
}

/// Bot commands for menu registration, as `(command, description)` pairs.
#[must_use]
pub fn bot_commands() -> Vec<(&'static str, &'static str)> {
    COMMANDS
        .iter()
        .map(|spec| (spec.tags[0], spec.description))
        .collect()
}

// ABOUTME: Remote commands and their rendering into shell strings for the instance.
// ABOUTME: Console commands go through an RCON client; arguments are single-quoted.

use crate::types::{BroadcastMessage, PlayerName};

/// A command the orchestrator or relay sends to the instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCommand {
    WhitelistAdd(PlayerName),
    Broadcast(BroadcastMessage),
    ServiceStart,
    ServiceStop,
}

/// How the game service is driven on the instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCommands {
    /// Shell command that launches the game service.
    pub start: String,
    /// Shell prefix that sends one console line to the running service.
    pub console: String,
}

impl ServiceCommands {
    pub fn new(start: impl Into<String>, console: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            console: console.into(),
        }
    }

    pub fn render(&self, command: &RemoteCommand) -> String {
        match command {
            RemoteCommand::ServiceStart => self.start.clone(),
            RemoteCommand::ServiceStop => self.console_line("stop"),
            RemoteCommand::WhitelistAdd(player) => {
                self.console_line(&format!("whitelist add {player}"))
            }
            RemoteCommand::Broadcast(message) => self.console_line(&format!("say {message}")),
        }
    }

    fn console_line(&self, line: &str) -> String {
        format!("{} {}", self.console, shell_quote(line))
    }
}

impl std::fmt::Display for RemoteCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteCommand::WhitelistAdd(player) => write!(f, "whitelist add {player}"),
            RemoteCommand::Broadcast(_) => f.write_str("broadcast"),
            RemoteCommand::ServiceStart => f.write_str("service start"),
            RemoteCommand::ServiceStop => f.write_str("service stop"),
        }
    }
}

/// Quote `value` as one POSIX shell word.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

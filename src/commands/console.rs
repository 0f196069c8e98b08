// ABOUTME: Line-oriented command console used by `hearth serve`.
// ABOUTME: Parses one command per line and runs it against the shared orchestrator.

use hearth::lifecycle::Ack;
use hearth::output::Output;
use hearth::types::{BroadcastMessage, BroadcastMessageError, PlayerName, PlayerNameError};
use thiserror::Error;

use super::Context;

pub const HELP: &str = "commands: start, stop, status, whitelist <player>, say <message>, \
players, reconcile, cancel, help, quit";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("invalid player name: {0}")]
    PlayerName(#[from] PlayerNameError),

    #[error("invalid broadcast message: {0}")]
    BroadcastMessage(#[from] BroadcastMessageError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Start,
    Stop,
    Status,
    Whitelist(PlayerName),
    Say(BroadcastMessage),
    Players,
    Reconcile,
    Cancel,
    Help,
    Quit,
}

impl ConsoleCommand {
    /// Parse one console line. Blank lines parse to `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, ConsoleError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        let command = match word.to_ascii_lowercase().as_str() {
            "start" => ConsoleCommand::Start,
            "stop" => ConsoleCommand::Stop,
            "status" => ConsoleCommand::Status,
            "players" | "online" => ConsoleCommand::Players,
            "reconcile" => ConsoleCommand::Reconcile,
            "cancel" => ConsoleCommand::Cancel,
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" => ConsoleCommand::Quit,
            "whitelist" => {
                if rest.is_empty() {
                    return Err(ConsoleError::MissingArgument("whitelist"));
                }
                ConsoleCommand::Whitelist(PlayerName::new(rest)?)
            }
            "say" => {
                if rest.is_empty() {
                    return Err(ConsoleError::MissingArgument("say"));
                }
                ConsoleCommand::Say(BroadcastMessage::new(rest)?)
            }
            _ => return Err(ConsoleError::Unknown(word.to_string())),
        };
        Ok(Some(command))
    }
}

/// Run one console command. Failures are reported, never fatal.
pub async fn execute(ctx: &Context, command: ConsoleCommand, output: &Output) {
    match command {
        ConsoleCommand::Start => report_ack(ctx.orchestrator.request_start(), output),
        ConsoleCommand::Stop => report_ack(ctx.orchestrator.request_stop(), output),
        ConsoleCommand::Status => output.status(&ctx.orchestrator.status().await),
        ConsoleCommand::Whitelist(player) => match ctx.relay.whitelist(player.clone()).await {
            Ok(()) => output.success(&format!("Added {player} to the whitelist")),
            Err(e) => output.error(&e.to_string()),
        },
        ConsoleCommand::Say(message) => match ctx.relay.broadcast(message).await {
            Ok(()) => output.success("Message sent"),
            Err(e) => output.error(&e.to_string()),
        },
        ConsoleCommand::Players => match ctx.relay.players().await {
            Ok(occupancy) if occupancy.reachable => {
                output.success(&format!("{} player(s) online", occupancy.players))
            }
            Ok(_) => output.success("Server is not answering status pings"),
            Err(e) => output.error(&e.to_string()),
        },
        ConsoleCommand::Reconcile => match ctx.orchestrator.reconcile().await {
            Ok(phase) => output.success(&format!("Server is {phase}")),
            Err(e) => output.error(&e.to_string()),
        },
        ConsoleCommand::Cancel => {
            if ctx.orchestrator.cancel_transition() {
                output.success("Cancelling the running transition");
            } else {
                output.success("Nothing to cancel");
            }
        }
        ConsoleCommand::Help => output.progress(HELP),
        // The serve loop handles quit before dispatching.
        ConsoleCommand::Quit => {}
    }
}

fn report_ack(
    result: Result<Ack, hearth::lifecycle::LifecycleError>,
    output: &Output,
) {
    match result {
        // Progress arrives as events.
        Ok(Ack::Accepted(handle)) => output.success(&format!("Server {} accepted", handle.kind())),
        Ok(Ack::AlreadyInState(phase)) => output.success(&format!("Server is already {phase}")),
        Err(e) => output.error(&e.to_string()),
    }
}

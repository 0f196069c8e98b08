// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use hearth::output::OutputMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hearth")]
#[command(about = "Start, stop and auto-shutdown an on-demand game server")]
#[command(version)]
pub struct Cli {
    /// Path to the config file (default: hearth.yml in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output, suitable for scripts
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Output JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new hearth.yml configuration file
    Init {
        /// Overwrite an existing hearth.yml
        #[arg(long)]
        force: bool,
    },

    #[command(flatten)]
    Deployment(DeploymentCommand),
}

/// Commands that act on the configured deployment.
#[derive(Subcommand)]
pub enum DeploymentCommand {
    /// Show the server's lifecycle phase
    Status,

    /// Bring the server up and wait until players can join
    Start,

    /// Take the server down and wait until the instance is off
    Stop,

    /// Add a player to the server whitelist
    Whitelist {
        /// Game account name
        player: String,
    },

    /// Broadcast a chat message to everyone online
    Say {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Show how many players are online
    Players,

    /// Run the idle monitor with an interactive command console
    Serve,
}

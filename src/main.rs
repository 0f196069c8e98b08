// ABOUTME: Entry point for the hearth CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands, DeploymentCommand};
use commands::Context;
use hearth::error::Result;
use hearth::output::Output;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mut output = Output::new(cli.output_mode());

    if let Err(e) = run(cli, &mut output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &mut Output) -> Result<()> {
    let command = match cli.command {
        Commands::Init { force } => return commands::init(force, output),
        Commands::Deployment(command) => command,
    };

    let ctx = Context::open(cli.config.as_deref()).await?;

    match command {
        DeploymentCommand::Status => commands::status(&ctx, output).await,
        DeploymentCommand::Start => commands::start(&ctx, output).await,
        DeploymentCommand::Stop => commands::stop(&ctx, output).await,
        DeploymentCommand::Whitelist { player } => commands::whitelist(&ctx, &player, output).await,
        DeploymentCommand::Say { message } => commands::say(&ctx, &message.join(" "), output).await,
        DeploymentCommand::Players => commands::players(&ctx, output).await,
        DeploymentCommand::Serve => commands::serve(ctx, output).await,
    }
}

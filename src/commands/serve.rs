// ABOUTME: Long-running mode: idle monitor plus a stdin command console.
// ABOUTME: Streams lifecycle events to output until quit, Ctrl-C or shutdown.

use hearth::error::Result;
use hearth::lifecycle::IdleMonitor;
use hearth::output::Output;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use super::Context;
use super::console::{self, ConsoleCommand};

pub async fn serve(ctx: Context, output: &mut Output) -> Result<()> {
    let monitor = IdleMonitor::new(ctx.orchestrator.clone()).spawn();
    let mut events = ctx.orchestrator.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    output.status(&ctx.orchestrator.status().await);
    output.progress(console::HELP);

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => match ConsoleCommand::parse(&line) {
                    Ok(Some(ConsoleCommand::Quit)) => break,
                    Ok(Some(command)) => console::execute(&ctx, command, output).await,
                    Ok(None) => {}
                    Err(e) => output.error(&e.to_string()),
                },
                // Without a console, keep monitoring until interrupted.
                None => stdin_open = false,
            },
            event = events.recv() => match event {
                Ok(event) => output.event(&event),
                Err(RecvError::Lagged(missed)) => warn!("Missed {} lifecycle events", missed),
                Err(RecvError::Closed) => break,
            },
            _ = &mut ctrl_c => {
                output.progress("Interrupted, shutting down");
                break;
            }
        }
    }

    ctx.orchestrator.cancel_transition();
    monitor.stop().await;
    Ok(())
}

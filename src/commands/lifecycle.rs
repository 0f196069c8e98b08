// ABOUTME: One-shot status, start and stop commands.
// ABOUTME: Start and stop stream phase changes and wait for the transition to finish.

use hearth::error::Result;
use hearth::lifecycle::{Ack, LifecycleEvent, TransitionHandle};
use hearth::output::Output;
use tokio::sync::broadcast;

use super::Context;

pub async fn status(ctx: &Context, output: &mut Output) -> Result<()> {
    let report = ctx.orchestrator.status().await;
    output.status(&report);
    Ok(())
}

pub async fn start(ctx: &Context, output: &mut Output) -> Result<()> {
    output.start_timer();
    let events = ctx.orchestrator.subscribe();
    let ack = ctx.orchestrator.request_start()?;
    follow(ctx, ack, events, output).await
}

pub async fn stop(ctx: &Context, output: &mut Output) -> Result<()> {
    output.start_timer();
    let events = ctx.orchestrator.subscribe();
    let ack = ctx.orchestrator.request_stop()?;
    follow(ctx, ack, events, output).await
}

async fn follow(
    ctx: &Context,
    ack: Ack,
    events: broadcast::Receiver<LifecycleEvent>,
    output: &Output,
) -> Result<()> {
    match ack {
        Ack::AlreadyInState(phase) => {
            output.success(&format!("Server is already {phase}"));
            Ok(())
        }
        Ack::Accepted(handle) => {
            output.progress(&format!(
                "Server {} requested, this can take several minutes...",
                handle.kind()
            ));
            let phase = wait(ctx, handle, events, output).await?;
            output.success(&format!("Server is {phase}"));
            Ok(())
        }
    }
}

/// Wait for `handle`, echoing phase changes. Ctrl-C cancels the current wait.
async fn wait(
    ctx: &Context,
    handle: TransitionHandle,
    mut events: broadcast::Receiver<LifecycleEvent>,
    output: &Output,
) -> Result<hearth::lifecycle::LifecyclePhase> {
    let outcome = handle.wait();
    tokio::pin!(outcome);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut interrupted = false;

    loop {
        tokio::select! {
            result = &mut outcome => return Ok(result?),
            _ = &mut ctrl_c, if !interrupted => {
                interrupted = true;
                output.progress("Interrupted, cancelling the transition...");
                ctx.orchestrator.cancel_transition();
            }
            Ok(event) = events.recv() => {
                // Failures surface through the returned error.
                if !matches!(event, LifecycleEvent::TransitionFailed { .. }) {
                    output.event(&event);
                }
            }
        }
    }
}

// ABOUTME: One-shot whitelist, say and players commands.
// ABOUTME: Arguments are validated before anything is sent to the instance.

use hearth::error::Result;
use hearth::output::Output;
use hearth::types::{BroadcastMessage, PlayerName};

use super::Context;

pub async fn whitelist(ctx: &Context, player: &str, output: &mut Output) -> Result<()> {
    let player = PlayerName::new(player)?;
    ctx.relay.whitelist(player.clone()).await?;
    output.success(&format!("Added {player} to the whitelist"));
    Ok(())
}

pub async fn say(ctx: &Context, message: &str, output: &mut Output) -> Result<()> {
    let message = BroadcastMessage::new(message)?;
    ctx.relay.broadcast(message).await?;
    output.success("Message sent");
    Ok(())
}

pub async fn players(ctx: &Context, output: &mut Output) -> Result<()> {
    let occupancy = ctx.relay.players().await?;
    if occupancy.reachable {
        output.success(&format!("{} player(s) online", occupancy.players));
    } else {
        output.success("Server is not answering status pings");
    }
    Ok(())
}

// ABOUTME: Command module aggregator for the hearth CLI.
// ABOUTME: Re-exports lifecycle, relay, console and init command handlers.

mod console;
mod context;
mod lifecycle;
mod relay;
mod serve;

pub use context::Context;
pub use lifecycle::{start, status, stop};
pub use relay::{players, say, whitelist};
pub use serve::serve;

use hearth::config;
use hearth::error::Result;
use hearth::output::Output;

/// Write a config template into the current directory.
pub fn init(force: bool, output: &mut Output) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let path = config::init_config(&cwd, force)?;
    output.success(&format!("Created {}", path.display()));
    Ok(())
}

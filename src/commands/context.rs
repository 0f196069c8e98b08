// ABOUTME: Builds the orchestrator and relay from config for every deployment command.
// ABOUTME: Runs the startup reconcile so the phase reflects what the providers report.

use std::path::Path;
use std::sync::Arc;

use hearth::config::Config;
use hearth::error::Result;
use hearth::lifecycle::{CommandRelay, Orchestrator};
use hearth::ping::StatusPinger;
use hearth::providers::{Providers, ScriptPower, ScriptRegistrar, SshExecutor};

pub struct Context {
    pub orchestrator: Orchestrator,
    pub relay: CommandRelay,
}

impl Context {
    /// Load config, wire up providers and reconcile the phase.
    pub async fn open(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Config::load(path)?,
            None => Config::discover(&std::env::current_dir()?)?,
        };

        let ctx = Self::from_config(&config)?;
        let phase = ctx.orchestrator.reconcile().await?;
        tracing::debug!("Deployment {} is {}", config.deployment.hostname, phase);
        Ok(ctx)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let providers = Providers {
            power: Arc::new(ScriptPower::new(
                config.deployment.instance.clone(),
                config.power.clone(),
            )),
            dns: Arc::new(ScriptRegistrar::new(config.dns.clone())),
            executor: Arc::new(SshExecutor::new(config.ssh.clone())),
            prober: Arc::new(StatusPinger::new(
                config.game.port,
                config.timing.probe_timeout,
            )),
        };

        let orchestrator = Orchestrator::new(
            providers,
            config.deployment.target(),
            config.game.service_commands()?,
            config.timing.clone(),
        );
        let relay = CommandRelay::new(orchestrator.clone());

        Ok(Self {
            orchestrator,
            relay,
        })
    }
}

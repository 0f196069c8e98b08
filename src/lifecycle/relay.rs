// ABOUTME: In-game administrative commands forwarded to the running deployment.
// ABOUTME: Every command requires the deployment to be online and never changes its phase.

use snafu::ensure;
use tracing::info;

use super::command::RemoteCommand;
use super::error::{AtStep, LifecycleError, NotOnlineSnafu, Step};
use super::orchestrator::Orchestrator;
use super::phase::LifecyclePhase;
use crate::providers::Occupancy;
use crate::types::{BroadcastMessage, PlayerName};

#[derive(Debug, Clone)]
pub struct CommandRelay {
    orchestrator: Orchestrator,
}

impl CommandRelay {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }

    pub async fn whitelist(&self, player: PlayerName) -> Result<(), LifecycleError> {
        self.send(RemoteCommand::WhitelistAdd(player)).await
    }

    pub async fn broadcast(&self, message: BroadcastMessage) -> Result<(), LifecycleError> {
        self.send(RemoteCommand::Broadcast(message)).await
    }

    /// Ask the game service who is online.
    pub async fn players(&self) -> Result<Occupancy, LifecycleError> {
        self.ensure_online()?;
        self.orchestrator
            .providers()
            .prober
            .probe(&self.orchestrator.target().hostname)
            .await
            .at_step(Step::CountPlayers)
    }

    async fn send(&self, command: RemoteCommand) -> Result<(), LifecycleError> {
        self.ensure_online()?;

        let providers = self.orchestrator.providers();
        let handle = providers.power.describe().await.at_step(Step::Describe)?;
        info!("Relaying {} to instance {}", command, handle.id);
        providers
            .executor
            .run(&handle, &self.orchestrator.commands().render(&command))
            .await
            .at_step(Step::RelayCommand)
    }

    fn ensure_online(&self) -> Result<(), LifecycleError> {
        let phase = self.orchestrator.phase();
        ensure!(phase == LifecyclePhase::Online, NotOnlineSnafu { phase });
        Ok(())
    }
}

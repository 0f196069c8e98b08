// ABOUTME: Start and stop sequences: power, DNS and game service in a fixed order.
// ABOUTME: Each step is idempotent so a stalled sequence can be re-run from the top.

use std::net::IpAddr;
use std::time::Duration;

use tracing::{info, warn};

use super::command::{RemoteCommand, ServiceCommands};
use super::error::{AtStep, LifecycleError, Step};
use super::orchestrator::DeploymentTarget;
use super::timings::Timings;
use super::wait::Waiter;
use crate::providers::{DnsBinding, Occupancy, PowerState, Providers, ServerHandle};

pub(crate) struct Sequence<'a> {
    pub providers: &'a Providers,
    pub target: &'a DeploymentTarget,
    pub commands: &'a ServiceCommands,
    pub timings: &'a Timings,
    pub waiter: Waiter,
}

impl Sequence<'_> {
    /// Power on, publish DNS, start the service, wait for it to answer.
    pub async fn start(&mut self) -> Result<(), LifecycleError> {
        let handle = self.describe().await?;
        info!("Powering on instance {}", handle.id);
        self.providers
            .power
            .power_on(&handle)
            .await
            .at_step(Step::PowerOn)?;
        self.await_running(&handle, Step::AwaitPowerOn).await?;

        // A restarted instance usually comes back with a new address.
        let handle = self.describe().await?;
        let address = handle.require_address().at_step(Step::ProbeService)?;

        let occupancy = self
            .providers
            .prober
            .probe_address(address)
            .await
            .at_step(Step::ProbeService)?;
        if occupancy.reachable {
            info!(
                "Game service on {} is already reachable, skipping DNS and service start",
                address
            );
            return Ok(());
        }

        let binding = DnsBinding {
            zone: self.target.zone.clone(),
            hostname: self.target.hostname.clone(),
            address,
        };
        info!("Pointing {} at {}", binding.hostname, binding.address);
        self.providers
            .dns
            .upsert_record(&binding)
            .await
            .at_step(Step::CreateDnsRecord)?;

        self.run(&handle, RemoteCommand::ServiceStart, Step::StartService)
            .await?;

        self.await_service(
            address,
            Step::AwaitServiceUp,
            self.timings.service_timeout,
            true,
        )
        .await?;
        Ok(())
    }

    /// Remove DNS, stop the service, let it settle, power off.
    pub async fn stop(&mut self) -> Result<(), LifecycleError> {
        let handle = self.describe().await?;
        self.await_running(&handle, Step::ConfirmRunning).await?;
        let handle = self.describe().await?;
        let address = handle.require_address().at_step(Step::ConfirmRunning)?;

        info!("Removing DNS record for {}", self.target.hostname);
        self.providers
            .dns
            .delete_record(&self.target.zone, &self.target.hostname)
            .await
            .at_step(Step::DeleteDnsRecord)?;

        if self.service_reachable(address).await {
            self.run(&handle, RemoteCommand::ServiceStop, Step::StopService)
                .await?;
            self.await_service(
                address,
                Step::AwaitServiceDown,
                self.timings.shutdown_timeout,
                false,
            )
            .await?;
        } else {
            info!(
                "Game service on {} is already down, skipping service stop",
                address
            );
        }
        self.waiter.pause(Step::Settle, self.timings.settle).await?;

        info!("Powering off instance {}", handle.id);
        self.providers
            .power
            .power_off(&handle)
            .await
            .at_step(Step::PowerOff)
    }

    /// Whether the service still answers on the instance. A failed check
    /// counts as reachable so the stop command is still sent.
    async fn service_reachable(&self, address: IpAddr) -> bool {
        match self.providers.prober.probe_address(address).await {
            Ok(occupancy) => occupancy.reachable,
            Err(e) => {
                warn!("Probing {} failed, sending stop anyway: {}", address, e);
                true
            }
        }
    }

    async fn describe(&self) -> Result<ServerHandle, LifecycleError> {
        self.providers
            .power
            .describe()
            .await
            .at_step(Step::Describe)
    }

    async fn run(
        &self,
        handle: &ServerHandle,
        command: RemoteCommand,
        step: Step,
    ) -> Result<(), LifecycleError> {
        info!("Sending {} to instance {}", command, handle.id);
        self.providers
            .executor
            .run(handle, &self.commands.render(&command))
            .await
            .at_step(step)
    }

    async fn await_running(
        &mut self,
        handle: &ServerHandle,
        step: Step,
    ) -> Result<(), LifecycleError> {
        let power = self.providers.power.clone();
        self.waiter
            .poll_until(step, self.timings.power_timeout, || {
                let power = power.clone();
                async move {
                    match power.power_state(handle).await {
                        Ok(PowerState::Running) => Some(()),
                        Ok(state) => {
                            tracing::debug!("Instance {} is {}", handle.id, state);
                            None
                        }
                        Err(e) => {
                            warn!("Power state check for {} failed: {}", handle.id, e);
                            None
                        }
                    }
                }
            })
            .await
    }

    async fn await_service(
        &mut self,
        address: IpAddr,
        step: Step,
        limit: Duration,
        reachable: bool,
    ) -> Result<(), LifecycleError> {
        let prober = self.providers.prober.clone();
        self.waiter
            .poll_until(step, limit, || {
                let prober = prober.clone();
                async move {
                    match prober.probe_address(address).await {
                        Ok(Occupancy { reachable: r, .. }) if r == reachable => Some(()),
                        Ok(_) => None,
                        Err(e) => {
                            warn!("Probing {} failed: {}", address, e);
                            None
                        }
                    }
                }
            })
            .await
    }
}

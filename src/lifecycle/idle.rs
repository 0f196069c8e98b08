// ABOUTME: Background monitor that shuts the deployment down when nobody is playing.
// ABOUTME: Two consecutive empty samples, half an interval apart, trigger a stop.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::events::LifecycleEvent;
use super::orchestrator::{Ack, Orchestrator};
use super::phase::{IdleVerdict, LifecyclePhase};

pub struct IdleMonitor {
    orchestrator: Orchestrator,
    interval: Duration,
}

impl IdleMonitor {
    /// Monitor sampling at the orchestrator's configured idle interval.
    pub fn new(orchestrator: Orchestrator) -> Self {
        let interval = orchestrator.timings().idle_interval;
        Self {
            orchestrator,
            interval,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run the monitor on its own task.
    pub fn spawn(self) -> MonitorHandle {
        let (shutdown, rx) = watch::channel(false);
        let task = tokio::spawn(self.run(rx));
        MonitorHandle { shutdown, task }
    }

    /// Sample forever until `shutdown` changes or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!("Idle monitor started, sampling every {:?}", self.interval);
        let mut delay = self.interval;
        loop {
            let wait = delay;
            tokio::select! {
                _ = shutdown.changed() => break,
                next = async {
                    tokio::time::sleep(wait).await;
                    self.sample().await
                } => delay = next,
            }
        }
        info!("Idle monitor stopped");
    }

    /// Take one occupancy sample and return how long to wait before the next.
    pub async fn sample(&self) -> Duration {
        let phase = self.orchestrator.phase();
        if phase != LifecyclePhase::Online {
            debug!("Deployment is {}, skipping occupancy sample", phase);
            return self.interval;
        }

        let hostname = &self.orchestrator.target().hostname;
        let occupancy = match self.orchestrator.providers().prober.probe(hostname).await {
            Ok(occupancy) => occupancy,
            Err(e) => {
                warn!("Occupancy probe of {} failed: {}", hostname, e);
                return self.interval;
            }
        };

        if !occupancy.is_idle() {
            debug!("{} player(s) online", occupancy.players);
            self.orchestrator.clear_idle_strikes();
            return self.interval;
        }

        match self.orchestrator.record_idle() {
            IdleVerdict::NotOnline => self.interval,
            IdleVerdict::FirstStrike => {
                info!("No players online, checking again in {:?}", self.interval / 2);
                self.interval / 2
            }
            IdleVerdict::Shutdown => {
                self.shut_down();
                self.orchestrator.clear_idle_strikes();
                self.interval
            }
        }
    }

    fn shut_down(&self) {
        info!("No players for two consecutive samples, stopping the deployment");
        match self.orchestrator.request_stop() {
            Ok(Ack::Accepted(_)) => {
                self.orchestrator
                    .publish(LifecycleEvent::IdleShutdown { at: Utc::now() });
            }
            Ok(Ack::AlreadyInState(phase)) => debug!("Idle stop was a no-op ({})", phase),
            Err(e) => warn!("Idle stop was not accepted: {}", e),
        }
    }
}

/// Handle to a spawned [`IdleMonitor`]. Dropping it also stops the monitor.
#[derive(Debug)]
pub struct MonitorHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            warn!("Idle monitor task ended abnormally: {}", e);
        }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

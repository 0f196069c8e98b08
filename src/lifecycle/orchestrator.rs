// ABOUTME: Lifecycle orchestrator: admits start/stop requests and runs them in the background.
// ABOUTME: Owns the deployment state; all phase writes go through its mutex.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::{broadcast, oneshot, watch};
use tracing::{info, warn};

use super::command::ServiceCommands;
use super::error::{AtStep, LifecycleError, Step};
use super::events::LifecycleEvent;
use super::phase::{Admission, DeploymentState, IdleVerdict, LifecyclePhase, TransitionKind};
use super::sequence::Sequence;
use super::timings::Timings;
use super::wait::Waiter;
use crate::providers::{PowerState, Providers};
use crate::types::{Hostname, ZoneId};

const EVENT_CAPACITY: usize = 64;

/// Where the deployment is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTarget {
    pub hostname: Hostname,
    pub zone: ZoneId,
}

/// Immediate answer to a start or stop request.
#[derive(Debug)]
pub enum Ack {
    /// The transition was admitted and is running in the background.
    Accepted(TransitionHandle),
    /// Nothing to do; the deployment is already in the requested phase.
    AlreadyInState(LifecyclePhase),
}

impl Ack {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Ack::Accepted(_))
    }

    /// Wait for the final phase. A no-op resolves immediately.
    pub async fn completion(self) -> Result<LifecyclePhase, LifecycleError> {
        match self {
            Ack::Accepted(handle) => handle.wait().await,
            Ack::AlreadyInState(phase) => Ok(phase),
        }
    }
}

/// Completion handle for an admitted transition.
#[derive(Debug)]
pub struct TransitionHandle {
    kind: TransitionKind,
    outcome: oneshot::Receiver<Result<LifecyclePhase, LifecycleError>>,
}

impl TransitionHandle {
    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    pub async fn wait(self) -> Result<LifecyclePhase, LifecycleError> {
        self.outcome
            .await
            .unwrap_or(Err(LifecycleError::Interrupted))
    }
}

/// Point-in-time view of the deployment.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub phase: LifecyclePhase,
    pub idle_strikes: u32,
    pub in_flight: Option<TransitionKind>,
    pub since: DateTime<Utc>,
    /// Instance power, checked only while a transition is under way.
    pub power: Option<PowerState>,
}

/// Releases the in-flight marker if a transition task unwinds before it
/// commits its outcome. The phase is left transitional, so the transition
/// can be retried.
struct InFlightGuard<'a> {
    state: &'a Mutex<DeploymentState>,
    kind: TransitionKind,
    armed: bool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock();
        if state.in_flight == Some(self.kind) {
            warn!(
                "{} transition ended without finishing, deployment left {}",
                self.kind, state.phase
            );
            state.in_flight = None;
        }
    }
}

struct Inner {
    providers: Providers,
    target: DeploymentTarget,
    commands: ServiceCommands,
    timings: Timings,
    state: Mutex<DeploymentState>,
    events: broadcast::Sender<LifecycleEvent>,
    cancel: watch::Sender<u64>,
}

#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("target", &self.inner.target)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Create an orchestrator for a deployment assumed to be offline.
    ///
    /// Call [`Orchestrator::reconcile`] to pick up a deployment that is
    /// already running.
    pub fn new(
        providers: Providers,
        target: DeploymentTarget,
        commands: ServiceCommands,
        timings: Timings,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (cancel, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                providers,
                target,
                commands,
                timings,
                state: Mutex::new(DeploymentState::new(LifecyclePhase::Offline)),
                events,
                cancel,
            }),
        }
    }

    pub fn request_start(&self) -> Result<Ack, LifecycleError> {
        self.request(TransitionKind::Start)
    }

    pub fn request_stop(&self) -> Result<Ack, LifecycleError> {
        self.request(TransitionKind::Stop)
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.inner.state.lock().phase
    }

    pub fn idle_strikes(&self) -> u32 {
        self.inner.state.lock().idle_strikes
    }

    pub fn target(&self) -> &DeploymentTarget {
        &self.inner.target
    }

    pub fn timings(&self) -> &Timings {
        &self.inner.timings
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.inner.events.subscribe()
    }

    /// Current phase, with a bounded power check while a transition runs.
    pub async fn status(&self) -> StatusReport {
        let state = self.inner.state.lock().clone();
        let power = if state.phase.is_transitional() {
            self.power_state().await
        } else {
            None
        };

        StatusReport {
            phase: state.phase,
            idle_strikes: state.idle_strikes,
            in_flight: state.in_flight,
            since: state.changed_at,
            power,
        }
    }

    async fn power_state(&self) -> Option<PowerState> {
        let power = &self.inner.providers.power;
        let check = async {
            let handle = power.describe().await?;
            power.power_state(&handle).await
        };

        match tokio::time::timeout(self.inner.timings.probe_timeout, check).await {
            Ok(Ok(state)) => Some(state),
            Ok(Err(e)) => {
                warn!("Power check during status failed: {}", e);
                None
            }
            Err(_) => {
                warn!("Power check during status timed out");
                None
            }
        }
    }

    /// Settle the phase on what the providers report.
    ///
    /// Running with a reachable service is online and stopped is offline.
    /// A running instance whose service does not answer is left as it is,
    /// except that it is never reported offline: from offline it settles
    /// on a stalled stop so `stop` can finish the job.
    pub async fn reconcile(&self) -> Result<LifecyclePhase, LifecycleError> {
        if let Some(kind) = self.inner.state.lock().in_flight {
            return Err(LifecycleError::AlreadyTransitioning {
                phase: kind.transitional_phase(),
            });
        }

        let providers = &self.inner.providers;
        let handle = providers.power.describe().await.at_step(Step::Describe)?;
        let power = providers
            .power
            .power_state(&handle)
            .await
            .at_step(Step::Describe)?;

        let reachable = match power {
            PowerState::Running => {
                let occupancy = match handle.address {
                    Some(address) => providers.prober.probe_address(address).await,
                    None => providers.prober.probe(&self.inner.target.hostname).await,
                };
                occupancy.at_step(Step::ProbeService)?.reachable
            }
            _ => false,
        };

        let (before, after) = {
            let mut state = self.inner.state.lock();
            let before = state.phase;
            let observed = match power {
                PowerState::Stopped => Some(LifecyclePhase::Offline),
                PowerState::Running if reachable => Some(LifecyclePhase::Online),
                PowerState::Running if before == LifecyclePhase::Offline => {
                    Some(LifecyclePhase::Stopping)
                }
                _ => None,
            };
            if let Some(phase) = observed {
                state.settle(phase)?;
            }
            (before, state.phase)
        };

        if before != after {
            info!("Reconciled phase from {} to {}", before, after);
            self.phase_changed(before, after);
        } else {
            info!("Reconciled phase: {} (instance {})", after, power);
        }
        Ok(after)
    }

    /// Abort the current wait of the in-flight transition.
    ///
    /// Returns false when nothing was in flight. Effects already issued to
    /// providers stay in place and the phase remains transitional.
    pub fn cancel_transition(&self) -> bool {
        let in_flight = self.inner.state.lock().in_flight;
        match in_flight {
            Some(kind) => {
                info!("Cancelling {} transition", kind);
                self.inner.cancel.send_modify(|generation| *generation += 1);
                true
            }
            None => false,
        }
    }

    pub(crate) fn providers(&self) -> &Providers {
        &self.inner.providers
    }

    pub(crate) fn commands(&self) -> &ServiceCommands {
        &self.inner.commands
    }

    pub(crate) fn record_idle(&self) -> IdleVerdict {
        self.inner.state.lock().record_idle()
    }

    pub(crate) fn clear_idle_strikes(&self) {
        self.inner.state.lock().idle_strikes = 0;
    }

    pub(crate) fn publish(&self, event: LifecycleEvent) {
        // No subscribers is fine.
        let _ = self.inner.events.send(event);
    }

    fn phase_changed(&self, from: LifecyclePhase, to: LifecyclePhase) {
        self.publish(LifecycleEvent::PhaseChanged {
            from,
            to,
            at: Utc::now(),
        });
    }

    fn request(&self, kind: TransitionKind) -> Result<Ack, LifecycleError> {
        let (admission, cancel) = {
            let mut state = self.inner.state.lock();
            let admission = state.admit(kind)?;
            (admission, self.inner.cancel.subscribe())
        };

        let from = match admission {
            Admission::AlreadyInState(phase) => {
                info!("Ignoring {} request, deployment is already {}", kind, phase);
                return Ok(Ack::AlreadyInState(phase));
            }
            Admission::Proceed { from } => from,
        };

        let to = kind.transitional_phase();
        if from == to {
            info!("Retrying stalled {} transition", kind);
        } else {
            self.phase_changed(from, to);
        }

        let (tx, rx) = oneshot::channel();
        let this = self.clone();
        tokio::spawn(async move {
            let outcome = this.run_transition(kind, cancel).await;
            // The caller may have dropped the handle.
            let _ = tx.send(outcome);
        });

        Ok(Ack::Accepted(TransitionHandle { kind, outcome: rx }))
    }

    async fn run_transition(
        &self,
        kind: TransitionKind,
        cancel: watch::Receiver<u64>,
    ) -> Result<LifecyclePhase, LifecycleError> {
        let inner = &self.inner;
        let mut sequence = Sequence {
            providers: &inner.providers,
            target: &inner.target,
            commands: &inner.commands,
            timings: &inner.timings,
            waiter: Waiter::new(inner.timings.poll_interval, cancel),
        };

        let mut guard = InFlightGuard {
            state: &inner.state,
            kind,
            armed: true,
        };

        info!("Starting {} transition", kind);
        let outcome = match kind {
            TransitionKind::Start => sequence.start().await,
            TransitionKind::Stop => sequence.stop().await,
        };

        let (before, after) = {
            let mut state = inner.state.lock();
            guard.armed = false;
            let before = state.phase;
            (before, state.finish(kind, &outcome))
        };
        if before != after {
            self.phase_changed(before, after);
        }

        match outcome {
            Ok(()) => {
                info!("{} transition finished, deployment is {}", kind, after);
                Ok(after)
            }
            Err(e) => {
                warn!("{} transition failed, deployment is {}: {}", kind, after, e);
                self.publish(LifecycleEvent::TransitionFailed {
                    transition: kind,
                    phase: after,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }
}

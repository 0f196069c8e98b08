// ABOUTME: Lifecycle phases and the single mutable deployment state record.
// ABOUTME: Admission and completion rules for transitions live here, next to the data.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use super::error::{LifecycleError, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    Offline,
    Starting,
    Online,
    Stopping,
}

impl LifecyclePhase {
    pub fn is_transitional(&self) -> bool {
        matches!(self, LifecyclePhase::Starting | LifecyclePhase::Stopping)
    }
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LifecyclePhase::Offline => "offline",
            LifecyclePhase::Starting => "starting",
            LifecyclePhase::Online => "online",
            LifecyclePhase::Stopping => "stopping",
        })
    }
}

/// Which way a transition moves the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Start,
    Stop,
}

impl TransitionKind {
    /// Phase held while the transition runs.
    pub fn transitional_phase(&self) -> LifecyclePhase {
        match self {
            TransitionKind::Start => LifecyclePhase::Starting,
            TransitionKind::Stop => LifecyclePhase::Stopping,
        }
    }

    /// Phase reached when the transition succeeds.
    pub fn target_phase(&self) -> LifecyclePhase {
        match self {
            TransitionKind::Start => LifecyclePhase::Online,
            TransitionKind::Stop => LifecyclePhase::Offline,
        }
    }

    /// Resting phase the transition departs from.
    pub fn origin_phase(&self) -> LifecyclePhase {
        match self {
            TransitionKind::Start => LifecyclePhase::Offline,
            TransitionKind::Stop => LifecyclePhase::Online,
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransitionKind::Start => "start",
            TransitionKind::Stop => "stop",
        })
    }
}

/// Outcome of asking the state record to begin a transition.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Admission {
    /// The transition may run; the phase has already moved.
    Proceed { from: LifecyclePhase },
    /// The deployment is already where the caller wants it.
    AlreadyInState(LifecyclePhase),
}

/// Idle monitor's view after registering one zero-player sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IdleVerdict {
    /// The phase changed under the sample; ignore it.
    NotOnline,
    /// First idle sample of a run.
    FirstStrike,
    /// Second consecutive idle sample: time to shut down.
    Shutdown,
}

#[derive(Debug, Clone)]
pub(crate) struct DeploymentState {
    pub phase: LifecyclePhase,
    pub idle_strikes: u32,
    pub in_flight: Option<TransitionKind>,
    pub changed_at: DateTime<Utc>,
}

impl DeploymentState {
    pub fn new(phase: LifecyclePhase) -> Self {
        Self {
            phase,
            idle_strikes: 0,
            in_flight: None,
            changed_at: Utc::now(),
        }
    }

    fn enter(&mut self, phase: LifecyclePhase) {
        if self.phase != phase {
            self.phase = phase;
            self.changed_at = Utc::now();
        }
    }

    /// Check-and-set the in-flight marker for `kind`.
    ///
    /// A stalled transition (transitional phase, nothing in flight) may be
    /// retried in the same direction; the opposite direction is refused.
    pub fn admit(&mut self, kind: TransitionKind) -> Result<Admission, LifecycleError> {
        if self.in_flight.is_some() {
            return Err(LifecycleError::AlreadyTransitioning { phase: self.phase });
        }

        let from = self.phase;
        if from == kind.target_phase() {
            return Ok(Admission::AlreadyInState(from));
        }
        if from != kind.origin_phase() && from != kind.transitional_phase() {
            return Err(LifecycleError::AlreadyTransitioning { phase: from });
        }

        self.in_flight = Some(kind);
        self.enter(kind.transitional_phase());
        Ok(Admission::Proceed { from })
    }

    /// Release the in-flight marker and commit the transition's outcome.
    pub fn finish<T>(
        &mut self,
        kind: TransitionKind,
        outcome: &Result<T, LifecycleError>,
    ) -> LifecyclePhase {
        self.in_flight = None;
        match outcome {
            Ok(_) => {
                self.enter(kind.target_phase());
                self.idle_strikes = 0;
            }
            Err(e) if kind == TransitionKind::Start && e.is_timeout_at(Step::AwaitPowerOn) => {
                self.enter(LifecyclePhase::Offline);
            }
            Err(_) => {}
        }
        self.phase
    }

    /// Settle on a phase observed from the providers.
    pub fn settle(&mut self, phase: LifecyclePhase) -> Result<(), LifecycleError> {
        if self.in_flight.is_some() {
            return Err(LifecycleError::AlreadyTransitioning { phase: self.phase });
        }
        if self.phase != phase {
            self.idle_strikes = 0;
        }
        self.enter(phase);
        Ok(())
    }

    pub fn record_idle(&mut self) -> IdleVerdict {
        if self.phase != LifecyclePhase::Online {
            return IdleVerdict::NotOnline;
        }
        if self.idle_strikes == 0 {
            self.idle_strikes = 1;
            IdleVerdict::FirstStrike
        } else {
            IdleVerdict::Shutdown
        }
    }
}

// ABOUTME: Lifecycle error types with SNAFU context selectors.
// ABOUTME: Provider failures carry the step that failed so operators know where a sequence stopped.

use std::fmt;
use std::time::Duration;

use snafu::{IntoError, Snafu};

use super::phase::LifecyclePhase;
use crate::providers::ProviderError;

/// One step of a start/stop sequence or a relayed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Describe,
    PowerOn,
    AwaitPowerOn,
    ProbeService,
    CreateDnsRecord,
    StartService,
    AwaitServiceUp,
    ConfirmRunning,
    DeleteDnsRecord,
    StopService,
    AwaitServiceDown,
    Settle,
    PowerOff,
    RelayCommand,
    CountPlayers,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::Describe => "looking up the instance",
            Step::PowerOn => "powering on the instance",
            Step::AwaitPowerOn => "waiting for the instance to run",
            Step::ProbeService => "probing the game service",
            Step::CreateDnsRecord => "creating the DNS record",
            Step::StartService => "starting the game service",
            Step::AwaitServiceUp => "waiting for the game service to come up",
            Step::ConfirmRunning => "confirming the instance is running",
            Step::DeleteDnsRecord => "deleting the DNS record",
            Step::StopService => "stopping the game service",
            Step::AwaitServiceDown => "waiting for the game service to go down",
            Step::Settle => "letting the game service settle",
            Step::PowerOff => "powering off the instance",
            Step::RelayCommand => "sending a console command",
            Step::CountPlayers => "counting online players",
        })
    }
}

/// Errors surfaced by the orchestrator and the command relay.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LifecycleError {
    #[snafu(display("a transition is already in progress (currently {phase})"))]
    AlreadyTransitioning { phase: LifecyclePhase },

    #[snafu(display("instance {instance} was not found"))]
    NotFound { instance: String },

    #[snafu(display("{step} failed: {source}"))]
    Provider { step: Step, source: ProviderError },

    #[snafu(display("{step} did not finish within {}", humantime_serde::re::humantime::format_duration(*limit)))]
    Timeout { step: Step, limit: Duration },

    #[snafu(display("{step} was cancelled"))]
    Cancelled { step: Step },

    #[snafu(display("the server is not online (currently {phase})"))]
    NotOnline { phase: LifecyclePhase },

    #[snafu(display("the transition task ended without reporting an outcome"))]
    Interrupted,
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleErrorKind {
    AlreadyTransitioning,
    NotFound,
    Provider,
    Timeout,
    Cancelled,
    NotOnline,
    Interrupted,
}

impl LifecycleError {
    pub fn kind(&self) -> LifecycleErrorKind {
        match self {
            LifecycleError::AlreadyTransitioning { .. } => LifecycleErrorKind::AlreadyTransitioning,
            LifecycleError::NotFound { .. } => LifecycleErrorKind::NotFound,
            LifecycleError::Provider { .. } => LifecycleErrorKind::Provider,
            LifecycleError::Timeout { .. } => LifecycleErrorKind::Timeout,
            LifecycleError::Cancelled { .. } => LifecycleErrorKind::Cancelled,
            LifecycleError::NotOnline { .. } => LifecycleErrorKind::NotOnline,
            LifecycleError::Interrupted => LifecycleErrorKind::Interrupted,
        }
    }

    /// The step a sequence stopped at, if the error came from one.
    pub fn step(&self) -> Option<Step> {
        match self {
            LifecycleError::Provider { step, .. }
            | LifecycleError::Timeout { step, .. }
            | LifecycleError::Cancelled { step } => Some(*step),
            _ => None,
        }
    }

    pub(crate) fn is_timeout_at(&self, at: Step) -> bool {
        matches!(self, LifecycleError::Timeout { step, .. } if *step == at)
    }
}

/// Attach the failing step to a provider result.
pub(crate) trait AtStep<T> {
    fn at_step(self, step: Step) -> Result<T, LifecycleError>;
}

impl<T> AtStep<T> for Result<T, ProviderError> {
    fn at_step(self, step: Step) -> Result<T, LifecycleError> {
        self.map_err(|source| match source {
            ProviderError::NotFound(instance) => LifecycleError::NotFound { instance },
            source => ProviderSnafu { step }.into_error(source),
        })
    }
}

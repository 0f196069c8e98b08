// ABOUTME: Lifecycle core: phase state machine, orchestrator, idle monitor and command relay.
// ABOUTME: All phase changes for the deployment go through the Orchestrator.

mod command;
mod error;
mod events;
mod idle;
mod orchestrator;
mod phase;
mod relay;
mod sequence;
mod timings;
mod wait;

pub use command::{RemoteCommand, ServiceCommands, shell_quote};
pub use error::{LifecycleError, LifecycleErrorKind, Step};
pub use events::LifecycleEvent;
pub use idle::{IdleMonitor, MonitorHandle};
pub use orchestrator::{Ack, DeploymentTarget, Orchestrator, StatusReport, TransitionHandle};
pub use phase::{LifecyclePhase, TransitionKind};
pub use relay::CommandRelay;
pub use timings::Timings;

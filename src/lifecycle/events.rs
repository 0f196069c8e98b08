// ABOUTME: Events published by the orchestrator and idle monitor.
// ABOUTME: Serialized as tagged JSON so the CLI can stream them in --json mode.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::phase::{LifecyclePhase, TransitionKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LifecycleEvent {
    PhaseChanged {
        from: LifecyclePhase,
        to: LifecyclePhase,
        at: DateTime<Utc>,
    },
    TransitionFailed {
        transition: TransitionKind,
        phase: LifecyclePhase,
        error: String,
    },
    /// The idle monitor requested a stop after two empty samples.
    IdleShutdown { at: DateTime<Utc> },
}

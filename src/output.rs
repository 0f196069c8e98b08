// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use serde::Serialize;
use std::time::Instant;

use crate::lifecycle::{LifecycleEvent, StatusReport};

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
#[derive(Debug, Clone)]
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    fn elapsed_secs(&self) -> Option<f64> {
        self.start_time.map(|t| t.elapsed().as_secs_f64())
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => match self.elapsed_secs() {
                Some(elapsed) => println!("{message} ({elapsed:.1}s)"),
                None => println!("{message}"),
            },
            OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => self.json_line(&JsonMessage {
                event: "success",
                message,
                duration_secs: self.elapsed_secs(),
            }),
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Error: {message}"),
            OutputMode::Json => {
                let event = JsonMessage {
                    event: "error",
                    message,
                    duration_secs: self.elapsed_secs(),
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    eprintln!("{json}");
                }
            }
        }
    }

    pub fn status(&self, report: &StatusReport) {
        match self.mode {
            OutputMode::Json => self.json_line(&JsonStatus {
                event: "status",
                report,
            }),
            OutputMode::Quiet => println!("{}", report.phase),
            OutputMode::Normal => println!("{}", describe_status(report)),
        }
    }

    /// Report a lifecycle event as it happens.
    pub fn event(&self, event: &LifecycleEvent) {
        match self.mode {
            OutputMode::Json => self.json_line(event),
            OutputMode::Quiet => {}
            OutputMode::Normal => println!("{}", describe_event(event)),
        }
    }

    fn json_line<T: Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string(value) {
            println!("{json}");
        }
    }
}

pub fn describe_status(report: &StatusReport) -> String {
    let mut line = format!(
        "Server is {} (since {})",
        report.phase,
        report.since.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if let Some(power) = report.power {
        line.push_str(&format!(", instance {power}"));
    }
    if report.in_flight.is_none() && report.phase.is_transitional() {
        line.push_str("; the last transition stalled, retry it or run reconcile");
    }
    if report.idle_strikes > 0 {
        line.push_str("; no players at the last check");
    }
    line
}

pub fn describe_event(event: &LifecycleEvent) -> String {
    match event {
        LifecycleEvent::PhaseChanged { from, to, .. } => format!("Server {from} -> {to}"),
        LifecycleEvent::TransitionFailed {
            transition,
            phase,
            error,
        } => format!("{transition} failed ({phase}): {error}"),
        LifecycleEvent::IdleShutdown { .. } => {
            "No one has been playing for a while, shutting the server down".to_string()
        }
    }
}

#[derive(Serialize)]
struct JsonMessage<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

#[derive(Serialize)]
struct JsonStatus<'a> {
    event: &'a str,
    #[serde(flatten)]
    report: &'a StatusReport,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{LifecyclePhase, TransitionKind};
    use chrono::Utc;

    fn report(phase: LifecyclePhase, in_flight: Option<TransitionKind>) -> StatusReport {
        StatusReport {
            phase,
            idle_strikes: 0,
            in_flight,
            since: Utc::now(),
            power: None,
        }
    }

    #[test]
    fn stalled_phase_is_called_out() {
        let line = describe_status(&report(LifecyclePhase::Starting, None));
        assert!(line.contains("stalled"));

        let line = describe_status(&report(LifecyclePhase::Starting, Some(TransitionKind::Start)));
        assert!(!line.contains("stalled"));
    }

    #[test]
    fn phase_change_reads_naturally() {
        let event = LifecycleEvent::PhaseChanged {
            from: LifecyclePhase::Offline,
            to: LifecyclePhase::Starting,
            at: Utc::now(),
        };
        assert_eq!(describe_event(&event), "Server offline -> starting");
    }
}

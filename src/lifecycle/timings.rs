// ABOUTME: Polling interval and per-phase wait bounds for lifecycle transitions.
// ABOUTME: Deserialized from the `timing` config section with humantime durations.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Timings {
    /// Delay between power/occupancy polls during a transition.
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    /// How long the instance may take to report `running`.
    #[serde(default = "default_power_timeout", with = "humantime_serde")]
    pub power_timeout: Duration,

    /// How long the game service may take to become reachable.
    #[serde(default = "default_service_timeout", with = "humantime_serde")]
    pub service_timeout: Duration,

    /// How long the game service may take to go away after `stop`.
    #[serde(default = "default_shutdown_timeout", with = "humantime_serde")]
    pub shutdown_timeout: Duration,

    /// Pause between the service going down and powering off.
    #[serde(default = "default_settle", with = "humantime_serde")]
    pub settle: Duration,

    /// Idle monitor sampling interval.
    #[serde(default = "default_idle_interval", with = "humantime_serde")]
    pub idle_interval: Duration,

    /// Bound on one status ping.
    #[serde(default = "default_probe_timeout", with = "humantime_serde")]
    pub probe_timeout: Duration,
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(10)
}

fn default_power_timeout() -> Duration {
    Duration::from_secs(5 * 60)
}

fn default_service_timeout() -> Duration {
    Duration::from_secs(10 * 60)
}

fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(5 * 60)
}

fn default_settle() -> Duration {
    Duration::from_secs(10)
}

fn default_idle_interval() -> Duration {
    Duration::from_secs(10 * 60)
}

fn default_probe_timeout() -> Duration {
    Duration::from_secs(5)
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
            power_timeout: default_power_timeout(),
            service_timeout: default_service_timeout(),
            shutdown_timeout: default_shutdown_timeout(),
            settle: default_settle(),
            idle_interval: default_idle_interval(),
            probe_timeout: default_probe_timeout(),
        }
    }
}

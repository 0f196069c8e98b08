// ABOUTME: Power provider contract: look up the instance and toggle its power.
// ABOUTME: Implementations must treat repeated power-on/off as successful no-ops.

use super::ProviderError;
use crate::types::InstanceId;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::net::IpAddr;

/// Power state as reported by the compute provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerState {
    Running,
    Stopped,
    /// Anything in between (booting, shutting down, rebooting).
    Pending,
}

impl PowerState {
    /// Map a provider state name onto the three states the core cares about.
    pub fn from_provider(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "running" => PowerState::Running,
            "stopped" => PowerState::Stopped,
            _ => PowerState::Pending,
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PowerState::Running => "running",
            PowerState::Stopped => "stopped",
            PowerState::Pending => "pending",
        })
    }
}

/// The compute instance as seen at one point in time.
///
/// The address can change across restarts, so a handle is only trusted for
/// the duration of a single transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerHandle {
    pub id: InstanceId,
    pub address: Option<IpAddr>,
}

impl ServerHandle {
    pub fn new(id: InstanceId, address: Option<IpAddr>) -> Self {
        Self { id, address }
    }

    pub fn require_address(&self) -> Result<IpAddr, ProviderError> {
        self.address.ok_or(ProviderError::NoAddress)
    }
}

#[async_trait]
pub trait PowerProvider: Send + Sync {
    /// Look up the instance, returning `ProviderError::NotFound` if it is gone.
    async fn describe(&self) -> Result<ServerHandle, ProviderError>;

    async fn power_state(&self, handle: &ServerHandle) -> Result<PowerState, ProviderError>;

    async fn power_on(&self, handle: &ServerHandle) -> Result<(), ProviderError>;

    async fn power_off(&self, handle: &ServerHandle) -> Result<(), ProviderError>;
}

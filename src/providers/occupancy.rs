// ABOUTME: Occupancy prober contract: is the game reachable and how many are playing.
// ABOUTME: An unreachable service is a normal answer, not an error.

use super::ProviderError;
use crate::types::Hostname;
use async_trait::async_trait;
use std::net::IpAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupancy {
    pub reachable: bool,
    pub players: u32,
}

impl Occupancy {
    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            players: 0,
        }
    }

    pub fn online(players: u32) -> Self {
        Self {
            reachable: true,
            players,
        }
    }

    /// No one is playing, either because the server is empty or unreachable.
    pub fn is_idle(&self) -> bool {
        self.players == 0
    }
}

#[async_trait]
pub trait OccupancyProber: Send + Sync {
    /// Probe the service the way players reach it, through DNS.
    async fn probe(&self, hostname: &Hostname) -> Result<Occupancy, ProviderError>;

    /// Probe the instance directly, bypassing DNS.
    async fn probe_address(&self, address: IpAddr) -> Result<Occupancy, ProviderError>;
}

// ABOUTME: Occupancy prober that asks the game server for its status over TCP.
// ABOUTME: A server that cannot be reached is reported as unreachable, not as an error.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::debug;

use super::PingError;
use super::codec::{self, StatusResponse};
use crate::providers::{Occupancy, OccupancyProber, ProviderError};
use crate::types::Hostname;

#[derive(Debug, Clone)]
pub struct StatusPinger {
    port: u16,
    timeout: Duration,
}

impl StatusPinger {
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self { port, timeout }
    }

    /// Query `host`; `Ok(None)` when nothing accepts the connection.
    pub async fn ping(&self, host: &str) -> Result<Option<StatusResponse>, PingError> {
        let stream =
            match tokio::time::timeout(self.timeout, TcpStream::connect((host, self.port))).await {
                Ok(Ok(stream)) => stream,
                Ok(Err(e)) => {
                    debug!("Status ping to {}:{} could not connect: {}", host, self.port, e);
                    return Ok(None);
                }
                Err(_) => {
                    debug!("Status ping to {}:{} timed out connecting", host, self.port);
                    return Ok(None);
                }
            };

        tokio::time::timeout(self.timeout, self.exchange(stream, host))
            .await
            .map_err(|_| PingError::Timeout)?
            .map(Some)
    }

    async fn exchange(&self, mut stream: TcpStream, host: &str) -> Result<StatusResponse, PingError> {
        stream.write_all(&codec::handshake(host, self.port)).await?;
        stream.write_all(&codec::status_request()).await?;
        stream.flush().await?;

        let frame = codec::read_frame(&mut stream).await?;
        codec::parse_status(frame)
    }
}

fn occupancy(
    target: &str,
    result: Result<Option<StatusResponse>, PingError>,
) -> Result<Occupancy, ProviderError> {
    match result {
        Ok(Some(status)) => Ok(Occupancy::online(status.players.online)),
        Ok(None) => Ok(Occupancy::unreachable()),
        Err(PingError::Timeout) => Err(ProviderError::Connection(format!(
            "status ping to {target} timed out"
        ))),
        Err(e) => Err(ProviderError::InvalidResponse(e.to_string())),
    }
}

#[async_trait]
impl OccupancyProber for StatusPinger {
    async fn probe(&self, hostname: &Hostname) -> Result<Occupancy, ProviderError> {
        occupancy(hostname.as_str(), self.ping(hostname.as_str()).await)
    }

    async fn probe_address(&self, address: IpAddr) -> Result<Occupancy, ProviderError> {
        let host = address.to_string();
        occupancy(&host, self.ping(&host).await)
    }
}

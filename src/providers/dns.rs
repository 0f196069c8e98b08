// ABOUTME: Name registrar contract for the deployment's public DNS record.
// ABOUTME: Deleting a record that does not exist must succeed.

use super::ProviderError;
use crate::types::{Hostname, ZoneId};
use async_trait::async_trait;
use std::net::IpAddr;

/// A hostname pointed at the instance's current address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsBinding {
    pub zone: ZoneId,
    pub hostname: Hostname,
    pub address: IpAddr,
}

#[async_trait]
pub trait NameRegistrar: Send + Sync {
    /// Create the record, or replace it if one already exists.
    async fn upsert_record(&self, binding: &DnsBinding) -> Result<(), ProviderError>;

    async fn delete_record(&self, zone: &ZoneId, hostname: &Hostname) -> Result<(), ProviderError>;
}

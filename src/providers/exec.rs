// ABOUTME: Remote executor contract for running shell commands on the instance.
// ABOUTME: Only dispatch success matters; command output is not interpreted.

use super::{ProviderError, ServerHandle};
use async_trait::async_trait;

#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    async fn run(&self, target: &ServerHandle, command: &str) -> Result<(), ProviderError>;
}

// ABOUTME: Remote executor that runs commands on the instance over SSH.
// ABOUTME: Connects to the instance's current address unless a fixed host is configured.

use async_trait::async_trait;

use super::{ExitCode, ProviderError, RemoteExecutor, ServerHandle};
use crate::config::SshConfig;
use crate::ssh::{Session, SessionConfig};

#[derive(Debug, Clone)]
pub struct SshExecutor {
    config: SshConfig,
}

impl SshExecutor {
    pub fn new(config: SshConfig) -> Self {
        Self { config }
    }

    /// Session parameters for reaching `target`.
    pub fn session_config(&self, target: &ServerHandle) -> Result<SessionConfig, ProviderError> {
        let host = match &self.config.host {
            Some(host) => host.clone(),
            None => target.require_address()?.to_string(),
        };

        let mut session = SessionConfig::new(host, &self.config.user)
            .port(self.config.port)
            .trust_on_first_use(self.config.trust_first_connection)
            .command_timeout(self.config.command_timeout);
        if let Some(key) = &self.config.key {
            session = session.key_path(key);
        }
        if let Some(known_hosts) = &self.config.known_hosts {
            session = session.known_hosts_path(known_hosts);
        }
        Ok(session)
    }
}

#[async_trait]
impl RemoteExecutor for SshExecutor {
    async fn run(&self, target: &ServerHandle, command: &str) -> Result<(), ProviderError> {
        let session_config = self.session_config(target)?;
        let host = session_config.host.clone();

        let session = Session::connect(session_config)
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        tracing::debug!("Dispatching remote command on {}", host);
        let result = session.exec(command).await;

        if let Err(e) = session.disconnect().await {
            tracing::warn!("SSH disconnect from {} failed: {}", host, e);
        }

        let output = result.map_err(|e| ProviderError::Connection(e.to_string()))?;
        if !output.success() {
            return Err(ProviderError::CommandFailed {
                code: ExitCode(i32::try_from(output.exit_code).ok()),
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(())
    }
}

// ABOUTME: Power and DNS providers backed by operator-supplied shell commands.
// ABOUTME: Context is passed through HEARTH_* environment variables; exit 0 means success.

use std::net::IpAddr;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use super::{
    DnsBinding, ExitCode, NameRegistrar, PowerProvider, PowerState, ProviderError, ServerHandle,
};
use crate::config::{DnsScripts, PowerScripts};
use crate::types::{Hostname, InstanceId, ZoneId};

pub const ENV_INSTANCE_ID: &str = "HEARTH_INSTANCE_ID";
pub const ENV_ZONE: &str = "HEARTH_ZONE";
pub const ENV_HOSTNAME: &str = "HEARTH_HOSTNAME";
pub const ENV_ADDRESS: &str = "HEARTH_ADDRESS";

/// Captured output of a script that exited successfully.
#[derive(Debug)]
pub struct ScriptOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Run `command` through `sh -c` with the given environment.
///
/// A non-zero exit becomes `ProviderError::CommandFailed` carrying stderr.
pub async fn run_script(
    command: &str,
    env: &[(&str, String)],
) -> Result<ScriptOutput, ProviderError> {
    tracing::debug!("Running provider script: {}", command);

    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .envs(env.iter().map(|(k, v)| (*k, v.as_str())))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        tracing::warn!(
            "Provider script failed with exit code {:?}: {}",
            output.status.code(),
            command
        );
        return Err(ProviderError::CommandFailed {
            code: ExitCode(output.status.code()),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(ScriptOutput { stdout, stderr })
}

/// What the `describe` script prints, as a single JSON object.
#[derive(Debug, Deserialize)]
struct InstanceReport {
    #[serde(default)]
    id: Option<String>,
    state: String,
    #[serde(default)]
    address: Option<IpAddr>,
}

/// Power provider that shells out to cloud CLI commands.
#[derive(Debug, Clone)]
pub struct ScriptPower {
    instance: InstanceId,
    scripts: PowerScripts,
}

impl ScriptPower {
    pub fn new(instance: InstanceId, scripts: PowerScripts) -> Self {
        Self { instance, scripts }
    }

    fn env(&self, handle: Option<&ServerHandle>) -> Vec<(&'static str, String)> {
        let id = handle.map_or(&self.instance, |h| &h.id);
        vec![(ENV_INSTANCE_ID, id.to_string())]
    }

    async fn report(&self) -> Result<InstanceReport, ProviderError> {
        let output = run_script(&self.scripts.describe, &self.env(None)).await?;
        let stdout = output.stdout.trim();
        if stdout.is_empty() {
            return Err(ProviderError::NotFound(self.instance.to_string()));
        }

        serde_json::from_str(stdout).map_err(|e| {
            ProviderError::InvalidResponse(format!("describe output is not valid JSON: {e}"))
        })
    }
}

#[async_trait]
impl PowerProvider for ScriptPower {
    async fn describe(&self) -> Result<ServerHandle, ProviderError> {
        let report = self.report().await?;
        let id = match report.id {
            Some(id) => InstanceId::new(&id).map_err(|e| {
                ProviderError::InvalidResponse(format!("describe reported a bad id: {e}"))
            })?,
            None => self.instance.clone(),
        };
        Ok(ServerHandle::new(id, report.address))
    }

    async fn power_state(&self, _handle: &ServerHandle) -> Result<PowerState, ProviderError> {
        let report = self.report().await?;
        Ok(PowerState::from_provider(&report.state))
    }

    async fn power_on(&self, handle: &ServerHandle) -> Result<(), ProviderError> {
        run_script(&self.scripts.start, &self.env(Some(handle))).await?;
        Ok(())
    }

    async fn power_off(&self, handle: &ServerHandle) -> Result<(), ProviderError> {
        run_script(&self.scripts.stop, &self.env(Some(handle))).await?;
        Ok(())
    }
}

/// Name registrar that shells out to DNS CLI commands.
#[derive(Debug, Clone)]
pub struct ScriptRegistrar {
    scripts: DnsScripts,
}

impl ScriptRegistrar {
    pub fn new(scripts: DnsScripts) -> Self {
        Self { scripts }
    }
}

#[async_trait]
impl NameRegistrar for ScriptRegistrar {
    async fn upsert_record(&self, binding: &DnsBinding) -> Result<(), ProviderError> {
        let env = [
            (ENV_ZONE, binding.zone.to_string()),
            (ENV_HOSTNAME, binding.hostname.to_string()),
            (ENV_ADDRESS, binding.address.to_string()),
        ];
        run_script(&self.scripts.upsert, &env).await?;
        Ok(())
    }

    async fn delete_record(&self, zone: &ZoneId, hostname: &Hostname) -> Result<(), ProviderError> {
        let env = [
            (ENV_ZONE, zone.to_string()),
            (ENV_HOSTNAME, hostname.to_string()),
        ];
        run_script(&self.scripts.delete, &env).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_report_accepts_missing_address() {
        let report: InstanceReport = serde_json::from_str(r#"{"state":"stopped"}"#).unwrap();
        assert_eq!(report.state, "stopped");
        assert!(report.address.is_none());
        assert!(report.id.is_none());
    }

    #[test]
    fn instance_report_parses_address() {
        let report: InstanceReport =
            serde_json::from_str(r#"{"id":"i-1","state":"running","address":"203.0.113.7"}"#)
                .unwrap();
        assert_eq!(report.address, Some("203.0.113.7".parse().unwrap()));
    }
}

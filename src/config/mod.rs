// ABOUTME: Configuration types and parsing for hearth.yml.
// ABOUTME: Handles YAML parsing, defaults, secret resolution and validation.

mod deserialize;
mod game;
mod init;
mod scripts;
mod secret;
mod ssh;

pub use game::{GameConfig, RconConfig};
pub use init::{TEMPLATE, init_config};
pub use scripts::{DnsScripts, PowerScripts};
pub use secret::SecretValue;
pub use ssh::SshConfig;

use crate::error::{Error, Result};
use crate::lifecycle::{DeploymentTarget, Timings};
use crate::types::{Hostname, InstanceId, ZoneId};
use deserialize::{deserialize_hostname, deserialize_ssh};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "hearth.yml";
pub const CONFIG_FILENAME_ALT: &str = "hearth.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".hearth/config.yml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub deployment: DeploymentConfig,

    pub power: PowerScripts,

    pub dns: DnsScripts,

    #[serde(default, deserialize_with = "deserialize_ssh")]
    pub ssh: SshConfig,

    #[serde(default)]
    pub game: GameConfig,

    #[serde(default)]
    pub timing: Timings,
}

/// The one deployment this process manages.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeploymentConfig {
    /// Name players connect to; also the DNS record hearth manages.
    #[serde(deserialize_with = "deserialize_hostname")]
    pub hostname: Hostname,
    pub zone: ZoneId,
    pub instance: InstanceId,
}

impl DeploymentConfig {
    pub fn target(&self) -> DeploymentTarget {
        DeploymentTarget {
            hostname: self.hostname.clone(),
            zone: self.zone.clone(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Find the config file in `dir`, trying each supported name in turn.
    pub fn find(dir: &Path) -> Result<PathBuf> {
        [CONFIG_FILENAME, CONFIG_FILENAME_ALT, CONFIG_FILENAME_DIR]
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
            .ok_or_else(|| Error::ConfigNotFound(dir.to_path_buf()))
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        Self::load(&Self::find(dir)?)
    }

    pub fn validate(&self) -> Result<()> {
        let commands = [
            ("power.describe", &self.power.describe),
            ("power.start", &self.power.start),
            ("power.stop", &self.power.stop),
            ("dns.upsert", &self.dns.upsert),
            ("dns.delete", &self.dns.delete),
            ("game.start", &self.game.start),
            ("game.rcon.client", &self.game.rcon.client),
        ];
        if let Some((field, _)) = commands.iter().find(|(_, cmd)| cmd.trim().is_empty()) {
            return Err(Error::InvalidConfig(format!("{field} cannot be empty")));
        }

        if self.ssh.user.trim().is_empty() {
            return Err(Error::InvalidConfig("ssh.user cannot be empty".to_string()));
        }

        let timing = &self.timing;
        if timing.poll_interval.is_zero() {
            return Err(Error::InvalidConfig(
                "timing.poll_interval must be greater than zero".to_string(),
            ));
        }
        if timing.idle_interval.is_zero() {
            return Err(Error::InvalidConfig(
                "timing.idle_interval must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

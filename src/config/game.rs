// ABOUTME: Game service settings: status port, launch command and RCON console.
// ABOUTME: Renders the console prefix used for stop, whitelist and say commands.

use serde::Deserialize;

use super::SecretValue;
use crate::error::Result;
use crate::lifecycle::{ServiceCommands, shell_quote};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameConfig {
    /// Port answering status pings.
    #[serde(default = "default_game_port")]
    pub port: u16,
    /// Shell command that launches the game service on the instance.
    #[serde(default = "default_start")]
    pub start: String,
    #[serde(default)]
    pub rcon: RconConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RconConfig {
    /// RCON client binary installed on the instance.
    #[serde(default = "default_rcon_client")]
    pub client: String,
    #[serde(default = "default_rcon_host")]
    pub host: String,
    #[serde(default = "default_rcon_port")]
    pub port: u16,
    #[serde(default = "default_rcon_password")]
    pub password: SecretValue,
}

fn default_game_port() -> u16 {
    25565
}

fn default_start() -> String {
    "systemctl start minecraft".to_string()
}

fn default_rcon_client() -> String {
    "mcrcon".to_string()
}

fn default_rcon_host() -> String {
    "localhost".to_string()
}

fn default_rcon_port() -> u16 {
    25575
}

fn default_rcon_password() -> SecretValue {
    SecretValue::from_env("RCON_PASSWORD")
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            port: default_game_port(),
            start: default_start(),
            rcon: RconConfig::default(),
        }
    }
}

impl Default for RconConfig {
    fn default() -> Self {
        Self {
            client: default_rcon_client(),
            host: default_rcon_host(),
            port: default_rcon_port(),
            password: default_rcon_password(),
        }
    }
}

impl GameConfig {
    /// Resolve the RCON password and build the service command set.
    pub fn service_commands(&self) -> Result<ServiceCommands> {
        let rcon = &self.rcon;
        let password = rcon.password.resolve()?;
        let console = format!(
            "{} -H {} -P {} -p {}",
            rcon.client,
            shell_quote(&rcon.host),
            rcon.port,
            shell_quote(&password)
        );
        Ok(ServiceCommands::new(self.start.clone(), console))
    }
}

// ABOUTME: SSH settings for reaching the game instance.
// ABOUTME: Accepts a "[user@]host[:port]" shorthand as well as the full mapping.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SshConfig {
    /// Fixed host to connect to. Unset means the instance's current address.
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub key: Option<PathBuf>,
    #[serde(default = "default_trust_first_connection")]
    pub trust_first_connection: bool,
    #[serde(default)]
    pub known_hosts: Option<PathBuf>,
    #[serde(default = "default_command_timeout", with = "humantime_serde")]
    pub command_timeout: Duration,
}

fn default_user() -> String {
    "root".to_string()
}

fn default_port() -> u16 {
    22
}

// Instances without a static address present a new host/key pairing after
// every restart.
fn default_trust_first_connection() -> bool {
    true
}

fn default_command_timeout() -> Duration {
    Duration::from_secs(60)
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            host: None,
            user: default_user(),
            port: default_port(),
            key: None,
            trust_first_connection: default_trust_first_connection(),
            known_hosts: None,
            command_timeout: default_command_timeout(),
        }
    }
}

impl SshConfig {
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("ssh address cannot be empty".to_string());
        }

        let (user, rest) = match s.split_once('@') {
            Some((user, rest)) => (Some(user), rest),
            None => (None, s),
        };

        let (host, port) = match rest.rsplit_once(':') {
            Some((host, port_str)) => {
                let port = port_str
                    .parse::<u16>()
                    .map_err(|_| format!("invalid port: {}", port_str))?;
                (host, port)
            }
            None => (rest, default_port()),
        };

        if host.is_empty() {
            return Err("ssh host cannot be empty".to_string());
        }
        if user.is_some_and(str::is_empty) {
            return Err("ssh user cannot be empty".to_string());
        }

        Ok(SshConfig {
            host: Some(host.to_string()),
            user: user.map_or_else(default_user, str::to_string),
            port,
            ..SshConfig::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_host_only() {
        let ssh = SshConfig::parse("mc.example.com").unwrap();
        assert_eq!(ssh.host.as_deref(), Some("mc.example.com"));
        assert_eq!(ssh.user, "root");
        assert_eq!(ssh.port, 22);
    }

    #[test]
    fn parse_user_host_port() {
        let ssh = SshConfig::parse("ubuntu@10.0.0.5:2222").unwrap();
        assert_eq!(ssh.host.as_deref(), Some("10.0.0.5"));
        assert_eq!(ssh.user, "ubuntu");
        assert_eq!(ssh.port, 2222);
    }

    #[test]
    fn parse_rejects_bad_port() {
        assert!(SshConfig::parse("host:ssh").is_err());
        assert!(SshConfig::parse("@host").is_err());
        assert!(SshConfig::parse("").is_err());
    }
}

// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Handles validated hostnames and the ssh shorthand string.

use serde::Deserialize;

use super::SshConfig;
use crate::types::Hostname;

pub fn deserialize_hostname<'de, D>(deserializer: D) -> Result<Hostname, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Hostname::new(&s).map_err(serde::de::Error::custom)
}

pub fn deserialize_ssh<'de, D>(deserializer: D) -> Result<SshConfig, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match SshEntry::deserialize(deserializer)? {
        SshEntry::Simple(s) => SshConfig::parse(&s).map_err(serde::de::Error::custom),
        SshEntry::Detailed(c) => Ok(c),
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SshEntry {
    Simple(String),
    Detailed(SshConfig),
}

// ABOUTME: Shell commands backing the power and DNS providers.
// ABOUTME: Each command runs under `sh -c` with HEARTH_* context variables set.

use serde::Deserialize;

/// Commands that query and toggle instance power.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PowerScripts {
    /// Prints `{"id": ..., "state": ..., "address": ...}` for the instance.
    pub describe: String,
    pub start: String,
    pub stop: String,
}

/// Commands that publish and withdraw the deployment's DNS record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DnsScripts {
    pub upsert: String,
    pub delete: String,
}

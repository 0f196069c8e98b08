// ABOUTME: Provider contracts the lifecycle core depends on, plus concrete providers.
// ABOUTME: Power, DNS, remote execution and occupancy probing are separate capabilities.

mod dns;
mod error;
mod exec;
mod occupancy;
mod power;
mod script;
mod ssh_exec;

pub use dns::{DnsBinding, NameRegistrar};
pub use error::{ExitCode, ProviderError};
pub use exec::RemoteExecutor;
pub use occupancy::{Occupancy, OccupancyProber};
pub use power::{PowerProvider, PowerState, ServerHandle};
pub use script::{ScriptOutput, ScriptPower, ScriptRegistrar, run_script};
pub use ssh_exec::SshExecutor;

use std::sync::Arc;

/// The full set of providers one deployment is driven through.
#[derive(Clone)]
pub struct Providers {
    pub power: Arc<dyn PowerProvider>,
    pub dns: Arc<dyn NameRegistrar>,
    pub executor: Arc<dyn RemoteExecutor>,
    pub prober: Arc<dyn OccupancyProber>,
}

impl std::fmt::Debug for Providers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Providers").finish_non_exhaustive()
    }
}

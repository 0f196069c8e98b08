// ABOUTME: In-memory deployment implementing every provider contract.
// ABOUTME: Records provider calls in order and lets tests inject delays and failures.

use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hearth::lifecycle::{DeploymentTarget, Orchestrator, ServiceCommands, Timings};
use hearth::providers::{
    DnsBinding, NameRegistrar, Occupancy, OccupancyProber, PowerProvider, PowerState,
    ProviderError, Providers, RemoteExecutor, ServerHandle,
};
use hearth::types::{Hostname, InstanceId, ZoneId};
use parking_lot::Mutex;

pub const HOSTNAME: &str = "mc.example.com";
pub const ZONE: &str = "Z123";
pub const INSTANCE: &str = "i-test";
pub const ADDRESS: &str = "203.0.113.7";
pub const START_COMMAND: &str = "start-game";
pub const CONSOLE: &str = "rcon";

/// Number of checks that never finish.
pub const NEVER: u32 = u32::MAX;

#[derive(Debug)]
struct State {
    power: PowerState,
    service_up: bool,
    players: u32,
    exists: bool,
    /// Power checks still reporting `pending` after power on.
    boot_polls: u32,
    /// Probes still unreachable after the service start command.
    service_boot_probes: u32,
    service_starting: bool,
    /// Whether the service ignores the stop command.
    service_sticks: bool,
    records: HashMap<String, IpAddr>,
    log: Vec<String>,
    failing: HashSet<&'static str>,
    panicking: HashSet<&'static str>,
    probes: u32,
}

/// A fake instance, DNS zone, shell and game server in one.
#[derive(Debug)]
pub struct World {
    state: Mutex<State>,
}

impl World {
    /// A stopped instance with no DNS record.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State {
                power: PowerState::Stopped,
                service_up: false,
                players: 0,
                exists: true,
                boot_polls: 1,
                service_boot_probes: 1,
                service_starting: false,
                service_sticks: false,
                records: HashMap::new(),
                log: Vec::new(),
                failing: HashSet::new(),
                panicking: HashSet::new(),
                probes: 0,
            }),
        })
    }

    /// An instance already running the game with a published record.
    pub fn running() -> Arc<Self> {
        let world = Self::new();
        {
            let mut state = world.state.lock();
            state.power = PowerState::Running;
            state.service_up = true;
            state
                .records
                .insert(HOSTNAME.to_string(), ADDRESS.parse().unwrap());
        }
        world
    }

    pub fn providers(self: &Arc<Self>) -> Providers {
        Providers {
            power: self.clone(),
            dns: self.clone(),
            executor: self.clone(),
            prober: self.clone(),
        }
    }

    pub fn set_power(&self, power: PowerState) {
        self.state.lock().power = power;
    }

    pub fn set_service_up(&self, up: bool) {
        self.state.lock().service_up = up;
    }

    pub fn set_players(&self, players: u32) {
        self.state.lock().players = players;
    }

    pub fn set_exists(&self, exists: bool) {
        self.state.lock().exists = exists;
    }

    pub fn set_boot_polls(&self, polls: u32) {
        self.state.lock().boot_polls = polls;
    }

    pub fn set_service_boot_probes(&self, probes: u32) {
        self.state.lock().service_boot_probes = probes;
    }

    pub fn set_service_sticks(&self, sticks: bool) {
        self.state.lock().service_sticks = sticks;
    }

    /// Make the named operation fail: `power_on`, `power_off`, `upsert`,
    /// `delete`, `run` or `probe`.
    pub fn fail(&self, operation: &'static str) {
        self.state.lock().failing.insert(operation);
    }

    /// Make the named operation panic, like a buggy provider would.
    pub fn panic_on(&self, operation: &'static str) {
        self.state.lock().panicking.insert(operation);
    }

    pub fn heal(&self, operation: &'static str) {
        let mut state = self.state.lock();
        state.failing.remove(operation);
        state.panicking.remove(operation);
    }

    pub fn log(&self) -> Vec<String> {
        self.state.lock().log.clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.state.lock().log.iter().filter(|e| *e == entry).count()
    }

    pub fn records(&self) -> HashMap<String, IpAddr> {
        self.state.lock().records.clone()
    }

    pub fn probes(&self) -> u32 {
        self.state.lock().probes
    }

    pub fn power(&self) -> PowerState {
        self.state.lock().power
    }

    pub fn service_up(&self) -> bool {
        self.state.lock().service_up
    }

    fn check(state: &State, operation: &'static str) -> Result<(), ProviderError> {
        if state.panicking.contains(operation) {
            panic!("{operation} panicked");
        }
        if state.failing.contains(operation) {
            return Err(ProviderError::Failed(format!("{operation} is broken")));
        }
        Ok(())
    }

    fn record(&self, operation: &'static str) -> Result<(), ProviderError> {
        let mut state = self.state.lock();
        Self::check(&state, operation)?;
        state.log.push(operation.to_string());
        Ok(())
    }
}

fn countdown(remaining: &mut u32) -> bool {
    match *remaining {
        NEVER => false,
        0 => true,
        _ => {
            *remaining -= 1;
            *remaining == 0
        }
    }
}

#[async_trait]
impl PowerProvider for World {
    async fn describe(&self) -> Result<ServerHandle, ProviderError> {
        let state = self.state.lock();
        if !state.exists {
            return Err(ProviderError::NotFound(INSTANCE.to_string()));
        }
        let address = (state.power == PowerState::Running).then(|| ADDRESS.parse().unwrap());
        Ok(ServerHandle::new(InstanceId::new(INSTANCE).unwrap(), address))
    }

    async fn power_state(&self, _handle: &ServerHandle) -> Result<PowerState, ProviderError> {
        let mut state = self.state.lock();
        if state.power == PowerState::Pending && countdown(&mut state.boot_polls) {
            state.power = PowerState::Running;
        }
        Ok(state.power)
    }

    async fn power_on(&self, _handle: &ServerHandle) -> Result<(), ProviderError> {
        self.record("power_on")?;
        let mut state = self.state.lock();
        if state.power == PowerState::Stopped {
            state.power = if state.boot_polls == 0 {
                PowerState::Running
            } else {
                PowerState::Pending
            };
        }
        Ok(())
    }

    async fn power_off(&self, _handle: &ServerHandle) -> Result<(), ProviderError> {
        self.record("power_off")?;
        let mut state = self.state.lock();
        state.power = PowerState::Stopped;
        state.service_up = false;
        state.service_starting = false;
        Ok(())
    }
}

#[async_trait]
impl NameRegistrar for World {
    async fn upsert_record(&self, binding: &DnsBinding) -> Result<(), ProviderError> {
        self.record("upsert")?;
        self.state
            .lock()
            .records
            .insert(binding.hostname.to_string(), binding.address);
        Ok(())
    }

    async fn delete_record(&self, _zone: &ZoneId, hostname: &Hostname) -> Result<(), ProviderError> {
        self.record("delete")?;
        self.state.lock().records.remove(hostname.as_str());
        Ok(())
    }
}

#[async_trait]
impl RemoteExecutor for World {
    async fn run(&self, target: &ServerHandle, command: &str) -> Result<(), ProviderError> {
        target.require_address()?;
        let mut state = self.state.lock();
        Self::check(&state, "run")?;
        state.log.push(format!("run: {command}"));

        if command == START_COMMAND {
            state.service_starting = true;
        } else if command == format!("{CONSOLE} 'stop'") && !state.service_sticks {
            state.service_up = false;
        }
        Ok(())
    }
}

impl World {
    /// What a status ping would see once it reached the instance.
    fn observe(state: &mut State) -> Occupancy {
        if state.service_starting && !state.service_up && countdown(&mut state.service_boot_probes)
        {
            state.service_up = true;
            state.service_starting = false;
        }

        if state.service_up {
            Occupancy::online(state.players)
        } else {
            Occupancy::unreachable()
        }
    }
}

#[async_trait]
impl OccupancyProber for World {
    /// Resolves through the zone: no record means nothing answers.
    async fn probe(&self, hostname: &Hostname) -> Result<Occupancy, ProviderError> {
        let mut state = self.state.lock();
        state.probes += 1;
        Self::check(&state, "probe")?;

        match state.records.get(hostname.as_str()) {
            Some(address) if *address == ADDRESS.parse::<IpAddr>().unwrap() => {
                Ok(Self::observe(&mut state))
            }
            _ => Ok(Occupancy::unreachable()),
        }
    }

    async fn probe_address(&self, address: IpAddr) -> Result<Occupancy, ProviderError> {
        let mut state = self.state.lock();
        state.probes += 1;
        Self::check(&state, "probe")?;

        if state.power != PowerState::Running || address != ADDRESS.parse::<IpAddr>().unwrap() {
            return Ok(Occupancy::unreachable());
        }
        Ok(Self::observe(&mut state))
    }
}

pub fn target() -> DeploymentTarget {
    DeploymentTarget {
        hostname: Hostname::new(HOSTNAME).unwrap(),
        zone: ZoneId::new(ZONE).unwrap(),
    }
}

pub fn commands() -> ServiceCommands {
    ServiceCommands::new(START_COMMAND, CONSOLE)
}

/// Short, distinct bounds so timeouts are easy to reason about.
pub fn timings() -> Timings {
    Timings {
        poll_interval: Duration::from_secs(1),
        power_timeout: Duration::from_secs(10),
        service_timeout: Duration::from_secs(20),
        shutdown_timeout: Duration::from_secs(10),
        settle: Duration::from_secs(2),
        idle_interval: Duration::from_secs(60),
        probe_timeout: Duration::from_secs(1),
    }
}

pub fn orchestrator(world: &Arc<World>) -> Orchestrator {
    Orchestrator::new(world.providers(), target(), commands(), timings())
}

/// An orchestrator that has reconciled against a running world.
pub async fn online(world: &Arc<World>) -> Orchestrator {
    let orchestrator = orchestrator(world);
    orchestrator.reconcile().await.unwrap();
    orchestrator
}

// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Player names and broadcast text are checked before they reach a remote shell.

mod broadcast;
mod hostname;
mod id;
mod player_name;

pub use broadcast::{BroadcastMessage, BroadcastMessageError, MAX_BROADCAST_LEN};
pub use hostname::{Hostname, HostnameError};
pub use id::{IdError, InstanceId, ZoneId};
pub use player_name::{PlayerName, PlayerNameError};

// ABOUTME: Validated text for in-game broadcast messages.
// ABOUTME: Rejects empty, oversized, or control-character-bearing messages.

use std::fmt;
use thiserror::Error;

/// Longest message the game console accepts for a single chat line.
pub const MAX_BROADCAST_LEN: usize = 256;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BroadcastMessageError {
    #[error("broadcast message cannot be empty")]
    Empty,

    #[error("broadcast message exceeds {MAX_BROADCAST_LEN} characters")]
    TooLong,

    #[error("broadcast message contains a control character")]
    ControlChar,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastMessage(String);

impl BroadcastMessage {
    pub fn new(value: &str) -> Result<Self, BroadcastMessageError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(BroadcastMessageError::Empty);
        }
        if value.chars().count() > MAX_BROADCAST_LEN {
            return Err(BroadcastMessageError::TooLong);
        }
        if value.chars().any(char::is_control) {
            return Err(BroadcastMessageError::ControlChar);
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BroadcastMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

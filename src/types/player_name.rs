// ABOUTME: Game account name validation for whitelist requests.
// ABOUTME: Accepts 3-16 characters of ASCII letters, digits and underscore.

use std::fmt;
use thiserror::Error;

const MIN_LEN: usize = 3;
const MAX_LEN: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlayerNameError {
    #[error("player name cannot be empty")]
    Empty,

    #[error("player name must be at least {MIN_LEN} characters")]
    TooShort,

    #[error("player name exceeds maximum length of {MAX_LEN} characters")]
    TooLong,

    #[error("invalid character in player name: '{0}'")]
    InvalidChar(char),
}

/// A player account name that is safe to splice into a console command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(value: &str) -> Result<Self, PlayerNameError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(PlayerNameError::Empty);
        }

        if let Some(c) = value
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '_')
        {
            return Err(PlayerNameError::InvalidChar(c));
        }

        // All characters are ASCII at this point, so len() counts characters.
        if value.len() < MIN_LEN {
            return Err(PlayerNameError::TooShort);
        }
        if value.len() > MAX_LEN {
            return Err(PlayerNameError::TooLong);
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

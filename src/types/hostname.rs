// ABOUTME: DNS hostname validation for the deployment's public name.
// ABOUTME: Each dot-separated label follows RFC 1123 rules.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostnameError {
    #[error("hostname cannot be empty")]
    Empty,

    #[error("hostname exceeds maximum length of 253 characters")]
    TooLong,

    #[error("hostname contains an empty label")]
    EmptyLabel,

    #[error("hostname label '{0}' exceeds 63 characters")]
    LabelTooLong(String),

    #[error("hostname label '{0}' cannot start or end with a hyphen")]
    HyphenEdge(String),

    #[error("invalid character in hostname: '{0}'")]
    InvalidChar(char),
}

/// A fully qualified hostname, stored lowercase and without a trailing dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hostname(String);

impl Hostname {
    pub fn new(value: &str) -> Result<Self, HostnameError> {
        let value = value.trim().trim_end_matches('.').to_ascii_lowercase();
        if value.is_empty() {
            return Err(HostnameError::Empty);
        }
        if value.len() > 253 {
            return Err(HostnameError::TooLong);
        }

        for label in value.split('.') {
            if label.is_empty() {
                return Err(HostnameError::EmptyLabel);
            }
            if label.len() > 63 {
                return Err(HostnameError::LabelTooLong(label.to_string()));
            }
            if label.starts_with('-') || label.ends_with('-') {
                return Err(HostnameError::HyphenEdge(label.to_string()));
            }
            if let Some(c) = label
                .chars()
                .find(|c| !c.is_ascii_alphanumeric() && *c != '-')
            {
                return Err(HostnameError::InvalidChar(c));
            }
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Hostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

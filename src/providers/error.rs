// ABOUTME: Error type shared by every provider implementation.
// ABOUTME: NotFound is kept distinct so the lifecycle core can report a missing instance.

use std::fmt;
use thiserror::Error;

/// Exit status of a provider-side command, absent when killed by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub Option<i32>);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, "status {code}"),
            None => f.write_str("no status"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider has no record of the instance.
    #[error("instance not found: {0}")]
    NotFound(String),

    /// The instance exists but has no network address yet.
    #[error("instance has no network address")]
    NoAddress,

    /// A provider-side command ran and reported failure.
    #[error("command exited with {code}: {stderr}")]
    CommandFailed { code: ExitCode, stderr: String },

    /// The provider answered with something we could not interpret.
    #[error("unexpected provider response: {0}")]
    InvalidResponse(String),

    /// Connecting to or talking with the remote side failed.
    #[error("remote connection failed: {0}")]
    Connection(String),

    #[error("{0}")]
    Failed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

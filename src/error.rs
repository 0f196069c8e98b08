// ABOUTME: Application-wide error types for hearth.
// ABOUTME: Wraps lifecycle, validation and config errors for the CLI.

use std::path::PathBuf;
use thiserror::Error;

use crate::lifecycle::LifecycleError;
use crate::types::{BroadcastMessageError, PlayerNameError};

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("invalid player name: {0}")]
    PlayerName(#[from] PlayerNameError),

    #[error("invalid broadcast message: {0}")]
    BroadcastMessage(#[from] BroadcastMessageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

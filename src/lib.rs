// ABOUTME: Library root for hearth - exposes the lifecycle core, providers and config.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod output;
pub mod ping;
pub mod providers;
pub mod ssh;
pub mod types;

//! # Foundry Sync
//!
//! Persistence for player snapshots.
//!
//! The game core never touches storage. This crate keeps the latest player
//! snapshot in memory, applies actions to it and hands every new snapshot to
//! a background worker that writes it to a [`PlayerStore`]. Writes are
//! best-effort: failures are logged and published, never rolled back.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub mod error;
pub mod gateway;
pub mod store;
pub mod worker;

pub use error::{Result, SyncError, SyncFailure};
pub use gateway::PlayerGateway;
pub use store::{FileStore, MemoryStore, PlayerStore};
pub use worker::{SyncCommand, SyncHandle, SyncWorker};

/// Sync configuration.
///
/// # Example RON
///
/// ```ron
/// SyncConfig(
///     save_dir: "saves",
///     channel_capacity: 64,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Directory for the file store.
    pub save_dir: PathBuf,
    /// Wake-up commands that can queue. Snapshots beyond this stay pending
    /// and ride on an already queued command.
    pub channel_capacity: usize,
    /// Failures buffered per subscriber.
    pub failure_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from("saves"),
            channel_capacity: 64,
            failure_capacity: 16,
        }
    }
}

impl SyncConfig {
    /// Parse a configuration from RON. Missing fields fall back to defaults.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }
}

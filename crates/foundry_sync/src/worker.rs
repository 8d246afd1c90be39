//! Background worker that writes player snapshots.
//!
//! The game updates its in-memory snapshot first and hands the result to the
//! worker through a [`SyncHandle`]. Handles stage each snapshot in a shared
//! pending map keyed by player, replacing any older one still waiting, and
//! then wake the worker. Every command the worker receives drains the map, so
//! the newest staged state always reaches the store even when wake-ups are
//! dropped because the channel is full.
//!
//! A failed write is logged and published on the failure channel; it is never
//! retried or rolled back here.
//!
//! # Channels
//!
//! ```text
//! SyncHandle --(pending map: newest Player per id)--+
//!            --(mpsc: SyncCommand)---------------> SyncWorker --> PlayerStore
//!                                                      |
//!                                                      +--(broadcast: SyncFailure)--> subscribers
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use foundry_core::ids::PlayerId;
use foundry_core::player::Player;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{Result, SyncError, SyncFailure};
use crate::store::PlayerStore;
use crate::SyncConfig;

/// Newest not-yet-written snapshot per player.
type PendingSnapshots = Arc<Mutex<BTreeMap<PlayerId, Player>>>;

/// Commands accepted by the worker.
///
/// Every command first writes all pending snapshots.
#[derive(Debug)]
pub enum SyncCommand {
    /// New snapshots are pending.
    Save,
    /// Reply once everything submitted before this command has been written.
    Flush {
        /// Completion signal.
        reply: oneshot::Sender<()>,
    },
    /// Write what is pending, then stop.
    Shutdown,
}

/// Cloneable sender side of the worker.
#[derive(Debug, Clone)]
pub struct SyncHandle {
    command_tx: mpsc::Sender<SyncCommand>,
    pending: PendingSnapshots,
    failure_tx: broadcast::Sender<SyncFailure>,
}

impl SyncHandle {
    /// Stage a snapshot, waiting for channel space to wake the worker.
    pub async fn submit(&self, player: Player) -> Result<()> {
        self.stage(player)?;
        self.command_tx
            .send(SyncCommand::Save)
            .await
            .map_err(|_| SyncError::WorkerClosed)
    }

    /// Stage a snapshot without waiting.
    ///
    /// A full channel already holds a command that will drain the pending
    /// map, so the snapshot is still written.
    pub fn try_submit(&self, player: Player) -> Result<()> {
        let id = player.id.clone();
        self.stage(player)?;
        match self.command_tx.try_send(SyncCommand::Save) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!(player = %id, "Sync queue full, snapshot left pending");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(SyncError::WorkerClosed),
        }
    }

    /// Wait until every snapshot submitted so far has been written or has failed.
    pub async fn flush(&self) -> Result<()> {
        let (reply, done) = oneshot::channel();
        self.command_tx
            .send(SyncCommand::Flush { reply })
            .await
            .map_err(|_| SyncError::WorkerClosed)?;
        done.await.map_err(|_| SyncError::WorkerClosed)
    }

    /// Ask the worker to write what is pending and stop.
    pub async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(SyncCommand::Shutdown)
            .await
            .map_err(|_| SyncError::WorkerClosed)
    }

    /// Subscribe to write failures from now on.
    pub fn subscribe_failures(&self) -> broadcast::Receiver<SyncFailure> {
        self.failure_tx.subscribe()
    }

    fn stage(&self, player: Player) -> Result<()> {
        if self.command_tx.is_closed() {
            return Err(SyncError::WorkerClosed);
        }
        let mut pending = self.pending.lock().map_err(|_| SyncError::Poisoned)?;
        pending.insert(player.id.clone(), player);
        Ok(())
    }
}

/// Background task that owns the store.
pub struct SyncWorker<S: PlayerStore> {
    store: Arc<S>,
    command_rx: mpsc::Receiver<SyncCommand>,
    pending: PendingSnapshots,
    failure_tx: broadcast::Sender<SyncFailure>,
    written: u64,
}

impl<S: PlayerStore + 'static> SyncWorker<S> {
    /// Create a worker and its handle.
    pub fn new(store: Arc<S>, config: &SyncConfig) -> (Self, SyncHandle) {
        let (command_tx, command_rx) = mpsc::channel(config.channel_capacity.max(1));
        let (failure_tx, _) = broadcast::channel(config.failure_capacity.max(1));
        let pending = PendingSnapshots::default();

        let worker = Self {
            store,
            command_rx,
            pending: Arc::clone(&pending),
            failure_tx: failure_tx.clone(),
            written: 0,
        };
        let handle = SyncHandle {
            command_tx,
            pending,
            failure_tx,
        };
        (worker, handle)
    }

    /// Create a worker and run it on the current tokio runtime.
    pub fn spawn(store: Arc<S>, config: &SyncConfig) -> (SyncHandle, JoinHandle<u64>) {
        let (worker, handle) = Self::new(store, config);
        (handle, tokio::spawn(worker.run()))
    }

    /// Main worker loop. Returns the number of snapshots written.
    pub async fn run(mut self) -> u64 {
        info!("SyncWorker started");

        while let Some(command) = self.command_rx.recv().await {
            self.write_pending();
            match command {
                SyncCommand::Save => {}
                SyncCommand::Flush { reply } => {
                    let _ = reply.send(());
                }
                SyncCommand::Shutdown => {
                    info!("Shutdown command received");
                    break;
                }
            }
        }

        info!(written = self.written, "SyncWorker stopped");
        self.written
    }

    /// Write and clear every pending snapshot.
    fn write_pending(&mut self) {
        let batch = match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(poisoned) => {
                warn!("Pending snapshot map poisoned, recovering");
                std::mem::take(&mut *poisoned.into_inner())
            }
        };
        for player in batch.values() {
            self.write(player);
        }
    }

    fn write(&mut self, player: &Player) {
        match self.store.save(player) {
            Ok(()) => {
                self.written += 1;
                debug!(player = %player.id, credits = player.credits, "Snapshot persisted");
            }
            Err(e) => {
                warn!(player = %player.id, error = %e, "Snapshot write failed");
                let _ = self.failure_tx.send(SyncFailure {
                    player_id: player.id.clone(),
                    message: e.to_string(),
                });
            }
        }
    }
}

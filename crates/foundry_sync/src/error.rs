//! Error types for persistence.

use foundry_core::ids::PlayerId;
use thiserror::Error;

/// Result type alias using [`SyncError`].
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors raised while loading or saving player snapshots.
#[derive(Debug, Error)]
pub enum SyncError {
    /// File system failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A snapshot could not be encoded.
    #[error("Failed to encode snapshot: {0}")]
    Encode(#[from] ron::Error),

    /// A stored snapshot could not be decoded.
    #[error("Failed to decode snapshot: {0}")]
    Decode(#[from] ron::error::SpannedError),

    /// The stored snapshot belongs to someone else.
    #[error("Snapshot for '{requested}' contains player '{found}'")]
    WrongPlayer {
        /// Player that was asked for.
        requested: PlayerId,
        /// Player found in the file.
        found: PlayerId,
    },

    /// The id cannot be used as a snapshot file name.
    #[error("Player id '{0}' may only contain ASCII letters, digits, '-' and '_'")]
    InvalidPlayerId(PlayerId),

    /// A store lock was poisoned by a panicking writer.
    #[error("Store lock poisoned")]
    Poisoned,

    /// A game action failed before anything was persisted.
    #[error(transparent)]
    Game(#[from] foundry_core::error::GameError),

    /// The worker is gone and no longer accepts snapshots.
    #[error("Sync worker has shut down")]
    WorkerClosed,
}

/// A failed durable write, as published on the failure channel.
///
/// The in-memory snapshot is never rolled back; subscribers decide whether to
/// warn the player or resubmit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    /// Player whose snapshot failed to save.
    pub player_id: PlayerId,
    /// Rendered error.
    pub message: String,
}

//! Player snapshot stores.
//!
//! A store loads and saves whole [`Player`] snapshots. The game never stores
//! deltas: every action already produces a complete replacement snapshot, so
//! the latest one is all that needs to reach disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use foundry_core::ids::PlayerId;
use foundry_core::player::Player;
use ron::ser::PrettyConfig;

use crate::error::{Result, SyncError};

/// Storage for whole player snapshots.
pub trait PlayerStore: Send + Sync {
    /// Load a player's snapshot, `None` if it was never saved.
    fn load(&self, id: &PlayerId) -> Result<Option<Player>>;

    /// Replace a player's stored snapshot.
    fn save(&self, player: &Player) -> Result<()>;

    /// Whether a snapshot exists.
    fn exists(&self, id: &PlayerId) -> Result<bool> {
        Ok(self.load(id)?.is_some())
    }
}

/// File-backed store writing one pretty-printed RON file per player.
///
/// # File Format
///
/// Snapshots are stored as `{dir}/{player_id}.ron`. Ids must be non-empty
/// and made of ASCII letters, digits, `-` and `_`, so every file stays inside
/// `dir`; other ids fail with [`SyncError::InvalidPlayerId`]. Writes go to a temporary
/// file first and are renamed into place, so a crash mid-write leaves the
/// previous snapshot intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory holding the snapshots.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn player_path(&self, id: &PlayerId) -> Result<PathBuf> {
        let name = id.as_str();
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(SyncError::InvalidPlayerId(id.clone()));
        }
        Ok(self.dir.join(format!("{name}.ron")))
    }
}

impl PlayerStore for FileStore {
    fn load(&self, id: &PlayerId) -> Result<Option<Player>> {
        let path = self.player_path(id)?;
        if !path.exists() {
            return Ok(None);
        }

        let text = fs::read_to_string(&path)?;
        let player: Player = ron::from_str(&text)?;
        if player.id != *id {
            return Err(SyncError::WrongPlayer {
                requested: id.clone(),
                found: player.id,
            });
        }

        tracing::debug!(player = %id, path = %path.display(), "Loaded snapshot");
        Ok(Some(player))
    }

    fn save(&self, player: &Player) -> Result<()> {
        let path = self.player_path(&player.id)?;
        let temp_path = path.with_extension("ron.tmp");

        let text = ron::ser::to_string_pretty(player, PrettyConfig::default())?;
        fs::write(&temp_path, text)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(player = %player.id, path = %path.display(), "Saved snapshot");
        Ok(())
    }

    fn exists(&self, id: &PlayerId) -> Result<bool> {
        Ok(self.player_path(id)?.exists())
    }
}

/// In-memory store for tests and offline play.
#[derive(Debug, Default)]
pub struct MemoryStore {
    players: RwLock<BTreeMap<PlayerId, Player>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> Result<usize> {
        Ok(self.players.read().map_err(|_| SyncError::Poisoned)?.len())
    }

    /// Whether nothing has been saved yet.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl PlayerStore for MemoryStore {
    fn load(&self, id: &PlayerId) -> Result<Option<Player>> {
        let players = self.players.read().map_err(|_| SyncError::Poisoned)?;
        Ok(players.get(id).cloned())
    }

    fn save(&self, player: &Player) -> Result<()> {
        let mut players = self.players.write().map_err(|_| SyncError::Poisoned)?;
        players.insert(player.id.clone(), player.clone());
        Ok(())
    }
}

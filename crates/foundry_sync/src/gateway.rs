//! The single place where player actions meet persistence.

use std::sync::Arc;

use foundry_core::actions::{apply_action, ActionOutcome, PlayerAction};
use foundry_core::catalog::Catalog;
use foundry_core::config::GameRules;
use foundry_core::ids::PlayerId;
use foundry_core::player::Player;
use foundry_core::rng::RandomSource;

use crate::error::Result;
use crate::store::PlayerStore;
use crate::worker::SyncHandle;

/// Holds the current snapshot of one player and keeps the store in step.
///
/// Every action is applied to the in-memory snapshot first; the new snapshot
/// is then queued for the sync worker. A full or failing store never undoes
/// the in-memory change.
pub struct PlayerGateway<R: RandomSource> {
    player: Player,
    catalog: Arc<Catalog>,
    rules: GameRules,
    rng: R,
    sync: SyncHandle,
}

impl<R: RandomSource> PlayerGateway<R> {
    /// Load a player from the store, or create and queue a starter profile.
    pub fn open<S: PlayerStore>(
        id: &PlayerId,
        username: &str,
        store: &S,
        catalog: Arc<Catalog>,
        rules: GameRules,
        rng: R,
        sync: SyncHandle,
    ) -> Result<Self> {
        let player = if let Some(player) = store.load(id)? {
            tracing::info!(player = %id, "Resuming saved profile");
            player
        } else {
            tracing::info!(player = %id, "Creating starter profile");
            let player = Player::starter(id.as_str(), username, &catalog)?;
            sync.try_submit(player.clone())?;
            player
        };

        Ok(Self {
            player,
            catalog,
            rules,
            rng,
            sync,
        })
    }

    /// Current snapshot.
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Catalog the player acts against.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Rules in force.
    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// Random source, for starting battles with the same stream.
    pub fn rng(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Apply an action, swap in the new snapshot and queue it for saving.
    ///
    /// # Errors
    /// Returns the game error if the action fails, in which case nothing
    /// changes and nothing is queued. Returns [`SyncError::WorkerClosed`]
    /// after the snapshot was swapped if the worker is gone.
    ///
    /// [`SyncError::WorkerClosed`]: crate::error::SyncError::WorkerClosed
    pub fn apply(&mut self, action: &PlayerAction) -> Result<ActionOutcome> {
        let outcome = apply_action(
            &self.player,
            action,
            &self.catalog,
            &self.rules,
            &mut self.rng,
        )?;
        self.player = outcome.player.clone();
        self.sync.try_submit(outcome.player.clone())?;
        Ok(outcome)
    }
}

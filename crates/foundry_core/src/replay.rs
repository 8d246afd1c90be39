//! Battle replays.
//!
//! A replay stores everything needed to recreate a battle: the mode, the RNG
//! seed, the player's team as it entered the battle and the command stream.
//! The opponent team is regenerated from the seed, so playing the commands
//! back through [`BattleSession::step`] reproduces the battle exactly.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::battle::{generate_opponent_team, BattleCommand, BattleMode, BattleSession};
use crate::catalog::Catalog;
use crate::error::{GameError, Result};
use crate::rng::SeededRandom;
use crate::unit::Unit;

/// Replay file format version for compatibility.
pub const REPLAY_VERSION: u32 = 1;

/// Complete replay data structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleReplay {
    /// Replay format version.
    pub version: u32,
    /// Battle mode, which fixes the opponent difficulty.
    pub mode: BattleMode,
    /// Random seed used for the battle.
    pub seed: u64,
    /// Player's team at the start of the battle.
    pub player_team: Vec<Unit>,
    /// Commands in the order they were issued.
    pub commands: Vec<BattleCommand>,
    /// Turn the battle ended on.
    pub final_turn: u32,
    /// Final session hash for verification.
    pub final_hash: u64,
}

impl BattleReplay {
    /// Create an empty replay.
    #[must_use]
    pub fn new(mode: BattleMode, seed: u64, player_team: Vec<Unit>) -> Self {
        Self {
            version: REPLAY_VERSION,
            mode,
            seed,
            player_team,
            commands: Vec::new(),
            final_turn: 0,
            final_hash: 0,
        }
    }

    /// Build the opening session and the generator the battle must be driven with.
    ///
    /// # Errors
    /// Returns an error if the recorded team cannot fight.
    pub fn start(&self) -> Result<(BattleSession, SeededRandom)> {
        let mut rng = SeededRandom::new(self.seed);
        let enemies = generate_opponent_team(&self.player_team, self.mode.difficulty(), &mut rng);
        let session = BattleSession::new(self.player_team.clone(), enemies)?;
        Ok((session, rng))
    }

    /// Record a command.
    pub fn record_command(&mut self, command: BattleCommand) {
        self.commands.push(command);
    }

    /// Finalize the replay with the end state.
    pub fn finalize(&mut self, session: &BattleSession) {
        self.final_turn = session.turn();
        self.final_hash = session.state_hash();
    }

    /// Play every recorded command and return the resulting session.
    ///
    /// # Errors
    /// Returns the first error raised by a recorded command.
    pub fn play(&self, catalog: &Catalog) -> Result<BattleSession> {
        let (mut session, mut rng) = self.start()?;
        for command in &self.commands {
            session = session.step(command, catalog, &mut rng)?;
        }
        Ok(session)
    }

    /// Check that playback reproduces the recorded final hash.
    ///
    /// # Errors
    /// Returns [`GameError::ReplayMismatch`] on a desync.
    pub fn verify(&self, catalog: &Catalog) -> Result<()> {
        let actual = self.play(catalog)?.state_hash();
        if actual != self.final_hash {
            tracing::warn!(
                expected = self.final_hash,
                actual,
                commands = self.commands.len(),
                "Replay desync"
            );
            return Err(GameError::ReplayMismatch {
                expected: self.final_hash,
                actual,
            });
        }
        Ok(())
    }

    /// Get the total number of commands in the replay.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Encode to bytes.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| GameError::InvalidState(format!("Failed to serialize replay: {e}")))
    }

    /// Decode from bytes, checking the format version.
    ///
    /// # Errors
    /// Returns an error if the bytes are malformed or from another version.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let replay: Self = bincode::deserialize(bytes)
            .map_err(|e| GameError::InvalidState(format!("Failed to deserialize replay: {e}")))?;

        if replay.version != REPLAY_VERSION {
            return Err(GameError::InvalidState(format!(
                "Replay version mismatch: expected {}, got {}",
                REPLAY_VERSION, replay.version
            )));
        }

        Ok(replay)
    }

    /// Save the replay to a file.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), bytes)
            .map_err(|e| GameError::InvalidState(format!("Failed to write replay file: {e}")))
    }

    /// Load a replay from a file.
    ///
    /// # Errors
    /// Returns an error if file reading or decoding fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())
            .map_err(|e| GameError::InvalidState(format!("Failed to read replay file: {e}")))?;
        Self::from_bytes(&bytes)
    }
}

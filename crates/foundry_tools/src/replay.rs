//! Recording and checking replay files.

use std::path::Path;

use foundry_core::battle::{choose_command, BattleMode};
use foundry_core::catalog::Catalog;
use foundry_core::player::{MatchResult, Player};
use foundry_core::replay::BattleReplay;

use crate::Result;

/// Outcome of a successful replay check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayCheck {
    /// Mode the battle was fought in.
    pub mode: BattleMode,
    /// Seed of the battle.
    pub seed: u64,
    /// Commands replayed.
    pub commands: usize,
    /// Turn the battle ended on.
    pub final_turn: u32,
    /// Result, if the replay reached the end.
    pub result: Option<MatchResult>,
}

/// Auto-play one battle for a profile and record it.
///
/// # Errors
///
/// Returns an error if the battle cannot start or a command is rejected.
pub fn record_battle(
    catalog: &Catalog,
    player: &Player,
    mode: BattleMode,
    seed: u64,
) -> Result<BattleReplay> {
    let team = player.team_units().into_iter().cloned().collect();
    let mut replay = BattleReplay::new(mode, seed, team);

    let (mut session, mut rng) = replay.start()?;
    while let Some(command) = choose_command(&session, &mut rng) {
        session = session.step(&command, catalog, &mut rng)?;
        replay.record_command(command);
    }
    replay.finalize(&session);

    tracing::info!(%mode, seed, commands = replay.command_count(), "Recorded battle");
    Ok(replay)
}

/// Load a replay file and check that it reproduces its final state.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or the replay desyncs.
pub fn verify_replay_file(path: &Path, catalog: &Catalog) -> Result<ReplayCheck> {
    let replay = BattleReplay::load(path)?;
    replay.verify(catalog)?;
    let session = replay.play(catalog)?;

    Ok(ReplayCheck {
        mode: replay.mode,
        seed: replay.seed,
        commands: replay.command_count(),
        final_turn: replay.final_turn,
        result: session.result(),
    })
}

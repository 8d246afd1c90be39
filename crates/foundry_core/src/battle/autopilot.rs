//! Automatic command selection for simulations and benchmarks.
//!
//! The autopilot plays the player's side the same way the opponent is played:
//! a uniformly random living unit, then a uniformly random equipped move.

use super::phase::{BattleCommand, BattlePhase};
use super::session::BattleSession;
use crate::catalog::Catalog;
use crate::error::{GameError, Result};
use crate::rng::RandomSource;

/// Upper bound on turns for [`play_out`].
pub const DEFAULT_TURN_LIMIT: u32 = 500;

/// Pick the next command for the player's side. `None` once the battle is over.
pub fn choose_command(session: &BattleSession, rng: &mut dyn RandomSource) -> Option<BattleCommand> {
    match session.phase() {
        BattlePhase::Deployment => {
            let living: Vec<_> = session.living_player_units().collect();
            living
                .get(rng.pick_index(living.len()))
                .map(|u| BattleCommand::Deploy(u.id.clone()))
        }
        BattlePhase::Reveal { .. } => Some(BattleCommand::FinishReveal),
        BattlePhase::Selection { player, .. } => {
            let unit = session.player_unit(player)?;
            unit.equipped_moves
                .get(rng.pick_index(unit.equipped_moves.len()))
                .map(|m| BattleCommand::SelectMove(m.clone()))
        }
        BattlePhase::Execution { .. } => Some(BattleCommand::ResolveRound),
        BattlePhase::Victory | BattlePhase::Defeat => None,
    }
}

/// Play a battle to the end, returning the final session and every command issued.
///
/// # Errors
/// Returns [`GameError::InvalidState`] if the battle is still running after
/// `turn_limit` turns, or any error from [`BattleSession::step`].
pub fn play_out(
    session: BattleSession,
    catalog: &Catalog,
    rng: &mut dyn RandomSource,
    turn_limit: u32,
) -> Result<(BattleSession, Vec<BattleCommand>)> {
    let mut session = session;
    let mut commands = Vec::new();

    while let Some(command) = choose_command(&session, rng) {
        if session.turn() > turn_limit {
            return Err(GameError::InvalidState(format!(
                "battle still running after {turn_limit} turns"
            )));
        }
        session = session.step(&command, catalog, rng)?;
        commands.push(command);
    }

    Ok((session, commands))
}

//! The battle state machine.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::phase::{BattleCommand, BattlePhase};
use crate::catalog::Catalog;
use crate::combat::apply_move;
use crate::error::{GameError, Result};
use crate::ids::{MoveId, UnitId};
use crate::player::MatchResult;
use crate::rng::RandomSource;
use crate::unit::Unit;

/// First line of every battle log.
pub const OPENING_LOG_LINE: &str = "Battle Initialized. Deployment Phase active.";

/// A duel between the player's team and an opponent team.
///
/// Sessions are values: [`BattleSession::step`] never touches `self` and
/// returns the next session, so a rejected command leaves the battle exactly
/// where it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleSession {
    turn: u32,
    phase: BattlePhase,
    player_team: Vec<Unit>,
    enemy_team: Vec<Unit>,
    log: Vec<String>,
}

/// Final state of a finished battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleReport {
    /// Victory or Defeat.
    pub result: MatchResult,
    /// Turn the battle ended on.
    pub turns: u32,
    /// Player's units as they ended the battle.
    pub player_team: Vec<Unit>,
    /// Opponent's units as they ended the battle.
    pub enemy_team: Vec<Unit>,
    /// Full battle log.
    pub log: Vec<String>,
}

impl BattleReport {
    /// Display name of the opposing team.
    #[must_use]
    pub fn opponent_name(&self) -> &str {
        self.enemy_team
            .first()
            .map_or("Unknown Enemy", |u| u.name.as_str())
    }

    /// Ids of the player's units that fought.
    #[must_use]
    pub fn team_used(&self) -> Vec<UnitId> {
        self.player_team.iter().map(|u| u.id.clone()).collect()
    }
}

impl BattleSession {
    /// Start a battle in the deployment phase on turn 1.
    ///
    /// # Errors
    /// Returns [`GameError::InvalidState`] if either team is empty or has no
    /// living unit.
    pub fn new(player_team: Vec<Unit>, enemy_team: Vec<Unit>) -> Result<Self> {
        if !player_team.iter().any(Unit::is_alive) {
            return Err(GameError::InvalidState(
                "player team has no living unit".to_string(),
            ));
        }
        if !enemy_team.iter().any(Unit::is_alive) {
            return Err(GameError::InvalidState(
                "enemy team has no living unit".to_string(),
            ));
        }

        Ok(Self {
            turn: 1,
            phase: BattlePhase::Deployment,
            player_team,
            enemy_team,
            log: vec![OPENING_LOG_LINE.to_string()],
        })
    }

    /// Current turn, starting at 1.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> &BattlePhase {
        &self.phase
    }

    /// Player's units.
    #[must_use]
    pub fn player_team(&self) -> &[Unit] {
        &self.player_team
    }

    /// Opponent's units.
    #[must_use]
    pub fn enemy_team(&self) -> &[Unit] {
        &self.enemy_team
    }

    /// Battle log, oldest line first.
    #[must_use]
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Whether the battle has ended.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Look up a player unit.
    #[must_use]
    pub fn player_unit(&self, id: &UnitId) -> Option<&Unit> {
        self.player_team.iter().find(|u| u.id == *id)
    }

    /// Look up an opponent unit.
    #[must_use]
    pub fn enemy_unit(&self, id: &UnitId) -> Option<&Unit> {
        self.enemy_team.iter().find(|u| u.id == *id)
    }

    /// Player units that can still be deployed.
    pub fn living_player_units(&self) -> impl Iterator<Item = &Unit> {
        self.player_team.iter().filter(|u| u.is_alive())
    }

    /// Apply a command and return the next session.
    ///
    /// # Errors
    /// - [`GameError::InvalidTransition`] if the phase does not accept the command
    /// - [`GameError::InvalidSelection`] for a dead, foreign or unequipped choice
    /// - [`GameError::UnknownMove`] if a chosen move is missing from the catalog
    pub fn step(
        &self,
        command: &BattleCommand,
        catalog: &Catalog,
        rng: &mut dyn RandomSource,
    ) -> Result<Self> {
        let next = match (&self.phase, command) {
            (BattlePhase::Deployment, BattleCommand::Deploy(unit_id)) => self.deploy(unit_id, rng)?,
            (BattlePhase::Reveal { player, enemy }, BattleCommand::FinishReveal) => {
                self.with_phase(BattlePhase::Selection {
                    player: player.clone(),
                    enemy: enemy.clone(),
                })
            }
            (BattlePhase::Selection { player, enemy }, BattleCommand::SelectMove(move_id)) => {
                self.select_move(player, enemy, move_id, catalog, rng)?
            }
            (
                BattlePhase::Execution {
                    player,
                    enemy,
                    player_move,
                    enemy_move,
                },
                BattleCommand::ResolveRound,
            ) => self.resolve_round(player, enemy, player_move, enemy_move, catalog)?,
            (phase, command) => {
                return Err(GameError::InvalidTransition {
                    phase: phase.name().to_string(),
                    command: command.name().to_string(),
                })
            }
        };

        #[cfg(feature = "debug-validation")]
        debug_assert!(
            next.player_team
                .iter()
                .chain(&next.enemy_team)
                .all(|u| u.stats.is_consistent()),
            "unit stats exceeded their maximum after {}",
            command.name()
        );

        tracing::debug!(
            turn = next.turn,
            from = %self.phase,
            to = %next.phase,
            "Battle phase transition"
        );
        Ok(next)
    }

    fn with_phase(&self, phase: BattlePhase) -> Self {
        Self {
            phase,
            ..self.clone()
        }
    }

    fn deploy(&self, unit_id: &UnitId, rng: &mut dyn RandomSource) -> Result<Self> {
        let unit = self.player_unit(unit_id).ok_or_else(|| {
            GameError::InvalidSelection(format!("unit '{unit_id}' is not in the battle team"))
        })?;
        if !unit.is_alive() {
            return Err(GameError::InvalidSelection(format!(
                "unit '{unit_id}' is destroyed"
            )));
        }

        let living: Vec<&Unit> = self.enemy_team.iter().filter(|u| u.is_alive()).collect();
        let enemy = living
            .get(rng.pick_index(living.len()))
            .ok_or_else(|| GameError::InvalidState("enemy team has no living unit".to_string()))?;

        Ok(self.with_phase(BattlePhase::Reveal {
            player: unit_id.clone(),
            enemy: enemy.id.clone(),
        }))
    }

    fn select_move(
        &self,
        player: &UnitId,
        enemy: &UnitId,
        move_id: &MoveId,
        catalog: &Catalog,
        rng: &mut dyn RandomSource,
    ) -> Result<Self> {
        let player_unit = active_unit(&self.player_team, player)?;
        if !player_unit.has_equipped(move_id) {
            return Err(GameError::InvalidSelection(format!(
                "move '{move_id}' is not equipped on '{player}'"
            )));
        }
        catalog.require_move(move_id)?;

        let enemy_unit = active_unit(&self.enemy_team, enemy)?;
        let enemy_move = enemy_unit
            .equipped_moves
            .get(rng.pick_index(enemy_unit.equipped_moves.len()))
            .ok_or_else(|| GameError::InvalidState(format!("'{enemy}' has no equipped moves")))?;

        Ok(self.with_phase(BattlePhase::Execution {
            player: player.clone(),
            enemy: enemy.clone(),
            player_move: move_id.clone(),
            enemy_move: enemy_move.clone(),
        }))
    }

    fn resolve_round(
        &self,
        player: &UnitId,
        enemy: &UnitId,
        player_move: &MoveId,
        enemy_move: &MoveId,
        catalog: &Catalog,
    ) -> Result<Self> {
        let player_move = catalog.require_move(player_move)?;
        let enemy_move = catalog.require_move(enemy_move)?;
        let mut player_unit = active_unit(&self.player_team, player)?.clone();
        let mut enemy_unit = active_unit(&self.enemy_team, enemy)?.clone();
        let mut log = self.log.clone();

        // Speeds are read once, before anyone acts.
        let player_first = player_unit.stats.speed >= enemy_unit.stats.speed;

        if player_first {
            let outcome = apply_move(&player_unit, player_move, &enemy_unit);
            log.extend(outcome.event.map(|e| e.to_string()));
            let reply = apply_move(&outcome.defender, enemy_move, &outcome.attacker);
            log.extend(reply.event.map(|e| e.to_string()));
            player_unit = reply.defender;
            enemy_unit = reply.attacker;
        } else {
            let outcome = apply_move(&enemy_unit, enemy_move, &player_unit);
            log.extend(outcome.event.map(|e| e.to_string()));
            let reply = apply_move(&outcome.defender, player_move, &outcome.attacker);
            log.extend(reply.event.map(|e| e.to_string()));
            player_unit = reply.attacker;
            enemy_unit = reply.defender;
        }

        let mut next = self.clone();
        next.log = log;
        replace_unit(&mut next.player_team, player_unit);
        replace_unit(&mut next.enemy_team, enemy_unit);

        let player_alive = next.player_team.iter().any(Unit::is_alive);
        let enemy_alive = next.enemy_team.iter().any(Unit::is_alive);

        // A simultaneous wipe counts as a loss: the player check runs first.
        next.phase = if !player_alive {
            BattlePhase::Defeat
        } else if !enemy_alive {
            BattlePhase::Victory
        } else {
            next.turn += 1;
            BattlePhase::Deployment
        };

        if next.phase.is_terminal() {
            tracing::info!(turn = next.turn, outcome = %next.phase, "Battle finished");
        }
        Ok(next)
    }

    /// Outcome, once the battle is over.
    #[must_use]
    pub const fn result(&self) -> Option<MatchResult> {
        match self.phase {
            BattlePhase::Victory => Some(MatchResult::Victory),
            BattlePhase::Defeat => Some(MatchResult::Defeat),
            _ => None,
        }
    }

    /// Final report, once the battle is over.
    #[must_use]
    pub fn finish(&self) -> Option<BattleReport> {
        Some(BattleReport {
            result: self.result()?,
            turns: self.turn,
            player_team: self.player_team.clone(),
            enemy_team: self.enemy_team.clone(),
            log: self.log.clone(),
        })
    }

    /// Hash of the whole session, for replay verification.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.turn.hash(&mut hasher);
        self.phase.hash(&mut hasher);
        self.player_team.hash(&mut hasher);
        self.enemy_team.hash(&mut hasher);
        self.log.hash(&mut hasher);
        hasher.finish()
    }
}

fn active_unit<'a>(team: &'a [Unit], id: &UnitId) -> Result<&'a Unit> {
    team.iter()
        .find(|u| u.id == *id)
        .ok_or_else(|| GameError::InvalidState(format!("active unit '{id}' vanished")))
}

fn replace_unit(team: &mut [Unit], unit: Unit) {
    if let Some(slot) = team.iter_mut().find(|u| u.id == unit.id) {
        *slot = unit;
    }
}

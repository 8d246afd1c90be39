//! Battle modes, opponent generation and match rewards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::session::BattleSession;
use crate::catalog::Catalog;
use crate::config::GameRules;
use crate::error::{GameError, Result};
use crate::ids::UnitId;
use crate::player::{MatchResult, Player, Rewards};
use crate::rng::RandomSource;
use crate::unit::Unit;

/// Difficulty of PvP arena battles.
pub const PVP_DIFFICULTY: u32 = 1;

/// Difficulty of bounty battles.
pub const BOUNTY_DIFFICULTY: u32 = 3;

/// Kind of battle being fought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleMode {
    /// Story campaign chapter. The chapter number is the difficulty.
    Story(u32),
    /// Standard arena battle.
    Pvp,
    /// Paid-entry battle that pays out bounty coins.
    Bounty,
}

impl BattleMode {
    /// Opponent difficulty for this mode.
    #[must_use]
    pub const fn difficulty(self) -> u32 {
        match self {
            Self::Story(chapter) => chapter,
            Self::Pvp => PVP_DIFFICULTY,
            Self::Bounty => BOUNTY_DIFFICULTY,
        }
    }

    /// Rewards paid out for a finished match.
    #[must_use]
    pub const fn rewards(self, result: MatchResult, rules: &GameRules) -> Rewards {
        match (result, self) {
            (MatchResult::Victory, Self::Bounty) => Rewards {
                credits: 0,
                bounty: Some(rules.win_bounty),
            },
            (MatchResult::Victory, _) => Rewards {
                credits: rules.win_credits,
                bounty: None,
            },
            (MatchResult::Defeat, _) => Rewards {
                credits: rules.loss_credits,
                bounty: None,
            },
        }
    }
}

impl fmt::Display for BattleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Story(chapter) => write!(f, "story chapter {chapter}"),
            Self::Pvp => f.write_str("pvp"),
            Self::Bounty => f.write_str("bounty"),
        }
    }
}

impl FromStr for BattleMode {
    type Err = GameError;

    /// Parses `pvp`, `bounty` or `story:<chapter>`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pvp" => Ok(Self::Pvp),
            "bounty" => Ok(Self::Bounty),
            other => other
                .strip_prefix("story:")
                .and_then(|chapter| chapter.parse().ok())
                .map(Self::Story)
                .ok_or_else(|| GameError::InvalidSelection(format!("unknown battle mode '{s}'"))),
        }
    }
}

/// Build an opponent team mirroring the player's team.
///
/// Each opponent copies its counterpart, renamed `Rogue Bot MK-<difficulty>`,
/// with max health scaled to `80 + 10 * difficulty` percent and speed scaled
/// by a random factor in `[0.9, 1.1)`. Current health is full, capped at the
/// scaled maximum.
pub fn generate_opponent_team(
    player_team: &[Unit],
    difficulty: u32,
    rng: &mut dyn RandomSource,
) -> Vec<Unit> {
    let health_percent = 80u64.saturating_add(u64::from(difficulty).saturating_mul(10));

    player_team
        .iter()
        .enumerate()
        .map(|(i, unit)| {
            let mut enemy = unit.clone();
            enemy.id = UnitId::new(format!("enemy-{i}"));
            enemy.name = format!("Rogue Bot MK-{difficulty}");

            let stats = &mut enemy.stats;
            let max_health = u64::from(unit.stats.max_health) * health_percent / 100;
            stats.max_health = u32::try_from(max_health).unwrap_or(u32::MAX);
            stats.current_health = unit.stats.max_health.min(stats.max_health);

            let speed_factor = rng.range_f64(0.9, 1.1);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let speed = (f64::from(unit.stats.speed) * speed_factor).floor() as u32;
            stats.speed = speed;

            enemy
        })
        .collect()
}

/// Start a battle for the player's current team.
///
/// # Errors
/// - [`GameError::InvalidSelection`] if a story chapter does not exist
/// - [`GameError::InvalidState`] if the battle team has no living unit
pub fn start_battle(
    player: &Player,
    mode: BattleMode,
    catalog: &Catalog,
    rng: &mut dyn RandomSource,
) -> Result<BattleSession> {
    if let BattleMode::Story(chapter) = mode {
        if catalog.chapter(chapter).is_none() {
            return Err(GameError::InvalidSelection(format!(
                "story chapter {chapter} does not exist"
            )));
        }
    }

    let team: Vec<Unit> = player.team_units().into_iter().cloned().collect();
    let enemies = generate_opponent_team(&team, mode.difficulty(), rng);

    tracing::info!(%mode, team = team.len(), "Starting battle");
    BattleSession::new(team, enemies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRandom;

    fn setup() -> (Catalog, Player) {
        let catalog = Catalog::builtin().unwrap();
        let player = Player::starter("p1", "Mechanic", &catalog).unwrap();
        (catalog, player)
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("pvp".parse::<BattleMode>().unwrap(), BattleMode::Pvp);
        assert_eq!("Bounty".parse::<BattleMode>().unwrap(), BattleMode::Bounty);
        assert_eq!("story:2".parse::<BattleMode>().unwrap(), BattleMode::Story(2));
        assert!("story:two".parse::<BattleMode>().is_err());
        assert!("arena".parse::<BattleMode>().is_err());
    }

    #[test]
    fn test_difficulty_by_mode() {
        assert_eq!(BattleMode::Story(2).difficulty(), 2);
        assert_eq!(BattleMode::Pvp.difficulty(), 1);
        assert_eq!(BattleMode::Bounty.difficulty(), 3);
    }

    #[test]
    fn test_rewards() {
        let rules = GameRules::default();
        assert_eq!(
            BattleMode::Pvp.rewards(MatchResult::Victory, &rules),
            Rewards { credits: 50, bounty: None }
        );
        assert_eq!(
            BattleMode::Bounty.rewards(MatchResult::Victory, &rules),
            Rewards { credits: 0, bounty: Some(10) }
        );
        assert_eq!(
            BattleMode::Story(1).rewards(MatchResult::Defeat, &rules),
            Rewards { credits: 10, bounty: None }
        );
    }

    #[test]
    fn test_opponent_team_mirrors_player() {
        let (_, player) = setup();
        let team: Vec<Unit> = player.team_units().into_iter().cloned().collect();
        let mut rng = SeededRandom::new(5);

        let enemies = generate_opponent_team(&team, 3, &mut rng);
        assert_eq!(enemies.len(), team.len());
        for (i, (enemy, unit)) in enemies.iter().zip(&team).enumerate() {
            assert_eq!(enemy.id.as_str(), format!("enemy-{i}"));
            assert_eq!(enemy.name, "Rogue Bot MK-3");
            assert_eq!(enemy.stats.max_health, unit.stats.max_health * 110 / 100);
            assert!(enemy.stats.current_health <= enemy.stats.max_health);
            assert!(f64::from(enemy.stats.speed) >= (f64::from(unit.stats.speed) * 0.9).floor());
            assert!(f64::from(enemy.stats.speed) <= f64::from(unit.stats.speed) * 1.1);
            assert_eq!(enemy.equipped_moves, unit.equipped_moves);
        }
    }

    #[test]
    fn test_low_difficulty_clamps_current_health() {
        let (_, player) = setup();
        let team: Vec<Unit> = player.team_units().into_iter().cloned().collect();
        let enemies = generate_opponent_team(&team, 1, &mut SeededRandom::new(6));
        for enemy in &enemies {
            assert_eq!(enemy.stats.current_health, enemy.stats.max_health);
            assert!(enemy.stats.is_consistent());
        }
    }

    #[test]
    fn test_unknown_chapter_rejected() {
        let (catalog, player) = setup();
        let mut rng = SeededRandom::new(7);
        assert!(start_battle(&player, BattleMode::Story(99), &catalog, &mut rng).is_err());
        let session = start_battle(&player, BattleMode::Story(1), &catalog, &mut rng).unwrap();
        assert_eq!(session.turn(), 1);
        assert_eq!(session.enemy_team().len(), 3);
    }
}

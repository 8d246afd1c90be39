//! Balance testing utilities for headless battles.
//!
//! This module runs many auto-piloted battles between two fixed teams to
//! check how rarity tiers and stat spreads fare against each other.

use foundry_core::battle::{play_out, BattleSession, DEFAULT_TURN_LIMIT};
use foundry_core::catalog::{Catalog, Rarity};
use foundry_core::error::Result;
use foundry_core::ids::UnitId;
use foundry_core::player::MatchResult;
use foundry_core::rng::SeededRandom;
use foundry_core::unit::Unit;

/// Statistics for a set of battles between team A (player side) and team B.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BattleStats {
    /// Total battles run.
    pub total_battles: u32,
    /// Wins for team A.
    pub wins_a: u32,
    /// Wins for team B.
    pub wins_b: u32,
    /// Average turns to resolution.
    pub avg_turns: f64,
}

impl BattleStats {
    /// Calculate win rate for team A (0.0 to 1.0).
    #[must_use]
    pub fn win_rate_a(&self) -> f64 {
        if self.total_battles == 0 {
            return 0.5;
        }
        f64::from(self.wins_a) / f64::from(self.total_battles)
    }

    /// Calculate win rate for team B (0.0 to 1.0).
    #[must_use]
    pub fn win_rate_b(&self) -> f64 {
        if self.total_battles == 0 {
            return 0.5;
        }
        f64::from(self.wins_b) / f64::from(self.total_battles)
    }

    /// Check if the matchup is balanced (within acceptable range).
    #[must_use]
    pub fn is_balanced(&self, min_rate: f64, max_rate: f64) -> bool {
        let rate = self.win_rate_a();
        rate >= min_rate && rate <= max_rate
    }
}

/// Play `battles` seeded battles between two teams and tally the results.
///
/// Seeds run from `first_seed` upwards, so the same call always produces the
/// same statistics.
///
/// # Errors
///
/// Returns an error if a battle cannot start or does not finish.
pub fn run_matchup(
    catalog: &Catalog,
    team_a: &[Unit],
    team_b: &[Unit],
    first_seed: u64,
    battles: u32,
) -> Result<BattleStats> {
    let mut stats = BattleStats::default();
    let mut total_turns = 0u64;

    for offset in 0..battles {
        let mut rng = SeededRandom::new(first_seed.wrapping_add(u64::from(offset)));
        let session = BattleSession::new(team_a.to_vec(), team_b.to_vec())?;
        let (done, _) = play_out(session, catalog, &mut rng, DEFAULT_TURN_LIMIT)?;

        stats.total_battles += 1;
        total_turns += u64::from(done.turn());
        match done.result() {
            Some(MatchResult::Victory) => stats.wins_a += 1,
            Some(MatchResult::Defeat) => stats.wins_b += 1,
            None => {}
        }
    }

    if stats.total_battles > 0 {
        #[allow(clippy::cast_precision_loss)]
        let avg = total_turns as f64 / f64::from(stats.total_battles);
        stats.avg_turns = avg;
    }
    tracing::debug!(
        battles = stats.total_battles,
        win_rate_a = stats.win_rate_a(),
        "Matchup finished"
    );
    Ok(stats)
}

/// A team of fresh instances of the first `size` templates of a rarity.
#[must_use]
pub fn rarity_team(catalog: &Catalog, rarity: Rarity, size: usize, prefix: &str) -> Vec<Unit> {
    catalog
        .templates_of_rarity(rarity)
        .take(size)
        .enumerate()
        .map(|(i, t)| Unit::from_template(t, UnitId::new(format!("{prefix}-{i}"))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{builtin_catalog, minimal_catalog, test_unit};

    #[test]
    fn test_battle_stats_win_rate() {
        let stats = BattleStats {
            total_battles: 100,
            wins_a: 55,
            wins_b: 45,
            avg_turns: 4.0,
        };

        assert!((stats.win_rate_a() - 0.55).abs() < 0.001);
        assert!((stats.win_rate_b() - 0.45).abs() < 0.001);
        assert!(stats.is_balanced(0.45, 0.60));
    }

    #[test]
    fn test_empty_stats_are_even() {
        assert!((BattleStats::default().win_rate_a() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_overwhelming_team_always_wins() {
        let catalog = minimal_catalog();
        let strong = vec![test_unit("strong", 500, 0, 100, 50)];
        let weak = vec![test_unit("weak", 50, 0, 5, 1)];

        let stats = run_matchup(&catalog, &strong, &weak, 0, 20).unwrap();
        assert_eq!(stats.wins_a, 20);
        assert!((stats.avg_turns - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_legendary_beats_common() {
        let catalog = builtin_catalog();
        let legendary = rarity_team(&catalog, Rarity::Legendary, 3, "leg");
        let common = rarity_team(&catalog, Rarity::Common, 3, "com");

        let stats = run_matchup(&catalog, &legendary, &common, 100, 50).unwrap();
        assert_eq!(stats.total_battles, 50);
        assert!(stats.win_rate_a() > 0.75, "legendary win rate {}", stats.win_rate_a());
    }
}

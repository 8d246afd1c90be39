//! Headless battle simulator for balance checks.
//!
//! Plays many auto-piloted battles from a starter profile and reports how the
//! starting team fares in a given mode. Each battle uses its own seed
//! (`seed + index`), so a run is reproducible from its configuration.

use std::fmt::Write as _;

use foundry_core::actions::{apply_action, PlayerAction};
use foundry_core::battle::{play_out, start_battle, BattleMode, DEFAULT_TURN_LIMIT};
use foundry_core::catalog::Catalog;
use foundry_core::config::GameRules;
use foundry_core::player::{MatchResult, Player};
use foundry_core::rng::SeededRandom;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Mode every battle is fought in.
    pub mode: BattleMode,
    /// Number of battles.
    pub battles: u32,
    /// Seed of the first battle.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            mode: BattleMode::Pvp,
            battles: 100,
            seed: 0,
        }
    }
}

/// Aggregate results of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    /// Configuration used.
    pub config: SimulationConfig,
    /// Battles won.
    pub victories: u32,
    /// Battles lost.
    pub defeats: u32,
    /// Fraction of battles won.
    pub win_rate: f64,
    /// Average turns per battle.
    pub avg_turns: f64,
    /// Longest battle in turns.
    pub max_turns: u32,
    /// Credits the rewards would have paid out.
    pub credits_earned: u64,
    /// Bounty coins the rewards would have paid out.
    pub bounty_earned: u64,
}

impl SimulationSummary {
    /// Render as a short human-readable report.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Mode:        {}", self.config.mode);
        let _ = writeln!(out, "Battles:     {} (seed {})", self.config.battles, self.config.seed);
        let _ = writeln!(out, "Victories:   {}", self.victories);
        let _ = writeln!(out, "Defeats:     {}", self.defeats);
        let _ = writeln!(out, "Win rate:    {:.1}%", self.win_rate * 100.0);
        let _ = writeln!(out, "Avg turns:   {:.2} (max {})", self.avg_turns, self.max_turns);
        let _ = writeln!(out, "Credits:     {}", self.credits_earned);
        let _ = writeln!(out, "Bounty:      {}", self.bounty_earned);
        out
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Run a simulation with a fresh starter profile.
///
/// Every battle starts from the same profile, so results are independent of
/// battle order. Rewards are settled on a scratch copy to total them up.
///
/// # Errors
///
/// Returns an error if the catalog cannot build a starter profile or a
/// battle cannot be played to the end.
pub fn run_simulation(
    catalog: &Catalog,
    rules: &GameRules,
    config: &SimulationConfig,
) -> Result<SimulationSummary> {
    let player = Player::starter("simulator", "Simulator", catalog)?;
    let mut ledger = player.clone();

    let mut victories = 0u32;
    let mut defeats = 0u32;
    let mut total_turns = 0u64;
    let mut max_turns = 0u32;

    for index in 0..config.battles {
        let seed = config.seed.wrapping_add(u64::from(index));
        let mut rng = SeededRandom::new(seed);
        let session = start_battle(&player, config.mode, catalog, &mut rng)?;
        let (done, _) = play_out(session, catalog, &mut rng, DEFAULT_TURN_LIMIT)?;
        let Some(report) = done.finish() else {
            continue;
        };

        match report.result {
            MatchResult::Victory => victories += 1,
            MatchResult::Defeat => defeats += 1,
        }
        total_turns += u64::from(report.turns);
        max_turns = max_turns.max(report.turns);

        let settle = PlayerAction::settle(config.mode, &report, seed);
        ledger = apply_action(&ledger, &settle, catalog, rules, &mut rng)?.player;

        tracing::debug!(seed, result = ?report.result, turns = report.turns, "Simulated battle");
    }

    let played = victories + defeats;
    #[allow(clippy::cast_precision_loss)]
    let avg_turns = if played == 0 {
        0.0
    } else {
        total_turns as f64 / f64::from(played)
    };
    let win_rate = if played == 0 {
        0.0
    } else {
        f64::from(victories) / f64::from(played)
    };

    let summary = SimulationSummary {
        config: config.clone(),
        victories,
        defeats,
        win_rate,
        avg_turns,
        max_turns,
        credits_earned: ledger.credits - player.credits,
        bounty_earned: ledger.bounty_coins - player.bounty_coins,
    };
    tracing::info!(
        mode = %config.mode,
        battles = played,
        win_rate = summary.win_rate,
        "Simulation finished"
    );
    Ok(summary)
}

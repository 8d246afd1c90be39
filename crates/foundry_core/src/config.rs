//! Tunable game rules.
//!
//! All economy and progression constants live in [`GameRules`]. The defaults
//! match the shipped game; a RON file can override any subset of them.
//!
//! # Example RON
//!
//! ```ron
//! GameRules(
//!     chest_cost: 100,
//!     daily_wins_required: 3,
//!     match_history_cap: 20,
//! )
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::player::PartCounts;

/// Economy, progression and reward constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    /// Credits charged for a purchased chest.
    pub chest_cost: u64,
    /// Parts granted by every chest.
    pub chest_parts: PartCounts,
    /// A blueprint is awarded when a roll is strictly above this value.
    pub blueprint_roll_threshold: f64,
    /// Daily wins needed to unlock the daily chest.
    pub daily_wins_required: u8,
    /// Maximum number of match history entries kept.
    pub match_history_cap: usize,
    /// Maximum battle team size.
    pub max_team_size: usize,
    /// Experience needed to leave level 1.
    pub xp_base: u64,
    /// Growth factor of the experience curve per level.
    pub xp_growth: f64,
    /// Stat growth applied per training action, in percent.
    pub stat_growth_percent: u32,
    /// Experience granted by one workshop training session.
    pub training_xp: u64,
    /// Credits for winning a story or PvP battle.
    pub win_credits: u64,
    /// Bounty coins for winning a bounty battle.
    pub win_bounty: u64,
    /// Consolation credits for a lost battle.
    pub loss_credits: u64,
    /// Credits charged to enter a bounty battle.
    pub bounty_entry_fee: u64,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            chest_cost: 100,
            chest_parts: PartCounts::new(5, 2, 1),
            blueprint_roll_threshold: 0.7,
            daily_wins_required: 3,
            match_history_cap: 20,
            max_team_size: 3,
            xp_base: 100,
            xp_growth: 1.5,
            stat_growth_percent: 105,
            training_xp: 50,
            win_credits: 50,
            win_bounty: 10,
            loss_credits: 10,
            bounty_entry_fee: 50,
        }
    }
}

impl GameRules {
    /// Parse rules from RON. Missing fields fall back to defaults.
    ///
    /// # Errors
    /// Returns [`GameError::DataParseError`] if the text is not valid RON.
    pub fn from_ron_str(source_name: &str, text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| GameError::DataParseError {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })
    }

    /// Check the rules for values the engines cannot work with.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.xp_base == 0 {
            errors.push("xp_base must be positive".to_string());
        }
        if self.xp_growth < 1.0 {
            errors.push(format!("xp_growth must be at least 1.0, got {}", self.xp_growth));
        }
        if !(0.0..1.0).contains(&self.blueprint_roll_threshold) {
            errors.push(format!(
                "blueprint_roll_threshold must be in [0, 1), got {}",
                self.blueprint_roll_threshold
            ));
        }
        if self.max_team_size == 0 {
            errors.push("max_team_size must be positive".to_string());
        }
        if self.match_history_cap == 0 {
            errors.push("match_history_cap must be positive".to_string());
        }
        errors
    }
}

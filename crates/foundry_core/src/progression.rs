//! Experience and leveling.
//!
//! The experience needed to leave level `L` is
//! `floor(xp_base * xp_growth^(L - 1))` (100, 150, 225, 337, ... with the
//! default rules). Gaining experience may cross several thresholds at once.
//!
//! Stat growth is applied once per [`add_experience`] call, whatever the
//! number of levels gained, including none. Health is topped up to the new
//! maximum.

use crate::config::GameRules;
use crate::unit::Unit;

/// Experience needed to advance from `level` to `level + 1`.
#[must_use]
pub fn xp_threshold(level: u32, rules: &GameRules) -> u64 {
    let exponent = i32::try_from(level.saturating_sub(1)).unwrap_or(i32::MAX);
    #[allow(clippy::cast_precision_loss)]
    let base = rules.xp_base as f64;
    let threshold = (base * rules.xp_growth.powi(exponent)).floor();
    // Float-to-int casts saturate; a zero threshold would never terminate.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let threshold = threshold as u64;
    threshold.max(1)
}

/// Scale a stat by a percentage, flooring.
#[must_use]
pub fn grow_stat(value: u32, percent: u32) -> u32 {
    let grown = u64::from(value) * u64::from(percent) / 100;
    u32::try_from(grown).unwrap_or(u32::MAX)
}

/// Grant experience and return the updated unit.
#[must_use]
pub fn add_experience(unit: &Unit, amount: u64, rules: &GameRules) -> Unit {
    let mut next = unit.clone();
    next.xp = next.xp.saturating_add(amount);

    let mut needed = xp_threshold(next.level, rules);
    while next.xp >= needed {
        next.xp -= needed;
        next.level += 1;
        needed = xp_threshold(next.level, rules);
    }

    let stats = &mut next.stats;
    stats.max_health = grow_stat(stats.max_health, rules.stat_growth_percent);
    stats.current_health = stats.max_health;
    stats.attack = grow_stat(stats.attack, rules.stat_growth_percent);

    if next.level > unit.level {
        tracing::debug!(
            unit = %next.id,
            from = unit.level,
            to = next.level,
            "Unit leveled up"
        );
    }

    next
}

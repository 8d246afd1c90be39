//! Unit instances ("machines").
//!
//! A [`Unit`] is a live copy of a [`UnitTemplate`]: it owns its stats, level
//! and equipped moves and shares nothing with the catalog. Instances are only
//! made through [`Unit::from_template`], which copies field by field.
//!
//! # Invariants
//!
//! - `current_health <= max_health` and `current_shield <= max_shield`
//! - `level >= 1`
//! - `equipped_moves` is a subset of `move_pool`

use serde::{Deserialize, Serialize};

use crate::catalog::{BaseStats, ElementType, Rarity, UnitTemplate};
use crate::error::{GameError, Result};
use crate::ids::{MoveId, TemplateId, UnitId};

/// Live stats of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitStats {
    /// Maximum hull integrity.
    pub max_health: u32,
    /// Current hull integrity.
    pub current_health: u32,
    /// Maximum shield buffer.
    pub max_shield: u32,
    /// Current shield buffer.
    pub current_shield: u32,
    /// Out-of-combat shield regeneration.
    pub shield_regen: u32,
    /// Attack power.
    pub attack: u32,
    /// Turn order priority.
    pub speed: u32,
}

impl UnitStats {
    /// Fresh stats at full health and shield.
    #[must_use]
    pub const fn from_base(base: &BaseStats) -> Self {
        Self {
            max_health: base.max_health,
            current_health: base.max_health,
            max_shield: base.max_shield,
            current_shield: base.max_shield,
            shield_regen: base.shield_regen,
            attack: base.attack,
            speed: base.speed,
        }
    }

    /// Whether the health and shield invariants hold.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.current_health <= self.max_health && self.current_shield <= self.max_shield
    }
}

/// One machine instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    /// Instance identifier, unique within a roster.
    pub id: UnitId,
    /// Template this unit was copied from.
    pub template_id: TemplateId,
    /// Display name.
    pub name: String,
    /// Rarity tier.
    pub rarity: Rarity,
    /// Element category.
    pub element: ElementType,
    /// Level, starting at 1.
    pub level: u32,
    /// Experience towards the next level.
    pub xp: u64,
    /// Live stats.
    pub stats: UnitStats,
    /// Level 1 stats, kept for display.
    pub base_stats: BaseStats,
    /// Moves this unit can equip.
    pub move_pool: Vec<MoveId>,
    /// Moves usable in battle.
    pub equipped_moves: Vec<MoveId>,
}

impl Unit {
    /// Instantiate a template: level 1, no experience, full health and shield,
    /// every pool move equipped.
    #[must_use]
    pub fn from_template(template: &UnitTemplate, id: UnitId) -> Self {
        Self {
            id,
            template_id: template.id.clone(),
            name: template.name.clone(),
            rarity: template.rarity,
            element: template.element,
            level: 1,
            xp: 0,
            stats: UnitStats::from_base(&template.base_stats),
            base_stats: template.base_stats,
            move_pool: template.move_pool.clone(),
            equipped_moves: template.move_pool.clone(),
        }
    }

    /// Whether the unit can still act.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.stats.current_health > 0
    }

    /// Whether a move is equipped.
    #[must_use]
    pub fn has_equipped(&self, move_id: &MoveId) -> bool {
        self.equipped_moves.contains(move_id)
    }

    /// Copy of this unit with a new equipped set.
    ///
    /// # Errors
    /// Returns [`GameError::InvalidSelection`] if the set is empty, has
    /// duplicates, or names a move outside the pool.
    pub fn with_equipped_moves(&self, moves: Vec<MoveId>) -> Result<Self> {
        if moves.is_empty() {
            return Err(GameError::InvalidSelection(format!(
                "unit '{}' must keep at least one move equipped",
                self.id
            )));
        }
        for (i, move_id) in moves.iter().enumerate() {
            if !self.move_pool.contains(move_id) {
                return Err(GameError::InvalidSelection(format!(
                    "move '{}' is not in the pool of unit '{}'",
                    move_id, self.id
                )));
            }
            if moves[..i].contains(move_id) {
                return Err(GameError::InvalidSelection(format!(
                    "move '{move_id}' is equipped twice"
                )));
            }
        }
        Ok(Self {
            equipped_moves: moves,
            ..self.clone()
        })
    }

    /// Take damage: the shield absorbs first, the rest comes off health.
    ///
    /// Returns `(absorbed, dealt)`.
    pub fn absorb_hit(&mut self, raw_damage: u32) -> (u32, u32) {
        let absorbed = self.stats.current_shield.min(raw_damage);
        self.stats.current_shield -= absorbed;
        let remaining = raw_damage - absorbed;
        self.stats.current_health = self.stats.current_health.saturating_sub(remaining);
        (absorbed, remaining)
    }

    /// Raise the shield, capped at its maximum. Returns the amount gained.
    pub fn charge_shield(&mut self, amount: u32) -> u32 {
        let before = self.stats.current_shield;
        self.stats.current_shield = before.saturating_add(amount).min(self.stats.max_shield);
        self.stats.current_shield - before
    }
}

//! Unit template data.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::move_data::ElementType;
use crate::ids::{BlueprintId, GuildId, MoveId, TemplateId};

/// Rarity tier of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    /// Entry tier.
    Common,
    /// Second tier.
    Uncommon,
    /// Third tier.
    Rare,
    /// Top tier.
    Legendary,
}

impl Rarity {
    /// All rarities, lowest first.
    pub const ALL: [Self; 4] = [Self::Common, Self::Uncommon, Self::Rare, Self::Legendary];

    /// Base stat multiplier in percent.
    #[must_use]
    pub const fn stat_percent(self) -> u32 {
        match self {
            Self::Common => 100,
            Self::Uncommon => 130,
            Self::Rare => 180,
            Self::Legendary => 250,
        }
    }

    /// Parts required to craft a template of this rarity.
    #[must_use]
    pub const fn crafting_cost(self) -> PartCounts {
        match self {
            Self::Common => PartCounts::new(10, 0, 0),
            Self::Uncommon => PartCounts::new(20, 10, 0),
            Self::Rare => PartCounts::new(50, 25, 5),
            Self::Legendary => PartCounts::new(100, 50, 20),
        }
    }

    /// Size of the move pool a template of this rarity is given.
    #[must_use]
    pub const fn move_pool_size(self) -> usize {
        match self {
            Self::Common | Self::Uncommon => 6,
            Self::Rare | Self::Legendary => 8,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::Legendary => "Legendary",
        };
        f.write_str(name)
    }
}

/// Part counts by tier. Used both for inventory and for crafting costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PartCounts {
    /// Common parts.
    pub common: u64,
    /// Uncommon parts.
    pub uncommon: u64,
    /// Rare parts.
    pub rare: u64,
}

impl PartCounts {
    /// Create part counts.
    #[must_use]
    pub const fn new(common: u64, uncommon: u64, rare: u64) -> Self {
        Self {
            common,
            uncommon,
            rare,
        }
    }

    /// First tier where `self` falls short of `cost`, as (tier, required, available).
    #[must_use]
    pub fn shortfall(&self, cost: &PartCounts) -> Option<(&'static str, u64, u64)> {
        [
            ("common parts", cost.common, self.common),
            ("uncommon parts", cost.uncommon, self.uncommon),
            ("rare parts", cost.rare, self.rare),
        ]
        .into_iter()
        .find(|(_, required, available)| available < required)
    }

    /// Subtract a cost, or `None` if any tier would go negative.
    #[must_use]
    pub fn checked_sub(&self, cost: &PartCounts) -> Option<Self> {
        Some(Self {
            common: self.common.checked_sub(cost.common)?,
            uncommon: self.uncommon.checked_sub(cost.uncommon)?,
            rare: self.rare.checked_sub(cost.rare)?,
        })
    }

    /// Add counts tier by tier.
    #[must_use]
    pub const fn saturating_add(&self, other: &PartCounts) -> Self {
        Self {
            common: self.common.saturating_add(other.common),
            uncommon: self.uncommon.saturating_add(other.uncommon),
            rare: self.rare.saturating_add(other.rare),
        }
    }
}

/// Level 1 stats of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseStats {
    /// Maximum hull integrity.
    pub max_health: u32,
    /// Maximum shield buffer.
    pub max_shield: u32,
    /// Out-of-combat shield regeneration.
    pub shield_regen: u32,
    /// Attack power.
    pub attack: u32,
    /// Turn order priority.
    pub speed: u32,
}

/// What it takes to craft a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftingRequirements {
    /// Blueprint consumed by crafting.
    pub blueprint_id: BlueprintId,
    /// Parts consumed by crafting.
    pub parts: PartCounts,
}

/// A unit template: the blueprint every instance is copied from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitTemplate {
    /// Template identifier.
    pub id: TemplateId,
    /// Display name.
    pub name: String,
    /// Flavour text.
    #[serde(default)]
    pub description: String,
    /// Owning guild, `None` for neutral templates.
    #[serde(default)]
    pub guild: Option<GuildId>,
    /// Rarity tier.
    pub rarity: Rarity,
    /// Element category.
    pub element: ElementType,
    /// Level 1 stats.
    pub base_stats: BaseStats,
    /// Crafting cost.
    pub crafting: CraftingRequirements,
    /// Moves available to instances of this template.
    pub move_pool: Vec<MoveId>,
}

impl UnitTemplate {
    /// Whether this template belongs to no guild.
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        self.guild.is_none()
    }
}

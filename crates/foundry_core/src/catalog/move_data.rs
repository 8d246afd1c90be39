//! Move definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::MoveId;

/// Damage/move category. There is no type-advantage matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementType {
    /// Physical impact.
    Kinetic,
    /// Fire and heat.
    Thermal,
    /// Lightning.
    Voltaic,
    /// Ice.
    Cryogenic,
    /// Nature and acid.
    Bio,
}

impl ElementType {
    /// All elements in catalog order.
    pub const ALL: [Self; 5] = [
        Self::Kinetic,
        Self::Thermal,
        Self::Voltaic,
        Self::Cryogenic,
        Self::Bio,
    ];

    /// Display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Kinetic => "Kinetic",
            Self::Thermal => "Thermal",
            Self::Voltaic => "Voltaic",
            Self::Cryogenic => "Cryogenic",
            Self::Bio => "Bio-Mech",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Stat a buff move is flavoured towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatType {
    /// Attack power.
    Attack,
    /// Hull integrity.
    Health,
    /// Shield buffer.
    Shield,
    /// Out-of-combat shield regeneration.
    ShieldRegen,
    /// Turn order.
    Speed,
}

/// Immutable catalog entry for a move.
///
/// # Example RON
///
/// ```ron
/// Move(
///     id: "bunker",
///     name: "Bunker Down",
///     element: Kinetic,
///     damage_percent: 0,
///     is_buff: true,
///     stat_target: Some(Shield),
///     buff_amount: Some(40),
///     description: "Fortifies position.",
///     cooldown: 3,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Unique move identifier.
    pub id: MoveId,
    /// Display name.
    pub name: String,
    /// Element category.
    pub element: ElementType,
    /// Damage multiplier in percent of attack (100 = 1.0x). Zero for pure buffs.
    pub damage_percent: u32,
    /// Whether this move buffs its user instead of dealing damage.
    #[serde(default)]
    pub is_buff: bool,
    /// Stat the buff is described as targeting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat_target: Option<StatType>,
    /// Amount granted by the buff.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buff_amount: Option<u32>,
    /// Flavour text.
    #[serde(default)]
    pub description: String,
    /// Declared cooldown in turns. Not enforced during move selection.
    #[serde(default)]
    pub cooldown: u32,
}

impl Move {
    /// Create a damage move.
    #[must_use]
    pub fn attack(id: impl Into<String>, name: impl Into<String>, element: ElementType, damage_percent: u32) -> Self {
        Self {
            id: MoveId::new(id),
            name: name.into(),
            element,
            damage_percent,
            is_buff: false,
            stat_target: None,
            buff_amount: None,
            description: String::new(),
            cooldown: 0,
        }
    }

    /// Create a self-buff move.
    #[must_use]
    pub fn buff(
        id: impl Into<String>,
        name: impl Into<String>,
        element: ElementType,
        stat: StatType,
        amount: u32,
    ) -> Self {
        Self {
            id: MoveId::new(id),
            name: name.into(),
            element,
            damage_percent: 0,
            is_buff: true,
            stat_target: Some(stat),
            buff_amount: Some(amount),
            description: String::new(),
            cooldown: 0,
        }
    }

    /// Buff amount, zero when unset.
    #[must_use]
    pub fn buff_value(&self) -> u32 {
        self.buff_amount.unwrap_or(0)
    }
}

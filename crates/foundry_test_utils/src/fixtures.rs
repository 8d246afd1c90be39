//! Test fixtures and helpers.
//!
//! Pre-built catalogs, players and units for consistent testing, plus a
//! [`ScriptedRandom`] source that replays a fixed list of values.

use std::collections::VecDeque;

use foundry_core::catalog::{
    BaseStats, Catalog, CatalogData, CraftingRequirements, ElementType, Move, PartCounts, Rarity,
    StatType, UnitTemplate,
};
use foundry_core::config::GameRules;
use foundry_core::ids::{BlueprintId, MoveId, TemplateId, UnitId};
use foundry_core::player::Player;
use foundry_core::rng::RandomSource;
use foundry_core::unit::Unit;

/// Random source that returns scripted values, then repeats the last one.
///
/// Use it to force a specific loot roll or opponent choice.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: VecDeque<f64>,
    last: f64,
}

impl ScriptedRandom {
    /// Create a source from values in `[0, 1)`.
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().collect(),
            last: 0.0,
        }
    }

    /// A source that always returns `value`.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self {
            values: VecDeque::new(),
            last: value,
        }
    }

    /// Number of scripted values not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn next_float(&mut self) -> f64 {
        if let Some(value) = self.values.pop_front() {
            self.last = value;
        }
        self.last
    }
}

/// The built-in catalog.
///
/// # Panics
///
/// Panics if the bundled data fails to parse.
#[must_use]
pub fn builtin_catalog() -> Catalog {
    Catalog::builtin().expect("bundled catalog data parses")
}

/// A starter profile on the built-in catalog.
///
/// # Panics
///
/// Panics if the built-in catalog cannot seed a starter profile.
#[must_use]
pub fn starter_player(catalog: &Catalog) -> Player {
    Player::starter("test-player", "Test_Mechanic", catalog).expect("starter profile builds")
}

/// Default rules.
#[must_use]
pub fn default_rules() -> GameRules {
    GameRules::default()
}

/// Rules parsed from a RON override, for tests that tweak the economy.
///
/// # Panics
///
/// Panics if the RON is invalid.
#[must_use]
pub fn rules_from_ron(text: &str) -> GameRules {
    GameRules::from_ron_str("test rules", text).expect("test rules parse")
}

/// A tiny catalog with two moves and one template, independent of the bundled data.
///
/// Moves: `strike` (Kinetic, 100%) and `bunker` (shield +40).
/// Template: `mech-0`, Common, crafted from `bp-mech-0`.
#[must_use]
pub fn minimal_catalog() -> Catalog {
    let data = CatalogData {
        moves: vec![
            Move::attack("strike", "Kinetic Strike", ElementType::Kinetic, 100),
            Move::buff("bunker", "Bunker Down", ElementType::Kinetic, StatType::Shield, 40),
        ],
        guilds: Vec::new(),
        chapters: Vec::new(),
    };
    let template = test_template(
        "mech-0",
        BaseStats {
            max_health: 100,
            max_shield: 40,
            shield_regen: 5,
            attack: 20,
            speed: 10,
        },
    );
    Catalog::with_templates(data, vec![template])
}

/// A Common Kinetic template with the given stats, knowing `strike` and `bunker`.
#[must_use]
pub fn test_template(id: &str, base_stats: BaseStats) -> UnitTemplate {
    UnitTemplate {
        id: TemplateId::new(id),
        name: format!("Test {id}"),
        description: String::new(),
        guild: None,
        rarity: Rarity::Common,
        element: ElementType::Kinetic,
        base_stats,
        crafting: CraftingRequirements {
            blueprint_id: BlueprintId::new(format!("bp-{id}")),
            parts: PartCounts::new(10, 0, 0),
        },
        move_pool: vec![MoveId::new("strike"), MoveId::new("bunker")],
    }
}

/// A level 1 unit with explicit combat stats, equipped with `strike` only.
///
/// The name equals the id so log lines read naturally in assertions.
#[must_use]
pub fn test_unit(id: &str, health: u32, shield: u32, attack: u32, speed: u32) -> Unit {
    let template = test_template(
        "mech-0",
        BaseStats {
            max_health: health,
            max_shield: shield,
            shield_regen: 5,
            attack,
            speed,
        },
    );
    let mut unit = Unit::from_template(&template, UnitId::new(id));
    unit.name = id.to_string();
    unit.equipped_moves = vec![MoveId::new("strike")];
    unit
}

/// The player's battle team as owned copies.
#[must_use]
pub fn team_of(player: &Player) -> Vec<Unit> {
    player.team_units().into_iter().cloned().collect()
}

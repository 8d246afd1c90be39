//! Loot chests.
//!
//! Every chest yields the same part bundle. On top of that, a roll strictly
//! above the blueprint threshold awards one blueprint drawn uniformly from the
//! whole template library. Owned blueprints may be drawn again.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::config::GameRules;
use crate::error::{GameError, Result};
use crate::ids::BlueprintId;
use crate::player::Player;
use crate::rng::RandomSource;

/// How a chest is paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChestKind {
    /// Free once per day after enough wins.
    Daily,
    /// Bought with credits.
    Purchased,
}

/// Contents of an opened chest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootResult {
    /// Common parts granted.
    pub common_parts: u64,
    /// Uncommon parts granted.
    pub uncommon_parts: u64,
    /// Rare parts granted.
    pub rare_parts: u64,
    /// Blueprint granted, if the roll succeeded.
    pub blueprint: Option<BlueprintId>,
}

/// Result of [`open_chest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChestOutcome {
    /// Player after payment and loot.
    pub player: Player,
    /// What was inside.
    pub loot: LootResult,
}

/// Roll the contents of one chest.
pub fn roll_loot(catalog: &Catalog, rules: &GameRules, rng: &mut dyn RandomSource) -> LootResult {
    let parts = rules.chest_parts;
    let blueprint = if rng.next_float() > rules.blueprint_roll_threshold {
        let templates = catalog.templates();
        templates
            .get(rng.pick_index(templates.len()))
            .map(|t| t.crafting.blueprint_id.clone())
    } else {
        None
    };

    LootResult {
        common_parts: parts.common,
        uncommon_parts: parts.uncommon,
        rare_parts: parts.rare,
        blueprint,
    }
}

/// Pay for and open a chest.
///
/// # Errors
/// - [`GameError::InsufficientResources`] if a purchased chest is unaffordable
/// - [`GameError::PreconditionNotMet`] if the daily chest is locked or claimed
///
/// Nothing is rolled and nothing changes on failure.
pub fn open_chest(
    player: &Player,
    kind: ChestKind,
    catalog: &Catalog,
    rules: &GameRules,
    rng: &mut dyn RandomSource,
) -> Result<ChestOutcome> {
    let mut next = match kind {
        ChestKind::Purchased => player.spend_credits(rules.chest_cost)?,
        ChestKind::Daily => {
            if player.daily_claimed {
                return Err(GameError::PreconditionNotMet(
                    "daily chest already claimed".to_string(),
                ));
            }
            if player.daily_wins < rules.daily_wins_required {
                return Err(GameError::PreconditionNotMet(format!(
                    "daily chest needs {} wins, have {}",
                    rules.daily_wins_required, player.daily_wins
                )));
            }
            let mut next = player.clone();
            next.daily_claimed = true;
            next
        }
    };

    let loot = roll_loot(catalog, rules, rng);
    next.inventory.parts = next.inventory.parts.saturating_add(&rules.chest_parts);
    if let Some(blueprint) = &loot.blueprint {
        next.inventory.blueprints.push(blueprint.clone());
    }

    tracing::info!(
        ?kind,
        blueprint = loot.blueprint.as_ref().map(BlueprintId::as_str),
        "Opened chest"
    );

    Ok(ChestOutcome { player: next, loot })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PartCounts;
    use crate::rng::SeededRandom;

    fn setup() -> (Catalog, Player) {
        let catalog = Catalog::builtin().unwrap();
        let player = Player::starter("p1", "Mechanic", &catalog).unwrap();
        (catalog, player)
    }

    #[test]
    fn test_purchased_chest_pays_and_grants_parts() {
        let (catalog, player) = setup();
        let rules = GameRules::default();
        let mut rng = SeededRandom::new(1);

        let outcome = open_chest(&player, ChestKind::Purchased, &catalog, &rules, &mut rng).unwrap();
        assert_eq!(outcome.player.credits, 400);
        assert_eq!(
            (outcome.loot.common_parts, outcome.loot.uncommon_parts, outcome.loot.rare_parts),
            (5, 2, 1)
        );
        assert_eq!(outcome.player.inventory.parts, PartCounts::new(55, 22, 6));
        let expected_blueprints = player.inventory.blueprints.len() + usize::from(outcome.loot.blueprint.is_some());
        assert_eq!(outcome.player.inventory.blueprints.len(), expected_blueprints);
    }

    #[test]
    fn test_purchased_chest_unaffordable() {
        let (catalog, mut player) = setup();
        player.credits = 99;
        let mut rng = SeededRandom::new(1);

        let err = open_chest(&player, ChestKind::Purchased, &catalog, &GameRules::default(), &mut rng)
            .unwrap_err();
        assert_eq!(err, GameError::insufficient("credits", 100, 99));
    }

    #[test]
    fn test_daily_chest_gating() {
        let (catalog, mut player) = setup();
        let rules = GameRules::default();
        let mut rng = SeededRandom::new(2);

        player.daily_wins = 2;
        assert!(matches!(
            open_chest(&player, ChestKind::Daily, &catalog, &rules, &mut rng),
            Err(GameError::PreconditionNotMet(_))
        ));

        player.daily_wins = 3;
        let outcome = open_chest(&player, ChestKind::Daily, &catalog, &rules, &mut rng).unwrap();
        assert!(outcome.player.daily_claimed);
        assert_eq!(outcome.player.credits, player.credits);

        assert!(matches!(
            open_chest(&outcome.player, ChestKind::Daily, &catalog, &rules, &mut rng),
            Err(GameError::PreconditionNotMet(_))
        ));
    }

    #[test]
    fn test_blueprint_rate() {
        let (catalog, _) = setup();
        let rules = GameRules::default();
        let mut rng = SeededRandom::new(0xC0FFEE);

        let trials = 10_000;
        let hits = (0..trials)
            .filter(|_| roll_loot(&catalog, &rules, &mut rng).blueprint.is_some())
            .count();
        #[allow(clippy::cast_precision_loss)]
        let rate = hits as f64 / f64::from(trials);
        assert!((0.25..=0.35).contains(&rate), "blueprint rate {rate}");
    }
}

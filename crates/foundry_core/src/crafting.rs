//! Crafting: blueprint plus parts in, fresh unit out.

use crate::catalog::Catalog;
use crate::error::{GameError, Result};
use crate::ids::BlueprintId;
use crate::player::Player;
use crate::unit::Unit;

/// Result of a successful craft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftResult {
    /// Player with parts deducted, blueprint consumed and the unit added.
    pub player: Player,
    /// The new unit, also the last roster entry of `player`.
    pub unit: Unit,
}

/// Craft the unit a blueprint describes.
///
/// Either everything happens (parts deducted exactly, every copy of the
/// blueprint consumed, a level 1 unit appended to the roster) or nothing does.
///
/// # Errors
/// - [`GameError::UnknownBlueprint`] if no template uses the blueprint
/// - [`GameError::PreconditionNotMet`] if the blueprint is not owned
/// - [`GameError::InsufficientResources`] naming the first short part tier
pub fn craft(player: &Player, blueprint: &BlueprintId, catalog: &Catalog) -> Result<CraftResult> {
    let template = catalog
        .template_for_blueprint(blueprint)
        .ok_or_else(|| GameError::UnknownBlueprint(blueprint.to_string()))?;

    if !player.inventory.has_blueprint(blueprint) {
        return Err(GameError::PreconditionNotMet(format!(
            "blueprint '{blueprint}' is not owned"
        )));
    }

    let cost = &template.crafting.parts;
    if let Some((resource, required, available)) = player.inventory.parts.shortfall(cost) {
        return Err(GameError::insufficient(resource, required, available));
    }
    let parts = player
        .inventory
        .parts
        .checked_sub(cost)
        .ok_or_else(|| GameError::InvalidState("part shortfall went undetected".to_string()))?;

    let mut next = player.clone();
    next.inventory.parts = parts;
    next.inventory.remove_blueprint(blueprint);

    let id = next.mint_unit_id(&template.id);
    let unit = Unit::from_template(template, id);
    next.roster.push(unit.clone());

    tracing::info!(
        blueprint = %blueprint,
        unit = %unit.id,
        rarity = %unit.rarity,
        "Crafted unit"
    );

    Ok(CraftResult { player: next, unit })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PartCounts;

    fn setup() -> (Catalog, Player) {
        let catalog = Catalog::builtin().unwrap();
        let player = Player::starter("p1", "Mechanic", &catalog).unwrap();
        (catalog, player)
    }

    #[test]
    fn test_craft_deducts_exactly() {
        let (catalog, player) = setup();
        let blueprint = BlueprintId::new("bp-mech-5");
        let cost = catalog.template_for_blueprint(&blueprint).unwrap().crafting.parts;

        let result = craft(&player, &blueprint, &catalog).unwrap();
        let after = &result.player;

        assert_eq!(
            after.inventory.parts,
            PartCounts::new(
                player.inventory.parts.common - cost.common,
                player.inventory.parts.uncommon - cost.uncommon,
                player.inventory.parts.rare - cost.rare,
            )
        );
        assert!(!after.inventory.has_blueprint(&blueprint));
        assert_eq!(after.roster.len(), player.roster.len() + 1);
        assert_eq!(result.unit.level, 1);
        assert_eq!(result.unit.xp, 0);
        assert_eq!(result.unit.template_id.as_str(), "mech-5");
        assert!(player.unit(&result.unit.id).is_none());
    }

    #[test]
    fn test_insufficient_rare_parts_is_noop() {
        let (catalog, mut player) = setup();
        let rare = catalog
            .templates()
            .iter()
            .find(|t| t.crafting.parts.rare > 0)
            .unwrap();
        let blueprint = rare.crafting.blueprint_id.clone();
        player.inventory.blueprints.push(blueprint.clone());
        player.inventory.parts = PartCounts::new(1_000, 1_000, 0);
        let before = player.clone();

        let err = craft(&player, &blueprint, &catalog).unwrap_err();
        assert!(matches!(err, GameError::InsufficientResources { ref resource, .. } if resource == "rare parts"));
        assert_eq!(player, before);
    }

    #[test]
    fn test_unowned_blueprint_rejected() {
        let (catalog, player) = setup();
        let err = craft(&player, &BlueprintId::new("bp-mech-60"), &catalog).unwrap_err();
        assert!(matches!(err, GameError::PreconditionNotMet(_)));
    }

    #[test]
    fn test_unknown_blueprint_rejected() {
        let (catalog, player) = setup();
        let err = craft(&player, &BlueprintId::new("bp-nope"), &catalog).unwrap_err();
        assert!(matches!(err, GameError::UnknownBlueprint(_)));
    }

    #[test]
    fn test_duplicate_blueprint_consumes_every_copy() {
        let (catalog, mut player) = setup();
        let blueprint = BlueprintId::new("bp-mech-55");
        player.inventory.blueprints.push(blueprint.clone());

        let result = craft(&player, &blueprint, &catalog).unwrap();
        assert!(!result.player.inventory.has_blueprint(&blueprint));
        assert_eq!(
            result.player.inventory.blueprints,
            vec![BlueprintId::new("bp-mech-5")]
        );
        assert_eq!(result.player.roster.len(), player.roster.len() + 1);
    }
}

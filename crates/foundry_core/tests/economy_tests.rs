//! Economy flow tests for foundry_core.
//!
//! These tests drive a fresh profile through the same action sequence a
//! player would take and check the resource bookkeeping end to end.

use foundry_core::actions::{apply_action, ActionEffect, PlayerAction};
use foundry_core::battle::{play_out, start_battle, BattleMode, DEFAULT_TURN_LIMIT};
use foundry_core::catalog::Rarity;
use foundry_core::error::GameError;
use foundry_core::loot::ChestKind;
use foundry_core::player::{MatchResult, Player};
use foundry_core::rng::SeededRandom;
use foundry_test_utils::fixtures::{builtin_catalog, default_rules, starter_player, ScriptedRandom};

// =============================================================================
// Starter Profile
// =============================================================================

mod starter {
    use super::*;

    #[test]
    fn test_starter_profile_is_valid() {
        let catalog = builtin_catalog();
        let player = starter_player(&catalog);

        assert!(player.validate(&default_rules()).is_empty());
        assert_eq!(player.credits, 500);
        assert_eq!(player.roster.len(), 3);
        assert_eq!(player.battle_team.len(), 3);
        assert_eq!(player.inventory.blueprints.len(), 2);
        assert!(player
            .roster
            .iter()
            .all(|u| u.rarity == Rarity::Common && u.level == 1));
    }

    #[test]
    fn test_starter_blueprints_are_craftable() {
        let catalog = builtin_catalog();
        let mut player = starter_player(&catalog);
        let mut rng = SeededRandom::new(0);
        let rules = default_rules();

        for blueprint in player.inventory.blueprints.clone() {
            let outcome = apply_action(
                &player,
                &PlayerAction::Craft(blueprint),
                &catalog,
                &rules,
                &mut rng,
            )
            .unwrap();
            player = outcome.player;
        }

        assert_eq!(player.roster.len(), 5);
        assert!(player.inventory.blueprints.is_empty());
        assert!(player.validate(&rules).is_empty());
    }
}

// =============================================================================
// Battles and Rewards
// =============================================================================

mod battles {
    use super::*;

    fn fight(player: &Player, mode: BattleMode, seed: u64) -> PlayerAction {
        let catalog = builtin_catalog();
        let mut rng = SeededRandom::new(seed);
        let session = start_battle(player, mode, &catalog, &mut rng).unwrap();
        let (done, _) = play_out(session, &catalog, &mut rng, DEFAULT_TURN_LIMIT).unwrap();
        let report = done.finish().unwrap();
        PlayerAction::settle(mode, &report, 1_700_000_000_000 + seed)
    }

    #[test]
    fn test_settled_battle_pays_and_records() {
        let catalog = builtin_catalog();
        let rules = default_rules();
        let player = starter_player(&catalog);
        let mut rng = SeededRandom::new(0);

        let action = fight(&player, BattleMode::Pvp, 7);
        let outcome = apply_action(&player, &action, &catalog, &rules, &mut rng).unwrap();

        let ActionEffect::Settled(entry) = outcome.effect else {
            panic!("expected a settlement");
        };
        let expected = match entry.result {
            MatchResult::Victory => 550,
            MatchResult::Defeat => 510,
        };
        assert_eq!(outcome.player.credits, expected);
        assert_eq!(outcome.player.match_history[0], entry);
        assert_eq!(entry.opponent_name, "Rogue Bot MK-1");
        assert_eq!(entry.team_used, player.battle_team);
    }

    #[test]
    fn test_bounty_entry_then_win() {
        let catalog = builtin_catalog();
        let rules = default_rules();
        let player = starter_player(&catalog);
        let mut rng = SeededRandom::new(0);

        let paid = apply_action(&player, &PlayerAction::PayBountyEntry, &catalog, &rules, &mut rng)
            .unwrap()
            .player;
        assert_eq!(paid.credits, 450);

        let settle = PlayerAction::SettleBattle {
            mode: BattleMode::Bounty,
            result: MatchResult::Victory,
            opponent_name: "Rogue Bot MK-3".to_string(),
            team_used: paid.battle_team.clone(),
            timestamp: 5,
        };
        let won = apply_action(&paid, &settle, &catalog, &rules, &mut rng).unwrap().player;
        assert_eq!(won.credits, 450);
        assert_eq!(won.bounty_coins, 10);
        assert_eq!(won.daily_wins, 1);
    }

    #[test]
    fn test_unknown_story_chapter_is_rejected() {
        let catalog = builtin_catalog();
        let player = starter_player(&catalog);
        let mut rng = SeededRandom::new(0);

        let err = start_battle(&player, BattleMode::Story(99), &catalog, &mut rng).unwrap_err();
        assert!(matches!(err, GameError::InvalidSelection(_)));
    }
}

// =============================================================================
// Daily Chest
// =============================================================================

mod daily {
    use super::*;

    #[test]
    fn test_daily_chest_cycle() {
        let catalog = builtin_catalog();
        let rules = default_rules();
        let mut player = starter_player(&catalog);
        let mut rng = ScriptedRandom::constant(0.1);

        let locked = apply_action(
            &player,
            &PlayerAction::OpenChest(ChestKind::Daily),
            &catalog,
            &rules,
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(locked, GameError::PreconditionNotMet(_)));

        for _ in 0..5 {
            player = apply_action(&player, &PlayerAction::RecordDailyWin, &catalog, &rules, &mut rng)
                .unwrap()
                .player;
        }
        assert_eq!(player.daily_wins, 3);

        let opened = apply_action(
            &player,
            &PlayerAction::OpenChest(ChestKind::Daily),
            &catalog,
            &rules,
            &mut rng,
        )
        .unwrap();
        assert!(opened.player.daily_claimed);
        assert_eq!(opened.player.credits, player.credits);
        assert_eq!(opened.player.inventory.parts.common, 55);

        let again = apply_action(
            &opened.player,
            &PlayerAction::OpenChest(ChestKind::Daily),
            &catalog,
            &rules,
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(again, GameError::PreconditionNotMet(_)));

        let next_day = apply_action(
            &opened.player,
            &PlayerAction::StartNewDay,
            &catalog,
            &rules,
            &mut rng,
        )
        .unwrap()
        .player;
        assert_eq!(next_day.daily_wins, 0);
        assert!(!next_day.daily_claimed);
    }

    #[test]
    fn test_chest_blueprint_feeds_crafting() {
        let catalog = builtin_catalog();
        let rules = default_rules();
        let player = starter_player(&catalog);
        // Roll above the threshold, then pick the first template (a guild common).
        let mut rng = ScriptedRandom::new([0.95, 0.0]);

        let opened = apply_action(
            &player,
            &PlayerAction::OpenChest(ChestKind::Purchased),
            &catalog,
            &rules,
            &mut rng,
        )
        .unwrap();
        let ActionEffect::Loot(loot) = opened.effect else {
            panic!("expected loot");
        };
        let blueprint = loot.blueprint.unwrap();
        assert_eq!(blueprint, catalog.templates()[0].crafting.blueprint_id);
        assert_eq!(opened.player.credits, 400);

        let crafted = apply_action(
            &opened.player,
            &PlayerAction::Craft(blueprint),
            &catalog,
            &rules,
            &mut rng,
        )
        .unwrap();
        let ActionEffect::Crafted(unit) = crafted.effect else {
            panic!("expected a crafted unit");
        };
        assert_eq!(unit.template_id, catalog.templates()[0].id);
        assert_eq!(crafted.player.inventory.parts.common, 55 - 10);
    }
}

// =============================================================================
// Loot Rolls
// =============================================================================

mod loot_rolls {
    use super::*;
    use foundry_core::loot::roll_loot;

    #[test]
    fn test_roll_at_threshold_has_no_blueprint() {
        let catalog = builtin_catalog();
        let rules = default_rules();
        let mut rng = ScriptedRandom::new([rules.blueprint_roll_threshold]);

        let loot = roll_loot(&catalog, &rules, &mut rng);
        assert_eq!(loot.blueprint, None);
        assert_eq!(loot.common_parts, rules.chest_parts.common);
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn test_roll_just_above_threshold_grants_first_blueprint() {
        let catalog = builtin_catalog();
        let rules = default_rules();
        let mut rng = ScriptedRandom::new([0.700_000_1, 0.0]);

        let loot = roll_loot(&catalog, &rules, &mut rng);
        assert_eq!(
            loot.blueprint.as_ref(),
            Some(&catalog.templates()[0].crafting.blueprint_id)
        );
        assert_eq!(loot.blueprint.unwrap().as_str(), "bp-mech-0");
    }

    #[test]
    fn test_blueprint_pick_covers_every_template() {
        let catalog = builtin_catalog();
        let rules = default_rules();
        let templates = catalog.templates();
        let n = templates.len();

        for (index, template) in templates.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let pick = (index as f64 + 0.5) / n as f64;
            let mut rng = ScriptedRandom::new([0.99, pick]);

            let loot = roll_loot(&catalog, &rules, &mut rng);
            assert_eq!(loot.blueprint.as_ref(), Some(&template.crafting.blueprint_id));
        }

        let mut rng = ScriptedRandom::new([0.99, 0.999_999]);
        let loot = roll_loot(&catalog, &rules, &mut rng);
        assert_eq!(loot.blueprint.as_ref(), Some(&templates[n - 1].crafting.blueprint_id));
    }
}

// =============================================================================
// Failure Leaves State Untouched
// =============================================================================

mod failures {
    use super::*;

    #[test]
    fn test_failed_actions_are_recoverable() {
        let catalog = builtin_catalog();
        let rules = default_rules();
        let player = starter_player(&catalog);
        let before = player.clone();
        let mut rng = SeededRandom::new(0);

        let failing = [
            PlayerAction::SpendCredits(10_000),
            PlayerAction::Craft(catalog.templates()[1].crafting.blueprint_id.clone()),
            PlayerAction::OpenChest(ChestKind::Daily),
            PlayerAction::ToggleSquadMember("not-mine".into()),
        ];

        for action in &failing {
            let err = apply_action(&player, action, &catalog, &rules, &mut rng).unwrap_err();
            assert!(err.is_recoverable(), "{} failed with {err}", action.name());
        }
        assert_eq!(player, before);
    }
}

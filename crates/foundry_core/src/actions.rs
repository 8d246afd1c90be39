//! Named player actions.
//!
//! [`apply_action`] is the single entry point for changing a [`Player`]: it
//! takes the current snapshot and an action and returns the replacement
//! snapshot together with whatever the action produced. A failed action
//! returns an error and the caller keeps the old snapshot.

use serde::{Deserialize, Serialize};

use crate::battle::{BattleMode, BattleReport};
use crate::catalog::Catalog;
use crate::config::GameRules;
use crate::crafting::craft;
use crate::error::{GameError, Result};
use crate::ids::{BlueprintId, GuildId, MoveId, UnitId};
use crate::loot::{open_chest, ChestKind, LootResult};
use crate::player::{MatchHistoryEntry, MatchResult, Player, ProfileUpdate};
use crate::progression::add_experience;
use crate::rng::RandomSource;
use crate::unit::Unit;

/// Everything a player can do outside of a battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Grant credits.
    AddCredits(u64),
    /// Spend credits.
    SpendCredits(u64),
    /// Grant bounty coins.
    AddBountyCoins(u64),
    /// Pay the bounty battle entry fee.
    PayBountyEntry,
    /// Join a guild.
    JoinGuild(GuildId),
    /// Run one workshop training session on a unit.
    TrainUnit(UnitId),
    /// Craft the unit a blueprint describes.
    Craft(BlueprintId),
    /// Open a chest.
    OpenChest(ChestKind),
    /// Count a win towards the daily chest.
    RecordDailyWin,
    /// Prepend an entry to the match history.
    RecordMatch(MatchHistoryEntry),
    /// Add a unit to or remove it from the battle team.
    ToggleSquadMember(UnitId),
    /// Change profile fields.
    UpdateProfile(ProfileUpdate),
    /// Replace a unit's equipped moves.
    EquipMoves {
        /// Unit to change.
        unit: UnitId,
        /// New equipped set, a non-empty subset of the move pool.
        moves: Vec<MoveId>,
    },
    /// Pay out a finished battle and record it.
    SettleBattle {
        /// Mode the battle was fought in.
        mode: BattleMode,
        /// Outcome.
        result: MatchResult,
        /// Display name of the opposing team.
        opponent_name: String,
        /// Units that fought.
        team_used: Vec<UnitId>,
        /// Caller-supplied time, in milliseconds since the epoch.
        timestamp: u64,
    },
    /// Reset the daily win counter and daily chest.
    StartNewDay,
}

impl PlayerAction {
    /// Build the settlement action for a finished battle.
    #[must_use]
    pub fn settle(mode: BattleMode, report: &BattleReport, timestamp: u64) -> Self {
        Self::SettleBattle {
            mode,
            result: report.result,
            opponent_name: report.opponent_name().to_string(),
            team_used: report.team_used(),
            timestamp,
        }
    }

    /// Short action name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddCredits(_) => "add_credits",
            Self::SpendCredits(_) => "spend_credits",
            Self::AddBountyCoins(_) => "add_bounty_coins",
            Self::PayBountyEntry => "pay_bounty_entry",
            Self::JoinGuild(_) => "join_guild",
            Self::TrainUnit(_) => "train_unit",
            Self::Craft(_) => "craft",
            Self::OpenChest(_) => "open_chest",
            Self::RecordDailyWin => "record_daily_win",
            Self::RecordMatch(_) => "record_match",
            Self::ToggleSquadMember(_) => "toggle_squad_member",
            Self::UpdateProfile(_) => "update_profile",
            Self::EquipMoves { .. } => "equip_moves",
            Self::SettleBattle { .. } => "settle_battle",
            Self::StartNewDay => "start_new_day",
        }
    }
}

/// Side product of an action, beyond the new snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionEffect {
    /// Nothing beyond the snapshot.
    None,
    /// A unit was trained.
    Trained(Unit),
    /// A unit was crafted.
    Crafted(Unit),
    /// A chest was opened.
    Loot(LootResult),
    /// A battle was settled.
    Settled(MatchHistoryEntry),
}

/// Result of [`apply_action`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Replacement snapshot.
    pub player: Player,
    /// What the action produced.
    pub effect: ActionEffect,
}

impl ActionOutcome {
    fn state(player: Player) -> Self {
        Self {
            player,
            effect: ActionEffect::None,
        }
    }
}

/// Apply an action to a player snapshot.
///
/// # Errors
/// Returns the action's typed failure; the input snapshot stays valid.
pub fn apply_action(
    player: &Player,
    action: &PlayerAction,
    catalog: &Catalog,
    rules: &GameRules,
    rng: &mut dyn RandomSource,
) -> Result<ActionOutcome> {
    let outcome = match action {
        PlayerAction::AddCredits(amount) => ActionOutcome::state(player.add_credits(*amount)),
        PlayerAction::SpendCredits(amount) => ActionOutcome::state(player.spend_credits(*amount)?),
        PlayerAction::AddBountyCoins(amount) => {
            ActionOutcome::state(player.add_bounty_coins(*amount))
        }
        PlayerAction::PayBountyEntry => {
            ActionOutcome::state(player.spend_credits(rules.bounty_entry_fee)?)
        }
        PlayerAction::JoinGuild(guild_id) => {
            if catalog.guild(guild_id).is_none() {
                return Err(GameError::UnknownGuild(guild_id.to_string()));
            }
            ActionOutcome::state(Player {
                guild: Some(guild_id.clone()),
                ..player.clone()
            })
        }
        PlayerAction::TrainUnit(unit_id) => {
            let unit = add_experience(player.require_unit(unit_id)?, rules.training_xp, rules);
            ActionOutcome {
                player: player.with_unit(unit.clone())?,
                effect: ActionEffect::Trained(unit),
            }
        }
        PlayerAction::Craft(blueprint) => {
            let result = craft(player, blueprint, catalog)?;
            ActionOutcome {
                player: result.player,
                effect: ActionEffect::Crafted(result.unit),
            }
        }
        PlayerAction::OpenChest(kind) => {
            let chest = open_chest(player, *kind, catalog, rules, rng)?;
            ActionOutcome {
                player: chest.player,
                effect: ActionEffect::Loot(chest.loot),
            }
        }
        PlayerAction::RecordDailyWin => ActionOutcome::state(player.record_daily_win(rules)),
        PlayerAction::RecordMatch(entry) => {
            ActionOutcome::state(player.record_match(entry.clone(), rules))
        }
        PlayerAction::ToggleSquadMember(unit_id) => {
            ActionOutcome::state(player.toggle_squad_member(unit_id, rules)?)
        }
        PlayerAction::UpdateProfile(update) => ActionOutcome::state(player.update_profile(update)),
        PlayerAction::EquipMoves { unit, moves } => {
            let unit = player.require_unit(unit)?.with_equipped_moves(moves.clone())?;
            ActionOutcome::state(player.with_unit(unit)?)
        }
        PlayerAction::SettleBattle {
            mode,
            result,
            opponent_name,
            team_used,
            timestamp,
        } => settle_battle(
            player,
            *mode,
            *result,
            opponent_name,
            team_used,
            *timestamp,
            rules,
        ),
        PlayerAction::StartNewDay => ActionOutcome::state(Player {
            daily_wins: 0,
            daily_claimed: false,
            ..player.clone()
        }),
    };

    tracing::debug!(
        player = %player.id,
        action = action.name(),
        credits = outcome.player.credits,
        "Applied player action"
    );
    Ok(outcome)
}

fn settle_battle(
    player: &Player,
    mode: BattleMode,
    result: MatchResult,
    opponent_name: &str,
    team_used: &[UnitId],
    timestamp: u64,
    rules: &GameRules,
) -> ActionOutcome {
    let rewards = mode.rewards(result, rules);

    let mut next = player.add_credits(rewards.credits);
    if let Some(bounty) = rewards.bounty {
        next = next.add_bounty_coins(bounty);
    }
    if result == MatchResult::Victory {
        next = next.record_daily_win(rules);
    }

    let entry = MatchHistoryEntry {
        id: format!("match-{timestamp}"),
        opponent_name: opponent_name.to_string(),
        result,
        timestamp,
        rewards,
        team_used: team_used.to_vec(),
    };
    next = next.record_match(entry.clone(), rules);

    tracing::info!(%mode, ?result, credits = rewards.credits, "Battle settled");
    ActionOutcome {
        player: next,
        effect: ActionEffect::Settled(entry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRandom;

    struct Fixture {
        catalog: Catalog,
        rules: GameRules,
        rng: SeededRandom,
        player: Player,
    }

    impl Fixture {
        fn new() -> Self {
            let catalog = Catalog::builtin().unwrap();
            let player = Player::starter("p1", "Mechanic", &catalog).unwrap();
            Self {
                catalog,
                rules: GameRules::default(),
                rng: SeededRandom::new(1),
                player,
            }
        }

        fn apply(&mut self, action: PlayerAction) -> Result<ActionOutcome> {
            apply_action(&self.player, &action, &self.catalog, &self.rules, &mut self.rng)
        }
    }

    fn settle(mode: BattleMode, result: MatchResult) -> PlayerAction {
        PlayerAction::SettleBattle {
            mode,
            result,
            opponent_name: "Rogue Bot MK-1".to_string(),
            team_used: Vec::new(),
            timestamp: 1_000,
        }
    }

    #[test]
    fn test_settle_victory() {
        let mut fx = Fixture::new();
        let outcome = fx.apply(settle(BattleMode::Pvp, MatchResult::Victory)).unwrap();
        assert_eq!(outcome.player.credits, 550);
        assert_eq!(outcome.player.daily_wins, 1);
        assert_eq!(outcome.player.match_history.len(), 1);
        assert_eq!(outcome.player.match_history[0].id, "match-1000");
    }

    #[test]
    fn test_settle_bounty_and_defeat() {
        let mut fx = Fixture::new();
        let won = fx.apply(settle(BattleMode::Bounty, MatchResult::Victory)).unwrap();
        assert_eq!(won.player.bounty_coins, 10);
        assert_eq!(won.player.credits, 500);

        let lost = fx.apply(settle(BattleMode::Story(1), MatchResult::Defeat)).unwrap();
        assert_eq!(lost.player.credits, 510);
        assert_eq!(lost.player.daily_wins, 0);
    }

    #[test]
    fn test_bounty_entry_fee() {
        let mut fx = Fixture::new();
        assert_eq!(fx.apply(PlayerAction::PayBountyEntry).unwrap().player.credits, 450);

        fx.player.credits = 49;
        assert!(matches!(
            fx.apply(PlayerAction::PayBountyEntry),
            Err(GameError::InsufficientResources { .. })
        ));
    }

    #[test]
    fn test_train_unit() {
        let mut fx = Fixture::new();
        let id = fx.player.battle_team[0].clone();
        let before = fx.player.require_unit(&id).unwrap().clone();

        let outcome = fx.apply(PlayerAction::TrainUnit(id.clone())).unwrap();
        let after = outcome.player.require_unit(&id).unwrap();
        assert_eq!(after.xp, 50);
        assert_eq!(after.stats.attack, before.stats.attack * 105 / 100);
        assert!(matches!(outcome.effect, ActionEffect::Trained(_)));

        assert!(matches!(
            fx.apply(PlayerAction::TrainUnit(UnitId::new("ghost"))),
            Err(GameError::UnknownUnit(_))
        ));
    }

    #[test]
    fn test_join_guild() {
        let mut fx = Fixture::new();
        let outcome = fx.apply(PlayerAction::JoinGuild(GuildId::new("pyro-forge"))).unwrap();
        assert_eq!(outcome.player.guild, Some(GuildId::new("pyro-forge")));
        assert!(fx.apply(PlayerAction::JoinGuild(GuildId::new("nobody"))).is_err());
    }

    #[test]
    fn test_equip_moves() {
        let mut fx = Fixture::new();
        let id = fx.player.roster[0].id.clone();
        let first = fx.player.roster[0].move_pool[0].clone();

        let outcome = fx
            .apply(PlayerAction::EquipMoves {
                unit: id.clone(),
                moves: vec![first.clone()],
            })
            .unwrap();
        assert_eq!(outcome.player.require_unit(&id).unwrap().equipped_moves, vec![first]);

        assert!(fx
            .apply(PlayerAction::EquipMoves { unit: id, moves: Vec::new() })
            .is_err());
    }

    #[test]
    fn test_new_day_resets_daily_chest() {
        let mut fx = Fixture::new();
        fx.player.daily_wins = 3;
        fx.player.daily_claimed = true;
        let outcome = fx.apply(PlayerAction::StartNewDay).unwrap();
        assert_eq!(outcome.player.daily_wins, 0);
        assert!(!outcome.player.daily_claimed);
    }

    #[test]
    fn test_failed_action_keeps_snapshot() {
        let mut fx = Fixture::new();
        let before = fx.player.clone();
        assert!(fx.apply(PlayerAction::OpenChest(ChestKind::Daily)).is_err());
        assert_eq!(fx.player, before);
    }
}

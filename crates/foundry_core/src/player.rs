//! The player aggregate.
//!
//! [`Player`] is the only piece of mutable game state. Every operation here
//! takes the current snapshot by reference and returns a complete
//! replacement, leaving the input untouched on failure.

use serde::{Deserialize, Serialize};

pub use crate::catalog::PartCounts;

use crate::catalog::{Catalog, Rarity};
use crate::config::GameRules;
use crate::error::{GameError, Result};
use crate::ids::{BlueprintId, GuildId, PlayerId, TemplateId, UnitId};
use crate::unit::Unit;

/// Credits a new profile starts with.
pub const STARTING_CREDITS: u64 = 500;

/// Parts a new profile starts with.
pub const STARTING_PARTS: PartCounts = PartCounts::new(50, 20, 5);

/// Library positions of the templates whose blueprints a new profile owns.
pub const STARTING_BLUEPRINT_INDICES: [usize; 2] = [5, 55];

/// Number of neutral common templates in the starting roster.
pub const STARTING_ROSTER_SIZE: usize = 3;

/// Parts and blueprints owned by a player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// Part counts by tier.
    pub parts: PartCounts,
    /// Owned blueprints. Chests may add duplicates; crafting removes them all.
    pub blueprints: Vec<BlueprintId>,
}

impl Inventory {
    /// Whether at least one copy of a blueprint is owned.
    #[must_use]
    pub fn has_blueprint(&self, blueprint: &BlueprintId) -> bool {
        self.blueprints.contains(blueprint)
    }

    /// Remove every copy of a blueprint. Returns `false` if none was owned.
    pub fn remove_blueprint(&mut self, blueprint: &BlueprintId) -> bool {
        let before = self.blueprints.len();
        self.blueprints.retain(|b| b != blueprint);
        self.blueprints.len() != before
    }
}

/// Outcome of a finished battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchResult {
    /// The opponent's team was wiped out.
    Victory,
    /// The player's team was wiped out.
    Defeat,
}

/// Rewards paid out for a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewards {
    /// Credits granted.
    pub credits: u64,
    /// Bounty coins granted, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounty: Option<u64>,
}

/// One line of match history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchHistoryEntry {
    /// Entry identifier.
    pub id: String,
    /// Display name of the opposing team.
    pub opponent_name: String,
    /// Match outcome.
    pub result: MatchResult,
    /// Caller-supplied time of the match, in milliseconds since the epoch.
    pub timestamp: u64,
    /// Rewards paid out.
    pub rewards: Rewards,
    /// Ids of the units that fought.
    pub team_used: Vec<UnitId>,
}

/// Editable profile fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// New display name.
    #[serde(default)]
    pub username: Option<String>,
    /// New avatar seed.
    #[serde(default)]
    pub avatar_seed: Option<String>,
    /// New wallet address.
    #[serde(default)]
    pub wallet_address: Option<String>,
}

/// Complete player snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Player identifier.
    pub id: PlayerId,
    /// Display name.
    pub username: String,
    /// Seed for the avatar picture.
    pub avatar_seed: String,
    /// Soft currency.
    pub credits: u64,
    /// Currency earned in bounty battles.
    pub bounty_coins: u64,
    /// Guild affiliation.
    #[serde(default)]
    pub guild: Option<GuildId>,
    /// Linked wallet address.
    #[serde(default)]
    pub wallet_address: Option<String>,
    /// Parts and blueprints.
    pub inventory: Inventory,
    /// Owned units.
    pub roster: Vec<Unit>,
    /// Ordered battle team, 1 to `max_team_size` roster ids.
    pub battle_team: Vec<UnitId>,
    /// Wins today, capped by the rules.
    pub daily_wins: u8,
    /// Whether today's daily chest was opened.
    pub daily_claimed: bool,
    /// Most recent match first.
    pub match_history: Vec<MatchHistoryEntry>,
    /// Counter used to mint unit ids.
    #[serde(default)]
    pub unit_serial: u64,
}

impl Player {
    /// Build the starting profile for a new player.
    ///
    /// # Errors
    /// Returns [`GameError::UnknownTemplate`] if the catalog is too small to
    /// provide the starting blueprints or roster.
    pub fn starter(
        id: impl Into<String>,
        username: impl Into<String>,
        catalog: &Catalog,
    ) -> Result<Self> {
        let id = PlayerId::new(id);
        let templates = catalog.templates();

        let blueprints = STARTING_BLUEPRINT_INDICES
            .iter()
            .map(|&index| {
                templates
                    .get(index)
                    .map(|t| t.crafting.blueprint_id.clone())
                    .ok_or_else(|| GameError::UnknownTemplate(format!("library index {index}")))
            })
            .collect::<Result<Vec<_>>>()?;

        let roster: Vec<Unit> = catalog
            .templates()
            .iter()
            .filter(|t| t.is_neutral() && t.rarity == Rarity::Common)
            .take(STARTING_ROSTER_SIZE)
            .map(|t| Unit::from_template(t, UnitId::new(format!("{}-starter", t.id))))
            .collect();
        if roster.len() < STARTING_ROSTER_SIZE {
            return Err(GameError::UnknownTemplate(format!(
                "need {STARTING_ROSTER_SIZE} neutral common templates, found {}",
                roster.len()
            )));
        }

        Ok(Self {
            avatar_seed: id.to_string(),
            id,
            username: username.into(),
            credits: STARTING_CREDITS,
            bounty_coins: 0,
            guild: None,
            wallet_address: None,
            inventory: Inventory {
                parts: STARTING_PARTS,
                blueprints,
            },
            battle_team: roster.iter().map(|u| u.id.clone()).collect(),
            roster,
            daily_wins: 0,
            daily_claimed: false,
            match_history: Vec::new(),
            unit_serial: 0,
        })
    }

    /// Look up an owned unit.
    #[must_use]
    pub fn unit(&self, id: &UnitId) -> Option<&Unit> {
        self.roster.iter().find(|u| u.id == *id)
    }

    /// Look up an owned unit, failing with [`GameError::UnknownUnit`].
    pub fn require_unit(&self, id: &UnitId) -> Result<&Unit> {
        self.unit(id)
            .ok_or_else(|| GameError::UnknownUnit(id.to_string()))
    }

    /// Battle team units in team order.
    #[must_use]
    pub fn team_units(&self) -> Vec<&Unit> {
        self.battle_team
            .iter()
            .filter_map(|id| self.unit(id))
            .collect()
    }

    /// Copy with one roster unit swapped for an updated version.
    ///
    /// # Errors
    /// Returns [`GameError::UnknownUnit`] if no unit has the same id.
    pub fn with_unit(&self, unit: Unit) -> Result<Self> {
        let mut next = self.clone();
        let slot = next
            .roster
            .iter_mut()
            .find(|u| u.id == unit.id)
            .ok_or_else(|| GameError::UnknownUnit(unit.id.to_string()))?;
        *slot = unit;
        Ok(next)
    }

    /// Mint a unit id for a new instance of `template`, unique in the roster.
    pub fn mint_unit_id(&mut self, template: &TemplateId) -> UnitId {
        loop {
            self.unit_serial += 1;
            let id = UnitId::new(format!("{}-{}", template, self.unit_serial));
            if self.unit(&id).is_none() {
                return id;
            }
        }
    }

    /// Copy with credits added.
    #[must_use]
    pub fn add_credits(&self, amount: u64) -> Self {
        Self {
            credits: self.credits.saturating_add(amount),
            ..self.clone()
        }
    }

    /// Copy with credits spent.
    ///
    /// # Errors
    /// Returns [`GameError::InsufficientResources`] if the balance is too low.
    pub fn spend_credits(&self, amount: u64) -> Result<Self> {
        let credits = self
            .credits
            .checked_sub(amount)
            .ok_or_else(|| GameError::insufficient("credits", amount, self.credits))?;
        Ok(Self {
            credits,
            ..self.clone()
        })
    }

    /// Copy with bounty coins added.
    #[must_use]
    pub fn add_bounty_coins(&self, amount: u64) -> Self {
        Self {
            bounty_coins: self.bounty_coins.saturating_add(amount),
            ..self.clone()
        }
    }

    /// Copy with one more daily win, capped at the daily requirement.
    #[must_use]
    pub fn record_daily_win(&self, rules: &GameRules) -> Self {
        Self {
            daily_wins: self
                .daily_wins
                .saturating_add(1)
                .min(rules.daily_wins_required),
            ..self.clone()
        }
    }

    /// Whether the daily chest can be opened.
    #[must_use]
    pub fn daily_chest_ready(&self, rules: &GameRules) -> bool {
        self.daily_wins >= rules.daily_wins_required && !self.daily_claimed
    }

    /// Copy with a match prepended to history, oldest entries dropped past the cap.
    #[must_use]
    pub fn record_match(&self, entry: MatchHistoryEntry, rules: &GameRules) -> Self {
        let mut history = Vec::with_capacity(rules.match_history_cap);
        history.push(entry);
        history.extend(self.match_history.iter().cloned());
        history.truncate(rules.match_history_cap);
        Self {
            match_history: history,
            ..self.clone()
        }
    }

    /// Copy with a unit added to or removed from the battle team.
    ///
    /// Adding to a full team evicts the earliest member. Removing the last
    /// member is ignored so the team never becomes empty.
    ///
    /// # Errors
    /// Returns [`GameError::InvalidSelection`] if the unit is not in the roster.
    pub fn toggle_squad_member(&self, unit_id: &UnitId, rules: &GameRules) -> Result<Self> {
        if self.unit(unit_id).is_none() {
            return Err(GameError::InvalidSelection(format!(
                "unit '{unit_id}' is not in the roster"
            )));
        }

        let mut team = self.battle_team.clone();
        if team.contains(unit_id) {
            if team.len() > 1 {
                team.retain(|id| id != unit_id);
            }
        } else {
            if team.len() >= rules.max_team_size.max(1) {
                team.remove(0);
            }
            team.push(unit_id.clone());
        }

        Ok(Self {
            battle_team: team,
            ..self.clone()
        })
    }

    /// Copy with profile fields updated.
    #[must_use]
    pub fn update_profile(&self, update: &ProfileUpdate) -> Self {
        let mut next = self.clone();
        if let Some(username) = &update.username {
            next.username.clone_from(username);
        }
        if let Some(seed) = &update.avatar_seed {
            next.avatar_seed.clone_from(seed);
        }
        if let Some(wallet) = &update.wallet_address {
            next.wallet_address = Some(wallet.clone());
        }
        next
    }

    /// Check the aggregate's invariants. Returns a list of violations.
    #[must_use]
    pub fn validate(&self, rules: &GameRules) -> Vec<String> {
        let mut errors = Vec::new();

        if self.battle_team.is_empty() || self.battle_team.len() > rules.max_team_size {
            errors.push(format!(
                "battle team has {} members, expected 1 to {}",
                self.battle_team.len(),
                rules.max_team_size
            ));
        }
        for (i, id) in self.battle_team.iter().enumerate() {
            if self.unit(id).is_none() {
                errors.push(format!("battle team member '{id}' is not in the roster"));
            }
            if self.battle_team[..i].contains(id) {
                errors.push(format!("battle team member '{id}' is listed twice"));
            }
        }
        for (i, unit) in self.roster.iter().enumerate() {
            if self.roster[..i].iter().any(|u| u.id == unit.id) {
                errors.push(format!("duplicate unit id '{}'", unit.id));
            }
            if !unit.stats.is_consistent() {
                errors.push(format!("unit '{}' has stats above their maximum", unit.id));
            }
            if unit.level == 0 {
                errors.push(format!("unit '{}' has level 0", unit.id));
            }
        }
        if self.daily_wins > rules.daily_wins_required {
            errors.push(format!("daily wins {} above cap", self.daily_wins));
        }
        if self.match_history.len() > rules.match_history_cap {
            errors.push(format!(
                "match history has {} entries, cap is {}",
                self.match_history.len(),
                rules.match_history_cap
            ));
        }

        errors
    }
}

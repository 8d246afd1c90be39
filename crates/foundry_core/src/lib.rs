//! # Foundry Core
//!
//! Game core for Scrap Foundry, a collectible combat game about building and
//! battling machines.
//!
//! This crate contains **only** game logic:
//! - No rendering
//! - No IO beyond reading and writing replay files on request
//! - No ambient randomness (every roll goes through an injected [`rng::RandomSource`])
//! - No global state (every operation maps a snapshot to a new snapshot)
//!
//! This separation enables:
//! - Seeded, reproducible battles and replays
//! - Headless simulation for balance testing
//! - Persistence handled entirely outside the core
//!
//! ## Crate Structure
//!
//! - [`catalog`] - Moves, unit templates, guilds and story chapters
//! - [`unit`] - Unit instances
//! - [`combat`] - Single move resolution
//! - [`battle`] - The battle state machine
//! - [`progression`] - Experience and leveling
//! - [`crafting`] / [`loot`] - Resource exchanges
//! - [`player`] / [`actions`] - The player aggregate and its reducer
//! - [`replay`] - Battle recording and verification

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod actions;
pub mod battle;
pub mod catalog;
pub mod combat;
pub mod config;
pub mod crafting;
pub mod error;
pub mod ids;
pub mod loot;
pub mod player;
pub mod progression;
pub mod replay;
pub mod rng;
pub mod unit;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::actions::{apply_action, ActionEffect, ActionOutcome, PlayerAction};
    pub use crate::battle::{
        play_out, start_battle, BattleCommand, BattleMode, BattlePhase, BattleReport,
        BattleSession,
    };
    pub use crate::catalog::{
        Catalog, CatalogData, ElementType, Guild, Move, PartCounts, Rarity, StoryChapter,
        UnitTemplate,
    };
    pub use crate::combat::{apply_move, CombatEvent, MoveOutcome};
    pub use crate::config::GameRules;
    pub use crate::crafting::{craft, CraftResult};
    pub use crate::error::{GameError, Result};
    pub use crate::ids::{BlueprintId, GuildId, MoveId, PlayerId, TemplateId, UnitId};
    pub use crate::loot::{open_chest, ChestKind, LootResult};
    pub use crate::player::{
        Inventory, MatchHistoryEntry, MatchResult, Player, ProfileUpdate, Rewards,
    };
    pub use crate::progression::{add_experience, xp_threshold};
    pub use crate::replay::BattleReplay;
    pub use crate::rng::{RandomSource, SeededRandom};
    pub use crate::unit::{Unit, UnitStats};
}

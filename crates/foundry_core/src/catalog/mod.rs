//! Static lookup tables: moves, unit templates, guilds and story chapters.
//!
//! Moves, guilds and chapters are authored data deserialized from RON. Unit
//! templates are rolled from a seed by [`generator::generate_templates`].
//! The catalog is read-only once built.
//!
//! **Note:** This module contains no IO. The built-in data is compiled in;
//! other files are read by the caller and handed over as text.

mod generator;
mod guild_data;
mod move_data;
mod template_data;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use generator::generate_templates;
pub use guild_data::{Guild, StoryChapter};
pub use move_data::{ElementType, Move, StatType};
pub use template_data::{BaseStats, CraftingRequirements, PartCounts, Rarity, UnitTemplate};

use crate::error::{GameError, Result};
use crate::ids::{BlueprintId, GuildId, MoveId, TemplateId};
use crate::rng::SeededRandom;

/// Built-in move, guild and chapter data.
const BUILTIN_DATA: &str = include_str!("../../data/catalog.ron");

/// Default seed used to roll the built-in template library.
pub const DEFAULT_CATALOG_SEED: u64 = 0x5C2A_F0D2;

/// Authored catalog data as it appears in a RON file.
///
/// # Example RON
///
/// ```ron
/// CatalogData(
///     moves: [...],
///     guilds: [...],
///     chapters: [...],
/// )
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogData {
    /// Move table.
    pub moves: Vec<Move>,
    /// Guild list.
    pub guilds: Vec<Guild>,
    /// Story chapters.
    #[serde(default)]
    pub chapters: Vec<StoryChapter>,
}

impl CatalogData {
    /// Parse catalog data from RON.
    ///
    /// # Errors
    /// Returns [`GameError::DataParseError`] if the text is not valid RON.
    pub fn from_ron_str(source_name: &str, text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| GameError::DataParseError {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })
    }

    /// The data compiled into the crate.
    ///
    /// # Errors
    /// Returns an error only if the bundled file is malformed.
    pub fn builtin() -> Result<Self> {
        Self::from_ron_str("catalog.ron", BUILTIN_DATA)
    }
}

/// Read-only catalog snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    moves: BTreeMap<MoveId, Move>,
    templates: Vec<UnitTemplate>,
    guilds: Vec<Guild>,
    chapters: Vec<StoryChapter>,
}

impl Catalog {
    /// Build a catalog, rolling the template library from `seed`.
    #[must_use]
    pub fn generate(data: CatalogData, seed: u64) -> Self {
        let mut rng = SeededRandom::new(seed);
        let templates = generate_templates(&data.moves, &data.guilds, &mut rng);
        Self::with_templates(data, templates)
    }

    /// Build a catalog around an explicit template list.
    #[must_use]
    pub fn with_templates(data: CatalogData, templates: Vec<UnitTemplate>) -> Self {
        let moves = data
            .moves
            .into_iter()
            .map(|m| (m.id.clone(), m))
            .collect();
        Self {
            moves,
            templates,
            guilds: data.guilds,
            chapters: data.chapters,
        }
    }

    /// The built-in catalog rolled with [`DEFAULT_CATALOG_SEED`].
    ///
    /// # Errors
    /// Returns an error only if the bundled data is malformed.
    pub fn builtin() -> Result<Self> {
        Ok(Self::generate(CatalogData::builtin()?, DEFAULT_CATALOG_SEED))
    }

    /// Look up a move.
    #[must_use]
    pub fn get_move(&self, id: &MoveId) -> Option<&Move> {
        self.moves.get(id)
    }

    /// Look up a move, failing with [`GameError::UnknownMove`].
    pub fn require_move(&self, id: &MoveId) -> Result<&Move> {
        self.get_move(id)
            .ok_or_else(|| GameError::UnknownMove(id.to_string()))
    }

    /// All moves, ordered by id.
    pub fn moves(&self) -> impl Iterator<Item = &Move> {
        self.moves.values()
    }

    /// Look up a template.
    #[must_use]
    pub fn template(&self, id: &TemplateId) -> Option<&UnitTemplate> {
        self.templates.iter().find(|t| t.id == *id)
    }

    /// Find the template crafted from a blueprint.
    #[must_use]
    pub fn template_for_blueprint(&self, blueprint: &BlueprintId) -> Option<&UnitTemplate> {
        self.templates
            .iter()
            .find(|t| t.crafting.blueprint_id == *blueprint)
    }

    /// All templates in library order.
    #[must_use]
    pub fn templates(&self) -> &[UnitTemplate] {
        &self.templates
    }

    /// Templates of a given rarity.
    pub fn templates_of_rarity(&self, rarity: Rarity) -> impl Iterator<Item = &UnitTemplate> {
        self.templates.iter().filter(move |t| t.rarity == rarity)
    }

    /// Look up a guild.
    #[must_use]
    pub fn guild(&self, id: &GuildId) -> Option<&Guild> {
        self.guilds.iter().find(|g| g.id == *id)
    }

    /// All guilds.
    #[must_use]
    pub fn guilds(&self) -> &[Guild] {
        &self.guilds
    }

    /// Look up a story chapter by number.
    #[must_use]
    pub fn chapter(&self, id: u32) -> Option<&StoryChapter> {
        self.chapters.iter().find(|c| c.id == id)
    }

    /// All story chapters.
    #[must_use]
    pub fn chapters(&self) -> &[StoryChapter] {
        &self.chapters
    }

    /// Validate internal consistency.
    ///
    /// Checks for:
    /// - Template move pools referencing unknown moves
    /// - Templates referencing unknown guilds
    /// - Duplicate template or blueprint ids
    /// - Buff moves without an amount
    ///
    /// Returns a list of validation errors.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for mv in self.moves.values() {
            if mv.is_buff && mv.buff_amount.is_none() {
                errors.push(format!("Buff move '{}' has no buff amount", mv.id));
            }
            if !mv.is_buff && mv.damage_percent == 0 {
                errors.push(format!("Damage move '{}' has zero multiplier", mv.id));
            }
        }

        let mut seen_templates = std::collections::BTreeSet::new();
        let mut seen_blueprints = std::collections::BTreeSet::new();
        for template in &self.templates {
            if !seen_templates.insert(&template.id) {
                errors.push(format!("Duplicate template id '{}'", template.id));
            }
            if !seen_blueprints.insert(&template.crafting.blueprint_id) {
                errors.push(format!(
                    "Duplicate blueprint id '{}'",
                    template.crafting.blueprint_id
                ));
            }
            for move_id in &template.move_pool {
                if self.get_move(move_id).is_none() {
                    errors.push(format!(
                        "Template '{}' uses unknown move '{}'",
                        template.id, move_id
                    ));
                }
            }
            if template.move_pool.is_empty() {
                errors.push(format!("Template '{}' has an empty move pool", template.id));
            }
            if let Some(guild_id) = &template.guild {
                if self.guild(guild_id).is_none() {
                    errors.push(format!(
                        "Template '{}' belongs to unknown guild '{}'",
                        template.id, guild_id
                    ));
                }
            }
        }

        errors
    }
}

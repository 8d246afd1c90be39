//! Guild (tribe) and story chapter data.

use serde::{Deserialize, Serialize};

use super::move_data::ElementType;
use crate::ids::GuildId;

/// A faction affiliation. Cosmetic in the core: the perk is display text only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    /// Guild identifier.
    pub id: GuildId,
    /// Display name.
    pub name: String,
    /// Flavour text.
    #[serde(default)]
    pub description: String,
    /// Perk description.
    #[serde(default)]
    pub perk: String,
    /// Element every guild-affiliated template is built around.
    pub element: ElementType,
}

/// A story campaign chapter. Its number doubles as the battle difficulty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryChapter {
    /// Chapter number, starting at 1.
    pub id: u32,
    /// Chapter title.
    pub title: String,
    /// Chapter synopsis.
    #[serde(default)]
    pub description: String,
}

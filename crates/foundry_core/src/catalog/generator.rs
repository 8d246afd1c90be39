//! Procedural unit template generation.
//!
//! The template library is not hand-authored: it is rolled from a seed using
//! the move table and guild list. The same seed and data always produce the
//! same library, so a seed is all a save file needs to pin the catalog.

use super::guild_data::Guild;
use super::move_data::{ElementType, Move};
use super::template_data::{BaseStats, CraftingRequirements, Rarity, UnitTemplate};
use crate::ids::{BlueprintId, GuildId, MoveId, TemplateId};
use crate::rng::{shuffle, RandomSource};

const LEGENDARY_NAMES: &[&str] = &[
    "Aethelgard", "Voltax", "Ignis", "Cryon", "Xenon", "Titanus", "Omegus", "Zeke", "Valkyrie",
    "Ragnarok", "Kronos", "Atlas", "Hyperion", "Helios",
];
const LEGENDARY_TITLES: &[&str] = &[
    "The World Burner", "The Star Eater", "Lord of the Void", "The Unbroken",
    "Architect of Ruin", "The Silent King", "Keeper of Time", "The Stormbringer",
    "The Iron Sovereign", "Queen of Blades",
];
const RARE_ADJECTIVES: &[&str] = &[
    "Vengeful", "Gilded", "Ancient", "Savage", "Divine", "Cursed", "Radiant", "Shadow", "Crimson",
    "Azure", "Ethereal", "Hallowed",
];
const RARE_NOUNS: &[&str] = &[
    "Vindicator", "Reaper", "Arbiter", "Paladin", "Specter", "Warlord", "Oracle", "Sentinel",
    "Guardian", "Destroyer", "Leviathan",
];
const COMMON_PREFIXES: &[&str] = &[
    "Scrap", "Gear", "Cog", "Steam", "Rust", "Bolt", "Wire", "Junk", "Flux", "Core",
];
const COMMON_SUFFIXES: &[&str] = &[
    "Walker", "Bot", "Drone", "Lifter", "Hauler", "Strider", "Mender", "Guard", "Loader", "Rig",
];

/// How many templates of each rarity are rolled per guild.
const PER_GUILD: [(Rarity, usize); 4] = [
    (Rarity::Common, 3),
    (Rarity::Uncommon, 3),
    (Rarity::Rare, 3),
    (Rarity::Legendary, 1),
];

/// How many neutral templates of each rarity are rolled.
const NEUTRAL: [(Rarity, usize); 4] = [
    (Rarity::Common, 15),
    (Rarity::Uncommon, 15),
    (Rarity::Rare, 15),
    (Rarity::Legendary, 5),
];

/// Roll the full template library.
///
/// Guild templates come first (guild order, rarity ascending), then neutral
/// ones. Ids are `mech-<n>` in generation order.
pub fn generate_templates(
    moves: &[Move],
    guilds: &[Guild],
    rng: &mut dyn RandomSource,
) -> Vec<UnitTemplate> {
    let mut templates = Vec::new();
    let mut next = 0usize;

    for guild in guilds {
        for (rarity, count) in PER_GUILD {
            for _ in 0..count {
                templates.push(roll_template(next, Some(guild), rarity, moves, rng));
                next += 1;
            }
        }
    }

    for (rarity, count) in NEUTRAL {
        for _ in 0..count {
            templates.push(roll_template(next, None, rarity, moves, rng));
            next += 1;
        }
    }

    tracing::debug!(count = templates.len(), "Generated unit templates");
    templates
}

fn roll_template(
    index: usize,
    guild: Option<&Guild>,
    rarity: Rarity,
    moves: &[Move],
    rng: &mut dyn RandomSource,
) -> UnitTemplate {
    let element = match guild {
        Some(guild) => guild.element,
        None => ElementType::ALL[rng.pick_index(ElementType::ALL.len())],
    };

    let base_stats = roll_stats(rarity, rng);
    let name = roll_name(rarity, rng);
    let move_pool = roll_move_pool(element, rarity, moves, rng);
    let id = format!("mech-{index}");

    UnitTemplate {
        crafting: CraftingRequirements {
            blueprint_id: BlueprintId::new(format!("bp-{id}")),
            parts: rarity.crafting_cost(),
        },
        id: TemplateId::new(id),
        name,
        description: format!("A {} class construct.", rarity.to_string().to_lowercase()),
        guild: guild.map(|g| GuildId::clone(&g.id)),
        rarity,
        element,
        base_stats,
        move_pool,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn roll_stats(rarity: Rarity, rng: &mut dyn RandomSource) -> BaseStats {
    let multiplier = f64::from(rarity.stat_percent()) / 100.0;
    let mut roll = |min: f64, spread: f64| ((min + rng.next_float() * spread) * multiplier).floor() as u32;

    BaseStats {
        max_health: roll(80.0, 40.0),
        max_shield: roll(30.0, 30.0),
        shield_regen: roll(5.0, 5.0),
        attack: roll(15.0, 10.0),
        speed: roll(8.0, 12.0),
    }
}

fn roll_name(rarity: Rarity, rng: &mut dyn RandomSource) -> String {
    let mut pick = |words: &[&'static str]| words[rng.pick_index(words.len())];

    match rarity {
        Rarity::Legendary => {
            let name = pick(LEGENDARY_NAMES);
            let title = pick(LEGENDARY_TITLES);
            format!("{name}, {title}")
        }
        Rarity::Rare => {
            let adjective = pick(RARE_ADJECTIVES);
            let noun = pick(RARE_NOUNS);
            format!("{adjective} {noun}")
        }
        Rarity::Common | Rarity::Uncommon => {
            let prefix = pick(COMMON_PREFIXES);
            let suffix = pick(COMMON_SUFFIXES);
            format!("{prefix} {suffix}")
        }
    }
}

/// Element moves plus kinetic moves, shuffled and cut to the rarity's pool size.
fn roll_move_pool(
    element: ElementType,
    rarity: Rarity,
    moves: &[Move],
    rng: &mut dyn RandomSource,
) -> Vec<MoveId> {
    let mut pool: Vec<MoveId> = moves
        .iter()
        .filter(|m| m.element == element)
        .chain(moves.iter().filter(|m| m.element == ElementType::Kinetic && element != ElementType::Kinetic))
        .map(|m| m.id.clone())
        .collect();

    shuffle(&mut pool, rng);
    pool.truncate(rarity.move_pool_size());
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::move_data::StatType;
    use crate::rng::SeededRandom;

    fn sample_moves() -> Vec<Move> {
        let mut moves = Vec::new();
        for i in 0..8 {
            moves.push(Move::attack(format!("k{i}"), "Kinetic", ElementType::Kinetic, 100));
            moves.push(Move::attack(format!("t{i}"), "Thermal", ElementType::Thermal, 110));
        }
        moves.push(Move::buff("wall", "Ice Wall", ElementType::Cryogenic, StatType::Shield, 60));
        moves
    }

    fn sample_guild() -> Guild {
        Guild {
            id: GuildId::new("pyro-forge"),
            name: "Pyro Forge".to_string(),
            description: String::new(),
            perk: String::new(),
            element: ElementType::Thermal,
        }
    }

    #[test]
    fn test_library_layout() {
        let mut rng = SeededRandom::new(1);
        let templates = generate_templates(&sample_moves(), &[sample_guild()], &mut rng);

        assert_eq!(templates.len(), 10 + 50);
        assert_eq!(templates[0].id.as_str(), "mech-0");
        assert_eq!(templates[0].crafting.blueprint_id.as_str(), "bp-mech-0");
        assert!(templates[..10].iter().all(|t| t.element == ElementType::Thermal));
        assert_eq!(templates[9].rarity, Rarity::Legendary);
        assert!(templates[10..].iter().all(UnitTemplate::is_neutral));
    }

    #[test]
    fn test_stats_scale_with_rarity() {
        let mut rng = SeededRandom::new(2);
        for rarity in Rarity::ALL {
            let stats = roll_stats(rarity, &mut rng);
            let m = f64::from(rarity.stat_percent()) / 100.0;
            assert!(f64::from(stats.max_health) >= (80.0 * m).floor());
            assert!(f64::from(stats.max_health) < 120.0 * m);
            assert!(f64::from(stats.speed) >= (8.0 * m).floor());
            assert!(f64::from(stats.speed) < 20.0 * m);
        }
    }

    #[test]
    fn test_move_pool_has_no_duplicates() {
        let mut rng = SeededRandom::new(3);
        let pool = roll_move_pool(ElementType::Kinetic, Rarity::Legendary, &sample_moves(), &mut rng);
        let mut sorted = pool.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), pool.len());
        assert_eq!(pool.len(), 8);
    }

    #[test]
    fn test_thermal_pool_mixes_kinetic() {
        let mut rng = SeededRandom::new(4);
        let pool = roll_move_pool(ElementType::Thermal, Rarity::Common, &sample_moves(), &mut rng);
        assert_eq!(pool.len(), 6);
        assert!(pool
            .iter()
            .all(|id| id.as_str().starts_with('k') || id.as_str().starts_with('t')));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate_templates(&sample_moves(), &[sample_guild()], &mut SeededRandom::new(9));
        let b = generate_templates(&sample_moves(), &[sample_guild()], &mut SeededRandom::new(9));
        assert_eq!(a, b);
    }
}

//! Move resolution.
//!
//! [`apply_move`] computes the effect of one move use on an attacker and a
//! defender and returns fresh copies of both. It never fails: the battle
//! session only hands it valid combinations.
//!
//! Damage is `floor(attack * damage_percent / 100)`. The defender's shield
//! absorbs first, whatever is left comes off health (floored at zero). Buff
//! moves only ever raise the user's own shield, capped at its maximum.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::Move;
use crate::unit::Unit;

/// Log record of one applied move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// A damage move landed.
    Damage {
        /// Name of the attacking unit.
        attacker: String,
        /// Name of the move used.
        move_name: String,
        /// Damage before shields.
        raw: u32,
        /// Damage soaked by the shield.
        absorbed: u32,
        /// Damage that reached health.
        dealt: u32,
    },
    /// A self-buff was used.
    Buff {
        /// Name of the unit using the buff.
        attacker: String,
        /// Name of the move used.
        move_name: String,
        /// Shield actually gained after the cap.
        gained: u32,
    },
}

impl fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Damage {
                attacker,
                move_name,
                dealt,
                ..
            } => write!(f, "{attacker} used {move_name} for {dealt} DMG!"),
            Self::Buff {
                attacker,
                move_name,
                ..
            } => write!(f, "{attacker} used {move_name} (Buff)"),
        }
    }
}

/// Result of [`apply_move`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Attacker after the move.
    pub attacker: Unit,
    /// Defender after the move.
    pub defender: Unit,
    /// `None` when the attacker was already down and nothing happened.
    pub event: Option<CombatEvent>,
}

/// Raw damage of a move before shields.
#[must_use]
pub fn calculate_damage(attack: u32, damage_percent: u32) -> u32 {
    let raw = u64::from(attack) * u64::from(damage_percent) / 100;
    u32::try_from(raw).unwrap_or(u32::MAX)
}

/// Apply one move from `attacker` to `defender`.
#[must_use]
pub fn apply_move(attacker: &Unit, mv: &Move, defender: &Unit) -> MoveOutcome {
    let mut attacker = attacker.clone();
    let mut defender = defender.clone();

    if !attacker.is_alive() {
        return MoveOutcome {
            attacker,
            defender,
            event: None,
        };
    }

    let event = if mv.is_buff {
        let gained = attacker.charge_shield(mv.buff_value());
        CombatEvent::Buff {
            attacker: attacker.name.clone(),
            move_name: mv.name.clone(),
            gained,
        }
    } else {
        let raw = calculate_damage(attacker.stats.attack, mv.damage_percent);
        let (absorbed, dealt) = defender.absorb_hit(raw);
        CombatEvent::Damage {
            attacker: attacker.name.clone(),
            move_name: mv.name.clone(),
            raw,
            absorbed,
            dealt,
        }
    };

    MoveOutcome {
        attacker,
        defender,
        event: Some(event),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ElementType, StatType};
    use crate::ids::{MoveId, TemplateId, UnitId};
    use crate::unit::UnitStats;
    use crate::catalog::{BaseStats, Rarity};

    fn unit(name: &str, health: u32, shield: u32, attack: u32, speed: u32) -> Unit {
        let base = BaseStats {
            max_health: health,
            max_shield: shield.max(10),
            shield_regen: 5,
            attack,
            speed,
        };
        let mut stats = UnitStats::from_base(&base);
        stats.current_shield = shield;
        Unit {
            id: UnitId::new(name),
            template_id: TemplateId::new("mech-0"),
            name: name.to_string(),
            rarity: Rarity::Common,
            element: ElementType::Kinetic,
            level: 1,
            xp: 0,
            stats,
            base_stats: base,
            move_pool: vec![MoveId::new("strike")],
            equipped_moves: vec![MoveId::new("strike")],
        }
    }

    fn strike() -> Move {
        Move::attack("strike", "Strike", ElementType::Kinetic, 100)
    }

    #[test]
    fn test_shield_absorbs_before_health() {
        let a = unit("A", 100, 0, 20, 10);
        let b = unit("B", 50, 10, 15, 5);

        let outcome = apply_move(&a, &strike(), &b);
        assert_eq!(outcome.defender.stats.current_shield, 0);
        assert_eq!(outcome.defender.stats.current_health, 40);
        assert_eq!(
            outcome.event.unwrap().to_string(),
            "A used Strike for 10 DMG!"
        );

        let back = apply_move(&outcome.defender, &strike(), &outcome.attacker);
        assert_eq!(back.defender.stats.current_health, 85);
    }

    #[test]
    fn test_multiplier_floors() {
        assert_eq!(calculate_damage(20, 130), 26);
        assert_eq!(calculate_damage(15, 110), 16);
        assert_eq!(calculate_damage(7, 50), 3);
        assert_eq!(calculate_damage(0, 250), 0);
    }

    #[test]
    fn test_health_floors_at_zero() {
        let a = unit("A", 100, 0, 500, 10);
        let b = unit("B", 30, 0, 15, 5);
        let outcome = apply_move(&a, &strike(), &b);
        assert_eq!(outcome.defender.stats.current_health, 0);
        assert!(!outcome.defender.is_alive());
    }

    #[test]
    fn test_dead_attacker_does_nothing() {
        let mut a = unit("A", 100, 0, 20, 10);
        a.stats.current_health = 0;
        let b = unit("B", 50, 10, 15, 5);

        let outcome = apply_move(&a, &strike(), &b);
        assert!(outcome.event.is_none());
        assert_eq!(outcome.defender, b);
        assert_eq!(outcome.attacker, a);
    }

    #[test]
    fn test_buff_targets_self_and_caps() {
        let a = unit("A", 100, 5, 20, 10);
        let b = unit("B", 50, 10, 15, 5);
        let wall = Move::buff("wall", "Ice Wall", ElementType::Cryogenic, StatType::Shield, 60);

        let outcome = apply_move(&a, &wall, &b);
        assert_eq!(outcome.attacker.stats.current_shield, outcome.attacker.stats.max_shield);
        assert_eq!(outcome.defender, b);
        assert_eq!(outcome.event.unwrap().to_string(), "A used Ice Wall (Buff)");
    }
}

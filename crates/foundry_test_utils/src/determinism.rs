//! Determinism testing utilities.
//!
//! Provides a harness for verifying that battles, loot and catalog
//! generation produce identical results given identical seeds.
//!
//! # Testing Strategy
//!
//! Every random decision in the core goes through an injected
//! [`RandomSource`](foundry_core::rng::RandomSource). Sources of
//! non-determinism this harness is meant to catch include:
//!
//! - **Ambient randomness**: any roll that bypasses the injected source.
//! - **Iteration order**: hash-map iteration leaking into results. Catalog
//!   moves are kept in a `BTreeMap` for that reason.
//! - **Shared state**: an operation mutating its input snapshot.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use foundry_core::battle::{play_out, start_battle, BattleMode, BattleSession, DEFAULT_TURN_LIMIT};
use foundry_core::catalog::Catalog;
use foundry_core::player::Player;
use foundry_core::rng::SeededRandom;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of steps performed per run.
    pub steps: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic run).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that every run matched, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Run is non-deterministic!\n\
                 Runs: {}\n\
                 Steps: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.steps,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a process multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run
/// * `steps` - Number of steps per run
/// * `setup` - Function to create the initial state
/// * `step` - Function to advance the state by one step
/// * `hash` - Function to compute a state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    steps: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..steps {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        steps,
    }
}

/// Hash any hashable value with the standard hasher.
#[must_use]
pub fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Play one auto-piloted battle to the end from a seed.
///
/// # Panics
///
/// Panics if the battle cannot start or does not finish within the turn limit.
#[must_use]
pub fn autoplay_battle(catalog: &Catalog, player: &Player, mode: BattleMode, seed: u64) -> BattleSession {
    let mut rng = SeededRandom::new(seed);
    let session = start_battle(player, mode, catalog, &mut rng).expect("battle starts");
    let (done, _) = play_out(session, catalog, &mut rng, DEFAULT_TURN_LIMIT).expect("battle finishes");
    done
}

/// Play the same seeded battle `runs` times and compare final hashes.
#[must_use]
pub fn verify_battle_determinism(
    catalog: &Catalog,
    player: &Player,
    mode: BattleMode,
    seed: u64,
    runs: usize,
) -> DeterminismResult {
    verify_determinism(
        runs,
        1,
        || None,
        |slot: &mut Option<BattleSession>| {
            *slot = Some(autoplay_battle(catalog, player, mode, seed));
        },
        |slot| slot.as_ref().map_or(0, BattleSession::state_hash),
    )
}

/// Property-based testing strategies.
pub mod strategies {
    use foundry_core::catalog::{BaseStats, ElementType, Move, PartCounts, StatType};
    use foundry_core::unit::Unit;
    use proptest::prelude::*;

    use crate::fixtures::test_template;

    /// Generate an element.
    pub fn arb_element() -> impl Strategy<Value = ElementType> {
        prop::sample::select(ElementType::ALL.to_vec())
    }

    /// Generate level 1 stats in the ranges templates are rolled in, up to Legendary.
    pub fn arb_base_stats() -> impl Strategy<Value = BaseStats> {
        (1u32..300, 0u32..150, 0u32..25, 1u32..63, 1u32..50).prop_map(
            |(max_health, max_shield, shield_regen, attack, speed)| BaseStats {
                max_health,
                max_shield,
                shield_regen,
                attack,
                speed,
            },
        )
    }

    /// Generate a damage move (50% to 250% of attack).
    pub fn arb_attack_move() -> impl Strategy<Value = Move> {
        (arb_element(), 50u32..=250).prop_map(|(element, pct)| {
            Move::attack(format!("atk-{pct}"), "Attack", element, pct)
        })
    }

    /// Generate a shield buff move.
    pub fn arb_buff_move() -> impl Strategy<Value = Move> {
        (arb_element(), 0u32..200).prop_map(|(element, amount)| {
            Move::buff(format!("buff-{amount}"), "Buff", element, StatType::Shield, amount)
        })
    }

    /// Generate any move.
    pub fn arb_move() -> impl Strategy<Value = Move> {
        prop_oneof![3 => arb_attack_move(), 1 => arb_buff_move()]
    }

    /// Generate a unit with current health and shield anywhere within bounds.
    pub fn arb_unit() -> impl Strategy<Value = Unit> {
        (arb_base_stats(), any::<u32>(), any::<u32>()).prop_map(|(stats, h, s)| {
            let template = test_template("mech-0", stats);
            let mut unit = Unit::from_template(&template, "prop-unit".into());
            unit.stats.current_health = h % (stats.max_health + 1);
            unit.stats.current_shield = s % (stats.max_shield + 1);
            unit
        })
    }

    /// Generate part counts.
    pub fn arb_parts() -> impl Strategy<Value = PartCounts> {
        (0u64..200, 0u64..100, 0u64..40).prop_map(|(c, u, r)| PartCounts::new(c, u, r))
    }

    /// Generate an experience grant.
    pub fn arb_xp() -> impl Strategy<Value = u64> {
        0u64..5_000
    }
}

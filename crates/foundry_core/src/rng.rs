//! Injectable randomness.
//!
//! Every random decision in the core (loot rolls, opponent deployment,
//! opponent move choice, opponent generation, catalog generation) goes through
//! a [`RandomSource`] passed in by the caller. Nothing in the core reaches for
//! an ambient generator.
//!
//! # Determinism
//!
//! [`SeededRandom`] wraps a ChaCha stream cipher RNG: the same seed always
//! produces the same sequence, which is what replays and tests rely on.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniformly distributed floats.
pub trait RandomSource {
    /// Next value in `[0, 1)`.
    fn next_float(&mut self) -> f64;

    /// Uniform index in `0..len`.
    ///
    /// Returns 0 for an empty range; callers check emptiness first.
    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let index = (self.next_float() * len as f64).floor() as usize;
        index.min(len - 1)
    }

    /// Uniform value in `[min, max)`.
    fn range_f64(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_float() * (max - min)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_float(&mut self) -> f64 {
        (**self).next_float()
    }
}

/// Seedable pseudo-random generator backed by ChaCha8.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededRandom {
    /// Create a generator from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seed this generator was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn next_float(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Shuffle a slice in place (Fisher-Yates) using the given source.
pub fn shuffle<T>(items: &mut [T], rng: &mut dyn RandomSource) {
    for i in (1..items.len()).rev() {
        let j = rng.pick_index(i + 1);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_random_is_deterministic() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_float().to_bits(), b.next_float().to_bits());
        }
    }

    #[test]
    fn test_values_in_unit_interval() {
        let mut rng = SeededRandom::new(7);
        for _ in 0..10_000 {
            let v = rng.next_float();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_pick_index_bounds() {
        let mut rng = SeededRandom::new(3);
        for _ in 0..1_000 {
            assert!(rng.pick_index(5) < 5);
        }
        assert_eq!(rng.pick_index(0), 0);
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = SeededRandom::new(11);
        let mut items: Vec<u32> = (0..20).collect();
        shuffle(&mut items, &mut rng);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }
}

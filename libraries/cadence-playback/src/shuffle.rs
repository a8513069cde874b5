//! Shuffle algorithms for queue randomization
//!
//! The queue never shuffles tracks directly. It shuffles its playback order
//! (a permutation of indices), so any `Shuffler` must work on arbitrary
//! element types.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Produces a random permutation of a slice, in place
pub trait Shuffler {
    /// Permute `items` in place
    ///
    /// Every element must appear exactly once afterwards.
    fn shuffle<T>(&mut self, items: &mut [T]);
}

/// Uniform shuffle using the Fisher-Yates algorithm
///
/// Walks from the last index down to 1 and swaps each slot with a uniformly
/// drawn slot in `[0, i]`, so each of the `n!` permutations is equally
/// likely.
#[derive(Debug, Clone)]
pub struct RandomShuffler {
    rng: StdRng,
}

impl RandomShuffler {
    /// Create a shuffler seeded from system entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a shuffler with a fixed seed
    ///
    /// The same seed always yields the same sequence of permutations.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a shuffler from an optional seed (entropy when `None`)
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::seeded)
    }
}

impl Default for RandomShuffler {
    fn default() -> Self {
        Self::new()
    }
}

impl Shuffler for RandomShuffler {
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.rng.gen_range(0..=i);
            items.swap(i, j);
        }
    }
}

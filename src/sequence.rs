//! Deterministic scalar stream for non-spatial decisions.
//!
//! Continent counts, per-source river draws and lake coin flips need to vary by seed
//! but have no spatial coherence, so they come from here rather than from noise.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded stream of scalars in `[0, 1)`.
#[derive(Clone, Debug)]
pub struct ScalarSequence {
    rng: ChaCha8Rng,
}

impl ScalarSequence {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Next scalar in `[0, 1)`.
    pub fn next(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Scalar in `[lo, hi)`.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next()
    }

    /// Integer in `[lo, hi]`.
    pub fn range_inclusive(&mut self, lo: i32, hi: i32) -> i32 {
        self.rng.gen_range(lo..=hi)
    }

    /// True with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next() < p
    }
}

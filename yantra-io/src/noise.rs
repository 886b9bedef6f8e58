//! Seeded Gaussian noise
//!
//! One generator instance is shared sequentially by everything that draws
//! from it, so a fixed seed reproduces a whole run.

use rand::prelude::*;
use rand::rngs::SmallRng;
use rand_distr::StandardNormal;

/// Noise generator with configurable seed for reproducibility
#[derive(Debug, Clone)]
pub struct NoiseGenerator {
    rng: SmallRng,
    seed: u64,
}

impl NoiseGenerator {
    /// Create a new noise generator
    ///
    /// A seed of 0 draws entropy from the OS for non-deterministic runs.
    pub fn new(seed: u64) -> Self {
        let rng = if seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(seed)
        };
        Self { rng, seed }
    }

    /// Seed this generator was built from (0 = entropy)
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Zero-mean Gaussian sample; exactly 0.0 when `stddev` is 0
    #[inline]
    pub fn gaussian(&mut self, stddev: f64) -> f64 {
        if stddev == 0.0 {
            return 0.0;
        }
        let n: f64 = self.rng.sample(StandardNormal);
        n * stddev
    }

    /// Returns true with given probability
    #[inline]
    pub fn chance(&mut self, probability: f64) -> bool {
        probability > 0.0 && self.rng.r#gen::<f64>() < probability
    }
}

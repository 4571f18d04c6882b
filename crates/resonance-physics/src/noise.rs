// ─────────────────────────────────────────────────────────────────────
// Resonance Kernel — Noise Source
// ─────────────────────────────────────────────────────────────────────
//! Seeded standard-normal generator. The same seed yields a bit-identical
//! sequence on every run and platform.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

pub struct NoiseSource {
    rng: ChaCha8Rng,
}

impl NoiseSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Standard normal deviate ξ ~ N(0, 1).
    #[inline]
    pub fn standard_normal(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }

    /// σ·ξ. Always consumes one deviate, even for σ = 0.
    #[inline]
    pub fn gaussian(&mut self, sigma: f64) -> f64 {
        sigma * self.standard_normal()
    }

    /// Wiener increment σ·√dt·ξ, so variance scales with dt.
    #[inline]
    pub fn wiener_increment(&mut self, sigma: f64, dt: f64) -> f64 {
        sigma * dt.sqrt() * self.standard_normal()
    }

    /// Uniform in [0, 1).
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

// ─────────────────────────────────────────────────────────────────────
// Resonance Kernel — Phase-Lock Controller
// ─────────────────────────────────────────────────────────────────────
//! Scalar phase-locked-loop law for the phase error δ:
//!
//!   Locked:   δ ← δ − K·sin(δ)·dt + σ·√dt·ξ
//!   Unlocked: δ ← δ + σ·√dt·ξ            (K treated as 0)
//!
//! The sinusoidal restoring term gives δ = 0 as the stable fixed point
//! for K > 0 and the nonlinear capture range of a real PLL.

use serde::{Deserialize, Serialize};

use crate::noise::NoiseSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockMode {
    Locked,
    Unlocked,
}

impl LockMode {
    pub fn is_locked(self) -> bool {
        matches!(self, Self::Locked)
    }
}

#[derive(Debug, Clone)]
pub struct PhaseLockController {
    mode: LockMode,
    gain: f64,
    jitter: f64,
    delta: f64,
}

impl PhaseLockController {
    /// `gain` is K (ignored when unlocked), `jitter` is σ in rad/√time.
    pub fn new(mode: LockMode, gain: f64, jitter: f64, initial_error: f64) -> Self {
        Self {
            mode,
            gain,
            jitter,
            delta: initial_error,
        }
    }

    pub fn mode(&self) -> LockMode {
        self.mode
    }

    /// Gain actually applied: K when locked, 0 otherwise.
    pub fn effective_gain(&self) -> f64 {
        if self.mode.is_locked() {
            self.gain
        } else {
            0.0
        }
    }

    /// Current phase error δ (rad).
    pub fn phase_error(&self) -> f64 {
        self.delta
    }

    /// Advance δ by one step. Consumes exactly one deviate.
    #[inline]
    pub fn step(&mut self, dt: f64, noise: &mut NoiseSource) -> f64 {
        let jitter = noise.wiener_increment(self.jitter, dt);
        let restoring = -self.effective_gain() * self.delta.sin() * dt;
        self.delta += restoring + jitter;
        self.delta
    }
}

// ─────────────────────────────────────────────────────────────────────
// Resonance Kernel — Sweep Orchestration
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Paired comparisons and parameter sweeps over independent runs.
//!
//! Architecture:
//!   - compare: locked vs unlocked, reflective vs absorbing, named
//!     scenario pairs
//!   - sweep: parametric (Q₀ × detuning × m/m_thr × seed), absorption
//!     (max damping × seed), drive noise (σ_drive)
//!   - export: JSON rows for presentation layers, failures logged only
//!
//! Every sweep point builds its own integrators and generators, so points
//! run in parallel on the rayon pool and the output order matches the
//! grid order regardless of scheduling.

pub mod compare;
pub mod export;
pub mod sweep;

pub use compare::{
    compare_boundaries, compare_field_lock, compare_lock, compare_scenarios, energy_gain_pct,
    lock_scenarios, retention_ratio, BoundaryComparison, FieldLockComparison, LockComparison,
    NamedScenario, ScenarioComparison,
};
pub use export::write_json;
pub use sweep::{
    absorption_sweep, noise_sweep, parametric_sweep, AbsorptionRow, AbsorptionSweep, NoiseRow,
    NoiseSweep, ParametricRow, ParametricSweep,
};

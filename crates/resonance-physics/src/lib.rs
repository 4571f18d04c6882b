// ─────────────────────────────────────────────────────────────────────
// Resonance Kernel — Physics Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Discrete-time steppers for driven, damped resonators and scalar wave
//! fields, with seeded noise, a sinusoidal phase-lock law, and
//! reflective or absorbing boundaries.
//!
//! Architecture (leaves first):
//!   - NoiseSource: seeded standard-normal deviates
//!   - GridShape / BoundaryPolicy: node layout, damping profile, edge rule
//!   - PhaseLockController: δ ← δ − K sin δ·dt + σ√dt·ξ
//!   - OscillatorIntegrator: RK4 Duffing/Mathieu resonator
//!   - FieldIntegrator: leapfrog wave equation on 1-D/2-D/3-D grids
//!   - DiagnosticsCollector: post-burn-in samples → summary metrics
//!
//! Every run is single-threaded and owns its state and generator.

pub mod boundary;
pub mod diagnostics;
pub mod field;
pub mod grid;
pub mod noise;
pub mod oscillator;
pub mod phase_lock;

pub use boundary::{BoundaryPolicy, DampingProfile, EdgeRing};
pub use diagnostics::{DiagnosticSample, DiagnosticsCollector};
pub use field::{simulate_field, FieldIntegrator, FieldState, FieldView};
pub use grid::GridShape;
pub use noise::NoiseSource;
pub use oscillator::{simulate, OscillatorIntegrator, OscillatorState};
pub use phase_lock::{LockMode, PhaseLockController};

// ─────────────────────────────────────────────────────────────────────
// Resonance Kernel — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Configuration records, error hierarchy, and diagnostic report types
//! shared by the resonance integrators and sweeps.

pub mod config;
pub mod error;
pub mod report;

pub use config::{FieldParams, InitialPhase, OscillatorParams, PHI, PHI_PI};
pub use error::{ResonanceError, ResonanceResult};
pub use report::{DiagnosticSummary, FieldReport, OscillatorReport, PowerMetrics};

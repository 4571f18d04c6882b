// ─────────────────────────────────────────────────────────────────────
// Resonance Kernel — Diagnostic Reports
// ─────────────────────────────────────────────────────────────────────
//! Named scalar metrics returned by every run. Presentation layers
//! (tables, charts, terminal views) consume these records.

use serde::{Deserialize, Serialize};

/// Reduction of the post-burn-in sample sequence.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DiagnosticSummary {
    /// Mean energy.
    pub mean: f64,
    /// Peak energy.
    pub peak: f64,
    /// √(mean squared amplitude).
    pub rms: f64,
    /// Tail-window mean energy over head-window mean energy.
    /// 1.0 with fewer than 20 samples, +∞ when the head mean is ≤ 0.
    pub growth_ratio: f64,
    /// Number of samples reduced.
    pub samples: usize,
}

impl DiagnosticSummary {
    /// True when the energy never left the finite range.
    pub fn is_finite(&self) -> bool {
        self.mean.is_finite() && self.peak.is_finite() && self.rms.is_finite()
    }
}

/// Drive energetics of a directly forced oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PowerMetrics {
    /// Mean input power F(t)·v.
    pub input_avg: f64,
    /// Mean dissipated power 2γ_eff·v².
    pub dissipated_avg: f64,
    /// |P_diss| / |P_in|, clamped to [0, 2].
    pub efficiency_proxy: f64,
}

impl PowerMetrics {
    pub fn new(input_avg: f64, dissipated_avg: f64) -> Self {
        let denom = input_avg.abs().max(1e-12);
        let efficiency_proxy = (dissipated_avg.abs() / denom).clamp(0.0, 2.0);
        Self {
            input_avg,
            dissipated_avg,
            efficiency_proxy,
        }
    }
}

/// Outcome of one oscillator run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OscillatorReport {
    pub locked: bool,
    pub summary: DiagnosticSummary,
    /// Present when a direct drive was configured.
    pub power: Option<PowerMetrics>,
    /// Baseline damping γ₀ after coupling.
    pub gamma: f64,
    /// Lock gain actually applied (0 for unlocked runs).
    pub lock_gain: f64,
    pub omega0: f64,
    pub omega_drive: f64,
    /// Phase error at the end of the run.
    pub final_phase_error: f64,
}

/// Outcome of one field run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldReport {
    /// `"reflective"` or `"absorbing"`.
    pub boundary: String,
    pub locked: bool,
    pub summary: DiagnosticSummary,
    pub courant: f64,
    pub final_phase_error: f64,
}

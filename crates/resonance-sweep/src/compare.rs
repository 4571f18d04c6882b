// ─────────────────────────────────────────────────────────────────────
// Resonance Kernel — Paired Comparisons
// ─────────────────────────────────────────────────────────────────────
//! Two runs that differ in exactly one switch (lock mode or boundary
//! policy) and share the same parameter record and seed. Each run seeds
//! its own generator, so both see the same noise stream.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use resonance_physics::{simulate, simulate_field, BoundaryPolicy, LockMode};
use resonance_types::{
    FieldParams, FieldReport, OscillatorParams, OscillatorReport, ResonanceResult,
};

/// 100·(E_lock − E_unlock) / max(E_unlock, 1e-12).
pub fn energy_gain_pct(locked: f64, unlocked: f64) -> f64 {
    100.0 * (locked - unlocked) / unlocked.max(1e-12)
}

/// E_reflective / E_absorbing, +∞ when the absorbing mean is ≤ 0.
pub fn retention_ratio(reflective: f64, absorbing: f64) -> f64 {
    if absorbing > 0.0 {
        reflective / absorbing
    } else {
        f64::INFINITY
    }
}

// ── Oscillator: locked vs unlocked ───────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockComparison {
    pub locked: OscillatorReport,
    pub unlocked: OscillatorReport,
    pub energy_gain_pct: f64,
    /// Locked minus unlocked growth ratio.
    pub growth_delta: f64,
    /// Locked minus unlocked efficiency proxy, for directly driven runs.
    pub efficiency_delta: Option<f64>,
}

impl LockComparison {
    pub fn from_reports(locked: OscillatorReport, unlocked: OscillatorReport) -> Self {
        let efficiency_delta = match (locked.power, unlocked.power) {
            (Some(l), Some(u)) => Some(l.efficiency_proxy - u.efficiency_proxy),
            _ => None,
        };
        Self {
            energy_gain_pct: energy_gain_pct(locked.summary.mean, unlocked.summary.mean),
            growth_delta: locked.summary.growth_ratio - unlocked.summary.growth_ratio,
            efficiency_delta,
            locked,
            unlocked,
        }
    }
}

pub fn compare_lock(params: &OscillatorParams) -> ResonanceResult<LockComparison> {
    let locked = simulate(params, LockMode::Locked)?;
    let unlocked = simulate(params, LockMode::Unlocked)?;
    Ok(LockComparison::from_reports(locked, unlocked))
}

// ── Field: reflective vs absorbing ───────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryComparison {
    pub reflective: FieldReport,
    pub absorbing: FieldReport,
    pub retention_ratio: f64,
}

/// Both runs locked; the absorbing layer comes from `params`.
pub fn compare_boundaries(params: &FieldParams) -> ResonanceResult<BoundaryComparison> {
    let reflective = simulate_field(params, BoundaryPolicy::Reflective, LockMode::Locked)?;
    let absorbing = simulate_field(
        params,
        BoundaryPolicy::absorbing_from(params),
        LockMode::Locked,
    )?;
    let retention_ratio = retention_ratio(reflective.summary.mean, absorbing.summary.mean);
    log::debug!(
        "boundaries {:?}: retention {retention_ratio:.3}",
        params.extents
    );
    Ok(BoundaryComparison {
        reflective,
        absorbing,
        retention_ratio,
    })
}

// ── Field: locked vs unlocked ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldLockComparison {
    pub locked: FieldReport,
    pub unlocked: FieldReport,
    pub energy_gain_pct: f64,
}

pub fn compare_field_lock(
    params: &FieldParams,
    policy: BoundaryPolicy,
) -> ResonanceResult<FieldLockComparison> {
    let locked = simulate_field(params, policy, LockMode::Locked)?;
    let unlocked = simulate_field(params, policy, LockMode::Unlocked)?;
    Ok(FieldLockComparison {
        energy_gain_pct: energy_gain_pct(locked.summary.mean, unlocked.summary.mean),
        locked,
        unlocked,
    })
}

// ── Named scenarios ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedScenario {
    pub name: String,
    pub params: OscillatorParams,
}

impl NamedScenario {
    pub fn new(name: impl Into<String>, params: OscillatorParams) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub name: String,
    pub comparison: LockComparison,
}

/// Directly driven resonator under phase chaos: passive baseline, high Q
/// with a stronger lock, active gain at 2.2γ and 3.0γ, and a detuned
/// high-noise drive.
pub fn lock_scenarios() -> Vec<NamedScenario> {
    let base = OscillatorParams {
        seed: 2,
        ..OscillatorParams::driven()
    };
    let high_q = OscillatorParams {
        q0: 2000.0,
        lock_gain: 4000.0,
        ..base.clone()
    };
    let gamma_high_q = high_q.base_damping();
    let detuned = OscillatorParams {
        q0: 1000.0,
        lock_gain: 2000.0,
        sigma_drive: 1.0,
        phase_jitter: 120.0,
        ..base.clone()
    }
    .with_detuning(0.98);

    vec![
        NamedScenario::new("passive baseline", base),
        NamedScenario::new("passive high-Q strong lock", high_q.clone()),
        NamedScenario::new(
            "active gain 2.2γ",
            OscillatorParams {
                active_gain: 2.2 * gamma_high_q,
                ..high_q.clone()
            },
        ),
        NamedScenario::new(
            "active gain 3.0γ",
            OscillatorParams {
                active_gain: 3.0 * gamma_high_q,
                ..high_q
            },
        ),
        NamedScenario::new("detuned 0.98, high noise", detuned),
    ]
}

/// Locked vs unlocked for every scenario, in input order.
pub fn compare_scenarios(scenarios: &[NamedScenario]) -> ResonanceResult<Vec<ScenarioComparison>> {
    log::info!("scenario comparison: {} scenarios", scenarios.len());
    scenarios
        .par_iter()
        .map(|s| -> ResonanceResult<ScenarioComparison> {
            Ok(ScenarioComparison {
                name: s.name.clone(),
                comparison: compare_lock(&s.params)?,
            })
        })
        .collect()
}

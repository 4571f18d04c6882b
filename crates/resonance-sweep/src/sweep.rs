// ─────────────────────────────────────────────────────────────────────
// Resonance Kernel — Parameter Sweeps
// ─────────────────────────────────────────────────────────────────────
//! Grids of independent runs, aggregated over seeds with mean and
//! population standard deviation.
//!
//!   parametric: Q₀ × ω_d/ω₀ × m/m_thr × seed, locked vs unlocked
//!   absorption: max layer damping × seed, reflective vs absorbing
//!   noise:      σ_drive, locked vs unlocked on a driven resonator
//!
//! Points are evaluated in parallel. Rows come back in grid order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use resonance_physics::{simulate, simulate_field, BoundaryPolicy, LockMode};
use resonance_types::{
    FieldParams, OscillatorParams, OscillatorReport, ResonanceError, ResonanceResult,
};

use crate::compare::{compare_lock, retention_ratio};

/// Mean and population standard deviation. Empty input gives (0, 0).
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

fn require_axis<T>(name: &str, values: &[T]) -> ResonanceResult<()> {
    if values.is_empty() {
        return Err(ResonanceError::Config(format!("sweep axis {name} is empty")));
    }
    Ok(())
}

// ── Parametric ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParametricSweep {
    /// Record every point is derived from; q0, detuning, depth and seed
    /// are overridden per point.
    pub base: OscillatorParams,
    pub quality_factors: Vec<f64>,
    pub detunings: Vec<f64>,
    /// Pump depth as multiples of m_thr = 1/Q₀.
    pub threshold_multiples: Vec<f64>,
    pub seeds: Vec<u64>,
}

impl Default for ParametricSweep {
    fn default() -> Self {
        Self {
            base: OscillatorParams {
                f0: 60.0,
                beta: 3e4,
                drive_amplitude: 0.0,
                sigma_gamma: 0.0,
                sigma_add: 1e-6,
                phase_jitter: 5.0,
                lock_gain: 3000.0,
                duration: 2.0,
                seed: 7,
                ..OscillatorParams::default()
            },
            quality_factors: vec![150.0, 300.0, 600.0],
            detunings: vec![0.98, 1.00, 1.02],
            threshold_multiples: vec![0.7, 0.9, 1.1, 1.4, 1.8, 2.2],
            seeds: vec![7, 11],
        }
    }
}

impl ParametricSweep {
    pub fn validate(&self) -> ResonanceResult<()> {
        require_axis("quality_factors", &self.quality_factors)?;
        require_axis("detunings", &self.detunings)?;
        require_axis("threshold_multiples", &self.threshold_multiples)?;
        require_axis("seeds", &self.seeds)?;
        self.base.validate()
    }

    /// (Q₀, detuning, m/m_thr) in row order.
    fn points(&self) -> Vec<(f64, f64, f64)> {
        let mut points = Vec::with_capacity(
            self.quality_factors.len() * self.detunings.len() * self.threshold_multiples.len(),
        );
        for &q0 in &self.quality_factors {
            for &detune in &self.detunings {
                for &multiple in &self.threshold_multiples {
                    points.push((q0, detune, multiple));
                }
            }
        }
        points
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParametricRow {
    pub q0: f64,
    pub detune: f64,
    pub m_over_thr: f64,
    pub m: f64,
    pub gain_pct_mean: f64,
    pub gain_pct_std: f64,
    pub growth_delta_mean: f64,
    pub growth_delta_std: f64,
}

pub fn parametric_sweep(grid: &ParametricSweep) -> ResonanceResult<Vec<ParametricRow>> {
    grid.validate()?;
    let points = grid.points();
    log::info!(
        "parametric sweep: {} points × {} seeds",
        points.len(),
        grid.seeds.len()
    );

    points
        .par_iter()
        .map(|&(q0, detune, multiple)| -> ResonanceResult<ParametricRow> {
            let point = grid
                .base
                .clone()
                .with_quality_factor(q0)
                .with_detuning(detune);
            let m = multiple * point.parametric_threshold();
            let point = point.with_modulation_depth(m);

            let mut gains = Vec::with_capacity(grid.seeds.len());
            let mut growth = Vec::with_capacity(grid.seeds.len());
            for &seed in &grid.seeds {
                let cmp = compare_lock(&point.clone().with_seed(seed))?;
                gains.push(cmp.energy_gain_pct);
                growth.push(cmp.growth_delta);
            }
            let (gain_pct_mean, gain_pct_std) = mean_std(&gains);
            let (growth_delta_mean, growth_delta_std) = mean_std(&growth);
            Ok(ParametricRow {
                q0,
                detune,
                m_over_thr: multiple,
                m,
                gain_pct_mean,
                gain_pct_std,
                growth_delta_mean,
                growth_delta_std,
            })
        })
        .collect()
}

// ── Absorption ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbsorptionSweep {
    /// Field record; seed and layer_max_damping are overridden per point.
    pub base: FieldParams,
    pub max_dampings: Vec<f64>,
    pub seeds: Vec<u64>,
}

impl Default for AbsorptionSweep {
    fn default() -> Self {
        Self {
            base: FieldParams::default().with_steps(6000),
            max_dampings: vec![0.0, 0.005, 0.01, 0.02, 0.03, 0.05],
            seeds: vec![3, 7, 11],
        }
    }
}

impl AbsorptionSweep {
    pub fn validate(&self) -> ResonanceResult<()> {
        require_axis("max_dampings", &self.max_dampings)?;
        require_axis("seeds", &self.seeds)?;
        self.base.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbsorptionRow {
    pub max_damping: f64,
    pub reflective_mean: f64,
    pub reflective_std: f64,
    pub absorbing_mean: f64,
    pub absorbing_std: f64,
    /// Ratio of the two means.
    pub retention_ratio: f64,
}

pub fn absorption_sweep(grid: &AbsorptionSweep) -> ResonanceResult<Vec<AbsorptionRow>> {
    grid.validate()?;
    log::info!(
        "absorption sweep: {} damping values × {} seeds",
        grid.max_dampings.len(),
        grid.seeds.len()
    );

    // The reflective run ignores the layer, so one baseline per seed serves
    // every row.
    let reflective = grid
        .seeds
        .par_iter()
        .map(|&seed| {
            let p = grid.base.clone().with_seed(seed);
            simulate_field(&p, BoundaryPolicy::Reflective, LockMode::Locked)
                .map(|r| r.summary.mean)
        })
        .collect::<ResonanceResult<Vec<f64>>>()?;
    let (reflective_mean, reflective_std) = mean_std(&reflective);

    grid.max_dampings
        .par_iter()
        .map(|&max_damping| -> ResonanceResult<AbsorptionRow> {
            let absorbing = grid
                .seeds
                .iter()
                .map(|&seed| {
                    let p = grid
                        .base
                        .clone()
                        .with_seed(seed)
                        .with_max_damping(max_damping);
                    simulate_field(&p, BoundaryPolicy::absorbing_from(&p), LockMode::Locked)
                        .map(|r| r.summary.mean)
                })
                .collect::<ResonanceResult<Vec<f64>>>()?;
            let (absorbing_mean, absorbing_std) = mean_std(&absorbing);
            Ok(AbsorptionRow {
                max_damping,
                reflective_mean,
                reflective_std,
                absorbing_mean,
                absorbing_std,
                retention_ratio: retention_ratio(reflective_mean, absorbing_mean),
            })
        })
        .collect()
}

// ── Drive noise ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSweep {
    /// Directly driven record; sigma_drive is overridden per point.
    pub base: OscillatorParams,
    pub sigma_drive_levels: Vec<f64>,
}

impl Default for NoiseSweep {
    fn default() -> Self {
        Self {
            base: OscillatorParams {
                q0: 1000.0,
                sigma_drive: 0.0,
                phase_jitter: 60.0,
                lock_gain: 3000.0,
                seed: 3,
                ..OscillatorParams::driven()
            },
            sigma_drive_levels: vec![0.0, 0.2, 0.4, 0.7, 1.0, 1.5, 2.0],
        }
    }
}

impl NoiseSweep {
    pub fn validate(&self) -> ResonanceResult<()> {
        require_axis("sigma_drive_levels", &self.sigma_drive_levels)?;
        self.base.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseRow {
    pub sigma_drive: f64,
    pub locked_energy: f64,
    pub unlocked_energy: f64,
    pub locked_efficiency: f64,
    pub unlocked_efficiency: f64,
}

impl NoiseRow {
    /// Row with the largest locked mean energy.
    pub fn loudest_locked(rows: &[NoiseRow]) -> Option<&NoiseRow> {
        rows.iter()
            .max_by(|a, b| a.locked_energy.total_cmp(&b.locked_energy))
    }

    /// Row with the largest unlocked mean energy.
    pub fn loudest_unlocked(rows: &[NoiseRow]) -> Option<&NoiseRow> {
        rows.iter()
            .max_by(|a, b| a.unlocked_energy.total_cmp(&b.unlocked_energy))
    }
}

pub fn noise_sweep(grid: &NoiseSweep) -> ResonanceResult<Vec<NoiseRow>> {
    grid.validate()?;
    log::info!("noise sweep: {} levels", grid.sigma_drive_levels.len());

    grid.sigma_drive_levels
        .par_iter()
        .map(|&sigma| -> ResonanceResult<NoiseRow> {
            let p = grid.base.clone().with_drive_noise(sigma);
            let locked = simulate(&p, LockMode::Locked)?;
            let unlocked = simulate(&p, LockMode::Unlocked)?;
            let efficiency = |r: &OscillatorReport| {
                r.power.map_or(0.0, |pm| pm.efficiency_proxy)
            };
            Ok(NoiseRow {
                sigma_drive: sigma,
                locked_energy: locked.summary.mean,
                unlocked_energy: unlocked.summary.mean,
                locked_efficiency: efficiency(&locked),
                unlocked_efficiency: efficiency(&unlocked),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_std_population() {
        let (m, s) = mean_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((m - 5.0).abs() < 1e-12);
        assert!((s - 2.0).abs() < 1e-12);
        assert_eq!(mean_std(&[]), (0.0, 0.0));
        assert_eq!(mean_std(&[3.5]), (3.5, 0.0));
    }

    #[test]
    fn test_default_grids_valid() {
        assert!(ParametricSweep::default().validate().is_ok());
        assert!(AbsorptionSweep::default().validate().is_ok());
        assert!(NoiseSweep::default().validate().is_ok());
        assert_eq!(ParametricSweep::default().points().len(), 54);
    }

    #[test]
    fn test_empty_axis_rejected() {
        let grid = ParametricSweep {
            seeds: vec![],
            ..ParametricSweep::default()
        };
        assert!(matches!(
            parametric_sweep(&grid),
            Err(ResonanceError::Config(_))
        ));
    }

    fn small_parametric() -> ParametricSweep {
        let defaults = ParametricSweep::default();
        ParametricSweep {
            base: OscillatorParams {
                duration: 0.4,
                ..defaults.base
            },
            quality_factors: vec![300.0],
            detunings: vec![1.0, 1.02],
            threshold_multiples: vec![0.9, 2.2],
            seeds: vec![11],
        }
    }

    #[test]
    fn test_parametric_rows_in_grid_order() {
        let grid = small_parametric();
        let rows = parametric_sweep(&grid).unwrap();
        let keys: Vec<(f64, f64)> = rows.iter().map(|r| (r.detune, r.m_over_thr)).collect();
        assert_eq!(keys, vec![(1.0, 0.9), (1.0, 2.2), (1.02, 0.9), (1.02, 2.2)]);
        for r in &rows {
            assert!((r.m - r.m_over_thr / 300.0).abs() < 1e-15);
            // Single seed: no spread.
            assert_eq!(r.gain_pct_std, 0.0);
            assert_eq!(r.growth_delta_std, 0.0);
        }
    }

    #[test]
    fn test_parametric_row_matches_direct_comparison() {
        let grid = small_parametric();
        let rows = parametric_sweep(&grid).unwrap();
        let p = grid
            .base
            .clone()
            .with_quality_factor(300.0)
            .with_detuning(1.02)
            .with_modulation_depth(2.2 / 300.0)
            .with_seed(11);
        let cmp = compare_lock(&p).unwrap();
        assert_eq!(rows[3].gain_pct_mean, cmp.energy_gain_pct);
        assert_eq!(rows[3].growth_delta_mean, cmp.growth_delta);
    }

    #[test]
    fn test_absorption_sweep_small_line() {
        let grid = AbsorptionSweep {
            base: FieldParams {
                extents: vec![150],
                steps: 1500,
                layer_len: 20,
                source: Some(vec![75]),
                ..FieldParams::default()
            },
            max_dampings: vec![0.0, 0.05],
            seeds: vec![3, 7],
        };
        let rows = absorption_sweep(&grid).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].max_damping, 0.0);
        assert_eq!(rows[0].reflective_mean, rows[1].reflective_mean);
        assert!(rows[1].retention_ratio > 1.0, "{:?}", rows[1]);
        assert!(rows.iter().all(|r| r.absorbing_mean > 0.0));
    }

    #[test]
    fn test_noise_sweep_lock_dominates() {
        let defaults = NoiseSweep::default();
        let grid = NoiseSweep {
            base: OscillatorParams {
                duration: 0.1,
                ..defaults.base
            },
            sigma_drive_levels: vec![0.0, 1.0],
        };
        let rows = noise_sweep(&grid).unwrap();
        assert_eq!(rows.len(), 2);
        for r in &rows {
            assert!(
                r.locked_energy > r.unlocked_energy,
                "σ={}: locked {} <= unlocked {}",
                r.sigma_drive,
                r.locked_energy,
                r.unlocked_energy
            );
            assert!((0.0..=2.0).contains(&r.locked_efficiency));
        }
        let best = NoiseRow::loudest_locked(&rows).unwrap();
        assert!(rows.iter().all(|r| r.locked_energy <= best.locked_energy));
        assert!(NoiseRow::loudest_unlocked(&[]).is_none());
    }

    #[test]
    fn test_sweep_config_from_json() {
        let grid: NoiseSweep =
            serde_json::from_str(r#"{"sigma_drive_levels": [0.5]}"#).unwrap();
        assert_eq!(grid.sigma_drive_levels, vec![0.5]);
        assert_eq!(grid.base.q0, 1000.0);
    }
}

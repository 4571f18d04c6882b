// ─────────────────────────────────────────────────────────────────────
// Resonance Kernel — Run Configuration
// ─────────────────────────────────────────────────────────────────────
//! Immutable parameter records for oscillator and field runs.
//!
//! A record is built once per run and never mutated by an integrator.
//! Derived scenarios copy and override with struct-update syntax or the
//! consuming `with_*` helpers:
//!
//! ```
//! use resonance_types::OscillatorParams;
//!
//! let base = OscillatorParams::default();
//! let stiff = OscillatorParams { q0: 600.0, ..base.clone() };
//! let pumped = base.with_modulation_depth(2.2 / 300.0);
//! assert_ne!(stiff.q0, pumped.q0);
//! ```

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::error::{ResonanceError, ResonanceResult};

/// Golden ratio φ.
pub const PHI: f64 = 1.618_033_988_749_895;

/// Default reference phase φπ (rad).
pub const PHI_PI: f64 = PHI * PI;

fn require_positive(name: &str, value: f64) -> ResonanceResult<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ResonanceError::Config(format!(
            "{name} must be > 0, got {value}"
        )));
    }
    Ok(())
}

fn require_non_negative(name: &str, value: f64) -> ResonanceResult<()> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(ResonanceError::Config(format!(
            "{name} must be >= 0, got {value}"
        )));
    }
    Ok(())
}

fn require_finite(name: &str, value: f64) -> ResonanceResult<()> {
    if !value.is_finite() {
        return Err(ResonanceError::Config(format!(
            "{name} must be finite, got {value}"
        )));
    }
    Ok(())
}

fn require_burn_in(value: f64) -> ResonanceResult<()> {
    if !(0.0..1.0).contains(&value) {
        return Err(ResonanceError::Config(format!(
            "burn_in_fraction must be in [0, 1), got {value}"
        )));
    }
    Ok(())
}

/// Starting phase error of the lock loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialPhase {
    /// Start at a fixed phase error (rad).
    Fixed(f64),
    /// Draw uniformly from [-π, π) as the run's first noise sample.
    Random,
}

impl Default for InitialPhase {
    fn default() -> Self {
        Self::Fixed(0.0)
    }
}

// ─── Oscillator ─────────────────────────────────────────────────────

/// Parameters of a damped, driven, optionally parametrically pumped
/// Duffing oscillator.
///
///   x¨ + 2γ_eff x˙ + [ω₀² + ω₀² m cos(2ω_d t + θ_pump)] x + β x³
///      = F₀ cos(ω_d t + θ_ref + δ) + noise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OscillatorParams {
    /// Natural frequency (Hz). ω₀ = 2π·f0.
    pub f0: f64,
    /// Quality factor. γ₀ = ω₀ / (2·q0).
    pub q0: f64,
    /// Cubic stiffness coefficient β.
    pub beta: f64,
    /// Drive frequency as a multiple of ω₀. The pump runs at twice this.
    pub omega_drive_ratio: f64,
    /// Parametric modulation depth m on the stiffness. 0 disables the pump.
    pub modulation_depth: f64,
    /// Direct forcing amplitude F₀. 0 disables direct drive.
    pub drive_amplitude: f64,
    /// Multiplicative damping fluctuation, one draw per step.
    pub sigma_gamma: f64,
    /// Additive acceleration noise, one draw per step.
    pub sigma_add: f64,
    /// Static noise on the drive (per √s).
    pub sigma_drive: f64,
    /// Phase-error diffusion (rad/√s).
    pub phase_jitter: f64,
    /// Restoring gain K of the lock loop (rad/s).
    pub lock_gain: f64,
    /// Coupling strength scaling damping and lock gain.
    pub field_strength: f64,
    /// Fraction of `field_strength` removed from the damping.
    pub field_damping_share: f64,
    /// Fraction of `field_strength` added to the lock gain.
    pub field_lock_share: f64,
    /// Target phase of the drive (rad).
    pub reference_phase: f64,
    /// Extra pump offset so that θ_pump = reference + δ + alignment.
    pub pump_alignment: f64,
    /// Negative damping subtracted from γ₀ (active gain).
    pub active_gain: f64,
    /// Time step (s).
    pub dt: f64,
    /// Simulated time (s).
    pub duration: f64,
    pub seed: u64,
    pub x0: f64,
    pub v0: f64,
    pub initial_phase: InitialPhase,
    /// Fraction of steps discarded before sampling diagnostics.
    pub burn_in_fraction: f64,
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            f0: 60.0,
            q0: 100.0,
            beta: 3.0e4,
            omega_drive_ratio: 1.0,
            modulation_depth: 0.012,
            drive_amplitude: 0.0,
            sigma_gamma: 0.0,
            sigma_add: 1e-4,
            sigma_drive: 0.0,
            phase_jitter: 30.0,
            lock_gain: 1500.0,
            field_strength: 0.7,
            field_damping_share: 0.6,
            field_lock_share: 1.0,
            reference_phase: PHI_PI,
            pump_alignment: PI - PHI_PI,
            active_gain: 0.0,
            dt: 2e-5,
            duration: 3.0,
            seed: 2,
            x0: 1e-6,
            v0: 0.0,
            initial_phase: InitialPhase::Fixed(0.0),
            burn_in_fraction: 0.5,
        }
    }
}

impl OscillatorParams {
    /// Directly driven resonator under drive static and strong phase chaos.
    pub fn driven() -> Self {
        Self {
            q0: 300.0,
            beta: 5e3,
            modulation_depth: 0.0,
            drive_amplitude: 1.0,
            sigma_add: 0.0,
            sigma_drive: 0.5,
            phase_jitter: 40.0,
            lock_gain: 1000.0,
            duration: 0.6,
            seed: 1,
            x0: 0.0,
            initial_phase: InitialPhase::Random,
            ..Self::default()
        }
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> ResonanceResult<()> {
        require_positive("f0", self.f0)?;
        require_positive("q0", self.q0)?;
        require_positive("dt", self.dt)?;
        require_positive("duration", self.duration)?;
        require_positive("omega_drive_ratio", self.omega_drive_ratio)?;
        require_finite("beta", self.beta)?;
        require_finite("modulation_depth", self.modulation_depth)?;
        require_finite("drive_amplitude", self.drive_amplitude)?;
        require_non_negative("sigma_gamma", self.sigma_gamma)?;
        require_non_negative("sigma_add", self.sigma_add)?;
        require_non_negative("sigma_drive", self.sigma_drive)?;
        require_non_negative("phase_jitter", self.phase_jitter)?;
        require_non_negative("lock_gain", self.lock_gain)?;
        require_non_negative("active_gain", self.active_gain)?;
        require_finite("field_strength", self.field_strength)?;
        require_finite("field_damping_share", self.field_damping_share)?;
        require_finite("field_lock_share", self.field_lock_share)?;
        require_finite("reference_phase", self.reference_phase)?;
        require_finite("pump_alignment", self.pump_alignment)?;
        require_finite("x0", self.x0)?;
        require_finite("v0", self.v0)?;
        if let InitialPhase::Fixed(delta) = self.initial_phase {
            require_finite("initial_phase", delta)?;
        }
        require_burn_in(self.burn_in_fraction)?;
        if self.n_steps() == 0 {
            return Err(ResonanceError::Config(format!(
                "duration {} shorter than one step of {}",
                self.duration, self.dt
            )));
        }
        Ok(())
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> ResonanceResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ResonanceError::Config(format!("JSON parse error: {e}")))
    }

    /// Number of integration steps, ⌊duration / dt⌋.
    pub fn n_steps(&self) -> usize {
        (self.duration / self.dt) as usize
    }

    /// ω₀ (rad/s).
    pub fn omega0(&self) -> f64 {
        TAU * self.f0
    }

    /// ω_d (rad/s).
    pub fn omega_drive(&self) -> f64 {
        self.omega_drive_ratio * self.omega0()
    }

    /// Baseline damping γ₀ after field coupling, floored at 0.
    pub fn base_damping(&self) -> f64 {
        let gamma0 = self.omega0() / (2.0 * self.q0);
        (gamma0 * (1.0 - self.field_strength * self.field_damping_share)).max(0.0)
    }

    /// Lock gain after field coupling.
    pub fn coupled_lock_gain(&self) -> f64 {
        self.lock_gain * (1.0 + self.field_strength * self.field_lock_share)
    }

    /// Canonical parametric threshold estimate m_thr ≈ 1/Q₀.
    pub fn parametric_threshold(&self) -> f64 {
        1.0 / self.q0
    }

    /// Whether the run carries a drive term whose power is worth reporting.
    pub fn has_direct_drive(&self) -> bool {
        self.drive_amplitude != 0.0 || self.sigma_drive != 0.0
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }

    pub fn with_modulation_depth(self, modulation_depth: f64) -> Self {
        Self {
            modulation_depth,
            ..self
        }
    }

    pub fn with_quality_factor(self, q0: f64) -> Self {
        Self { q0, ..self }
    }

    pub fn with_detuning(self, omega_drive_ratio: f64) -> Self {
        Self {
            omega_drive_ratio,
            ..self
        }
    }

    pub fn with_drive_noise(self, sigma_drive: f64) -> Self {
        Self {
            sigma_drive,
            ..self
        }
    }
}

// ─── Field ──────────────────────────────────────────────────────────

/// Parameters of a damped scalar wave field on a 1-D/2-D/3-D grid with
/// a single phase-driven point source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldParams {
    /// Nodes per axis (1 to 3 axes, each at least 3 nodes).
    pub extents: Vec<usize>,
    pub wave_speed: f64,
    pub dx: f64,
    pub dt: f64,
    pub steps: usize,
    /// Baseline damping γ of every node.
    pub gamma_interior: f64,
    /// Absorbing layer thickness L (nodes).
    pub layer_len: usize,
    /// Extra damping at the outermost node of the absorbing layer.
    pub layer_max_damping: f64,
    /// Source node coordinates. `None` places it at the grid centre.
    pub source: Option<Vec<usize>>,
    /// Source amplitude A.
    pub amplitude: f64,
    /// Source frequency in cycles per step.
    pub cycles_per_step: f64,
    /// Multiplier on the source angular frequency.
    pub detune: f64,
    /// Relative amplitude noise of the source.
    pub sigma_amp: f64,
    /// Phase diffusion (rad/√time).
    pub phase_jitter: f64,
    /// Lock gain K used by locked runs.
    pub lock_gain: f64,
    pub reference_phase: f64,
    pub seed: u64,
    pub burn_in_fraction: f64,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            extents: vec![600],
            wave_speed: 1.0,
            dx: 1.0,
            dt: 0.5,
            steps: 9000,
            gamma_interior: 1e-3,
            layer_len: 80,
            layer_max_damping: 0.02,
            source: Some(vec![60]),
            amplitude: 0.6,
            cycles_per_step: 0.02,
            detune: 1.0,
            sigma_amp: 0.10,
            phase_jitter: 0.02 / 0.5f64.sqrt(),
            lock_gain: 0.3,
            reference_phase: PHI_PI,
            seed: 4,
            burn_in_fraction: 0.5,
        }
    }
}

impl FieldParams {
    /// 60×24 membrane, source at the centre.
    pub fn plane_2d() -> Self {
        Self {
            extents: vec![60, 24],
            dt: 0.45,
            gamma_interior: 1.5e-3,
            layer_len: 6,
            layer_max_damping: 0.05,
            source: None,
            amplitude: 0.8,
            phase_jitter: 0.02 / 0.45f64.sqrt(),
            steps: 2000,
            seed: 7,
            ..Self::default()
        }
    }

    /// 22³ cube, source at the centre.
    pub fn cube_3d() -> Self {
        Self {
            extents: vec![22, 22, 22],
            dt: 0.35,
            steps: 700,
            gamma_interior: 2e-3,
            layer_len: 3,
            layer_max_damping: 0.06,
            source: None,
            amplitude: 0.7,
            phase_jitter: 0.02 / 0.35f64.sqrt(),
            seed: 5,
            ..Self::default()
        }
    }

    /// Number of active axes.
    pub fn dims(&self) -> usize {
        self.extents.len()
    }

    /// Courant number r = c·dt/dx.
    pub fn courant_number(&self) -> f64 {
        self.wave_speed * self.dt / self.dx
    }

    /// Stability bound 1/√dims of the explicit scheme.
    pub fn courant_limit(&self) -> f64 {
        1.0 / (self.dims().max(1) as f64).sqrt()
    }

    /// Validate configuration parameters, including the Courant bound.
    pub fn validate(&self) -> ResonanceResult<()> {
        if self.extents.is_empty() || self.extents.len() > 3 {
            return Err(ResonanceError::Grid(format!(
                "grid must have 1 to 3 axes, got {}",
                self.extents.len()
            )));
        }
        if let Some(n) = self.extents.iter().copied().find(|&n| n < 3) {
            return Err(ResonanceError::Grid(format!(
                "every axis needs at least 3 nodes, got {n}"
            )));
        }
        if let Some(src) = &self.source {
            if src.len() != self.dims() {
                return Err(ResonanceError::Grid(format!(
                    "source has {} coordinates for a {}-D grid",
                    src.len(),
                    self.dims()
                )));
            }
        }
        require_positive("wave_speed", self.wave_speed)?;
        require_positive("dx", self.dx)?;
        require_positive("dt", self.dt)?;
        if self.steps == 0 {
            return Err(ResonanceError::Config("steps must be >= 1".to_string()));
        }
        require_non_negative("gamma_interior", self.gamma_interior)?;
        require_non_negative("layer_max_damping", self.layer_max_damping)?;
        require_finite("amplitude", self.amplitude)?;
        require_non_negative("cycles_per_step", self.cycles_per_step)?;
        require_finite("detune", self.detune)?;
        require_non_negative("sigma_amp", self.sigma_amp)?;
        require_non_negative("phase_jitter", self.phase_jitter)?;
        require_non_negative("lock_gain", self.lock_gain)?;
        require_finite("reference_phase", self.reference_phase)?;
        require_burn_in(self.burn_in_fraction)?;

        let courant = self.courant_number();
        let limit = self.courant_limit();
        if courant > limit {
            return Err(ResonanceError::Stability {
                courant,
                limit,
                dims: self.dims(),
            });
        }
        Ok(())
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> ResonanceResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ResonanceError::Config(format!("JSON parse error: {e}")))
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }

    pub fn with_max_damping(self, layer_max_damping: f64) -> Self {
        Self {
            layer_max_damping,
            ..self
        }
    }

    pub fn with_steps(self, steps: usize) -> Self {
        Self { steps, ..self }
    }
}

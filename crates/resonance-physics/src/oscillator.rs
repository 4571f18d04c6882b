// ─────────────────────────────────────────────────────────────────────
// Resonance Kernel — Oscillator Integrator
// ─────────────────────────────────────────────────────────────────────
//! Classical RK4 stepper for a damped, driven Duffing resonator with an
//! optional parametric pump at twice the drive frequency:
//!
//!   a(t, x, v) = −2γ_eff·v − (ω₀² + k_mod(t))·x − β·x³ + F(t) + η
//!
//!   γ_eff    = max(0, γ₀ − G) + σ_γ·ξ
//!   k_mod(t) = ω₀²·m·cos(2ω_d t + θ_ref + δ + θ_align)
//!   F(t)     = F₀·cos(ω_d t + θ_ref + δ) + σ_F·√dt·ξ
//!   η        = σ_a·ξ
//!
//! Noise terms and δ are sampled once per step and held fixed across the
//! four RK stages. The pump and drive phases use stage time.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use resonance_types::{
    InitialPhase, OscillatorParams, OscillatorReport, PowerMetrics, ResonanceResult,
};

use crate::diagnostics::{DiagnosticSample, DiagnosticsCollector};
use crate::noise::NoiseSource;
use crate::phase_lock::{LockMode, PhaseLockController};

/// Snapshot of the resonator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OscillatorState {
    pub x: f64,
    pub v: f64,
    pub phase_error: f64,
    pub t: f64,
    pub step_count: u64,
}

/// Terms held fixed for the duration of one step.
#[derive(Debug, Clone, Copy)]
struct StepForcing {
    gamma_eff: f64,
    accel_noise: f64,
    drive_noise: f64,
    drive_phase: f64,
    pump_phase: f64,
}

#[derive(Debug, Clone, Copy, Default)]
struct PowerAccumulator {
    input: f64,
    dissipated: f64,
    count: usize,
}

/// Single-run integrator. Owns its state, lock loop, and generator.
pub struct OscillatorIntegrator {
    params: OscillatorParams,
    omega0: f64,
    omega0_sq: f64,
    omega_d: f64,
    gamma0: f64,
    damping_floor: f64,
    n_steps: usize,
    state: OscillatorState,
    controller: PhaseLockController,
    noise: NoiseSource,
    diagnostics: DiagnosticsCollector,
    power: Option<PowerAccumulator>,
}

impl OscillatorIntegrator {
    /// Validate `params` and seed a fresh run. Fails before any stepping.
    pub fn new(params: &OscillatorParams, mode: LockMode) -> ResonanceResult<Self> {
        params.validate()?;

        let mut noise = NoiseSource::new(params.seed);
        let delta0 = match params.initial_phase {
            InitialPhase::Fixed(delta) => delta,
            InitialPhase::Random => (noise.uniform() - 0.5) * TAU,
        };

        let omega0 = params.omega0();
        let gamma0 = params.base_damping();
        let damping_floor = (gamma0 - params.active_gain).max(0.0);
        let controller = PhaseLockController::new(
            mode,
            params.coupled_lock_gain(),
            params.phase_jitter,
            delta0,
        );
        let n_steps = params.n_steps();

        log::debug!(
            "oscillator: ω0={omega0:.3} γ0={gamma0:.4e} K_eff={:.1} steps={n_steps} mode={mode:?}",
            controller.effective_gain()
        );

        Ok(Self {
            omega0,
            omega0_sq: omega0 * omega0,
            omega_d: params.omega_drive(),
            gamma0,
            damping_floor,
            n_steps,
            state: OscillatorState {
                x: params.x0,
                v: params.v0,
                phase_error: delta0,
                t: 0.0,
                step_count: 0,
            },
            controller,
            noise,
            diagnostics: DiagnosticsCollector::new(n_steps, params.burn_in_fraction),
            power: params.has_direct_drive().then(PowerAccumulator::default),
            params: params.clone(),
        })
    }

    pub fn params(&self) -> &OscillatorParams {
        &self.params
    }

    pub fn state(&self) -> OscillatorState {
        self.state
    }

    pub fn diagnostics(&self) -> &DiagnosticsCollector {
        &self.diagnostics
    }

    /// Total configured steps.
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    pub fn is_finished(&self) -> bool {
        self.state.step_count as usize >= self.n_steps
    }

    /// E = ½v² + ½ω₀²x² + ¼βx⁴, always against the unmodulated ω₀.
    #[inline]
    pub fn energy_of(&self, x: f64, v: f64) -> f64 {
        let x2 = x * x;
        0.5 * v * v + 0.5 * self.omega0_sq * x2 + 0.25 * self.params.beta * x2 * x2
    }

    pub fn energy(&self) -> f64 {
        self.energy_of(self.state.x, self.state.v)
    }

    /// Acceleration and drive force at stage time `t`.
    #[inline]
    fn acceleration(&self, t: f64, x: f64, v: f64, f: &StepForcing) -> (f64, f64) {
        let p = &self.params;
        let k_mod = if p.modulation_depth != 0.0 {
            self.omega0_sq * p.modulation_depth * (2.0 * self.omega_d * t + f.pump_phase).cos()
        } else {
            0.0
        };
        let drive = if p.drive_amplitude != 0.0 {
            p.drive_amplitude * (self.omega_d * t + f.drive_phase).cos()
        } else {
            0.0
        } + f.drive_noise;
        let a = -2.0 * f.gamma_eff * v - (self.omega0_sq + k_mod) * x - p.beta * x * x * x
            + drive
            + f.accel_noise;
        (a, drive)
    }

    /// Advance one step. Draws, in order: phase jitter, damping noise,
    /// additive noise, drive noise.
    pub fn step(&mut self) -> OscillatorState {
        let dt = self.params.dt;
        let n = self.state.step_count;
        let t = n as f64 * dt;

        let delta = self.controller.step(dt, &mut self.noise);
        let gamma_eff = self.damping_floor + self.noise.gaussian(self.params.sigma_gamma);
        let accel_noise = self.noise.gaussian(self.params.sigma_add);
        let drive_noise = self.noise.wiener_increment(self.params.sigma_drive, dt);

        let drive_phase = self.params.reference_phase + delta;
        let forcing = StepForcing {
            gamma_eff,
            accel_noise,
            drive_noise,
            drive_phase,
            pump_phase: drive_phase + self.params.pump_alignment,
        };

        let OscillatorState { x, v, .. } = self.state;
        let half = 0.5 * dt;

        let (a1, d1) = self.acceleration(t, x, v, &forcing);
        let (x2, v2) = (x + half * v, v + half * a1);
        let (a2, d2) = self.acceleration(t + half, x2, v2, &forcing);
        let (x3, v3) = (x + half * v2, v + half * a2);
        let (a3, d3) = self.acceleration(t + half, x3, v3, &forcing);
        let (x4, v4) = (x + dt * v3, v + dt * a3);
        let (a4, d4) = self.acceleration(t + dt, x4, v4, &forcing);

        let x_new = x + (dt / 6.0) * (v + 2.0 * v2 + 2.0 * v3 + v4);
        let v_new = v + (dt / 6.0) * (a1 + 2.0 * a2 + 2.0 * a3 + a4);

        self.state = OscillatorState {
            x: x_new,
            v: v_new,
            phase_error: delta,
            t: (n + 1) as f64 * dt,
            step_count: n + 1,
        };

        let sample = DiagnosticSample {
            energy: self.energy_of(x_new, v_new),
            amplitude_sq: x_new * x_new,
        };
        if self.diagnostics.record(n as usize, sample) {
            if let Some(acc) = self.power.as_mut() {
                let drive = (d1 + 2.0 * d2 + 2.0 * d3 + d4) / 6.0;
                acc.input += drive * v_new;
                acc.dissipated += 2.0 * gamma_eff * v_new * v_new;
                acc.count += 1;
            }
        }

        self.state
    }

    /// Step until the configured step count is reached.
    pub fn run(&mut self) -> OscillatorReport {
        while !self.is_finished() {
            self.step();
        }
        let report = self.report();
        if !report.summary.is_finite() {
            log::warn!(
                "oscillator run diverged: mean energy {} after {} steps",
                report.summary.mean,
                self.n_steps
            );
        }
        log::debug!(
            "oscillator done: E_avg={:.4e} growth={:.3} samples={}",
            report.summary.mean,
            report.summary.growth_ratio,
            report.summary.samples
        );
        report
    }

    /// Metrics over the samples collected so far.
    pub fn report(&self) -> OscillatorReport {
        let power = self.power.map(|acc| {
            let n = acc.count.max(1) as f64;
            PowerMetrics::new(acc.input / n, acc.dissipated / n)
        });
        OscillatorReport {
            locked: self.controller.mode().is_locked(),
            summary: self.diagnostics.summary(),
            power,
            gamma: self.gamma0,
            lock_gain: self.controller.effective_gain(),
            omega0: self.omega0,
            omega_drive: self.omega_d,
            final_phase_error: self.controller.phase_error(),
        }
    }
}

/// Build, run, and report a single oscillator scenario.
pub fn simulate(params: &OscillatorParams, mode: LockMode) -> ResonanceResult<OscillatorReport> {
    Ok(OscillatorIntegrator::new(params, mode)?.run())
}

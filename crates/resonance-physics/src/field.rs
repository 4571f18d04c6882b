// ─────────────────────────────────────────────────────────────────────
// Resonance Kernel — Field Integrator
// ─────────────────────────────────────────────────────────────────────
//! Explicit central-difference stepper for a damped scalar wave field on
//! a 1-D/2-D/3-D grid:
//!
//!   u⁺ = (2 − 2γ·dt)·u − (1 − γ·dt)·u⁻ + r²·∇²u
//!
//! with r = c·dt/dx and the 2/4/6-neighbour Laplacian. A single source
//! node receives dt²·A·(1 + σ_A·ξ)·sin(ω·n + θ_ref + δ) where δ follows
//! the phase-lock law. The outermost ring is owned by the
//! [`BoundaryPolicy`]; three buffers are rotated in place every step.

use std::f64::consts::TAU;

use resonance_types::{FieldParams, FieldReport, ResonanceError, ResonanceResult};

use crate::boundary::{BoundaryPolicy, DampingProfile, EdgeRing};
use crate::diagnostics::{DiagnosticSample, DiagnosticsCollector};
use crate::grid::GridShape;
use crate::noise::NoiseSource;
use crate::phase_lock::{LockMode, PhaseLockController};

/// Three time slices of the field. After [`FieldState::rotate`],
/// `current` holds the most recently completed step and `prev` the one
/// before it; `next` is scratch.
#[derive(Debug, Clone)]
pub struct FieldState {
    prev: Vec<f64>,
    current: Vec<f64>,
    next: Vec<f64>,
}

impl FieldState {
    pub fn zeros(len: usize) -> Self {
        Self {
            prev: vec![0.0; len],
            current: vec![0.0; len],
            next: vec![0.0; len],
        }
    }

    pub fn prev(&self) -> &[f64] {
        &self.prev
    }

    pub fn current(&self) -> &[f64] {
        &self.current
    }

    /// prev ← current, current ← next. No allocation.
    #[inline]
    pub fn rotate(&mut self) {
        std::mem::swap(&mut self.prev, &mut self.current);
        std::mem::swap(&mut self.current, &mut self.next);
    }
}

/// Read-only view of the current slice, handed to observers.
#[derive(Debug, Clone, Copy)]
pub struct FieldView<'a> {
    shape: &'a GridShape,
    data: &'a [f64],
}

impl<'a> FieldView<'a> {
    pub fn shape(&self) -> &'a GridShape {
        self.shape
    }

    pub fn as_slice(&self) -> &'a [f64] {
        self.data
    }

    /// Value at `coords` (one entry per active axis), `None` if outside.
    pub fn get(&self, coords: &[usize]) -> Option<f64> {
        let c = self.shape.pad(coords).ok()?;
        if (0..self.shape.dims()).any(|a| c[a] >= self.shape.extents()[a]) {
            return None;
        }
        self.data.get(self.shape.index(c)).copied()
    }
}

pub struct FieldIntegrator {
    params: FieldParams,
    shape: GridShape,
    policy: BoundaryPolicy,
    damping: DampingProfile,
    ring: EdgeRing,
    interior: Vec<usize>,
    source: usize,
    state: FieldState,
    controller: PhaseLockController,
    noise: NoiseSource,
    diagnostics: DiagnosticsCollector,
    courant_sq: f64,
    omega: f64,
    step_count: usize,
}

impl FieldIntegrator {
    /// Validate `params` (including the Courant bound) and build a zeroed
    /// field. Fails before any stepping.
    pub fn new(
        params: &FieldParams,
        policy: BoundaryPolicy,
        mode: LockMode,
    ) -> ResonanceResult<Self> {
        params.validate()?;
        let shape = GridShape::new(&params.extents)?;

        let source = match &params.source {
            Some(coords) => {
                let c = shape.pad(coords)?;
                if let Some(a) = (0..shape.dims()).find(|&a| c[a] >= shape.extents()[a]) {
                    return Err(ResonanceError::Grid(format!(
                        "source coordinate {} outside axis {a} of extent {}",
                        c[a],
                        shape.extents()[a]
                    )));
                }
                shape.index(shape.clamp_interior(c))
            }
            None => shape.index(shape.clamp_interior(shape.centre())),
        };

        let [ri, rj, rk] = shape.interior_ranges();
        let mut interior = Vec::with_capacity(shape.interior_len());
        for k in rk {
            for j in rj.clone() {
                for i in ri.clone() {
                    interior.push(shape.index([i, j, k]));
                }
            }
        }

        let damping = policy.profile(&shape, params.gamma_interior);
        let ring = EdgeRing::new(&shape);
        let courant = params.courant_number();
        let controller =
            PhaseLockController::new(mode, params.lock_gain, params.phase_jitter, 0.0);

        log::debug!(
            "field: {}-D {:?} nodes={} r={courant:.3} boundary={} mode={mode:?}",
            shape.dims(),
            shape.extents(),
            shape.len(),
            policy.name()
        );

        Ok(Self {
            state: FieldState::zeros(shape.len()),
            diagnostics: DiagnosticsCollector::new(params.steps, params.burn_in_fraction),
            noise: NoiseSource::new(params.seed),
            courant_sq: courant * courant,
            omega: TAU * params.cycles_per_step * params.detune,
            step_count: 0,
            params: params.clone(),
            shape,
            policy,
            damping,
            ring,
            interior,
            source,
            controller,
        })
    }

    pub fn shape(&self) -> &GridShape {
        &self.shape
    }

    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn damping(&self) -> &DampingProfile {
        &self.damping
    }

    pub fn diagnostics(&self) -> &DiagnosticsCollector {
        &self.diagnostics
    }

    /// Linear index of the driven node.
    pub fn source_index(&self) -> usize {
        self.source
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn is_finished(&self) -> bool {
        self.step_count >= self.params.steps
    }

    pub fn view(&self) -> FieldView<'_> {
        FieldView {
            shape: &self.shape,
            data: &self.state.current,
        }
    }

    /// ½·Σ(v² + c²|∇u|²)·dxᵈ over interior nodes, with v = (u − u⁻)/dt and
    /// centred-difference gradients.
    pub fn energy(&self) -> f64 {
        let u = &self.state.current;
        let u_prev = &self.state.prev;
        let inv_dt = 1.0 / self.params.dt;
        let inv_2dx = 0.5 / self.params.dx;
        let c2 = self.params.wave_speed * self.params.wave_speed;
        let strides = self.shape.strides();

        let sum: f64 = self
            .interior
            .iter()
            .map(|&idx| {
                let v = (u[idx] - u_prev[idx]) * inv_dt;
                let grad_sq: f64 = strides
                    .iter()
                    .map(|&s| {
                        let g = (u[idx + s] - u[idx - s]) * inv_2dx;
                        g * g
                    })
                    .sum();
                v * v + c2 * grad_sq
            })
            .sum();
        let cell_volume = self.params.dx.powi(self.shape.dims() as i32);
        0.5 * sum * cell_volume
    }

    /// Mean u² over interior nodes.
    pub fn mean_sq_amplitude(&self) -> f64 {
        let u = &self.state.current;
        let sum: f64 = self.interior.iter().map(|&idx| u[idx] * u[idx]).sum();
        sum / self.interior.len().max(1) as f64
    }

    /// Advance one step. Draws, in order: phase jitter, amplitude noise.
    pub fn step(&mut self) {
        let dt = self.params.dt;
        let n = self.step_count;

        let phase = self.params.reference_phase + self.controller.step(dt, &mut self.noise);
        let amp_noise = self.noise.gaussian(self.params.sigma_amp);

        let strides = self.shape.strides();
        let r2 = self.courant_sq;
        let FieldState {
            prev,
            current,
            next,
        } = &mut self.state;

        for &idx in &self.interior {
            let u = current[idx];
            let lap: f64 = strides
                .iter()
                .map(|&s| current[idx + s] + current[idx - s] - 2.0 * u)
                .sum();
            let g_dt = self.damping.get(idx) * dt;
            next[idx] = (2.0 - 2.0 * g_dt) * u - (1.0 - g_dt) * prev[idx] + r2 * lap;
        }

        next[self.source] += dt
            * dt
            * self.params.amplitude
            * (1.0 + amp_noise)
            * (self.omega * n as f64 + phase).sin();

        self.policy.apply_edges(&self.ring, current, next);
        self.state.rotate();
        self.step_count = n + 1;

        if self.diagnostics.is_sampling(n) {
            let sample = DiagnosticSample {
                energy: self.energy(),
                amplitude_sq: self.mean_sq_amplitude(),
            };
            self.diagnostics.record(n, sample);
        }
    }

    /// Run the configured step count.
    pub fn run(&mut self) -> FieldReport {
        self.run_observed(|_, _| {})
    }

    /// Run the configured step count, handing every completed step to
    /// `observer` as a read-only view.
    pub fn run_observed<F>(&mut self, mut observer: F) -> FieldReport
    where
        F: FnMut(usize, FieldView<'_>),
    {
        while !self.is_finished() {
            self.step();
            observer(self.step_count, self.view());
        }
        let report = self.report();
        if !report.summary.is_finite() {
            log::warn!(
                "field run diverged ({} boundary): mean energy {}",
                report.boundary,
                report.summary.mean
            );
        }
        log::debug!(
            "field done: boundary={} E_avg={:.4e} samples={}",
            report.boundary,
            report.summary.mean,
            report.summary.samples
        );
        report
    }

    pub fn report(&self) -> FieldReport {
        FieldReport {
            boundary: self.policy.name().to_string(),
            locked: self.controller.mode().is_locked(),
            summary: self.diagnostics.summary(),
            courant: self.params.courant_number(),
            final_phase_error: self.controller.phase_error(),
        }
    }
}

/// Build, run, and report a single field scenario.
pub fn simulate_field(
    params: &FieldParams,
    policy: BoundaryPolicy,
    mode: LockMode,
) -> ResonanceResult<FieldReport> {
    Ok(FieldIntegrator::new(params, policy, mode)?.run())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_1d() -> FieldParams {
        FieldParams {
            extents: vec![120],
            steps: 600,
            layer_len: 15,
            source: Some(vec![30]),
            ..FieldParams::default()
        }
    }

    #[test]
    fn test_rotation_keeps_history() {
        let mut f =
            FieldIntegrator::new(&small_1d(), BoundaryPolicy::Reflective, LockMode::Locked)
                .unwrap();
        for _ in 0..20 {
            f.step();
        }
        let before = f.state().current().to_vec();
        f.step();
        assert_eq!(f.state().prev(), before.as_slice());
        assert_eq!(f.step_count(), 21);
    }

    #[test]
    fn test_field_state_rotate() {
        let mut s = FieldState::zeros(3);
        s.current[1] = 1.0;
        s.next[1] = 2.0;
        s.rotate();
        assert_eq!(s.prev()[1], 1.0);
        assert_eq!(s.current()[1], 2.0);
    }

    #[test]
    fn test_courant_rejected_every_dimension() {
        for extents in [vec![40], vec![12, 12], vec![8, 8, 8]] {
            let dims = extents.len();
            let p = FieldParams {
                extents,
                source: None,
                dt: 1.0 / (dims as f64).sqrt() + 0.01,
                ..FieldParams::default()
            };
            let err = FieldIntegrator::new(&p, BoundaryPolicy::Reflective, LockMode::Locked);
            assert!(
                matches!(err, Err(ResonanceError::Stability { dims: d, .. }) if d == dims),
                "{dims}-D Courant violation not rejected"
            );
        }
    }

    #[test]
    fn test_source_placement() {
        let on_ring = FieldParams {
            source: Some(vec![0]),
            ..small_1d()
        };
        let f = FieldIntegrator::new(&on_ring, BoundaryPolicy::Reflective, LockMode::Locked)
            .unwrap();
        assert_eq!(f.source_index(), 1);

        let outside = FieldParams {
            source: Some(vec![500]),
            ..small_1d()
        };
        assert!(matches!(
            FieldIntegrator::new(&outside, BoundaryPolicy::Reflective, LockMode::Locked),
            Err(ResonanceError::Grid(_))
        ));

        let centred = FieldIntegrator::new(
            &FieldParams::plane_2d(),
            BoundaryPolicy::Reflective,
            LockMode::Locked,
        )
        .unwrap();
        assert_eq!(centred.source_index(), centred.shape().index([30, 12, 0]));
    }

    #[test]
    fn test_undriven_field_stays_silent() {
        let p = FieldParams {
            amplitude: 0.0,
            ..small_1d()
        };
        let mut f = FieldIntegrator::new(&p, BoundaryPolicy::Reflective, LockMode::Locked).unwrap();
        let report = f.run();
        assert_eq!(report.summary.mean, 0.0);
        assert!(f.state().current().iter().all(|&u| u == 0.0));
    }

    #[test]
    fn test_deterministic_runs() {
        let p = small_1d();
        let policy = BoundaryPolicy::absorbing_from(&p);
        let a = simulate_field(&p, policy, LockMode::Unlocked).unwrap();
        let b = simulate_field(&p, policy, LockMode::Unlocked).unwrap();
        assert_eq!(a, b);
        assert!(a.summary.mean > 0.0);
    }

    #[test]
    fn test_reflective_edges_pinned_to_zero() {
        let p = FieldParams::plane_2d().with_steps(200);
        let mut f = FieldIntegrator::new(&p, BoundaryPolicy::Reflective, LockMode::Locked).unwrap();
        let ring: Vec<usize> = EdgeRing::new(f.shape()).nodes().collect();
        let mut checked = 0usize;
        f.run_observed(|_, view| {
            let data = view.as_slice();
            assert!(ring.iter().all(|&i| data[i] == 0.0));
            checked += 1;
        });
        assert_eq!(checked, 200);
    }

    #[test]
    fn test_absorbing_edge_copies_inner_node() {
        let p = small_1d();
        let mut f =
            FieldIntegrator::new(&p, BoundaryPolicy::absorbing_from(&p), LockMode::Locked)
                .unwrap();
        for _ in 0..300 {
            let inner_left = f.view().as_slice()[1];
            let inner_right = f.view().as_slice()[118];
            f.step();
            assert_eq!(f.view().as_slice()[0], inner_left);
            assert_eq!(f.view().as_slice()[119], inner_right);
        }
    }

    #[test]
    fn test_view_lookup() {
        let p = FieldParams::cube_3d().with_steps(10);
        let mut f = FieldIntegrator::new(&p, BoundaryPolicy::Reflective, LockMode::Locked).unwrap();
        f.run();
        let view = f.view();
        let src = f.shape().coords(f.source_index());
        assert_eq!(view.get(&src[..3]), Some(view.as_slice()[f.source_index()]));
        assert_eq!(view.get(&[22, 0, 0]), None);
        assert_eq!(view.get(&[1, 1]), None);
    }

    #[test]
    fn test_confinement_retains_more_energy() {
        let p = FieldParams::default();
        let reflective = simulate_field(&p, BoundaryPolicy::Reflective, LockMode::Locked).unwrap();
        let absorbing =
            simulate_field(&p, BoundaryPolicy::absorbing_from(&p), LockMode::Locked).unwrap();
        let ratio = reflective.summary.mean / absorbing.summary.mean;
        assert!(ratio > 1.0, "reflective/absorbing energy ratio {ratio}");
    }

    #[test]
    fn test_multidimensional_runs_finite() {
        for p in [
            FieldParams::plane_2d().with_steps(300),
            FieldParams::cube_3d().with_steps(120),
        ] {
            let steps = p.steps;
            for policy in [BoundaryPolicy::Reflective, BoundaryPolicy::absorbing_from(&p)] {
                let r = simulate_field(&p, policy, LockMode::Locked).unwrap();
                assert!(r.summary.is_finite(), "{:?} {}", p.extents, r.boundary);
                assert!(r.summary.mean > 0.0);
                assert_eq!(r.summary.samples, steps - steps / 2 - 1);
            }
        }
    }

    #[test]
    fn test_energy_of_uniform_translation_is_zero() {
        let p = FieldParams {
            amplitude: 0.0,
            ..small_1d()
        };
        let mut f = FieldIntegrator::new(&p, BoundaryPolicy::Reflective, LockMode::Locked).unwrap();
        f.state.prev.fill(0.5);
        f.state.current.fill(0.5);
        assert_eq!(f.energy(), 0.0);
        assert!((f.mean_sq_amplitude() - 0.25).abs() < 1e-15);
    }
}

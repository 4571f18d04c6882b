// ─────────────────────────────────────────────────────────────────────
// Resonance Kernel — Integrator Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks for the hot loops:
//!   - Noise draws and the phase-lock step
//!   - Oscillator RK4 step and short runs
//!   - Field step in 1-D, 2-D and 3-D for both boundary policies
//!   - Field energy functional

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use resonance_physics::{
    BoundaryPolicy, FieldIntegrator, LockMode, NoiseSource, OscillatorIntegrator,
    PhaseLockController,
};
use resonance_types::{FieldParams, OscillatorParams};

// ── Helpers ───────────────────────────────────────────────────────────

/// Step budget that a benchmark never exhausts, with sampling never reached.
fn unbounded(params: FieldParams) -> FieldParams {
    FieldParams {
        steps: 1 << 40,
        burn_in_fraction: 0.99,
        ..params
    }
}

fn make_field(params: &FieldParams, policy: BoundaryPolicy) -> FieldIntegrator {
    let mut field = match FieldIntegrator::new(params, policy, LockMode::Locked) {
        Ok(f) => f,
        Err(e) => panic!("bench field params invalid: {e}"),
    };
    // Fill the grid so the stencil sees non-zero data.
    for _ in 0..50 {
        field.step();
    }
    field
}

fn make_oscillator(params: &OscillatorParams) -> OscillatorIntegrator {
    match OscillatorIntegrator::new(params, LockMode::Locked) {
        Ok(o) => o,
        Err(e) => panic!("bench oscillator params invalid: {e}"),
    }
}

// ── Noise / phase lock ───────────────────────────────────────────────

fn bench_standard_normal(c: &mut Criterion) {
    let mut noise = NoiseSource::new(42);
    c.bench_function("noise_standard_normal", |b| {
        b.iter(|| noise.standard_normal())
    });
}

fn bench_phase_lock_step(c: &mut Criterion) {
    let mut noise = NoiseSource::new(42);
    let mut pll = PhaseLockController::new(LockMode::Locked, 2550.0, 30.0, 0.3);
    c.bench_function("phase_lock_step", |b| {
        b.iter(|| pll.step(black_box(2e-5), &mut noise))
    });
}

// ── Oscillator ───────────────────────────────────────────────────────

fn bench_oscillator_step(c: &mut Criterion) {
    // Burn-in never ends within a benchmark, so no samples are recorded.
    let params = OscillatorParams {
        duration: 1e6,
        burn_in_fraction: 0.99,
        ..OscillatorParams::default()
    };
    let mut osc = make_oscillator(&params);
    c.bench_function("oscillator_rk4_step", |b| b.iter(|| osc.step()));
}

fn bench_oscillator_driven_run(c: &mut Criterion) {
    let params = OscillatorParams {
        duration: 0.02,
        ..OscillatorParams::driven()
    };
    c.bench_function("oscillator_driven_run_1000_steps", |b| {
        b.iter(|| make_oscillator(black_box(&params)).run())
    });
}

// ── Field ────────────────────────────────────────────────────────────

fn bench_field_step_1d(c: &mut Criterion) {
    let params = unbounded(FieldParams::default());
    let mut reflective = make_field(&params, BoundaryPolicy::Reflective);
    c.bench_function("field_step_1d_600_reflective", |b| {
        b.iter(|| reflective.step())
    });
    let mut absorbing = make_field(&params, BoundaryPolicy::absorbing_from(&params));
    c.bench_function("field_step_1d_600_absorbing", |b| {
        b.iter(|| absorbing.step())
    });
}

fn bench_field_step_2d(c: &mut Criterion) {
    let params = unbounded(FieldParams::plane_2d());
    let mut field = make_field(&params, BoundaryPolicy::absorbing_from(&params));
    c.bench_function("field_step_2d_60x24", |b| b.iter(|| field.step()));
}

fn bench_field_step_3d(c: &mut Criterion) {
    let params = unbounded(FieldParams::cube_3d());
    let mut field = make_field(&params, BoundaryPolicy::absorbing_from(&params));
    c.bench_function("field_step_3d_22cubed", |b| b.iter(|| field.step()));
}

fn bench_field_energy(c: &mut Criterion) {
    let params = unbounded(FieldParams::cube_3d());
    let field = make_field(&params, BoundaryPolicy::Reflective);
    c.bench_function("field_energy_3d_22cubed", |b| {
        b.iter(|| black_box(&field).energy())
    });
}

// ── Groups ───────────────────────────────────────────────────────────

criterion_group!(primitives, bench_standard_normal, bench_phase_lock_step,);

criterion_group!(oscillator, bench_oscillator_step, bench_oscillator_driven_run,);

criterion_group!(
    field,
    bench_field_step_1d,
    bench_field_step_2d,
    bench_field_step_3d,
    bench_field_energy,
);

criterion_main!(primitives, oscillator, field);

// ─────────────────────────────────────────────────────────────────────
// Resonance Kernel — Diagnostics Collector
// ─────────────────────────────────────────────────────────────────────
//! Append-only post-burn-in samples and their reduction to
//! {mean, peak, RMS, growth ratio}.
//!
//! The growth ratio compares the mean energy of the last 10 % of samples
//! with the first 10 %. It separates runaway (parametric) growth from a
//! steady state.

use resonance_types::DiagnosticSummary;

/// Below this many samples the growth ratio is reported as 1.0.
pub const MIN_GROWTH_SAMPLES: usize = 20;

/// Upper bound on the up-front sample allocation.
const MAX_PREALLOC: usize = 1 << 16;

/// One post-burn-in snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DiagnosticSample {
    pub energy: f64,
    /// Squared amplitude (x² for oscillators, mean u² for fields).
    pub amplitude_sq: f64,
}

#[derive(Debug, Clone)]
pub struct DiagnosticsCollector {
    burn_in_step: usize,
    samples: Vec<DiagnosticSample>,
}

impl DiagnosticsCollector {
    /// Steps `n > ⌊total_steps · burn_in_fraction⌋` are sampled.
    pub fn new(total_steps: usize, burn_in_fraction: f64) -> Self {
        let burn_in_step = (total_steps as f64 * burn_in_fraction.clamp(0.0, 1.0)) as usize;
        let capacity = total_steps
            .saturating_sub(burn_in_step + 1)
            .min(MAX_PREALLOC);
        Self {
            burn_in_step,
            samples: Vec::with_capacity(capacity),
        }
    }

    pub fn burn_in_step(&self) -> usize {
        self.burn_in_step
    }

    /// Whether `step` lies strictly after the burn-in point.
    #[inline]
    pub fn is_sampling(&self, step: usize) -> bool {
        step > self.burn_in_step
    }

    /// Append `sample` if `step` is past burn-in. Returns whether it was kept.
    #[inline]
    pub fn record(&mut self, step: usize, sample: DiagnosticSample) -> bool {
        if !self.is_sampling(step) {
            return false;
        }
        self.samples.push(sample);
        true
    }

    pub fn samples(&self) -> &[DiagnosticSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Tail-over-head energy ratio.
    pub fn growth_ratio(&self) -> f64 {
        let m = self.samples.len();
        if m < MIN_GROWTH_SAMPLES {
            return 1.0;
        }
        let k = m / 10;
        let mean = |s: &[DiagnosticSample]| s.iter().map(|x| x.energy).sum::<f64>() / k as f64;
        let head = mean(&self.samples[..k]);
        let tail = mean(&self.samples[m - k..]);
        if head > 0.0 {
            tail / head
        } else {
            f64::INFINITY
        }
    }

    pub fn summary(&self) -> DiagnosticSummary {
        let n = self.samples.len();
        if n == 0 {
            return DiagnosticSummary {
                growth_ratio: 1.0,
                ..DiagnosticSummary::default()
            };
        }
        let (sum_e, peak, sum_a) = self.samples.iter().fold(
            (0.0, f64::NEG_INFINITY, 0.0),
            |(s, p, a), x| (s + x.energy, p.max(x.energy), a + x.amplitude_sq),
        );
        DiagnosticSummary {
            mean: sum_e / n as f64,
            peak,
            rms: (sum_a / n as f64).sqrt(),
            growth_ratio: self.growth_ratio(),
            samples: n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(energy: f64) -> DiagnosticSample {
        DiagnosticSample {
            energy,
            amplitude_sq: energy,
        }
    }

    #[test]
    fn test_burn_in_strictly_after() {
        let mut d = DiagnosticsCollector::new(100, 0.5);
        assert_eq!(d.burn_in_step(), 50);
        assert!(!d.record(50, sample(1.0)));
        assert!(d.record(51, sample(1.0)));
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn test_full_run_sample_count() {
        let steps = 1000;
        let mut d = DiagnosticsCollector::new(steps, 0.5);
        for n in 0..steps {
            d.record(n, sample(1.0));
        }
        assert_eq!(d.len(), steps - steps / 2 - 1);
    }

    #[test]
    fn test_growth_ratio_guard_below_twenty() {
        let mut d = DiagnosticsCollector::new(38, 0.5);
        for n in 0..38 {
            d.record(n, sample((n * n) as f64 + 1.0));
        }
        assert_eq!(d.len(), 18);
        assert_eq!(d.growth_ratio(), 1.0);
        assert_eq!(d.summary().growth_ratio, 1.0);
    }

    #[test]
    fn test_growth_ratio_head_tail() {
        let mut d = DiagnosticsCollector::new(100, 0.0);
        // Steps 1..=99 are sampled: 99 samples, k = 9.
        for n in 0..100 {
            let e = if n <= 9 { 2.0 } else if n >= 91 { 10.0 } else { 5.0 };
            d.record(n, sample(e));
        }
        assert_eq!(d.len(), 99);
        assert!((d.growth_ratio() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_growth_ratio_infinite_on_zero_head() {
        let mut d = DiagnosticsCollector::new(40, 0.0);
        for n in 0..40 {
            d.record(n, sample(if n < 10 { 0.0 } else { 1.0 }));
        }
        assert_eq!(d.growth_ratio(), f64::INFINITY);
    }

    #[test]
    fn test_summary_values() {
        let mut d = DiagnosticsCollector::new(5, 0.0);
        for (n, e) in [(1, 1.0), (2, 3.0), (3, 2.0)] {
            d.record(
                n,
                DiagnosticSample {
                    energy: e,
                    amplitude_sq: 4.0,
                },
            );
        }
        let s = d.summary();
        assert!((s.mean - 2.0).abs() < 1e-12);
        assert_eq!(s.peak, 3.0);
        assert!((s.rms - 2.0).abs() < 1e-12);
        assert_eq!(s.samples, 3);
    }

    #[test]
    fn test_empty_summary() {
        let d = DiagnosticsCollector::new(10, 0.5);
        let s = d.summary();
        assert_eq!(s.samples, 0);
        assert_eq!(s.mean, 0.0);
        assert_eq!(s.growth_ratio, 1.0);
    }
}

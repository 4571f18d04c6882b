// ─────────────────────────────────────────────────────────────────────
// Resonance Kernel — Boundary Policy
// ─────────────────────────────────────────────────────────────────────
//! Edge treatment for wave fields.
//!
//! - `Reflective`: Dirichlet, outermost ring forced to zero every step.
//!   Energy stays in the domain and builds standing waves.
//! - `Absorbing`: a damping layer of L nodes, ramped linearly from 0 at
//!   depth L to `max_damping` at depth 0 and added to the baseline, plus
//!   a first-order outgoing rule that copies the nearest interior value
//!   onto the outermost ring.

use serde::{Deserialize, Serialize};

use resonance_types::FieldParams;

use crate::grid::GridShape;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    Reflective,
    Absorbing { layer_len: usize, max_damping: f64 },
}

impl BoundaryPolicy {
    /// Absorbing policy with the layer configured in `params`.
    pub fn absorbing_from(params: &FieldParams) -> Self {
        Self::Absorbing {
            layer_len: params.layer_len,
            max_damping: params.layer_max_damping,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Reflective => "reflective",
            Self::Absorbing { .. } => "absorbing",
        }
    }

    /// Per-node damping γ for this policy.
    pub fn profile(&self, shape: &GridShape, baseline: f64) -> DampingProfile {
        let mut gamma = vec![baseline; shape.len()];
        if let Self::Absorbing {
            layer_len,
            max_damping,
        } = *self
        {
            if layer_len > 0 {
                let l = layer_len as f64;
                for (idx, g) in gamma.iter_mut().enumerate() {
                    let d = shape.depth(shape.coords(idx));
                    if d < layer_len {
                        *g += max_damping * (l - d as f64) / l;
                    }
                }
            }
        }
        DampingProfile { gamma }
    }

    /// Overwrite the outermost ring of `next`. Interior nodes are untouched.
    pub fn apply_edges(&self, ring: &EdgeRing, current: &[f64], next: &mut [f64]) {
        match self {
            Self::Reflective => {
                for &(node, _) in &ring.pairs {
                    next[node] = 0.0;
                }
            }
            Self::Absorbing { .. } => {
                for &(node, inner) in &ring.pairs {
                    next[node] = current[inner];
                }
            }
        }
    }
}

/// Read-only per-node damping coefficients, fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct DampingProfile {
    gamma: Vec<f64>,
}

impl DampingProfile {
    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        self.gamma[index]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.gamma
    }

    pub fn max(&self) -> f64 {
        self.gamma.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Outermost-ring nodes paired with their nearest interior node.
#[derive(Debug, Clone)]
pub struct EdgeRing {
    pairs: Vec<(usize, usize)>,
}

impl EdgeRing {
    pub fn new(shape: &GridShape) -> Self {
        let pairs = (0..shape.len())
            .filter_map(|idx| {
                let c = shape.coords(idx);
                shape
                    .is_boundary(c)
                    .then(|| (idx, shape.index(shape.clamp_interior(c))))
            })
            .collect();
        Self { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.pairs.iter().map(|&(node, _)| node)
    }
}

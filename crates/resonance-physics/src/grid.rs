// ─────────────────────────────────────────────────────────────────────
// Resonance Kernel — Grid Shape
// ─────────────────────────────────────────────────────────────────────
//! Row-major node layout for 1-D/2-D/3-D grids. Axis 0 is the fastest
//! varying; unused axes have extent 1.

use std::ops::Range;

use resonance_types::{ResonanceError, ResonanceResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridShape {
    dims: usize,
    extents: [usize; 3],
    strides: [usize; 3],
}

impl GridShape {
    pub fn new(extents: &[usize]) -> ResonanceResult<Self> {
        if extents.is_empty() || extents.len() > 3 {
            return Err(ResonanceError::Grid(format!(
                "grid must have 1 to 3 axes, got {}",
                extents.len()
            )));
        }
        if let Some(&n) = extents.iter().find(|&&n| n < 3) {
            return Err(ResonanceError::Grid(format!(
                "every axis needs at least 3 nodes, got {n}"
            )));
        }
        let mut ext = [1usize; 3];
        ext[..extents.len()].copy_from_slice(extents);
        let strides = [1, ext[0], ext[0] * ext[1]];
        Ok(Self {
            dims: extents.len(),
            extents: ext,
            strides,
        })
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Extents of the active axes.
    pub fn extents(&self) -> &[usize] {
        &self.extents[..self.dims]
    }

    /// Linear offset between neighbours along each active axis.
    pub fn strides(&self) -> &[usize] {
        &self.strides[..self.dims]
    }

    pub fn len(&self) -> usize {
        self.extents.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn index(&self, coords: [usize; 3]) -> usize {
        coords[0] + self.strides[1] * coords[1] + self.strides[2] * coords[2]
    }

    #[inline]
    pub fn coords(&self, index: usize) -> [usize; 3] {
        let i = index % self.extents[0];
        let j = (index / self.strides[1]) % self.extents[1];
        let k = index / self.strides[2];
        [i, j, k]
    }

    /// Per-axis ranges covering every node off the outermost ring.
    /// Inactive axes yield `0..1`.
    pub fn interior_ranges(&self) -> [Range<usize>; 3] {
        let r = |axis: usize| {
            if axis < self.dims {
                1..self.extents[axis] - 1
            } else {
                0..1
            }
        };
        [r(0), r(1), r(2)]
    }

    /// Number of interior nodes.
    pub fn interior_len(&self) -> usize {
        self.interior_ranges().iter().map(|r| r.len()).product()
    }

    /// True if any active coordinate lies on the outermost ring.
    #[inline]
    pub fn is_boundary(&self, coords: [usize; 3]) -> bool {
        (0..self.dims).any(|a| coords[a] == 0 || coords[a] == self.extents[a] - 1)
    }

    /// Nodes to the nearest active face (0 on the outermost ring).
    pub fn depth(&self, coords: [usize; 3]) -> usize {
        (0..self.dims)
            .map(|a| coords[a].min(self.extents[a] - 1 - coords[a]))
            .min()
            .unwrap_or(0)
    }

    /// Nearest interior node: every active coordinate clamped to [1, N-2].
    pub fn clamp_interior(&self, coords: [usize; 3]) -> [usize; 3] {
        let mut out = coords;
        for (a, c) in out.iter_mut().enumerate().take(self.dims) {
            *c = (*c).clamp(1, self.extents[a] - 2);
        }
        out
    }

    /// Grid centre, `N/2` along each active axis.
    pub fn centre(&self) -> [usize; 3] {
        let mut c = [0usize; 3];
        for (a, v) in c.iter_mut().enumerate().take(self.dims) {
            *v = self.extents[a] / 2;
        }
        c
    }

    /// Expand a coordinate slice of length `dims` into padded form.
    pub fn pad(&self, coords: &[usize]) -> ResonanceResult<[usize; 3]> {
        if coords.len() != self.dims {
            return Err(ResonanceError::Grid(format!(
                "{} coordinates for a {}-D grid",
                coords.len(),
                self.dims
            )));
        }
        let mut out = [0usize; 3];
        out[..self.dims].copy_from_slice(coords);
        Ok(out)
    }
}

use crate::error::{OperationError, Result};
use crate::math::Point3;
use crate::topology::{FaceId, TopologyStore};

use super::UvBounds;

/// Evaluates a face's surface on a regular grid over its uv bounds.
///
/// Points come out `u`-major: all `v` samples of the first `u` column, then
/// the next column. A single sample along a direction sits at the middle of
/// the range.
pub struct SampleFace {
    face: FaceId,
    nu: usize,
    nv: usize,
}

impl SampleFace {
    #[must_use]
    pub fn new(face: FaceId, nu: usize, nv: usize) -> Self {
        Self { face, nu, nv }
    }

    /// Executes the query, returning `nu * nv` points.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] for a zero sample count, or
    /// an error if the face is missing.
    pub fn execute(&self, store: &TopologyStore) -> Result<Vec<Point3>> {
        if self.nu == 0 || self.nv == 0 {
            return Err(OperationError::InvalidInput("sample counts must be positive".into()).into());
        }
        let bounds = UvBounds::new(self.face).execute(store)?;
        let surface = &store.face(self.face)?.surface;

        let mut points = Vec::with_capacity(self.nu * self.nv);
        for u in grid(bounds.u_min, bounds.u_max, self.nu) {
            for v in grid(bounds.v_min, bounds.v_max, self.nv) {
                points.push(surface.evaluate(u, v)?);
            }
        }
        Ok(points)
    }
}

/// `n` evenly spaced values from `lo` to `hi` inclusive.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn grid(lo: f64, hi: f64, n: usize) -> impl Iterator<Item = f64> {
    (0..n).map(move |k| {
        if n == 1 {
            0.5 * (lo + hi)
        } else {
            lo + (hi - lo) * k as f64 / (n - 1) as f64
        }
    })
}

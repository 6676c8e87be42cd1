use std::f64::consts::TAU;

use crate::error::{OperationError, Result};
use crate::geometry::surface::SurfaceDomain;
use crate::topology::{FaceId, TopologyStore};

/// Angles this close below 2pi are treated as 0.
const SEAM_SNAP: f64 = 1e-9;

/// Slack below `u_min` tolerated by [`unwrap_angle`].
const ANGLE_SLACK: f64 = 1e-7;

/// Computes the parameter rectangle covered by a face's boundary.
///
/// For angular `u` the result is the smallest arc containing every boundary
/// angle. `u_min` lies in `[0, 2pi)` and `u_max` may exceed `2pi` when the
/// face crosses the parametrization seam.
pub struct UvBounds {
    face: FaceId,
}

impl UvBounds {
    #[must_use]
    pub fn new(face: FaceId) -> Self {
        Self { face }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is missing or has no boundary points.
    pub fn execute(&self, store: &TopologyStore) -> Result<SurfaceDomain> {
        let surface = &store.face(self.face)?.surface;
        let uvs: Vec<(f64, f64)> = store
            .face_polylines(self.face)?
            .iter()
            .flatten()
            .map(|p| surface.inverse(p))
            .collect();
        if uvs.is_empty() {
            return Err(OperationError::Failed("face has no boundary points".into()).into());
        }

        let (v_min, v_max) = min_max(uvs.iter().map(|uv| uv.1));
        let (u_min, u_max) = if surface.is_u_periodic() {
            covering_arc(uvs.iter().map(|uv| uv.0))
        } else {
            min_max(uvs.iter().map(|uv| uv.0))
        };
        Ok(SurfaceDomain::new(u_min, u_max, v_min, v_max))
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
        (lo.min(x), hi.max(x))
    })
}

/// Smallest arc containing all `angles`, found by leaving out the largest
/// gap between consecutive angles on the circle.
///
/// Returns `(start, end)` with `start` in `[0, 2pi)` and `end >= start`.
pub fn covering_arc(angles: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut sorted: Vec<f64> = angles
        .map(|u| {
            let w = u.rem_euclid(TAU);
            if TAU - w < SEAM_SNAP {
                0.0
            } else {
                w
            }
        })
        .collect();
    if sorted.is_empty() {
        return (0.0, 0.0);
    }
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mut widest = sorted[0] + TAU - sorted[n - 1];
    let mut arc = (sorted[0], sorted[n - 1]);
    for k in 0..n - 1 {
        let gap = sorted[k + 1] - sorted[k];
        if gap > widest + 1e-12 {
            widest = gap;
            arc = (sorted[k + 1], sorted[k] + TAU);
        }
    }
    arc
}

/// Shifts angle `u` into the turn starting (just below) `u_min`.
#[must_use]
pub fn unwrap_angle(u: f64, u_min: f64) -> f64 {
    u_min + (u - u_min + ANGLE_SLACK).rem_euclid(TAU) - ANGLE_SLACK
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::surface::Cylinder;
    use crate::math::{Point3, Vector3};
    use crate::operations::creation::MakePatch;
    use crate::topology::FaceSurface;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn arc_away_from_seam() {
        let (lo, hi) = covering_arc([0.5, 1.0, 2.0].into_iter());
        assert!((lo - 0.5).abs() < 1e-12 && (hi - 2.0).abs() < 1e-12);
    }

    #[test]
    fn arc_across_seam_exceeds_two_pi() {
        let (lo, hi) = covering_arc([-0.3, 0.0, 0.3].into_iter());
        assert!((lo - (TAU - 0.3)).abs() < 1e-12);
        assert!((hi - (TAU + 0.3)).abs() < 1e-12);
    }

    #[test]
    fn angle_just_below_two_pi_snaps_to_zero() {
        let (lo, hi) = covering_arc([-1e-12, FRAC_PI_2].into_iter());
        assert!(lo.abs() < 1e-12 && (hi - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn unwrap_keeps_angles_past_start() {
        assert!((unwrap_angle(0.1, TAU - 0.3) - (TAU + 0.1)).abs() < 1e-12);
        assert!((unwrap_angle(-1e-9, 0.0) + 1e-9).abs() < 1e-15);
    }

    #[test]
    fn seam_straddling_patch() {
        let mut store = TopologyStore::new();
        // Angles around pi straddle the branch cut of the inverse mapping.
        let cyl = Cylinder::new(Point3::origin(), 1.0, Vector3::z(), Vector3::x()).unwrap();
        let face = MakePatch::new(FaceSurface::Cylinder(cyl), (PI - 0.4, PI + 0.4), (0.0, 2.0))
            .execute(&mut store)
            .unwrap();
        let d = UvBounds::new(face).execute(&store).unwrap();
        assert!((d.u_max - d.u_min - 0.8).abs() < 1e-9);
        assert!((d.u_min - (PI - 0.4)).abs() < 1e-9);
        assert!((d.v_max - 2.0).abs() < 1e-12 && d.v_min.abs() < 1e-12);
    }
}

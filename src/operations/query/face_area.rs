use crate::error::Result;
use crate::geometry::surface::Surface;
use crate::math::polygon_3d::polygon_area_3d;
use crate::math::Point3;
use crate::topology::{FaceId, FaceSurface, TopologyStore};

use super::sample_face::grid;
use super::uv_bounds::unwrap_angle;
use super::UvBounds;

/// Grid resolution for surfaces without a closed-form development.
const GRID: usize = 24;

/// Computes the area of a face (holes subtracted).
///
/// Planes use the polygon area of the boundary, cylinders the area of the
/// boundary developed into `(radius * u, v)`. Other surfaces sum grid quads
/// over their uv bounds.
pub struct FaceArea {
    face: FaceId,
}

impl FaceArea {
    #[must_use]
    pub fn new(face: FaceId) -> Self {
        Self { face }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is missing or cannot be evaluated.
    pub fn execute(&self, store: &TopologyStore) -> Result<f64> {
        let face = store.face(self.face)?;
        let loops = store.face_polylines(self.face)?;
        let area = match &face.surface {
            FaceSurface::Plane(plane) => net_area(&loops, |l| polygon_area_3d(l, plane.plane_normal())),
            FaceSurface::Cylinder(cyl) => {
                let u_min = UvBounds::new(self.face).execute(store)?.u_min;
                net_area(&loops, |l| {
                    let developed: Vec<(f64, f64)> = l
                        .iter()
                        .map(|p| {
                            let (u, v) = cyl.inverse(p);
                            (cyl.radius() * unwrap_angle(u, u_min), v)
                        })
                        .collect();
                    shoelace(&developed)
                })
            }
            FaceSurface::Cone(_) => grid_area(store, self.face)?,
        };
        Ok(area)
    }
}

fn net_area(loops: &[Vec<Point3>], area_of: impl Fn(&[Point3]) -> f64) -> f64 {
    let mut iter = loops.iter();
    let outer = iter.next().map_or(0.0, |l| area_of(l));
    iter.fold(outer, |acc, hole| acc - area_of(hole))
}

fn shoelace(points: &[(f64, f64)]) -> f64 {
    let n = points.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let (x0, y0) = points[i];
            let (x1, y1) = points[(i + 1) % n];
            x0 * y1 - x1 * y0
        })
        .sum();
    0.5 * twice.abs()
}

fn grid_area(store: &TopologyStore, face: FaceId) -> Result<f64> {
    let bounds = UvBounds::new(face).execute(store)?;
    let surface = &store.face(face)?.surface;
    let us: Vec<f64> = grid(bounds.u_min, bounds.u_max, GRID + 1).collect();
    let vs: Vec<f64> = grid(bounds.v_min, bounds.v_max, GRID + 1).collect();

    let mut area = 0.0;
    for i in 0..GRID {
        for j in 0..GRID {
            let p00 = surface.evaluate(us[i], vs[j])?;
            let p10 = surface.evaluate(us[i + 1], vs[j])?;
            let p11 = surface.evaluate(us[i + 1], vs[j + 1])?;
            let p01 = surface.evaluate(us[i], vs[j + 1])?;
            area += 0.5 * (p10 - p00).cross(&(p11 - p00)).norm();
            area += 0.5 * (p11 - p00).cross(&(p01 - p00)).norm();
        }
    }
    Ok(area)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::surface::{Cone, Cylinder};
    use crate::math::Vector3;
    use crate::operations::creation::{MakeFace, MakePatch, MakeWire};
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn square_with_square_hole() {
        let mut store = TopologyStore::new();
        let outer = MakeWire::new(
            vec![p(0.0, 0.0, 0.0), p(4.0, 0.0, 0.0), p(4.0, 4.0, 0.0), p(0.0, 4.0, 0.0)],
            true,
        )
        .execute(&mut store)
        .unwrap();
        let hole = MakeWire::new(
            vec![p(1.0, 1.0, 0.0), p(1.0, 2.0, 0.0), p(2.0, 2.0, 0.0), p(2.0, 1.0, 0.0)],
            true,
        )
        .execute(&mut store)
        .unwrap();
        let face = MakeFace::new(outer, vec![hole]).execute(&mut store).unwrap();
        let area = FaceArea::new(face).execute(&store).unwrap();
        assert!((area - 15.0).abs() < 1e-12);
    }

    #[test]
    fn quarter_cylinder_area() {
        let mut store = TopologyStore::new();
        let cyl = Cylinder::new(p(0.0, 0.0, 0.0), 2.0, Vector3::z(), Vector3::x()).unwrap();
        let face = MakePatch::new(FaceSurface::Cylinder(cyl), (0.0, FRAC_PI_2), (0.0, 5.0))
            .execute(&mut store)
            .unwrap();
        let area = FaceArea::new(face).execute(&store).unwrap();
        assert!((area - 5.0 * PI).abs() < 1e-9);
    }

    #[test]
    fn cone_frustum_area_from_grid() {
        let mut store = TopologyStore::new();
        let cone = Cone::new(p(0.0, 0.0, 0.0), Vector3::z(), FRAC_PI_4, Vector3::x()).unwrap();
        let face = MakePatch::new(FaceSurface::Cone(cone), (0.0, PI), (1.0, 2.0))
            .execute(&mut store)
            .unwrap();
        // Lateral area of a frustum slice: sweep * sin(a) * (v1^2 - v0^2) / 2.
        let exact = PI * FRAC_PI_4.sin() * 1.5;
        let area = FaceArea::new(face).execute(&store).unwrap();
        assert!((area - exact).abs() < 1e-2 * exact);
    }
}

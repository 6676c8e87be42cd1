use crate::error::Result;
use crate::math::polygon_3d::{polygon_area_3d, polygon_centroid_3d};
use crate::math::{Point3, Vector3};
use crate::topology::{FaceId, FaceSurface, TopologyStore};

use super::SampleFace;

const GRID: usize = 16;

/// Computes the centroid of a face.
///
/// Planar faces use the area-weighted polygon centroid with holes removed.
/// Curved faces average a regular uv grid, which is exact along the
/// developable directions of a cylinder.
pub struct FaceCentroid {
    face: FaceId,
}

impl FaceCentroid {
    #[must_use]
    pub fn new(face: FaceId) -> Self {
        Self { face }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is missing or cannot be evaluated.
    pub fn execute(&self, store: &TopologyStore) -> Result<Point3> {
        let FaceSurface::Plane(plane) = &store.face(self.face)?.surface else {
            let samples = SampleFace::new(self.face, GRID, GRID).execute(store)?;
            let sum = samples.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords);
            #[allow(clippy::cast_precision_loss)]
            let n = samples.len() as f64;
            return Ok(Point3::from(sum / n));
        };

        let normal = plane.plane_normal();
        let loops = store.face_polylines(self.face)?;
        let mut weighted = Vector3::zeros();
        let mut total = 0.0;
        for (i, l) in loops.iter().enumerate() {
            let sign = if i == 0 { 1.0 } else { -1.0 };
            let area = polygon_area_3d(l, normal) * sign;
            weighted += polygon_centroid_3d(l, normal).coords * area;
            total += area;
        }
        if total.abs() < f64::EPSILON {
            return Ok(polygon_centroid_3d(&loops[0], normal));
        }
        Ok(Point3::from(weighted / total))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::surface::Cylinder;
    use crate::operations::creation::{MakeFace, MakePatch, MakeWire};

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn hole_shifts_centroid() {
        let mut store = TopologyStore::new();
        let outer = MakeWire::new(
            vec![p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(2.0, 1.0, 0.0), p(0.0, 1.0, 0.0)],
            true,
        )
        .execute(&mut store)
        .unwrap();
        // Unit hole over the right half leaves the left square.
        let hole = MakeWire::new(
            vec![p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(2.0, 1.0, 0.0), p(2.0, 0.0, 0.0)],
            true,
        )
        .execute(&mut store)
        .unwrap();
        let face = MakeFace::new(outer, vec![hole]).execute(&mut store).unwrap();
        let c = FaceCentroid::new(face).execute(&store).unwrap();
        assert!((c - p(0.5, 0.5, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn cylinder_centroid_is_mid_height() {
        let mut store = TopologyStore::new();
        let cyl = Cylinder::new(p(0.0, 0.0, 0.0), 1.0, Vector3::z(), Vector3::x()).unwrap();
        let face = MakePatch::new(FaceSurface::Cylinder(cyl), (-0.5, 0.5), (0.0, 4.0))
            .execute(&mut store)
            .unwrap();
        let c = FaceCentroid::new(face).execute(&store).unwrap();
        assert!((c.z - 2.0).abs() < 1e-9);
        assert!(c.y.abs() < 1e-9);
        assert!(c.x > 0.9 && c.x < 1.0);
    }
}

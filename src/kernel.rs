//! Capability interface the sheet-metal engine uses to talk to a B-rep kernel.
//!
//! The engine never evaluates surfaces itself; every geometric question goes
//! through [`GeometryKernel`]. [`TopologyStore`] is the in-crate
//! implementation.

use std::fmt;
use std::hash::Hash;

use serde::Serialize;

use crate::error::{OperationError, Result};
use crate::geometry::surface::SurfaceDomain;
use crate::math::{Point3, RigidTransform, Vector3};
use crate::operations::creation::{MakeFace, MakeWire};
use crate::operations::query::{
    Aabb, BoundingBox, EdgeInfo, FaceArea, FaceCentroid, FaceDistance, FaceEdges, SampleFace,
    UvBounds,
};
use crate::operations::transform::TransformFace;
use crate::topology::{FaceId, FaceSurface, SolidId, TopologyStore};

/// Coarse surface classification used by the unfolding engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SurfaceKind {
    Flat,
    Cylindrical,
    Unknown,
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Flat => "Flat",
            Self::Cylindrical => "Cylindrical",
            Self::Unknown => "Unknown",
        })
    }
}

/// Carrier plane of a flat face. `normal` follows the face orientation.
#[derive(Debug, Clone, Copy)]
pub struct PlaneParams {
    pub origin: Point3,
    pub normal: Vector3,
}

/// Carrier cylinder of a cylindrical face.
#[derive(Debug, Clone, Copy)]
pub struct CylinderParams {
    /// A point on the axis.
    pub location: Point3,
    /// Unit axis direction.
    pub axis: Vector3,
    pub radius: f64,
}

/// Queries and value-semantics edits over faces of a B-rep model.
///
/// Handles are opaque. `apply_transform` and `planar_face` create new faces
/// and never modify existing ones, so a failure leaves every handle the
/// caller holds valid.
pub trait GeometryKernel {
    type Face: Copy + Eq + Hash + fmt::Debug;
    type Solid: Copy + fmt::Debug;

    /// Faces of `solid` in a stable enumeration order.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid is not known to the kernel.
    fn faces_of(&self, solid: Self::Solid) -> Result<Vec<Self::Face>>;

    /// # Errors
    ///
    /// Returns an error if the face is not known to the kernel.
    fn surface_kind(&self, face: Self::Face) -> Result<SurfaceKind>;

    /// # Errors
    ///
    /// Returns [`OperationError::UnsupportedSurface`] for non-planar faces.
    fn plane_params(&self, face: Self::Face) -> Result<PlaneParams>;

    /// # Errors
    ///
    /// Returns [`OperationError::UnsupportedSurface`] for non-cylindrical faces.
    fn cylinder_params(&self, face: Self::Face) -> Result<CylinderParams>;

    /// # Errors
    ///
    /// Returns an error if the face cannot be evaluated.
    fn bounding_box(&self, face: Self::Face) -> Result<Aabb>;

    /// # Errors
    ///
    /// Returns an error if the face cannot be evaluated.
    fn area(&self, face: Self::Face) -> Result<f64>;

    /// # Errors
    ///
    /// Returns an error if the face cannot be evaluated.
    fn centroid(&self, face: Self::Face) -> Result<Point3>;

    /// Minimum distance between two faces.
    ///
    /// # Errors
    ///
    /// Returns an error if either face cannot be evaluated.
    fn distance(&self, a: Self::Face, b: Self::Face) -> Result<f64>;

    /// Regular `nu x nv` grid of surface points over the face's uv bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if the face cannot be evaluated.
    fn sample(&self, face: Self::Face, nu: usize, nv: usize) -> Result<Vec<Point3>>;

    /// # Errors
    ///
    /// Returns an error if the face cannot be evaluated.
    fn uv_bounds(&self, face: Self::Face) -> Result<SurfaceDomain>;

    /// Positions of the distinct vertices of the face.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is not known to the kernel.
    fn vertices(&self, face: Self::Face) -> Result<Vec<Point3>>;

    /// # Errors
    ///
    /// Returns an error if the face cannot be evaluated.
    fn edges(&self, face: Self::Face) -> Result<Vec<EdgeInfo>>;

    /// Returns a moved copy of `face`.
    ///
    /// # Errors
    ///
    /// Returns an error if the face cannot be copied.
    fn apply_transform(&mut self, face: Self::Face, transform: &RigidTransform)
        -> Result<Self::Face>;

    /// Builds a planar face bounded by the closed polygon `points`.
    ///
    /// # Errors
    ///
    /// Returns an error for degenerate or non-planar polygons.
    fn planar_face(&mut self, points: &[Point3]) -> Result<Self::Face>;
}

impl GeometryKernel for TopologyStore {
    type Face = FaceId;
    type Solid = SolidId;

    fn faces_of(&self, solid: SolidId) -> Result<Vec<FaceId>> {
        self.solid_faces(solid)
    }

    fn surface_kind(&self, face: FaceId) -> Result<SurfaceKind> {
        Ok(match self.face(face)?.surface {
            FaceSurface::Plane(_) => SurfaceKind::Flat,
            FaceSurface::Cylinder(_) => SurfaceKind::Cylindrical,
            FaceSurface::Cone(_) => SurfaceKind::Unknown,
        })
    }

    fn plane_params(&self, face: FaceId) -> Result<PlaneParams> {
        let data = self.face(face)?;
        let FaceSurface::Plane(plane) = &data.surface else {
            return Err(OperationError::UnsupportedSurface("plane_params").into());
        };
        let normal = if data.same_sense {
            *plane.plane_normal()
        } else {
            -plane.plane_normal()
        };
        Ok(PlaneParams {
            origin: *plane.origin(),
            normal,
        })
    }

    fn cylinder_params(&self, face: FaceId) -> Result<CylinderParams> {
        let FaceSurface::Cylinder(cylinder) = &self.face(face)?.surface else {
            return Err(OperationError::UnsupportedSurface("cylinder_params").into());
        };
        Ok(CylinderParams {
            location: *cylinder.center(),
            axis: *cylinder.axis(),
            radius: cylinder.radius(),
        })
    }

    fn bounding_box(&self, face: FaceId) -> Result<Aabb> {
        BoundingBox::of_face(face).execute(self)
    }

    fn area(&self, face: FaceId) -> Result<f64> {
        FaceArea::new(face).execute(self)
    }

    fn centroid(&self, face: FaceId) -> Result<Point3> {
        FaceCentroid::new(face).execute(self)
    }

    fn distance(&self, a: FaceId, b: FaceId) -> Result<f64> {
        FaceDistance::new(a, b).execute(self)
    }

    fn sample(&self, face: FaceId, nu: usize, nv: usize) -> Result<Vec<Point3>> {
        SampleFace::new(face, nu, nv).execute(self)
    }

    fn uv_bounds(&self, face: FaceId) -> Result<SurfaceDomain> {
        UvBounds::new(face).execute(self)
    }

    fn vertices(&self, face: FaceId) -> Result<Vec<Point3>> {
        self.face_vertex_points(face)
    }

    fn edges(&self, face: FaceId) -> Result<Vec<EdgeInfo>> {
        FaceEdges::new(face).execute(self)
    }

    fn apply_transform(&mut self, face: FaceId, transform: &RigidTransform) -> Result<FaceId> {
        TransformFace::new(face, *transform).execute(self)
    }

    fn planar_face(&mut self, points: &[Point3]) -> Result<FaceId> {
        let wire = MakeWire::new(points.to_vec(), true).execute(self)?;
        MakeFace::new(wire, vec![]).execute(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::surface::{Cone, Cylinder};
    use crate::operations::creation::{MakeBox, MakePatch};
    use std::f64::consts::FRAC_PI_2;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn classifies_each_surface() {
        let mut store = TopologyStore::new();
        let solid = MakeBox::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0))
            .execute(&mut store)
            .unwrap();
        let faces = store.faces_of(solid).unwrap();
        assert_eq!(faces.len(), 6);
        assert_eq!(store.surface_kind(faces[0]).unwrap(), SurfaceKind::Flat);

        let cyl = Cylinder::new(p(0.0, 0.0, 0.0), 1.0, Vector3::z(), Vector3::x()).unwrap();
        let bend = MakePatch::new(FaceSurface::Cylinder(cyl), (0.0, FRAC_PI_2), (0.0, 1.0))
            .execute(&mut store)
            .unwrap();
        assert_eq!(store.surface_kind(bend).unwrap(), SurfaceKind::Cylindrical);
        let params = store.cylinder_params(bend).unwrap();
        assert!((params.radius - 1.0).abs() < 1e-12);
        assert!(store.plane_params(bend).is_err());

        let cone = Cone::new(p(0.0, 0.0, 0.0), Vector3::z(), 0.3, Vector3::x()).unwrap();
        let taper = MakePatch::new(FaceSurface::Cone(cone), (0.0, FRAC_PI_2), (1.0, 2.0))
            .execute(&mut store)
            .unwrap();
        assert_eq!(store.surface_kind(taper).unwrap(), SurfaceKind::Unknown);
        assert!(matches!(
            store.cylinder_params(taper),
            Err(crate::Error::Operation(OperationError::UnsupportedSurface(_)))
        ));
    }

    #[test]
    fn box_face_normals_point_outward() {
        let mut store = TopologyStore::new();
        let solid = MakeBox::new(p(0.0, 0.0, 0.0), p(2.0, 2.0, 2.0))
            .execute(&mut store)
            .unwrap();
        for face in store.faces_of(solid).unwrap() {
            let params = store.plane_params(face).unwrap();
            let c = store.centroid(face).unwrap();
            assert!((c - p(1.0, 1.0, 1.0)).dot(&params.normal) > 0.0);
        }
    }

    #[test]
    fn planar_face_from_polygon() {
        let mut store = TopologyStore::new();
        let face = store
            .planar_face(&[
                p(0.0, 0.0, 1.0),
                p(3.0, 0.0, 1.0),
                p(3.0, 2.0, 1.0),
                p(0.0, 2.0, 1.0),
            ])
            .unwrap();
        assert!((store.area(face).unwrap() - 6.0).abs() < 1e-9);
        assert_eq!(store.vertices(face).unwrap().len(), 4);
        assert_eq!(store.edges(face).unwrap().len(), 4);
    }

    #[test]
    fn apply_transform_keeps_source() {
        let mut store = TopologyStore::new();
        let face = store
            .planar_face(&[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)])
            .unwrap();
        let moved = store
            .apply_transform(face, &RigidTransform::translation(Vector3::new(0.0, 0.0, 5.0)))
            .unwrap();
        let before = store.bounding_box(face).unwrap();
        let after = store.bounding_box(moved).unwrap();
        assert!(before.max.z.abs() < 1e-12);
        assert!((after.min.z - 5.0).abs() < 1e-12);
    }
}

use crate::error::Result;
use crate::geometry::surface::{Surface, SurfaceDomain};
use crate::math::distance_3d::{point_to_segment_dist, segment_to_segment_dist};
use crate::math::polygon_3d::point_in_polygon_3d;
use crate::math::Point3;
use crate::topology::{FaceId, FaceSurface, TopologyStore};

use super::uv_bounds::unwrap_angle;
use super::{SampleFace, UvBounds};

const PARAM_SLACK: f64 = 1e-9;
const GRID: usize = 12;

/// Computes the minimum distance between two faces.
///
/// Takes the smallest of the boundary-to-boundary distance and the
/// distances from each face's boundary points to the other face's interior.
/// Curved edges take part through sample points only, so chords never pull
/// the result below the true distance. Faces whose interiors cross without
/// either boundary coming close are not detected.
pub struct FaceDistance {
    a: FaceId,
    b: FaceId,
}

impl FaceDistance {
    #[must_use]
    pub fn new(a: FaceId, b: FaceId) -> Self {
        Self { a, b }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if either face is missing or cannot be evaluated.
    pub fn execute(&self, store: &TopologyStore) -> Result<f64> {
        let ba = Boundary::collect(store, self.a)?;
        let bb = Boundary::collect(store, self.b)?;

        let mut best = ba.distance_to(&bb).min(bb.distance_to(&ba));

        let probe_a = Probe::new(store, self.a)?;
        let probe_b = Probe::new(store, self.b)?;
        for p in &ba.points {
            best = best.min(probe_b.interior_distance(p));
        }
        for p in &bb.points {
            best = best.min(probe_a.interior_distance(p));
        }
        Ok(best)
    }
}

/// Straight edges as segments plus sample points along every edge.
struct Boundary {
    segments: Vec<(Point3, Point3)>,
    points: Vec<Point3>,
}

impl Boundary {
    fn collect(store: &TopologyStore, face: FaceId) -> Result<Self> {
        let mut segments = Vec::new();
        let mut points = Vec::new();
        for id in store.face_edges(face)? {
            let edge = store.edge(id)?;
            let n = edge.segment_count();
            for k in 0..=n {
                #[allow(clippy::cast_precision_loss)]
                let s = k as f64 / n as f64;
                points.push(edge.point_at(s)?);
            }
            if !edge.is_curved() {
                segments.push((edge.point_at(0.0)?, edge.point_at(1.0)?));
            }
        }
        Ok(Self { segments, points })
    }

    /// Smallest distance from this boundary's segments and points to the
    /// other's segments, and between the two point sets.
    fn distance_to(&self, other: &Self) -> f64 {
        let mut best = f64::INFINITY;
        for (a0, a1) in &self.segments {
            for (b0, b1) in &other.segments {
                best = best.min(segment_to_segment_dist(a0, a1, b0, b1));
            }
        }
        for p in &self.points {
            for (b0, b1) in &other.segments {
                best = best.min(point_to_segment_dist(p, b0, b1));
            }
            for q in &other.points {
                best = best.min((p - q).norm());
            }
        }
        best
    }
}

/// Distance from points to the interior of one face.
struct Probe<'a> {
    surface: &'a FaceSurface,
    loops: Vec<Vec<Point3>>,
    bounds: SurfaceDomain,
    samples: Vec<Point3>,
}

impl<'a> Probe<'a> {
    fn new(store: &'a TopologyStore, face: FaceId) -> Result<Self> {
        let surface = &store.face(face)?.surface;
        let samples = match surface {
            FaceSurface::Cone(_) => SampleFace::new(face, GRID, GRID).execute(store)?,
            _ => Vec::new(),
        };
        Ok(Self {
            surface,
            loops: store.face_polylines(face)?,
            bounds: UvBounds::new(face).execute(store)?,
            samples,
        })
    }

    /// Distance from `p` to its foot point on the face, or infinity when the
    /// foot point falls outside the face.
    fn interior_distance(&self, p: &Point3) -> f64 {
        match self.surface {
            FaceSurface::Plane(plane) => {
                let foot = plane.project(p);
                let inside = self
                    .loops
                    .first()
                    .is_some_and(|outer| point_in_polygon_3d(&foot, outer, plane))
                    && !self.loops[1..]
                        .iter()
                        .any(|hole| point_in_polygon_3d(&foot, hole, plane));
                if inside {
                    plane.signed_distance(p).abs()
                } else {
                    f64::INFINITY
                }
            }
            FaceSurface::Cylinder(cyl) => {
                let (u, v) = cyl.inverse(p);
                let u = unwrap_angle(u, self.bounds.u_min);
                let b = &self.bounds;
                if u <= b.u_max + PARAM_SLACK
                    && v >= b.v_min - PARAM_SLACK
                    && v <= b.v_max + PARAM_SLACK
                {
                    cyl.distance_to(p)
                } else {
                    f64::INFINITY
                }
            }
            FaceSurface::Cone(_) => self
                .samples
                .iter()
                .map(|s| (s - p).norm())
                .fold(f64::INFINITY, f64::min),
        }
    }
}

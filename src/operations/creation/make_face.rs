use crate::error::{OperationError, Result, TopologyError};
use crate::geometry::surface::Plane;
use crate::math::polygon_3d::newell_normal;
use crate::topology::{FaceData, FaceId, FaceSurface, TopologyStore, WireId};

/// Creates a face bounded by closed wires.
///
/// Without an explicit surface the wires must be planar; the plane frame
/// takes its `u` direction from the first boundary segment.
pub struct MakeFace {
    outer_wire: WireId,
    inner_wires: Vec<WireId>,
    surface: Option<FaceSurface>,
    same_sense: bool,
}

impl MakeFace {
    #[must_use]
    pub fn new(outer_wire: WireId, inner_wires: Vec<WireId>) -> Self {
        Self {
            outer_wire,
            inner_wires,
            surface: None,
            same_sense: true,
        }
    }

    /// Uses `surface` as the carrier instead of fitting a plane.
    #[must_use]
    pub fn with_surface(mut self, surface: FaceSurface) -> Self {
        self.surface = Some(surface);
        self
    }

    #[must_use]
    pub fn with_same_sense(mut self, same_sense: bool) -> Self {
        self.same_sense = same_sense;
        self
    }

    /// Executes the operation, creating the face in the topology store.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::WireNotClosed`] for an open boundary wire and
    /// [`OperationError::InvalidInput`] when no plane fits the boundary.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<FaceId> {
        for wire in std::iter::once(self.outer_wire).chain(self.inner_wires.iter().copied()) {
            if !store.wire(wire)?.is_closed {
                return Err(TopologyError::WireNotClosed.into());
            }
        }

        let surface = match &self.surface {
            Some(surface) => surface.clone(),
            None => FaceSurface::Plane(fit_plane(store, self.outer_wire)?),
        };

        Ok(store.add_face(FaceData {
            surface,
            outer_wire: self.outer_wire,
            inner_wires: self.inner_wires.clone(),
            same_sense: self.same_sense,
        }))
    }
}

fn fit_plane(store: &TopologyStore, wire: WireId) -> Result<Plane> {
    let points = store.wire_polyline(wire)?;
    if points.len() < 3 {
        return Err(OperationError::InvalidInput("planar face needs three points".into()).into());
    }
    let normal = newell_normal(&points)?;
    let plane = Plane::with_u_hint(points[0], normal, &(points[1] - points[0]))?;

    let scale = points
        .iter()
        .map(|p| (p - points[0]).norm())
        .fold(1.0_f64, f64::max);
    if points
        .iter()
        .any(|p| plane.signed_distance(p).abs() > 1e-7 * scale)
    {
        return Err(OperationError::InvalidInput("boundary wire is not planar".into()).into());
    }
    Ok(plane)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Point3, Vector3};
    use crate::operations::creation::MakeWire;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn frame_follows_first_edge() {
        let mut store = TopologyStore::new();
        let wire = MakeWire::new(
            vec![p(0.0, 0.0, 1.0), p(0.0, 2.0, 1.0), p(-3.0, 2.0, 1.0), p(-3.0, 0.0, 1.0)],
            true,
        )
        .execute(&mut store)
        .unwrap();
        let face = MakeFace::new(wire, vec![]).execute(&mut store).unwrap();
        let FaceSurface::Plane(plane) = &store.face(face).unwrap().surface else {
            panic!("expected a plane");
        };
        assert!((plane.u_dir() - Vector3::y()).norm() < 1e-12);
        assert!((plane.plane_normal() - Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn open_wire_rejected() {
        let mut store = TopologyStore::new();
        let wire = MakeWire::new(vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0)], false)
            .execute(&mut store)
            .unwrap();
        assert!(MakeFace::new(wire, vec![]).execute(&mut store).is_err());
    }

    #[test]
    fn twisted_quad_rejected() {
        let mut store = TopologyStore::new();
        let wire = MakeWire::new(
            vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.5), p(0.0, 1.0, 0.0)],
            true,
        )
        .execute(&mut store)
        .unwrap();
        assert!(MakeFace::new(wire, vec![]).execute(&mut store).is_err());
    }
}

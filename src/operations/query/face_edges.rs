use crate::error::Result;
use crate::math::{Point3, Vector3};
use crate::topology::{FaceId, TopologyStore};

/// Geometry of one boundary edge, in the edge's own direction.
#[derive(Debug, Clone, Copy)]
pub struct EdgeInfo {
    pub start: Point3,
    pub end: Point3,
    pub midpoint: Point3,
    pub start_tangent: Vector3,
    pub end_tangent: Vector3,
    pub length: f64,
}

/// Lists the distinct edges bounding a face.
pub struct FaceEdges {
    face: FaceId,
}

impl FaceEdges {
    #[must_use]
    pub fn new(face: FaceId) -> Self {
        Self { face }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if an entity is missing or an edge fails to evaluate.
    pub fn execute(&self, store: &TopologyStore) -> Result<Vec<EdgeInfo>> {
        store
            .face_edges(self.face)?
            .into_iter()
            .map(|id| {
                let edge = store.edge(id)?;
                Ok(EdgeInfo {
                    start: store.vertex(edge.start)?.point,
                    end: store.vertex(edge.end)?.point,
                    midpoint: edge.point_at(0.5)?,
                    start_tangent: edge.tangent_at(0.0)?,
                    end_tangent: edge.tangent_at(1.0)?,
                    length: edge.length(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::surface::Cylinder;
    use crate::operations::creation::MakePatch;
    use crate::topology::FaceSurface;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn arc_edge_midpoint_lies_on_arc() {
        let mut store = TopologyStore::new();
        let cyl = Cylinder::new(Point3::origin(), 2.0, Vector3::z(), Vector3::x()).unwrap();
        let face = MakePatch::new(FaceSurface::Cylinder(cyl), (0.0, FRAC_PI_2), (0.0, 1.0))
            .execute(&mut store)
            .unwrap();
        let edges = FaceEdges::new(face).execute(&store).unwrap();
        assert_eq!(edges.len(), 4);
        let arc = &edges[0];
        let h = 2.0_f64.sqrt();
        assert!((arc.midpoint - Point3::new(h, h, 0.0)).norm() < 1e-12);
        assert!((arc.start_tangent - Vector3::y()).norm() < 1e-12);
        assert!((arc.end_tangent + Vector3::x()).norm() < 1e-12);
    }
}

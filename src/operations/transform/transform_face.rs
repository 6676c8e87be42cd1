use std::collections::HashMap;

use crate::error::Result;
use crate::math::RigidTransform;
use crate::topology::{
    EdgeData, EdgeId, FaceData, FaceId, OrientedEdge, TopologyStore, VertexId, WireData, WireId,
};

/// Copies a face with all of its wires, edges and vertices moved by a rigid
/// transform.
///
/// The source face is left untouched, so a failed copy never disturbs
/// existing geometry. Entities shared between wires of the face stay shared
/// in the copy.
pub struct TransformFace {
    face: FaceId,
    transform: RigidTransform,
}

impl TransformFace {
    #[must_use]
    pub fn new(face: FaceId, transform: RigidTransform) -> Self {
        Self { face, transform }
    }

    /// Executes the operation, returning the handle of the new face.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or one of its entities is missing.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<FaceId> {
        let source = store.face(self.face)?.clone();
        let mut copier = Copier {
            transform: &self.transform,
            vertices: HashMap::new(),
            edges: HashMap::new(),
        };

        let outer_wire = copier.wire(store, source.outer_wire)?;
        let inner_wires = source
            .inner_wires
            .iter()
            .map(|&w| copier.wire(store, w))
            .collect::<Result<Vec<_>>>()?;

        Ok(store.add_face(FaceData {
            surface: source.surface.transformed(&self.transform),
            outer_wire,
            inner_wires,
            same_sense: source.same_sense,
        }))
    }
}

struct Copier<'a> {
    transform: &'a RigidTransform,
    vertices: HashMap<VertexId, VertexId>,
    edges: HashMap<EdgeId, EdgeId>,
}

impl Copier<'_> {
    fn vertex(&mut self, store: &mut TopologyStore, id: VertexId) -> Result<VertexId> {
        if let Some(&copy) = self.vertices.get(&id) {
            return Ok(copy);
        }
        let moved = store.vertex(id)?.transformed(self.transform);
        let copy = store.add_vertex(moved);
        self.vertices.insert(id, copy);
        Ok(copy)
    }

    fn edge(&mut self, store: &mut TopologyStore, id: EdgeId) -> Result<EdgeId> {
        if let Some(&copy) = self.edges.get(&id) {
            return Ok(copy);
        }
        let source = store.edge(id)?.clone();
        let start = self.vertex(store, source.start)?;
        let end = self.vertex(store, source.end)?;
        let copy = store.add_edge(EdgeData {
            start,
            end,
            curve: source.curve.transformed(self.transform),
            t_start: source.t_start,
            t_end: source.t_end,
        });
        self.edges.insert(id, copy);
        Ok(copy)
    }

    fn wire(&mut self, store: &mut TopologyStore, id: WireId) -> Result<WireId> {
        let source = store.wire(id)?.clone();
        let edges = source
            .edges
            .iter()
            .map(|oe| Ok(OrientedEdge::new(self.edge(store, oe.edge)?, oe.forward)))
            .collect::<Result<Vec<_>>>()?;
        Ok(store.add_wire(WireData {
            edges,
            is_closed: source.is_closed,
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Point3, Vector3};
    use crate::operations::creation::{MakeFace, MakeWire};
    use crate::operations::query::FaceArea;
    use std::f64::consts::FRAC_PI_2;

    fn square(store: &mut TopologyStore) -> FaceId {
        let wire = MakeWire::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            true,
        )
        .execute(store)
        .unwrap();
        MakeFace::new(wire, vec![]).execute(store).unwrap()
    }

    #[test]
    fn copy_moves_and_source_stays() {
        let mut store = TopologyStore::new();
        let face = square(&mut store);
        let turn =
            RigidTransform::rotation_about(&Point3::origin(), &Vector3::x(), FRAC_PI_2).unwrap();
        let moved = TransformFace::new(face, turn).execute(&mut store).unwrap();
        assert_ne!(moved, face);

        let before = store.face_vertex_points(face).unwrap();
        let after = store.face_vertex_points(moved).unwrap();
        assert!((before[2] - Point3::new(1.0, 1.0, 0.0)).norm() < 1e-12);
        assert!((after[2] - Point3::new(1.0, 0.0, 1.0)).norm() < 1e-12);
        let a0 = FaceArea::new(face).execute(&store).unwrap();
        let a1 = FaceArea::new(moved).execute(&store).unwrap();
        assert!((a0 - a1).abs() < 1e-12);
    }

    #[test]
    fn closing_vertex_stays_shared() {
        let mut store = TopologyStore::new();
        let face = square(&mut store);
        let moved = TransformFace::new(face, RigidTransform::translation(Vector3::z()))
            .execute(&mut store)
            .unwrap();
        let wire = store.face(moved).unwrap().outer_wire;
        let edges = &store.wire(wire).unwrap().edges;
        let first = store.edge(edges[0].edge).unwrap().start;
        let last = store.edge(edges[3].edge).unwrap().end;
        assert_eq!(first, last);
    }
}

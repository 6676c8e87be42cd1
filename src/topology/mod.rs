pub mod edge;
pub mod face;
pub mod shell;
pub mod solid;
pub mod vertex;
pub mod wire;

pub use edge::{EdgeCurve, EdgeData, EdgeId};
pub use face::{FaceData, FaceId, FaceSurface};
pub use shell::{ShellData, ShellId};
pub use solid::{SolidData, SolidId};
pub use vertex::{VertexData, VertexId};
pub use wire::{OrientedEdge, WireData, WireId};

use std::collections::HashSet;

use slotmap::SlotMap;

use crate::error::{Result, TopologyError};
use crate::math::Point3;

/// Arena owning every topological entity.
///
/// Entities refer to each other through typed generational keys, so a
/// stale handle is reported as [`TopologyError::EntityNotFound`] instead of
/// dangling.
#[derive(Debug, Default)]
pub struct TopologyStore {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    wires: SlotMap<WireId, WireData>,
    faces: SlotMap<FaceId, FaceData>,
    shells: SlotMap<ShellId, ShellData>,
    solids: SlotMap<SolidId, SolidData>,
}

macro_rules! arena_access {
    ($field:ident, $id:ty, $data:ty, $add:ident, $get:ident, $get_mut:ident, $name:literal) => {
        #[doc = concat!("Inserts a ", $name, " and returns its handle.")]
        pub fn $add(&mut self, data: $data) -> $id {
            self.$field.insert(data)
        }

        #[doc = concat!("Looks up a ", $name, ".")]
        ///
        /// # Errors
        ///
        /// Returns [`TopologyError::EntityNotFound`] for an unknown handle.
        pub fn $get(&self, id: $id) -> std::result::Result<&$data, TopologyError> {
            self.$field
                .get(id)
                .ok_or(TopologyError::EntityNotFound($name))
        }

        #[doc = concat!("Looks up a ", $name, " for mutation.")]
        ///
        /// # Errors
        ///
        /// Returns [`TopologyError::EntityNotFound`] for an unknown handle.
        pub fn $get_mut(&mut self, id: $id) -> std::result::Result<&mut $data, TopologyError> {
            self.$field
                .get_mut(id)
                .ok_or(TopologyError::EntityNotFound($name))
        }
    };
}

impl TopologyStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    arena_access!(vertices, VertexId, VertexData, add_vertex, vertex, vertex_mut, "vertex");
    arena_access!(edges, EdgeId, EdgeData, add_edge, edge, edge_mut, "edge");
    arena_access!(wires, WireId, WireData, add_wire, wire, wire_mut, "wire");
    arena_access!(faces, FaceId, FaceData, add_face, face, face_mut, "face");
    arena_access!(shells, ShellId, ShellData, add_shell, shell, shell_mut, "shell");
    arena_access!(solids, SolidId, SolidData, add_solid, solid, solid_mut, "solid");

    /// Faces of every shell of `solid`, outer shell first.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid or one of its shells is missing.
    pub fn solid_faces(&self, solid: SolidId) -> Result<Vec<FaceId>> {
        let data = self.solid(solid)?;
        let mut faces = Vec::new();
        for shell in std::iter::once(data.outer_shell).chain(data.inner_shells.iter().copied()) {
            faces.extend_from_slice(&self.shell(shell)?.faces);
        }
        Ok(faces)
    }

    /// Vertex where each oriented edge of `wire` begins, in traversal order.
    ///
    /// # Errors
    ///
    /// Returns an error if the wire or one of its edges is missing.
    pub fn wire_vertices(&self, wire: WireId) -> Result<Vec<VertexId>> {
        self.wire(wire)?
            .edges
            .iter()
            .map(|oe| {
                let edge = self.edge(oe.edge)?;
                Ok(if oe.forward { edge.start } else { edge.end })
            })
            .collect()
    }

    /// Boundary of `wire` as a polyline, with arcs split into short chords.
    /// The closing point is not repeated.
    ///
    /// # Errors
    ///
    /// Returns an error if an entity is missing or an edge fails to evaluate.
    pub fn wire_polyline(&self, wire: WireId) -> Result<Vec<Point3>> {
        let mut points = Vec::new();
        for oe in &self.wire(wire)?.edges {
            let edge = self.edge(oe.edge)?;
            let n = edge.segment_count();
            for k in 0..n {
                #[allow(clippy::cast_precision_loss)]
                let s = k as f64 / n as f64;
                points.push(edge.point_at(if oe.forward { s } else { 1.0 - s })?);
            }
        }
        Ok(points)
    }

    /// Boundary polylines of `face`, outer wire first.
    ///
    /// # Errors
    ///
    /// Returns an error if an entity is missing or an edge fails to evaluate.
    pub fn face_polylines(&self, face: FaceId) -> Result<Vec<Vec<Point3>>> {
        self.face(face)?
            .wires()
            .map(|wire| self.wire_polyline(wire))
            .collect()
    }

    /// Distinct edges bounding `face`, over all of its wires.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or one of its wires is missing.
    pub fn face_edges(&self, face: FaceId) -> Result<Vec<EdgeId>> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for wire in self.face(face)?.wires() {
            for oe in &self.wire(wire)?.edges {
                if seen.insert(oe.edge) {
                    edges.push(oe.edge);
                }
            }
        }
        Ok(edges)
    }

    /// Positions of the distinct vertices of `face`.
    ///
    /// # Errors
    ///
    /// Returns an error if an entity is missing.
    pub fn face_vertex_points(&self, face: FaceId) -> Result<Vec<Point3>> {
        let mut seen = HashSet::new();
        let mut points = Vec::new();
        for wire in self.face(face)?.wires() {
            for vid in self.wire_vertices(wire)? {
                if seen.insert(vid) {
                    points.push(self.vertex(vid)?.point);
                }
            }
        }
        Ok(points)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::curve::Line;

    #[test]
    fn stale_handle_is_reported() {
        let mut store = TopologyStore::new();
        let id = store.add_vertex(VertexData::new(Point3::origin()));
        let other = TopologyStore::new();
        assert!(matches!(
            other.vertex(id),
            Err(TopologyError::EntityNotFound("vertex"))
        ));
        store.vertex_mut(id).unwrap().point.x = 4.0;
        assert!((store.vertex(id).unwrap().point.x - 4.0).abs() < 1e-12);
    }

    #[test]
    fn reversed_edge_starts_at_its_end_vertex() {
        let mut store = TopologyStore::new();
        let a = store.add_vertex(VertexData::new(Point3::origin()));
        let b = store.add_vertex(VertexData::new(Point3::new(2.0, 0.0, 0.0)));
        let line = Line::through(Point3::origin(), Point3::new(2.0, 0.0, 0.0)).unwrap();
        let edge = store.add_edge(EdgeData {
            start: a,
            end: b,
            curve: EdgeCurve::Line(line),
            t_start: 0.0,
            t_end: 2.0,
        });
        let wire = store.add_wire(WireData {
            edges: vec![OrientedEdge::new(edge, false)],
            is_closed: false,
        });
        assert_eq!(store.wire_vertices(wire).unwrap(), vec![b]);
        let poly = store.wire_polyline(wire).unwrap();
        assert!((poly[0] - Point3::new(2.0, 0.0, 0.0)).norm() < 1e-12);
    }
}

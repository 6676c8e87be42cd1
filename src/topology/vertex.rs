use crate::math::{Point3, RigidTransform};

slotmap::new_key_type! {
    /// Handle of a vertex in the [`super::TopologyStore`].
    pub struct VertexId;
}

/// A topological vertex: a position shared by the edges that meet there.
#[derive(Debug, Clone)]
pub struct VertexData {
    pub point: Point3,
}

impl VertexData {
    #[must_use]
    pub fn new(point: Point3) -> Self {
        Self { point }
    }

    /// Returns a copy of the vertex moved by `transform`.
    #[must_use]
    pub fn transformed(&self, transform: &RigidTransform) -> Self {
        Self::new(transform.transform_point(&self.point))
    }
}

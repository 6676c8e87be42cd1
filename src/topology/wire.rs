use super::edge::EdgeId;

slotmap::new_key_type! {
    /// Handle of a wire in the [`super::TopologyStore`].
    pub struct WireId;
}

/// An edge as used by a wire, possibly traversed end to start.
#[derive(Debug, Clone, Copy)]
pub struct OrientedEdge {
    pub edge: EdgeId,
    pub forward: bool,
}

impl OrientedEdge {
    #[must_use]
    pub fn new(edge: EdgeId, forward: bool) -> Self {
        Self { edge, forward }
    }
}

/// Ordered chain of oriented edges.
#[derive(Debug, Clone)]
pub struct WireData {
    pub edges: Vec<OrientedEdge>,
    pub is_closed: bool,
}

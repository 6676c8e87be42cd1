use std::fmt;

use serde::Serialize;
use slotmap::SlotMap;

use crate::error::{Result, TopologyError};
use crate::kernel::SurfaceKind;
use crate::math::{Point3, Vector3};

use super::{Diagnostic, FaceNumber, FaceRecord};

slotmap::new_key_type! {
    /// Handle of a node in a [`BendTree`].
    pub struct NodeId;
}

/// Which way a bend turns relative to its axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BendDirection {
    Up,
    Down,
}

/// Geometry of a cylindrical bend face.
#[derive(Debug, Clone, Serialize)]
pub struct BendGeometry {
    /// Unit direction of the cylinder axis.
    pub axis: Vector3,
    /// Face centroid projected onto the cylinder axis.
    pub center: Point3,
    /// Radius of the cylinder on the side of the sheet the tree follows.
    /// That is the inner radius when the bend turns toward that side, and
    /// the inner radius plus the thickness when it turns away.
    pub radius: f64,
    /// Angular span of the face in `(0, 2pi]`.
    pub angle: f64,
    pub direction: BendDirection,
    /// Unit tangents at both ends of the face's first edge.
    pub tangent_vectors: Vec<Vector3>,
}

impl BendGeometry {
    /// Length of the bend once straightened.
    #[must_use]
    pub fn developed_length(&self) -> f64 {
        self.radius * self.angle
    }
}

/// Midpoint of the edge a node shares with its parent.
///
/// `before` is recorded when bends are analyzed; `after` follows the node
/// through every transform applied during unfolding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pivot {
    pub before: Point3,
    pub after: Point3,
}

/// One face of the sheet and its place in the bend hierarchy.
#[derive(Debug, Clone)]
pub struct FaceNode<F> {
    /// Classification at build time. Its handle is the original face.
    pub record: FaceRecord<F>,
    /// Current geometry; replaced whenever the node is moved or developed.
    pub face: F,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub processed: bool,
    pub flattened: bool,
    pub bend: Option<BendGeometry>,
    pub center_of_mass: Option<Point3>,
    pub pivot: Option<Pivot>,
    pub centroid_before: Option<Point3>,
}

impl<F: Copy> FaceNode<F> {
    fn new(record: FaceRecord<F>, parent: Option<NodeId>) -> Self {
        Self {
            record,
            face: record.handle,
            parent,
            children: Vec::new(),
            processed: false,
            flattened: false,
            bend: None,
            center_of_mass: None,
            pivot: None,
            centroid_before: None,
        }
    }
}

impl<F> FaceNode<F> {
    #[must_use]
    pub fn id(&self) -> FaceNumber {
        self.record.id
    }

    #[must_use]
    pub fn kind(&self) -> SurfaceKind {
        self.record.kind
    }
}

/// Rooted tree of sheet faces connected through bends.
///
/// Nodes live in an arena and refer to each other by [`NodeId`], so the
/// parent links carry no ownership.
#[derive(Debug, Clone)]
pub struct BendTree<F> {
    nodes: SlotMap<NodeId, FaceNode<F>>,
    root: NodeId,
    diagnostics: Vec<Diagnostic>,
}

impl<F: Copy> BendTree<F> {
    /// Creates a tree holding only `root`.
    #[must_use]
    pub fn new(root: FaceRecord<F>) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(FaceNode::new(root, None));
        Self {
            nodes,
            root,
            diagnostics: Vec::new(),
        }
    }

    /// Attaches `record` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for an unknown parent.
    pub fn add_child(&mut self, parent: NodeId, record: FaceRecord<F>) -> Result<NodeId> {
        if !self.nodes.contains_key(parent) {
            return Err(TopologyError::EntityNotFound("node").into());
        }
        let child = self.nodes.insert(FaceNode::new(record, Some(parent)));
        self.node_mut(parent)?.children.push(child);
        Ok(child)
    }
}

impl<F> BendTree<F> {
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for an unknown node.
    pub fn node(&self, id: NodeId) -> Result<&FaceNode<F>> {
        self.nodes
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("node").into())
    }

    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for an unknown node.
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut FaceNode<F>> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("node").into())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node, parents before children, siblings in insertion order.
    #[must_use]
    pub fn preorder(&self) -> Vec<NodeId> {
        self.subtree(self.root)
    }

    /// `id` followed by all of its descendants, in preorder.
    #[must_use]
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(node) = self.nodes.get(next) else {
                continue;
            };
            order.push(next);
            stack.extend(node.children.iter().rev());
        }
        order
    }

    /// Number of edges from the root down to `id`.
    #[must_use]
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.nodes.get(id).and_then(|n| n.parent);
        while let Some(parent) = current {
            depth += 1;
            current = self.nodes.get(parent).and_then(|n| n.parent);
        }
        depth
    }

    /// Node wrapping the face numbered `face`, if it is in the tree.
    #[must_use]
    pub fn find(&self, face: FaceNumber) -> Option<NodeId> {
        self.nodes
            .iter()
            .find_map(|(id, node)| (node.record.id == face).then_some(id))
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &FaceNode<F>)> {
        self.nodes.iter()
    }

    /// Recoverable problems met while analyzing and unfolding the tree.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        if !self.diagnostics.contains(&diagnostic) {
            self.diagnostics.push(diagnostic);
        }
    }
}

impl<F> fmt::Display for BendTree<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for id in self.preorder() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            let indent = "  ".repeat(self.depth(id));
            write!(
                f,
                "{indent}{} [{}] area={:.3}",
                node.record.id, node.record.kind, node.record.area
            )?;
            if let Some(bend) = &node.bend {
                write!(
                    f,
                    " r={:.3} angle={:.2}deg",
                    bend.radius,
                    bend.angle.to_degrees()
                )?;
            }
            if node.flattened {
                f.write_str(" (flat)")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{KernelContext, Result};
use crate::kernel::{GeometryKernel, SurfaceKind};
use crate::math::{is_parallel, midpoint, Point3, RigidTransform, Vector3, TOLERANCE};

use super::bend::{bend_geometry, shared_vertices};
use super::{BendTree, Diagnostic, NodeId, SheetConfig, TripletIssue, UnfoldMode};

/// What an [`Unfold`] run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UnfoldReport {
    /// The tree was rotated to bring the root into the XY plane.
    pub aligned: bool,
    /// Rigid transforms applied, one per moved subtree.
    pub transforms_applied: usize,
    pub triplets_flattened: usize,
    /// Triplets left bent because their geometry was degenerate.
    pub skipped: usize,
}

/// Straightens every Flat -> Cylindrical -> Flat triplet of an analyzed
/// [`BendTree`], depth first from the root.
///
/// For each triplet the child face and everything below it are rotated
/// flat about the bend axis and slid out so that the two shared edges end
/// up `radius * angle` apart. The bend face itself is replaced by the
/// planar strip joining them. Bends already flattened are left alone, so a
/// second run is a no-op.
pub struct Unfold<'a> {
    config: &'a SheetConfig,
}

impl<'a> Unfold<'a> {
    #[must_use]
    pub fn new(config: &'a SheetConfig) -> Self {
        Self { config }
    }

    /// Executes the unfolding in place.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SheetError::Kernel`] if a kernel query or
    /// transform fails. Degenerate triplets are not errors; they are
    /// recorded in the tree's diagnostics.
    pub fn execute<K: GeometryKernel>(
        &self,
        kernel: &mut K,
        tree: &mut BendTree<K::Face>,
    ) -> Result<UnfoldReport> {
        let mut unfolder = Unfolder {
            kernel,
            config: self.config,
            report: UnfoldReport::default(),
        };
        if self.config.align_root {
            unfolder.align_root(tree)?;
        }
        unfolder.visit(tree, tree.root())?;

        let report = unfolder.report;
        info!(
            flattened = report.triplets_flattened,
            skipped = report.skipped,
            transforms = report.transforms_applied,
            "unfolded"
        );
        Ok(report)
    }
}

struct Unfolder<'k, K: GeometryKernel> {
    kernel: &'k mut K,
    config: &'k SheetConfig,
    report: UnfoldReport,
}

impl<K: GeometryKernel> Unfolder<'_, K> {
    /// Rotates the whole tree about the origin so the root normal is +Z.
    fn align_root(&mut self, tree: &mut BendTree<K::Face>) -> Result<()> {
        let root = tree.node(tree.root())?;
        if root.kind() != SurfaceKind::Flat {
            return Ok(());
        }
        let number = root.id();
        let normal = self
            .kernel
            .plane_params(root.face)
            .on_face(number, "plane_params")?
            .normal;
        if is_parallel(&normal, &Vector3::z(), self.config.angle_tolerance) {
            return Ok(());
        }
        let axis = normal.cross(&Vector3::z());
        if axis.norm() < TOLERANCE {
            return Ok(());
        }
        let angle = normal.normalize().z.clamp(-1.0, 1.0).acos();
        let turn = RigidTransform::rotation_about(&Point3::origin(), &axis, angle)
            .on_face(number, "align_root")?;
        self.move_subtree(tree, tree.root(), &turn)?;
        self.report.aligned = true;
        debug!(angle = angle.to_degrees(), "aligned root with the XY plane");
        Ok(())
    }

    fn visit(&mut self, tree: &mut BendTree<K::Face>, id: NodeId) -> Result<()> {
        let node = tree.node(id)?;
        if node.kind() == SurfaceKind::Unknown {
            let face = node.id();
            tree.report(Diagnostic::UnclassifiableSurface { face });
            return Ok(());
        }
        let parent_is_flat = node.kind() == SurfaceKind::Flat;

        for child in node.children.clone() {
            let node = tree.node(child)?;
            match node.kind() {
                SurfaceKind::Unknown => {
                    let face = node.id();
                    tree.report(Diagnostic::UnclassifiableSurface { face });
                }
                SurfaceKind::Flat => self.visit(tree, child)?,
                SurfaceKind::Cylindrical => {
                    let grandchildren = node.children.clone();
                    if parent_is_flat && !node.flattened {
                        let target = grandchildren.iter().copied().find(|&g| {
                            tree.node(g)
                                .is_ok_and(|n| n.kind() == SurfaceKind::Flat)
                        });
                        if let Some(target) = target {
                            self.flatten(tree, id, child, target)?;
                        }
                    }
                    for grandchild in grandchildren {
                        self.visit(tree, grandchild)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Flattens the triplet `parent -> bend -> child`.
    fn flatten(
        &mut self,
        tree: &mut BendTree<K::Face>,
        parent: NodeId,
        bend: NodeId,
        child: NodeId,
    ) -> Result<()> {
        let (p, b, c) = (tree.node(parent)?, tree.node(bend)?, tree.node(child)?);
        let (p_face, b_face, c_face) = (p.face, b.face, c.face);
        let (p_id, b_id, c_id) = (p.id(), b.id(), c.id());
        let bend_children = b.children.clone();
        let tol = self.config.vertex_match_tolerance;

        let skip = |tree: &mut BendTree<K::Face>, reason: TripletIssue| {
            warn!(parent = %p_id, bend = %b_id, child = %c_id, %reason, "skipped bend");
            tree.report(Diagnostic::DegenerateTriplet {
                parent: p_id,
                bend: b_id,
                child: c_id,
                reason,
            });
        };

        let v = shared_vertices(&*self.kernel, p_face, b_face, b_id, tol)?;
        let [v1, v2] = v.as_slice() else {
            skip(tree, TripletIssue::NoParentPivot);
            self.report.skipped += 1;
            return Ok(());
        };
        let (v1, v2) = (*v1, *v2);
        let w = shared_vertices(&*self.kernel, b_face, c_face, c_id, tol)?;
        let [w1, w2] = w.as_slice() else {
            skip(tree, TripletIssue::NoChildPivot);
            self.report.skipped += 1;
            return Ok(());
        };
        let (w1, w2) = (*w1, *w2);
        let (m1, m2) = (midpoint(&v1, &v2), midpoint(&w1, &w2));

        let p_centroid = self.kernel.centroid(p_face).on_face(p_id, "centroid")?;
        let Some(d) = self.direction(&m1, &m2, &p_centroid) else {
            skip(tree, TripletIssue::NoDirection);
            self.report.skipped += 1;
            return Ok(());
        };

        let b_centroid = self.kernel.centroid(b_face).on_face(b_id, "centroid")?;
        let geometry = bend_geometry(&*self.kernel, b_face, b_id, &b_centroid)?;
        let length = geometry.developed_length();

        // Either sense of the axis may be the unbending one; keep the one
        // that swings the child out along the unfold direction.
        let arm = self.kernel.centroid(c_face).on_face(c_id, "centroid")? - m2;
        let forward = RigidTransform::rotation_about(&m2, &geometry.axis, -geometry.angle)
            .on_face(b_id, "rotation")?;
        let backward = RigidTransform::rotation_about(&m2, &geometry.axis, geometry.angle)
            .on_face(b_id, "rotation")?;
        let rotation = if forward.transform_vector(&arm).dot(&d)
            >= backward.transform_vector(&arm).dot(&d)
        {
            forward
        } else {
            backward
        };
        let transform = rotation.then(&RigidTransform::translation(m1 + d * length - m2));

        for subtree in bend_children {
            self.move_subtree(tree, subtree, &transform)?;
        }

        let (w1, w2) = (transform.transform_point(&w1), transform.transform_point(&w2));
        let (near_v1, near_v2) = if (w1 - v1).norm() <= (w2 - v1).norm() {
            (w1, w2)
        } else {
            (w2, w1)
        };
        let strip = self
            .kernel
            .planar_face(&[v1, v2, near_v2, near_v1])
            .on_face(b_id, "planar_face")?;
        let strip_centroid = self.kernel.centroid(strip).on_face(b_id, "centroid")?;

        let node = tree.node_mut(bend)?;
        node.face = strip;
        node.flattened = true;
        node.center_of_mass = Some(strip_centroid);
        node.bend = Some(geometry);
        tree.node_mut(child)?.flattened = true;

        self.report.triplets_flattened += 1;
        debug!(parent = %p_id, bend = %b_id, child = %c_id, length, "flattened bend");
        Ok(())
    }

    /// Unit direction in which the child is laid out, or `None` if every
    /// candidate vanishes.
    fn direction(&self, m1: &Point3, m2: &Point3, parent_centroid: &Point3) -> Option<Vector3> {
        let project = |v: Vector3| match self.config.mode {
            UnfoldMode::PlanView => Vector3::new(v.x, v.y, 0.0),
            UnfoldMode::Spatial => v,
        };
        [m2 - m1, m1 - parent_centroid]
            .into_iter()
            .map(project)
            .find_map(|v| v.try_normalize(self.config.vertex_match_tolerance.max(TOLERANCE)))
    }

    /// Replaces the geometry of `id` and all of its descendants by copies
    /// moved with `transform`.
    fn move_subtree(
        &mut self,
        tree: &mut BendTree<K::Face>,
        id: NodeId,
        transform: &RigidTransform,
    ) -> Result<()> {
        for n in tree.subtree(id) {
            let node = tree.node(n)?;
            let moved = self
                .kernel
                .apply_transform(node.face, transform)
                .on_face(node.id(), "apply_transform")?;
            let node = tree.node_mut(n)?;
            node.face = moved;
            node.center_of_mass = node.center_of_mass.map(|c| transform.transform_point(&c));
            if let Some(pivot) = &mut node.pivot {
                pivot.after = transform.transform_point(&pivot.after);
            }
        }
        self.report.transforms_applied += 1;
        Ok(())
    }
}

use std::f64::consts::TAU;

use tracing::{debug, warn};

use crate::error::{KernelContext, Result};
use crate::kernel::{GeometryKernel, SurfaceKind};
use crate::math::{midpoint, Point3};

use super::{BendDirection, BendGeometry, BendTree, Diagnostic, FaceNumber, Pivot, SheetConfig};

/// Maps a raw angular span into `(0, 2pi]`.
///
/// Spans measured across the parametrization seam come out zero, negative
/// or above a full turn; whole turns are added or removed until the value
/// lands in range. A zero span counts as a full turn.
#[must_use]
pub fn normalize_bend_angle(span: f64) -> f64 {
    let r = span.rem_euclid(TAU);
    if r <= 0.0 {
        TAU
    } else {
        r
    }
}

/// Annotates every node of a [`BendTree`] with its centroid, its pivot on
/// the edge shared with its parent and, for cylindrical faces, the bend
/// geometry.
///
/// A node whose surface is neither flat nor cylindrical is reported as a
/// [`Diagnostic::UnclassifiableSurface`] and its whole branch is skipped.
pub struct AnalyzeBends<'a> {
    config: &'a SheetConfig,
}

impl<'a> AnalyzeBends<'a> {
    #[must_use]
    pub fn new(config: &'a SheetConfig) -> Self {
        Self { config }
    }

    /// Executes the analysis in place.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SheetError::Kernel`] if a kernel query fails.
    pub fn execute<K: GeometryKernel>(
        &self,
        kernel: &K,
        tree: &mut BendTree<K::Face>,
    ) -> Result<()> {
        let mut stack = vec![tree.root()];
        let mut bends = 0usize;
        while let Some(id) = stack.pop() {
            let node = tree.node(id)?;
            let (face, number, kind, parent) = (node.face, node.id(), node.kind(), node.parent);
            if kind == SurfaceKind::Unknown {
                warn!(face = %number, "unclassifiable surface, branch left as is");
                tree.report(Diagnostic::UnclassifiableSurface { face: number });
                continue;
            }

            let centroid = kernel.centroid(face).on_face(number, "centroid")?;
            let pivot = match parent {
                Some(parent) => {
                    let parent_face = tree.node(parent)?.face;
                    common_pivot(kernel, parent_face, face, number, self.config)?
                        .map(|m| Pivot { before: m, after: m })
                }
                None => None,
            };
            let bend = if kind == SurfaceKind::Cylindrical {
                bends += 1;
                Some(bend_geometry(kernel, face, number, &centroid)?)
            } else {
                None
            };

            let node = tree.node_mut(id)?;
            node.center_of_mass = Some(centroid);
            node.centroid_before = Some(centroid);
            node.pivot = pivot;
            node.bend = bend;
            node.processed = true;
            stack.extend(node.children.iter().rev());
        }
        debug!(bends, "analyzed bends");
        Ok(())
    }
}

pub(crate) fn bend_geometry<K: GeometryKernel>(
    kernel: &K,
    face: K::Face,
    number: FaceNumber,
    centroid: &Point3,
) -> Result<BendGeometry> {
    let cylinder = kernel.cylinder_params(face).on_face(number, "cylinder_params")?;
    let uv = kernel.uv_bounds(face).on_face(number, "uv_bounds")?;
    let angle = normalize_bend_angle(uv.u_max - uv.u_min);
    let axis = cylinder.axis;
    let center = cylinder.location + axis * axis.dot(&(centroid - cylinder.location));

    let edges = kernel.edges(face).on_face(number, "edges")?;
    #[allow(clippy::cast_precision_loss)]
    let mean_z = edges.iter().map(|e| e.midpoint.z).sum::<f64>() / edges.len().max(1) as f64;
    let direction = if mean_z > center.z {
        BendDirection::Down
    } else {
        BendDirection::Up
    };
    let tangent_vectors = edges
        .first()
        .map(|e| vec![e.start_tangent, e.end_tangent])
        .unwrap_or_default();

    debug!(
        face = %number,
        radius = cylinder.radius,
        angle = angle.to_degrees(),
        ?direction,
        "bend"
    );
    Ok(BendGeometry {
        axis,
        center,
        radius: cylinder.radius,
        angle,
        direction,
        tangent_vectors,
    })
}

/// Vertices of `a` that coincide with a vertex of `b`.
pub(crate) fn shared_vertices<K: GeometryKernel>(
    kernel: &K,
    a: K::Face,
    b: K::Face,
    number: FaceNumber,
    tolerance: f64,
) -> Result<Vec<Point3>> {
    let va = kernel.vertices(a).on_face(number, "vertices")?;
    let vb = kernel.vertices(b).on_face(number, "vertices")?;
    Ok(va
        .into_iter()
        .filter(|p| vb.iter().any(|q| (p - q).norm() <= tolerance))
        .collect())
}

/// Midpoint of the two vertices `a` and `b` have in common, or `None`
/// unless exactly two coincide.
pub(crate) fn common_pivot<K: GeometryKernel>(
    kernel: &K,
    a: K::Face,
    b: K::Face,
    number: FaceNumber,
    config: &SheetConfig,
) -> Result<Option<Point3>> {
    let shared = shared_vertices(kernel, a, b, number, config.vertex_match_tolerance)?;
    Ok(match shared.as_slice() {
        [p, q] => Some(midpoint(p, q)),
        _ => None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::surface::{Cone, Cylinder};
    use crate::math::Vector3;
    use crate::operations::creation::{MakeBentSheet, MakePatch};
    use crate::sheet::{BuildHierarchy, FaceRecord, FindThicknessPairs, IdAllocator};
    use crate::topology::{FaceId, FaceSurface, TopologyStore};
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn analyzed_l_bracket() -> (TopologyStore, BendTree<FaceId>) {
        analyzed(
            MakeBentSheet::new(2.0, 10.0)
                .leg(20.0)
                .bend(2.0, -FRAC_PI_2)
                .leg(15.0),
            2.0,
        )
    }

    fn analyzed(sheet: MakeBentSheet, t: f64) -> (TopologyStore, BendTree<FaceId>) {
        let mut store = TopologyStore::new();
        let solid = sheet.execute(&mut store).unwrap();
        let mut ids = IdAllocator::new();
        let records: Vec<_> = store
            .faces_of(solid)
            .unwrap()
            .into_iter()
            .map(|f| FaceRecord::classify(&store, f, ids.id_for(f)).unwrap())
            .collect();
        let config = SheetConfig::default();
        let pairs = FindThicknessPairs::new(t, &config)
            .execute(&store, &records)
            .unwrap()
            .pairs;
        let mut tree = BuildHierarchy::new(&config)
            .execute(&store, &pairs)
            .unwrap()
            .unwrap();
        AnalyzeBends::new(&config).execute(&store, &mut tree).unwrap();
        (store, tree)
    }

    #[test]
    fn angle_normalization() {
        assert_relative_eq!(normalize_bend_angle(FRAC_PI_2), FRAC_PI_2);
        assert_relative_eq!(normalize_bend_angle(-FRAC_PI_2), 1.5 * PI, epsilon = 1e-12);
        assert_relative_eq!(normalize_bend_angle(2.5 * PI), FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(normalize_bend_angle(0.0), TAU);
        assert_relative_eq!(normalize_bend_angle(2.0 * TAU), TAU);
        assert_relative_eq!(normalize_bend_angle(TAU), TAU);
    }

    #[test]
    fn l_bracket_bend_geometry() {
        let (_, tree) = analyzed_l_bracket();
        let order = tree.preorder();
        let bend_node = tree.node(order[1]).unwrap();
        let bend = bend_node.bend.as_ref().unwrap();
        assert_relative_eq!(bend.radius, 2.0);
        assert_relative_eq!(bend.angle, FRAC_PI_2, epsilon = 1e-9);
        assert_relative_eq!(bend.developed_length(), PI, epsilon = 1e-9);
        assert_relative_eq!(bend.center, p(20.0, 5.0, -2.0), epsilon = 1e-6);
        assert_eq!(bend.direction, BendDirection::Down);
        assert_eq!(bend.tangent_vectors.len(), 2);
        assert!(bend.angle > 0.0 && bend.angle <= TAU);

        // Shared edge with the root runs along y at x = 20, z = 0.
        let pivot = bend_node.pivot.unwrap();
        assert_relative_eq!(pivot.before, p(20.0, 5.0, 0.0), epsilon = 1e-9);
        let child = tree.node(order[2]).unwrap();
        assert_relative_eq!(child.pivot.unwrap().before, p(22.0, 5.0, -2.0), epsilon = 1e-9);

        assert!(tree.node(order[0]).unwrap().pivot.is_none());
        assert!(tree.nodes().all(|(_, n)| n.processed && n.center_of_mass.is_some()));
        assert!(tree.diagnostics().is_empty());
    }

    #[test]
    fn radius_follows_tracked_side() {
        // The tree follows the side on the outside of this bend.
        let (_, tree) = analyzed(
            MakeBentSheet::new(1.0, 8.0)
                .leg(10.0)
                .bend(3.0, FRAC_PI_2)
                .leg(30.0),
            1.0,
        );
        let bend = tree.node(tree.preorder()[1]).unwrap().bend.clone().unwrap();
        assert_relative_eq!(bend.radius, 4.0, epsilon = 1e-9);
        assert_relative_eq!(bend.developed_length(), 2.0 * PI, epsilon = 1e-9);
    }

    #[test]
    fn seam_straddling_bend_angle() {
        let mut store = TopologyStore::new();
        let cyl = Cylinder::new(p(0.0, 0.0, 0.0), 3.0, Vector3::z(), Vector3::x()).unwrap();
        let face = MakePatch::new(FaceSurface::Cylinder(cyl), (5.5, 6.7), (0.0, 4.0))
            .execute(&mut store)
            .unwrap();
        let mut ids = IdAllocator::new();
        let record = FaceRecord::classify(&store, face, ids.id_for(face)).unwrap();
        let mut tree = BendTree::new(record);
        AnalyzeBends::new(&SheetConfig::default())
            .execute(&store, &mut tree)
            .unwrap();
        let bend = tree.node(tree.root()).unwrap().bend.clone().unwrap();
        assert_relative_eq!(bend.angle, 1.2, epsilon = 1e-9);
    }

    #[test]
    fn unknown_surface_stops_its_branch() {
        let mut store = TopologyStore::new();
        let root_face = store
            .planar_face(&[p(0.0, 0.0, 0.0), p(4.0, 0.0, 0.0), p(4.0, 4.0, 0.0), p(0.0, 4.0, 0.0)])
            .unwrap();
        let cone = Cone::new(p(0.0, 0.0, -5.0), Vector3::z(), 0.4, Vector3::x()).unwrap();
        let cone_face = MakePatch::new(FaceSurface::Cone(cone), (0.0, FRAC_PI_2), (1.0, 2.0))
            .execute(&mut store)
            .unwrap();
        let tail = store
            .planar_face(&[p(9.0, 0.0, 0.0), p(9.0, 1.0, 0.0), p(8.0, 1.0, 0.0)])
            .unwrap();

        let mut ids = IdAllocator::new();
        let mut record = |f: FaceId| FaceRecord::classify(&store, f, ids.id_for(f)).unwrap();
        let (r0, r1, r2) = (record(root_face), record(cone_face), record(tail));
        let mut tree = BendTree::new(r0);
        let cone_node = tree.add_child(tree.root(), r1).unwrap();
        let tail_node = tree.add_child(cone_node, r2).unwrap();

        AnalyzeBends::new(&SheetConfig::default())
            .execute(&store, &mut tree)
            .unwrap();
        assert_eq!(
            tree.diagnostics(),
            &[Diagnostic::UnclassifiableSurface { face: FaceNumber(1) }]
        );
        assert!(tree.node(tree.root()).unwrap().processed);
        assert!(!tree.node(tail_node).unwrap().processed);
    }
}

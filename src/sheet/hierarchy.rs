use std::collections::{HashMap, VecDeque};

use tracing::{debug, info};

use crate::error::{KernelContext, Result};
use crate::kernel::GeometryKernel;
use crate::math::Point3;

use super::{BendTree, FaceNumber, FaceRecord, NodeId, SheetConfig, ThicknessPair};

/// A face, or both faces of a pair, still waiting for a parent.
#[derive(Debug, Clone, Copy)]
enum Candidate<F> {
    Pair(FaceRecord<F>, FaceRecord<F>),
    Single(FaceRecord<F>),
}

/// Grows a [`BendTree`] from thickness pairs by face adjacency.
///
/// The root is the largest paired face. Parents are taken breadth first;
/// each waiting candidate attaches its first face touching the current
/// parent, and the other face of a pair keeps waiting on its own. Faces
/// never reached are left out of the tree.
pub struct BuildHierarchy<'a> {
    config: &'a SheetConfig,
}

impl<'a> BuildHierarchy<'a> {
    #[must_use]
    pub fn new(config: &'a SheetConfig) -> Self {
        Self { config }
    }

    /// Executes the build. Returns `None` when there are no pairs.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SheetError::Kernel`] if sampling a face fails.
    pub fn execute<K: GeometryKernel>(
        &self,
        kernel: &K,
        pairs: &[ThicknessPair<K::Face>],
    ) -> Result<Option<BendTree<K::Face>>> {
        let Some((root_pair, root_is_a)) = largest_face(pairs) else {
            return Ok(None);
        };
        let root_pair = &pairs[root_pair];
        let (root, partner) = if root_is_a {
            (root_pair.a, root_pair.b)
        } else {
            (root_pair.b, root_pair.a)
        };

        let mut tree = BendTree::new(root);
        let mut waiting: Vec<Candidate<K::Face>> = vec![Candidate::Single(partner)];
        waiting.extend(
            pairs
                .iter()
                .filter(|p| p.a.id != root.id && p.b.id != root.id)
                .map(|p| Candidate::Pair(p.a, p.b)),
        );

        let mut probes = Probes::new(kernel, self.config);
        let mut frontier: VecDeque<(NodeId, FaceRecord<K::Face>)> =
            VecDeque::from([(tree.root(), root)]);

        while let Some((parent_id, parent)) = frontier.pop_front() {
            let mut still_waiting = Vec::with_capacity(waiting.len());
            let mut released = Vec::new();
            for candidate in waiting {
                let (first, second) = match candidate {
                    Candidate::Pair(a, b) => (a, Some(b)),
                    Candidate::Single(a) => (a, None),
                };
                let attached = if probes.adjacent(&first, &parent)? {
                    Some((first, second))
                } else {
                    match second {
                        Some(b) if probes.adjacent(&b, &parent)? => Some((b, Some(first))),
                        _ => None,
                    }
                };
                match attached {
                    Some((child, other)) => {
                        let node = tree.add_child(parent_id, child)?;
                        debug!(parent = %parent.id, child = %child.id, "attached face");
                        frontier.push_back((node, child));
                        released.extend(other.map(Candidate::Single));
                    }
                    None => still_waiting.push(candidate),
                }
            }
            still_waiting.extend(released);
            waiting = still_waiting;
        }

        if !waiting.is_empty() {
            debug!(orphans = waiting.len(), "faces not connected to the root");
        }
        info!(root = %root.id, faces = tree.len(), "built bend hierarchy");
        Ok(Some(tree))
    }
}

/// Index of the pair holding the largest face, and whether it is face `a`.
/// The first of equally large faces wins.
fn largest_face<F>(pairs: &[ThicknessPair<F>]) -> Option<(usize, bool)> {
    let mut best: Option<(usize, bool, f64)> = None;
    for (i, pair) in pairs.iter().enumerate() {
        for (is_a, face) in [(true, &pair.a), (false, &pair.b)] {
            if best.map_or(true, |(_, _, area)| face.area > area) {
                best = Some((i, is_a, face.area));
            }
        }
    }
    best.map(|(i, is_a, _)| (i, is_a))
}

/// Lazily sampled proximity points per face.
struct Probes<'k, K: GeometryKernel> {
    kernel: &'k K,
    config: &'k SheetConfig,
    points: HashMap<FaceNumber, Vec<Point3>>,
}

impl<'k, K: GeometryKernel> Probes<'k, K> {
    fn new(kernel: &'k K, config: &'k SheetConfig) -> Self {
        Self {
            kernel,
            config,
            points: HashMap::new(),
        }
    }

    fn points(&mut self, face: &FaceRecord<K::Face>) -> Result<&[Point3]> {
        if !self.points.contains_key(&face.id) {
            let n = self.config.adjacency_samples;
            let mut pts = self.kernel.sample(face.handle, n, n).on_face(face.id, "sample")?;
            pts.extend(self.kernel.vertices(face.handle).on_face(face.id, "vertices")?);
            self.points.insert(face.id, pts);
        }
        Ok(self.points.get(&face.id).map(Vec::as_slice).unwrap_or_default())
    }

    /// Bounding boxes overlap and some pair of probe points is within the
    /// adjacency tolerance.
    fn adjacent(&mut self, a: &FaceRecord<K::Face>, b: &FaceRecord<K::Face>) -> Result<bool> {
        let tol = self.config.adjacency_tolerance;
        if !a.bbox.intersects(&b.bbox, tol) {
            return Ok(false);
        }
        let pa = self.points(a)?.to_vec();
        let pb = self.points(b)?;
        Ok(pa.iter().any(|p| pb.iter().any(|q| (p - q).norm() <= tol)))
    }
}

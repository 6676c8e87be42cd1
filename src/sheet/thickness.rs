use tracing::{debug, warn};

use crate::error::{KernelContext, Result};
use crate::kernel::{GeometryKernel, SurfaceKind};
use crate::math::{is_close, is_parallel};

use super::{FaceNumber, FaceRecord, SheetConfig};

/// Two opposite sides of the constant-thickness shell.
#[derive(Debug, Clone, Copy)]
pub struct ThicknessPair<F> {
    pub a: FaceRecord<F>,
    pub b: FaceRecord<F>,
    /// Measured separation of the two faces.
    pub distance: f64,
}

/// Outcome of [`FindThicknessPairs`].
#[derive(Debug, Clone)]
pub struct PairSearch<F> {
    pub pairs: Vec<ThicknessPair<F>>,
    /// Faces skipped because their surface is neither flat nor cylindrical.
    pub unclassified: Vec<FaceNumber>,
}

/// Pairs faces whose normals are parallel and whose separation matches the
/// sheet thickness.
///
/// Matching is greedy in record order: each face is paired with the first
/// later face that qualifies, and a paired face is never reconsidered.
pub struct FindThicknessPairs<'a> {
    thickness: f64,
    config: &'a SheetConfig,
}

impl<'a> FindThicknessPairs<'a> {
    #[must_use]
    pub fn new(thickness: f64, config: &'a SheetConfig) -> Self {
        Self { thickness, config }
    }

    /// Executes the search over `records`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SheetError::Kernel`] if a distance query
    /// fails.
    pub fn execute<K: GeometryKernel>(
        &self,
        kernel: &K,
        records: &[FaceRecord<K::Face>],
    ) -> Result<PairSearch<K::Face>> {
        let unclassified: Vec<FaceNumber> = records
            .iter()
            .filter(|r| r.kind == SurfaceKind::Unknown)
            .map(|r| r.id)
            .collect();
        for &face in &unclassified {
            warn!(%face, "face is neither flat nor cylindrical, excluded from pairing");
        }

        let usable: Vec<bool> = records
            .iter()
            .map(|r| r.kind != SurfaceKind::Unknown && r.area >= self.config.min_face_area)
            .collect();
        let mut processed = vec![false; records.len()];
        let mut pairs = Vec::new();

        for i in 0..records.len() {
            if processed[i] || !usable[i] {
                continue;
            }
            for j in i + 1..records.len() {
                if processed[j] || !usable[j] {
                    continue;
                }
                let (a, b) = (&records[i], &records[j]);
                if !is_parallel(&a.normal, &b.normal, self.config.angle_tolerance) {
                    continue;
                }
                let distance = separation(kernel, a, b, self.config)?;
                if is_close(distance, self.thickness, self.config.thickness_tolerance) {
                    debug!(a = %a.id, b = %b.id, distance, "thickness pair");
                    pairs.push(ThicknessPair {
                        a: *a,
                        b: *b,
                        distance,
                    });
                    processed[i] = true;
                    processed[j] = true;
                    break;
                }
            }
        }

        Ok(PairSearch {
            pairs,
            unclassified,
        })
    }
}

/// Distance between two parallel faces: exact for a flat first face,
/// otherwise the mean distance between matching points of the two sample
/// grids.
fn separation<K: GeometryKernel>(
    kernel: &K,
    a: &FaceRecord<K::Face>,
    b: &FaceRecord<K::Face>,
    config: &SheetConfig,
) -> Result<f64> {
    if a.kind == SurfaceKind::Flat {
        return kernel.distance(a.handle, b.handle).on_face(a.id, "distance");
    }
    let (nu, nv) = (config.samples_u, config.samples_v);
    let pa = kernel.sample(a.handle, nu, nv).on_face(a.id, "sample")?;
    let pb = kernel.sample(b.handle, nu, nv).on_face(b.id, "sample")?;
    let count = pa.len().min(pb.len());
    if count == 0 {
        return Ok(f64::INFINITY);
    }
    let total: f64 = pa.iter().zip(&pb).map(|(p, q)| (p - q).norm()).sum();
    #[allow(clippy::cast_precision_loss)]
    let mean = total / count as f64;
    Ok(mean)
}

/// Estimates the sheet thickness as the smallest gap between two parallel,
/// non-touching flat faces.
pub struct EstimateThickness<'a> {
    config: &'a SheetConfig,
}

impl<'a> EstimateThickness<'a> {
    #[must_use]
    pub fn new(config: &'a SheetConfig) -> Self {
        Self { config }
    }

    /// Executes the estimate. Returns `None` when no two flat faces are
    /// parallel and apart.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SheetError::Kernel`] if a distance query
    /// fails.
    pub fn execute<K: GeometryKernel>(
        &self,
        kernel: &K,
        records: &[FaceRecord<K::Face>],
    ) -> Result<Option<f64>> {
        let flats: Vec<&FaceRecord<K::Face>> = records
            .iter()
            .filter(|r| r.kind == SurfaceKind::Flat)
            .collect();
        let mut best: Option<f64> = None;
        for (i, a) in flats.iter().enumerate() {
            for b in &flats[i + 1..] {
                if !is_parallel(&a.normal, &b.normal, self.config.angle_tolerance) {
                    continue;
                }
                let d = kernel.distance(a.handle, b.handle).on_face(a.id, "distance")?;
                if d > self.config.adjacency_tolerance && best.map_or(true, |t| d < t) {
                    best = Some(d);
                }
            }
        }
        if let Some(t) = best {
            debug!(thickness = t, "estimated sheet thickness");
        }
        Ok(best)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::creation::{MakeBentSheet, MakeBox};
    use crate::sheet::IdAllocator;
    use crate::topology::{FaceId, SolidId, TopologyStore};
    use std::f64::consts::FRAC_PI_2;

    fn records(store: &TopologyStore, solid: SolidId) -> Vec<FaceRecord<FaceId>> {
        let mut ids = IdAllocator::new();
        store
            .faces_of(solid)
            .unwrap()
            .into_iter()
            .map(|f| FaceRecord::classify(store, f, ids.id_for(f)).unwrap())
            .collect()
    }

    fn l_bracket(store: &mut TopologyStore) -> SolidId {
        MakeBentSheet::new(2.0, 10.0)
            .leg(20.0)
            .bend(2.0, -FRAC_PI_2)
            .leg(15.0)
            .execute(store)
            .unwrap()
    }

    #[test]
    fn l_bracket_pairs_every_sheet_face() {
        let mut store = TopologyStore::new();
        let solid = l_bracket(&mut store);
        let recs = records(&store, solid);
        let config = SheetConfig::default();
        let found = FindThicknessPairs::new(2.0, &config)
            .execute(&store, &recs)
            .unwrap();

        let ids: Vec<(usize, usize)> = found.pairs.iter().map(|p| (p.a.id.0, p.b.id.0)).collect();
        assert_eq!(ids, vec![(0, 3), (1, 4), (2, 5)]);
        for pair in &found.pairs {
            assert!((pair.distance - 2.0).abs() < 1e-9);
        }
        assert!(found.unclassified.is_empty());
    }

    #[test]
    fn first_qualifying_face_wins() {
        let mut store = TopologyStore::new();
        let quad = |store: &mut TopologyStore, x0: f64, x1: f64, z: f64| {
            store
                .planar_face(&[
                    Point3::new(x0, 0.0, z),
                    Point3::new(x1, 0.0, z),
                    Point3::new(x1, 4.0, z),
                    Point3::new(x0, 4.0, z),
                ])
                .unwrap()
        };
        let faces = [
            quad(&mut store, 0.0, 4.0, 0.0),
            // Both lie within tolerance; the second is closer to the target.
            quad(&mut store, 0.0, 4.0, 2.1),
            quad(&mut store, 1.0, 3.0, 2.0),
        ];
        let mut ids = IdAllocator::new();
        let recs: Vec<_> = faces
            .into_iter()
            .map(|f| FaceRecord::classify(&store, f, ids.id_for(f)).unwrap())
            .collect();

        let config = SheetConfig::default().with_thickness_tolerance(0.1);
        let found = FindThicknessPairs::new(2.0, &config)
            .execute(&store, &recs)
            .unwrap();
        let ids: Vec<(usize, usize)> = found.pairs.iter().map(|p| (p.a.id.0, p.b.id.0)).collect();
        assert_eq!(ids, vec![(0, 1)]);
        assert!((found.pairs[0].distance - 2.1).abs() < 1e-9);
    }

    #[test]
    fn block_has_no_pairs_at_sheet_thickness() {
        let mut store = TopologyStore::new();
        let solid = MakeBox::new(Point3::origin(), Point3::new(10.0, 20.0, 30.0))
            .execute(&mut store)
            .unwrap();
        let recs = records(&store, solid);
        let config = SheetConfig::default();
        let found = FindThicknessPairs::new(2.0, &config)
            .execute(&store, &recs)
            .unwrap();
        assert!(found.pairs.is_empty());
    }

    #[test]
    fn small_faces_are_ignored() {
        let mut store = TopologyStore::new();
        let solid = l_bracket(&mut store);
        let recs = records(&store, solid);
        // Only the two 20 x 10 legs reach 190 mm^2.
        let config = SheetConfig::default().with_min_face_area(190.0);
        let found = FindThicknessPairs::new(2.0, &config)
            .execute(&store, &recs)
            .unwrap();
        assert_eq!(found.pairs.len(), 1);
        assert_eq!((found.pairs[0].a.id.0, found.pairs[0].b.id.0), (0, 3));
    }

    #[test]
    fn estimate_matches_sheet_thickness() {
        let mut store = TopologyStore::new();
        let solid = l_bracket(&mut store);
        let recs = records(&store, solid);
        let t = EstimateThickness::new(&SheetConfig::default())
            .execute(&store, &recs)
            .unwrap()
            .unwrap();
        assert!((t - 2.0).abs() < 1e-9);
    }
}

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{KernelContext, Result, SheetError};
use crate::kernel::{GeometryKernel, SurfaceKind};
use crate::math::Point3;
use crate::operations::query::{Aabb, EdgeInfo};

use super::{
    AnalyzeBends, BendTree, BuildHierarchy, Diagnostic, EstimateThickness, FaceRecord,
    FindThicknessPairs, Hole, IdAllocator, RecognizeHoles, SheetConfig, Unfold, UnfoldReport,
};

/// Scalar description of an analyzed part.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetSummary {
    pub is_sheet_metal: bool,
    /// Sheet thickness used for the analysis, given or estimated.
    pub thickness: Option<f64>,
    pub num_bends: usize,
    pub num_holes: usize,
    /// Outline length of the flat pattern.
    pub total_perimeter: f64,
    pub flat_area: f64,
    /// Bounding box of the flat pattern.
    pub bbox: Option<Aabb>,
}

impl SheetSummary {
    fn not_sheet_metal(thickness: Option<f64>) -> Self {
        Self {
            is_sheet_metal: false,
            thickness,
            num_bends: 0,
            num_holes: 0,
            total_perimeter: 0.0,
            flat_area: 0.0,
            bbox: None,
        }
    }
}

/// Result of running the whole pipeline on one solid: pairing, hierarchy,
/// bend analysis, unfolding and hole recognition.
#[derive(Debug, Clone)]
pub struct SheetMetalPart<F> {
    pub summary: SheetSummary,
    /// Flat-pattern tree, absent when the solid is not sheet metal.
    pub tree: Option<BendTree<F>>,
    pub holes: Vec<Hole>,
    pub unfold: Option<UnfoldReport>,
    /// Face numbers handed out during the analysis.
    pub ids: IdAllocator<F>,
    diagnostics: Vec<Diagnostic>,
}

impl<F: Copy + Eq + std::hash::Hash> SheetMetalPart<F> {
    /// Analyzes `solid` and unfolds it in `kernel`.
    ///
    /// The input faces are never modified; the flat pattern is made of new
    /// faces referenced from the returned tree.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::InvalidConfig`] for a bad configuration,
    /// [`SheetError::NoFaces`] for an empty solid, and
    /// [`SheetError::Kernel`] when a kernel call fails.
    pub fn analyze<K>(kernel: &mut K, solid: K::Solid, config: &SheetConfig) -> Result<Self>
    where
        K: GeometryKernel<Face = F>,
    {
        config.validate()?;
        let faces = kernel.faces_of(solid)?;
        if faces.is_empty() {
            return Err(SheetError::NoFaces.into());
        }

        let mut ids = IdAllocator::new();
        let records = faces
            .into_iter()
            .map(|face| FaceRecord::classify(&*kernel, face, ids.id_for(face)))
            .collect::<Result<Vec<_>>>()?;

        let thickness = match config.thickness {
            Some(t) => Some(t),
            None => EstimateThickness::new(config).execute(&*kernel, &records)?,
        };
        let Some(t) = thickness else {
            warn!("no parallel faces to estimate a thickness from, not sheet metal");
            return Ok(Self::flat_out(ids, None, Vec::new()));
        };

        let search = FindThicknessPairs::new(t, config).execute(&*kernel, &records)?;
        let mut diagnostics: Vec<Diagnostic> = search
            .unclassified
            .iter()
            .map(|&face| Diagnostic::UnclassifiableSurface { face })
            .collect();
        info!(pairs = search.pairs.len(), thickness = t, "thickness pairs");

        let Some(mut tree) = BuildHierarchy::new(config).execute(&*kernel, &search.pairs)? else {
            warn!(thickness = t, "no thickness pairs, not sheet metal");
            return Ok(Self::flat_out(ids, Some(t), diagnostics));
        };
        AnalyzeBends::new(config).execute(&*kernel, &mut tree)?;
        let report = Unfold::new(config).execute(kernel, &mut tree)?;
        let holes = RecognizeHoles::new(t, config).execute(&*kernel, &records)?;

        for d in tree.diagnostics() {
            if !diagnostics.contains(d) {
                diagnostics.push(*d);
            }
        }
        let summary = summarize(&*kernel, &tree, t, holes.len(), config)?;
        info!(
            bends = summary.num_bends,
            holes = summary.num_holes,
            perimeter = summary.total_perimeter,
            "sheet-metal part analyzed"
        );
        Ok(Self {
            summary,
            tree: Some(tree),
            holes,
            unfold: Some(report),
            ids,
            diagnostics,
        })
    }

    fn flat_out(ids: IdAllocator<F>, thickness: Option<f64>, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            summary: SheetSummary::not_sheet_metal(thickness),
            tree: None,
            holes: Vec::new(),
            unfold: None,
            ids,
            diagnostics,
        }
    }
}

impl<F> SheetMetalPart<F> {
    /// Recoverable problems found anywhere in the pipeline.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

fn summarize<K: GeometryKernel>(
    kernel: &K,
    tree: &BendTree<K::Face>,
    thickness: f64,
    num_holes: usize,
    config: &SheetConfig,
) -> Result<SheetSummary> {
    let mut flat_area = 0.0;
    let mut bbox: Option<Aabb> = None;
    let mut outlines: Vec<Vec<EdgeInfo>> = Vec::with_capacity(tree.len());
    let mut num_bends = 0;
    for id in tree.preorder() {
        let node = tree.node(id)?;
        if node.kind() == SurfaceKind::Cylindrical {
            num_bends += 1;
        }
        flat_area += kernel.area(node.face).on_face(node.id(), "area")?;
        let b = kernel.bounding_box(node.face).on_face(node.id(), "bounding_box")?;
        bbox = Some(bbox.map_or(b, |acc| acc.union(&b)));
        outlines.push(kernel.edges(node.face).on_face(node.id(), "edges")?);
    }

    let tol = config.vertex_match_tolerance;
    let mut total_perimeter = 0.0;
    for (i, edges) in outlines.iter().enumerate() {
        for edge in edges {
            let shared = outlines
                .iter()
                .enumerate()
                .any(|(j, other)| j != i && other.iter().any(|e| same_edge(edge, e, tol)));
            if !shared {
                total_perimeter += edge.length;
            }
        }
    }

    Ok(SheetSummary {
        is_sheet_metal: true,
        thickness: Some(thickness),
        num_bends,
        num_holes,
        total_perimeter,
        flat_area,
        bbox,
    })
}

fn same_edge(a: &EdgeInfo, b: &EdgeInfo, tol: f64) -> bool {
    let close = |p: &Point3, q: &Point3| (p - q).norm() <= tol;
    close(&a.midpoint, &b.midpoint)
        && ((close(&a.start, &b.start) && close(&a.end, &b.end))
            || (close(&a.start, &b.end) && close(&a.end, &b.start)))
}

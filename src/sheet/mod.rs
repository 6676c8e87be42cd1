//! Sheet-metal analysis: thickness pairing, bend hierarchy, bend geometry
//! and flat-pattern unfolding over any [`GeometryKernel`].
//!
//! [`GeometryKernel`]: crate::kernel::GeometryKernel

mod bend;
mod config;
mod hierarchy;
mod holes;
mod ids;
mod part;
mod record;
mod thickness;
mod tree;
mod unfold;

pub use bend::{normalize_bend_angle, AnalyzeBends};
pub use config::{SheetConfig, UnfoldMode};
pub use hierarchy::BuildHierarchy;
pub use holes::{Hole, RecognizeHoles};
pub use ids::IdAllocator;
pub use part::{SheetMetalPart, SheetSummary};
pub use record::FaceRecord;
pub use thickness::{EstimateThickness, FindThicknessPairs, PairSearch, ThicknessPair};
pub use tree::{BendDirection, BendGeometry, BendTree, FaceNode, NodeId, Pivot};
pub use unfold::{Unfold, UnfoldReport};

use std::fmt;

use serde::Serialize;

/// Sequential face number, scoped to one analysis session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FaceNumber(pub usize);

impl fmt::Display for FaceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "face #{}", self.0)
    }
}

/// Why a Flat -> Cylindrical -> Flat triplet could not be flattened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TripletIssue {
    /// The bend shares no two-vertex edge with its parent.
    NoParentPivot,
    /// The bend shares no two-vertex edge with its child.
    NoChildPivot,
    /// No usable in-plane unfold direction could be derived.
    NoDirection,
}

impl fmt::Display for TripletIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoParentPivot => "no shared edge with parent",
            Self::NoChildPivot => "no shared edge with child",
            Self::NoDirection => "degenerate unfold direction",
        })
    }
}

/// A recoverable condition met while analyzing a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Diagnostic {
    /// The face is neither planar nor cylindrical; its branch is left as is.
    UnclassifiableSurface { face: FaceNumber },
    /// A bend triplet was skipped.
    DegenerateTriplet {
        parent: FaceNumber,
        bend: FaceNumber,
        child: FaceNumber,
        reason: TripletIssue,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnclassifiableSurface { face } => write!(f, "{face}: unclassifiable surface"),
            Self::DegenerateTriplet {
                parent,
                bend,
                child,
                reason,
            } => write!(f, "skipped bend {parent} -> {bend} -> {child}: {reason}"),
        }
    }
}

use serde::Serialize;

use crate::error::{OperationError, Result};
use crate::math::{Point3, Vector3};
use crate::topology::{FaceId, SolidId, TopologyStore};

use super::SampleFace;

/// Grid used to catch the bulge of curved faces between boundary points.
const CURVED_SAMPLES: usize = 9;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aabb {
    pub min: Point3,
    pub max: Point3,
}

impl Aabb {
    /// Smallest box containing all `points`, or `None` for no points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(Self { min: first, max: first }, |b, p| Self {
            min: b.min.inf(p),
            max: b.max.sup(p),
        }))
    }

    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Whether the boxes overlap once each is grown by `gap` on every side.
    #[must_use]
    pub fn intersects(&self, other: &Self, gap: f64) -> bool {
        (0..3).all(|i| self.min[i] <= other.max[i] + gap && other.min[i] <= self.max[i] + gap)
    }

    #[must_use]
    pub fn extent(&self) -> Vector3 {
        self.max - self.min
    }
}

enum Target {
    Face(FaceId),
    Solid(SolidId),
}

/// Computes the axis-aligned bounding box of a face or a solid.
pub struct BoundingBox {
    target: Target,
}

impl BoundingBox {
    #[must_use]
    pub fn of_face(face: FaceId) -> Self {
        Self {
            target: Target::Face(face),
        }
    }

    #[must_use]
    pub fn of_solid(solid: SolidId) -> Self {
        Self {
            target: Target::Solid(solid),
        }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if an entity is missing or the target has no
    /// boundary points.
    pub fn execute(&self, store: &TopologyStore) -> Result<Aabb> {
        let faces = match self.target {
            Target::Face(face) => vec![face],
            Target::Solid(solid) => store.solid_faces(solid)?,
        };
        let mut points = Vec::new();
        for face in faces {
            points.extend(store.face_polylines(face)?.into_iter().flatten());
            if store.face(face)?.surface.is_u_periodic() {
                points.extend(SampleFace::new(face, CURVED_SAMPLES, CURVED_SAMPLES).execute(store)?);
            }
        }
        Aabb::from_points(&points)
            .ok_or_else(|| OperationError::Failed("bounding box of an empty boundary".into()).into())
    }
}

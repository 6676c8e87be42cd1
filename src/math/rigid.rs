use nalgebra::{Translation3, Unit, UnitQuaternion};

use crate::error::{GeometryError, Result};

use super::{Isometry3, Point3, Vector3, TOLERANCE};

/// A proper rigid motion of 3D space (rotation + translation, no scaling).
///
/// Used for every repositioning the unfolder performs, so distances and
/// angles between transformed entities are preserved exactly up to rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    iso: Isometry3,
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl RigidTransform {
    /// The identity motion.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            iso: Isometry3::identity(),
        }
    }

    /// A pure translation by `offset`.
    #[must_use]
    pub fn translation(offset: Vector3) -> Self {
        Self {
            iso: Isometry3::from_parts(Translation3::from(offset), UnitQuaternion::identity()),
        }
    }

    /// Rotation by `angle` radians about the line through `origin` along `axis`
    /// (right-hand rule).
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if `axis` has zero length.
    pub fn rotation_about(origin: &Point3, axis: &Vector3, angle: f64) -> Result<Self> {
        if axis.norm() < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let rotation = UnitQuaternion::from_axis_angle(&Unit::new_normalize(*axis), angle);
        // x -> origin + R (x - origin)
        let shift = origin.coords - rotation * origin.coords;
        Ok(Self {
            iso: Isometry3::from_parts(Translation3::from(shift), rotation),
        })
    }

    /// Returns the motion that applies `self` first and then `next`.
    #[must_use]
    pub fn then(&self, next: &Self) -> Self {
        Self {
            iso: next.iso * self.iso,
        }
    }

    /// Maps a point.
    #[must_use]
    pub fn transform_point(&self, point: &Point3) -> Point3 {
        self.iso.transform_point(point)
    }

    /// Maps a direction (translation is ignored).
    #[must_use]
    pub fn transform_vector(&self, vector: &Vector3) -> Vector3 {
        self.iso.transform_vector(vector)
    }

    /// Rotation angle of the motion in radians, in `[0, pi]`.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.iso.rotation.angle()
    }

    /// Translation part of the motion.
    #[must_use]
    pub fn offset(&self) -> Vector3 {
        self.iso.translation.vector
    }

    /// Returns `true` if the motion moves no point by more than `tolerance`
    /// within a unit neighbourhood of the origin.
    #[must_use]
    pub fn is_identity(&self, tolerance: f64) -> bool {
        self.angle() <= tolerance && self.offset().norm() <= tolerance
    }
}

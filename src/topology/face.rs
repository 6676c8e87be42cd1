use crate::error::Result;
use crate::geometry::surface::{Cone, Cylinder, Plane, Surface};
use crate::math::{Point3, RigidTransform, Vector3};

use super::wire::WireId;

slotmap::new_key_type! {
    /// Handle of a face in the [`super::TopologyStore`].
    pub struct FaceId;
}

/// Carrier surface of a face.
#[derive(Debug, Clone)]
pub enum FaceSurface {
    Plane(Plane),
    Cylinder(Cylinder),
    Cone(Cone),
}

impl FaceSurface {
    /// Short lowercase surface name, used in error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Plane(_) => "plane",
            Self::Cylinder(_) => "cylinder",
            Self::Cone(_) => "cone",
        }
    }

    /// Point at `(u, v)`.
    ///
    /// # Errors
    ///
    /// Propagates surface evaluation errors.
    pub fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        match self {
            Self::Plane(s) => s.evaluate(u, v),
            Self::Cylinder(s) => s.evaluate(u, v),
            Self::Cone(s) => s.evaluate(u, v),
        }
    }

    /// Surface normal at `(u, v)`, not corrected for face orientation.
    ///
    /// # Errors
    ///
    /// Propagates surface evaluation errors.
    pub fn normal(&self, u: f64, v: f64) -> Result<Vector3> {
        match self {
            Self::Plane(s) => s.normal(u, v),
            Self::Cylinder(s) => s.normal(u, v),
            Self::Cone(s) => s.normal(u, v),
        }
    }

    #[must_use]
    pub fn inverse(&self, point: &Point3) -> (f64, f64) {
        match self {
            Self::Plane(s) => s.inverse(point),
            Self::Cylinder(s) => s.inverse(point),
            Self::Cone(s) => s.inverse(point),
        }
    }

    /// Whether the `u` parameter is an angle (periodic with period 2pi).
    #[must_use]
    pub fn is_u_periodic(&self) -> bool {
        !matches!(self, Self::Plane(_))
    }

    #[must_use]
    pub fn transformed(&self, transform: &RigidTransform) -> Self {
        match self {
            Self::Plane(s) => Self::Plane(s.transformed(transform)),
            Self::Cylinder(s) => Self::Cylinder(s.transformed(transform)),
            Self::Cone(s) => Self::Cone(s.transformed(transform)),
        }
    }
}

/// A bounded region of a surface: one outer wire plus hole wires.
#[derive(Debug, Clone)]
pub struct FaceData {
    pub surface: FaceSurface,
    pub outer_wire: WireId,
    pub inner_wires: Vec<WireId>,
    /// `true` when the face normal agrees with the surface normal.
    pub same_sense: bool,
}

impl FaceData {
    /// All boundary wires, outer first.
    pub fn wires(&self) -> impl Iterator<Item = WireId> + '_ {
        std::iter::once(self.outer_wire).chain(self.inner_wires.iter().copied())
    }
}

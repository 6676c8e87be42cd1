mod cone;
mod cylinder;
mod plane;

pub use cone::Cone;
pub use cylinder::Cylinder;
pub use plane::Plane;

use crate::error::Result;
use crate::math::{Point3, RigidTransform, Vector3};

/// Parameter rectangle of a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceDomain {
    pub u_min: f64,
    pub u_max: f64,
    pub v_min: f64,
    pub v_max: f64,
}

impl SurfaceDomain {
    #[must_use]
    pub fn new(u_min: f64, u_max: f64, v_min: f64, v_max: f64) -> Self {
        Self {
            u_min,
            u_max,
            v_min,
            v_max,
        }
    }

    /// Parameter at the center of the rectangle.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (
            0.5 * (self.u_min + self.u_max),
            0.5 * (self.v_min + self.v_max),
        )
    }
}

/// Parametric surface in 3D space.
pub trait Surface {
    /// Point at `(u, v)`.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3>;

    /// Unit surface normal at `(u, v)`.
    ///
    /// # Errors
    ///
    /// Returns an error where the normal is undefined (e.g. a cone apex).
    fn normal(&self, u: f64, v: f64) -> Result<Vector3>;

    /// Natural parameter range of the surface.
    fn domain(&self) -> SurfaceDomain;

    /// `(u, v)` of the surface point nearest to `point`. Angular
    /// parameters come back in `(-pi, pi]`.
    fn inverse(&self, point: &Point3) -> (f64, f64);

    /// Returns a copy of the surface moved by `transform`.
    #[must_use]
    fn transformed(&self, transform: &RigidTransform) -> Self
    where
        Self: Sized;
}

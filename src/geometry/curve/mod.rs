mod arc;
mod line;

pub use arc::Arc;
pub use line::Line;

use crate::error::Result;
use crate::math::{Point3, RigidTransform, Vector3};

/// Parameter interval of a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    pub t_min: f64,
    pub t_max: f64,
}

impl CurveDomain {
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }

    /// Returns `true` if `t` lies inside the interval (inclusive).
    #[must_use]
    pub fn contains(&self, t: f64) -> bool {
        t >= self.t_min && t <= self.t_max
    }
}

/// Parametric curve in 3D space.
pub trait Curve {
    /// Point at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    fn evaluate(&self, t: f64) -> Result<Point3>;

    /// Unit tangent at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tangent is degenerate.
    fn tangent(&self, t: f64) -> Result<Vector3>;

    /// Natural parameter range of the curve.
    fn domain(&self) -> CurveDomain;

    /// Length of the portion between parameters `t0` and `t1`.
    fn length_between(&self, t0: f64, t1: f64) -> f64;

    /// Parameter of the curve point nearest to `point`.
    fn parameter_of(&self, point: &Point3) -> f64;

    /// Returns a copy of the curve moved by `transform`.
    #[must_use]
    fn transformed(&self, transform: &RigidTransform) -> Self
    where
        Self: Sized;
}

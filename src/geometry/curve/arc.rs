use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::math::{Point3, RigidTransform, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// Circular arc in 3D.
///
/// `P(t) = center + radius * (cos(t) * ref_dir + sin(t) * (normal x ref_dir))`,
/// swept from `start_angle` to `end_angle` counter-clockwise about `normal`.
#[derive(Debug, Clone)]
pub struct Arc {
    center: Point3,
    radius: f64,
    normal: Vector3,
    ref_dir: Vector3,
    start_angle: f64,
    end_angle: f64,
}

impl Arc {
    /// Creates a new arc.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive, either direction is
    /// zero-length, or `ref_dir` is not perpendicular to `normal`.
    pub fn new(
        center: Point3,
        radius: f64,
        normal: Vector3,
        ref_dir: Vector3,
        start_angle: f64,
        end_angle: f64,
    ) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate("arc radius must be positive".into()).into());
        }
        let normal = normal
            .try_normalize(TOLERANCE)
            .ok_or(GeometryError::ZeroVector)?;
        let ref_dir = ref_dir
            .try_normalize(TOLERANCE)
            .ok_or(GeometryError::ZeroVector)?;
        if normal.dot(&ref_dir).abs() > 1e-9 {
            return Err(GeometryError::Degenerate(
                "reference direction must be perpendicular to normal".into(),
            )
            .into());
        }
        Ok(Self {
            center,
            radius,
            normal,
            ref_dir,
            start_angle,
            end_angle,
        })
    }

    /// Arc about `normal` through `start` and `end`, sweeping
    /// counter-clockwise from `start` for `sweep` radians.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` coincides with `center`.
    pub fn from_start(center: Point3, normal: Vector3, start: &Point3, sweep: f64) -> Result<Self> {
        let radial = start - center;
        Self::new(center, radial.norm(), normal, radial, 0.0, sweep)
    }

    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    #[must_use]
    pub fn ref_dir(&self) -> &Vector3 {
        &self.ref_dir
    }

    /// Swept angle in radians.
    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    fn binormal(&self) -> Vector3 {
        self.normal.cross(&self.ref_dir)
    }
}

impl Curve for Arc {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        let (s, c) = t.sin_cos();
        Ok(self.center + (self.ref_dir * c + self.binormal() * s) * self.radius)
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        let (s, c) = t.sin_cos();
        (self.binormal() * c - self.ref_dir * s)
            .try_normalize(TOLERANCE)
            .ok_or_else(|| GeometryError::ZeroVector.into())
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(self.start_angle, self.end_angle)
    }

    fn length_between(&self, t0: f64, t1: f64) -> f64 {
        self.radius * (t1 - t0).abs()
    }

    /// Angle of `point` about the normal, shifted into
    /// `[start_angle, start_angle + 2pi)`.
    fn parameter_of(&self, point: &Point3) -> f64 {
        let d = point - self.center;
        let angle = d.dot(&self.binormal()).atan2(d.dot(&self.ref_dir));
        self.start_angle + (angle - self.start_angle).rem_euclid(TAU)
    }

    fn transformed(&self, transform: &RigidTransform) -> Self {
        Self {
            center: transform.transform_point(&self.center),
            radius: self.radius,
            normal: transform.transform_vector(&self.normal),
            ref_dir: transform.transform_vector(&self.ref_dir),
            start_angle: self.start_angle,
            end_angle: self.end_angle,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn quarter() -> Arc {
        Arc::new(Point3::origin(), 2.0, Vector3::z(), Vector3::x(), 0.0, FRAC_PI_2).unwrap()
    }

    #[test]
    fn quarter_arc_endpoints() {
        let a = quarter();
        assert!((a.evaluate(0.0).unwrap() - Point3::new(2.0, 0.0, 0.0)).norm() < 1e-12);
        assert!((a.evaluate(FRAC_PI_2).unwrap() - Point3::new(0.0, 2.0, 0.0)).norm() < 1e-12);
        assert!((a.length_between(0.0, FRAC_PI_2) - PI).abs() < 1e-12);
    }

    #[test]
    fn tangent_is_counter_clockwise() {
        let t = quarter().tangent(0.0).unwrap();
        assert!((t - Vector3::y()).norm() < 1e-12);
    }

    #[test]
    fn parameter_of_wraps_past_start() {
        let a = Arc::new(Point3::origin(), 1.0, Vector3::z(), Vector3::x(), 1.0, 4.0).unwrap();
        // -pi/2 lies at 3pi/2 once shifted past the start angle.
        let t = a.parameter_of(&Point3::new(0.0, -1.0, 0.0));
        assert!((t - 1.5 * PI).abs() < 1e-12);
    }

    #[test]
    fn from_start_measures_radius() {
        let a = Arc::from_start(Point3::origin(), Vector3::y(), &Point3::new(0.0, 0.0, 3.0), PI)
            .unwrap();
        assert!((a.radius() - 3.0).abs() < 1e-12);
        assert!((a.sweep() - PI).abs() < 1e-12);
    }

    #[test]
    fn non_perpendicular_reference_rejected() {
        let r = Arc::new(Point3::origin(), 1.0, Vector3::z(), Vector3::z(), 0.0, 1.0);
        assert!(r.is_err());
    }
}

use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::math::{Point3, RigidTransform, Vector3, TOLERANCE};

use super::{Surface, SurfaceDomain};

/// Circular cylinder.
///
/// `P(u, v) = center + radius * (cos(u) * ref_dir + sin(u) * binormal) + v * axis`
/// where `binormal = axis x ref_dir`. The surface normal points away from
/// the axis.
#[derive(Debug, Clone)]
pub struct Cylinder {
    center: Point3,
    radius: f64,
    axis: Vector3,
    ref_dir: Vector3,
}

impl Cylinder {
    /// Creates a cylinder from a point on its axis, its radius, the axis
    /// direction and the `u = 0` direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive, a direction is
    /// zero-length, or `ref_dir` is not perpendicular to `axis`.
    pub fn new(center: Point3, radius: f64, axis: Vector3, ref_dir: Vector3) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(
                GeometryError::Degenerate("cylinder radius must be positive".into()).into(),
            );
        }
        let axis = axis
            .try_normalize(TOLERANCE)
            .ok_or(GeometryError::ZeroVector)?;
        let ref_dir = ref_dir
            .try_normalize(TOLERANCE)
            .ok_or(GeometryError::ZeroVector)?;
        if axis.dot(&ref_dir).abs() > 1e-9 {
            return Err(GeometryError::Degenerate(
                "reference direction must be perpendicular to axis".into(),
            )
            .into());
        }
        Ok(Self {
            center,
            radius,
            axis,
            ref_dir,
        })
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
    pub fn axis(&self) -> &Vector3 {
        &self.axis
    }

    #[must_use]
    pub fn ref_dir(&self) -> &Vector3 {
        &self.ref_dir
    }

    fn binormal(&self) -> Vector3 {
        self.axis.cross(&self.ref_dir)
    }

    /// Projects `point` onto the axis line.
    #[must_use]
    pub fn project_to_axis(&self, point: &Point3) -> Point3 {
        self.center + self.axis * (point - self.center).dot(&self.axis)
    }

    /// Distance of `point` from the surface (ignores any face bounds).
    #[must_use]
    pub fn distance_to(&self, point: &Point3) -> f64 {
        ((point - self.project_to_axis(point)).norm() - self.radius).abs()
    }
}

impl Surface for Cylinder {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        let (s, c) = u.sin_cos();
        Ok(self.center + (self.ref_dir * c + self.binormal() * s) * self.radius + self.axis * v)
    }

    fn normal(&self, u: f64, _v: f64) -> Result<Vector3> {
        let (s, c) = u.sin_cos();
        Ok(self.ref_dir * c + self.binormal() * s)
    }

    fn domain(&self) -> SurfaceDomain {
        SurfaceDomain::new(0.0, TAU, f64::NEG_INFINITY, f64::INFINITY)
    }

    fn inverse(&self, point: &Point3) -> (f64, f64) {
        let d = point - self.center;
        let u = d.dot(&self.binormal()).atan2(d.dot(&self.ref_dir));
        (u, d.dot(&self.axis))
    }

    fn transformed(&self, transform: &RigidTransform) -> Self {
        Self {
            center: transform.transform_point(&self.center),
            radius: self.radius,
            axis: transform.transform_vector(&self.axis),
            ref_dir: transform.transform_vector(&self.ref_dir),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn y_cylinder() -> Cylinder {
        Cylinder::new(Point3::new(0.0, 0.0, 2.0), 2.0, Vector3::y(), Vector3::x()).unwrap()
    }

    #[test]
    fn binormal_completes_frame() {
        // axis y, ref x: binormal = y x x = -z.
        let c = y_cylinder();
        let p = c.evaluate(FRAC_PI_2, 1.0).unwrap();
        assert!((p - Point3::new(0.0, 1.0, 0.0)).norm() < 1e-12);
        assert!((c.normal(FRAC_PI_2, 0.0).unwrap() + Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn inverse_roundtrip() {
        let c = y_cylinder();
        for &(u, v) in &[(0.0, 0.0), (FRAC_PI_2, 3.0), (-2.5, -1.0), (3.0, 0.25)] {
            let (u2, v2) = c.inverse(&c.evaluate(u, v).unwrap());
            assert!((u - u2).abs() < 1e-9 && (v - v2).abs() < 1e-9, "u={u}, v={v}");
        }
    }

    #[test]
    fn distance_from_surface() {
        let c = y_cylinder();
        assert!((c.distance_to(&Point3::new(0.0, 5.0, 2.0)) - 2.0).abs() < 1e-12);
        assert!((c.distance_to(&Point3::new(5.0, -3.0, 2.0)) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn transform_keeps_radius_and_moves_axis() {
        let c = y_cylinder();
        let rot = RigidTransform::rotation_about(&Point3::origin(), &Vector3::z(), FRAC_PI_2).unwrap();
        let moved = c.transformed(&rot);
        assert!((moved.axis() + Vector3::x()).norm() < 1e-12);
        assert!((moved.radius() - 2.0).abs() < 1e-12);
        assert!((moved.center() - Point3::new(0.0, 0.0, 2.0)).norm() < 1e-12);
    }

    #[test]
    fn invalid_radius() {
        assert!(Cylinder::new(Point3::origin(), 0.0, Vector3::z(), Vector3::x()).is_err());
    }
}

use std::f64::consts::{FRAC_PI_2, TAU};

use crate::error::{GeometryError, Result};
use crate::math::{Point3, RigidTransform, Vector3, TOLERANCE};

use super::{Surface, SurfaceDomain};

/// Right circular cone.
///
/// `P(u, v) = apex + v * (cos(a) * axis + sin(a) * (cos(u) * ref_dir + sin(u) * binormal))`
/// with half-angle `a`; `v` is the distance from the apex along a generator.
#[derive(Debug, Clone)]
pub struct Cone {
    apex: Point3,
    axis: Vector3,
    half_angle: f64,
    ref_dir: Vector3,
}

impl Cone {
    /// Creates a cone.
    ///
    /// # Errors
    ///
    /// Returns an error if the half-angle is outside `(0, pi/2)`, a direction
    /// is zero-length, or `ref_dir` is not perpendicular to `axis`.
    pub fn new(apex: Point3, axis: Vector3, half_angle: f64, ref_dir: Vector3) -> Result<Self> {
        if half_angle <= TOLERANCE || half_angle >= FRAC_PI_2 - TOLERANCE {
            return Err(
                GeometryError::Degenerate("cone half-angle must be in (0, pi/2)".into()).into(),
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
            apex,
            axis,
            half_angle,
            ref_dir,
        })
    }

    #[must_use]
    pub fn apex(&self) -> &Point3 {
        &self.apex
    }

    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        &self.axis
    }

    #[must_use]
    pub fn half_angle(&self) -> f64 {
        self.half_angle
    }

    #[must_use]
    pub fn ref_dir(&self) -> &Vector3 {
        &self.ref_dir
    }

    fn binormal(&self) -> Vector3 {
        self.axis.cross(&self.ref_dir)
    }

    fn radial(&self, u: f64) -> Vector3 {
        let (s, c) = u.sin_cos();
        self.ref_dir * c + self.binormal() * s
    }
}

impl Surface for Cone {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        let (sa, ca) = self.half_angle.sin_cos();
        Ok(self.apex + (self.axis * ca + self.radial(u) * sa) * v)
    }

    fn normal(&self, u: f64, v: f64) -> Result<Vector3> {
        if v.abs() < TOLERANCE {
            return Err(
                GeometryError::Degenerate("cone normal is undefined at the apex".into()).into(),
            );
        }
        // Rotating the generator a quarter turn toward the outside.
        let (sa, ca) = self.half_angle.sin_cos();
        Ok(self.radial(u) * ca - self.axis * sa)
    }

    fn domain(&self) -> SurfaceDomain {
        SurfaceDomain::new(0.0, TAU, 0.0, f64::INFINITY)
    }

    fn inverse(&self, point: &Point3) -> (f64, f64) {
        let d = point - self.apex;
        let u = d.dot(&self.binormal()).atan2(d.dot(&self.ref_dir));
        let generator = self.axis * self.half_angle.cos() + self.radial(u) * self.half_angle.sin();
        (u, d.dot(&generator).max(0.0))
    }

    fn transformed(&self, transform: &RigidTransform) -> Self {
        Self {
            apex: transform.transform_point(&self.apex),
            axis: transform.transform_vector(&self.axis),
            half_angle: self.half_angle,
            ref_dir: transform.transform_vector(&self.ref_dir),
        }
    }
}

pub mod distance_3d;
pub mod polygon_3d;
mod rigid;

pub use rigid::RigidTransform;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Rigid motion (rotation followed by translation).
pub type Isometry3 = nalgebra::Isometry3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Returns the midpoint of two points.
#[must_use]
pub fn midpoint(a: &Point3, b: &Point3) -> Point3 {
    nalgebra::center(a, b)
}

/// Returns `true` if two directions are parallel or anti-parallel within
/// `angle_tolerance` radians.
#[must_use]
pub fn is_parallel(a: &Vector3, b: &Vector3, angle_tolerance: f64) -> bool {
    let (la, lb) = (a.norm(), b.norm());
    if la < TOLERANCE || lb < TOLERANCE {
        return false;
    }
    let cos = (a.dot(b) / (la * lb)).abs().min(1.0);
    cos.acos() <= angle_tolerance
}

/// Relative closeness test: `|a - b| <= rel_tol * max(|a|, |b|)`.
#[must_use]
pub fn is_close(a: f64, b: f64, rel_tol: f64) -> bool {
    (a - b).abs() <= rel_tol * a.abs().max(b.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anti_parallel_counts_as_parallel() {
        assert!(is_parallel(&Vector3::z(), &-Vector3::z(), 1e-9));
        assert!(!is_parallel(&Vector3::z(), &Vector3::x(), 1e-3));
    }

    #[test]
    fn zero_vector_is_never_parallel() {
        assert!(!is_parallel(&Vector3::zeros(), &Vector3::x(), 1.0));
    }

    #[test]
    fn relative_closeness() {
        assert!(is_close(2.0, 2.0 + 1e-7, 1e-6));
        assert!(!is_close(2.0, 2.1, 1e-6));
        assert!(is_close(0.0, 0.0, 0.0));
    }
}

use crate::error::{GeometryError, Result};
use crate::geometry::surface::Plane;

use super::{Point3, Vector3, TOLERANCE};

/// Projects a 3D point onto the UV coordinate system of a plane.
#[must_use]
fn project_to_uv(point: &Point3, plane: &Plane) -> (f64, f64) {
    let diff = point - plane.origin();
    (diff.dot(plane.u_dir()), diff.dot(plane.v_dir()))
}

/// Point-in-polygon test for a 3D point lying on (or projected onto) the
/// polygon's plane.
///
/// Uses the winding number in the plane's UV frame. Points exactly on the
/// boundary may be classified either way; callers that care measure the
/// boundary distance separately.
#[must_use]
pub fn point_in_polygon_3d(point: &Point3, polygon: &[Point3], plane: &Plane) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let (px, py) = project_to_uv(point, plane);
    let uvs: Vec<(f64, f64)> = polygon.iter().map(|p| project_to_uv(p, plane)).collect();

    winding_number_2d(px, py, &uvs) != 0
}

/// Winding number of point `(px, py)` with respect to polygon `verts`.
fn winding_number_2d(px: f64, py: f64, verts: &[(f64, f64)]) -> i32 {
    let n = verts.len();
    let mut winding = 0i32;
    for i in 0..n {
        let (x0, y0) = verts[i];
        let (x1, y1) = verts[(i + 1) % n];

        if y0 <= py {
            if y1 > py && cross_2d(x1 - x0, y1 - y0, px - x0, py - y0) > 0.0 {
                winding += 1;
            }
        } else if y1 <= py && cross_2d(x1 - x0, y1 - y0, px - x0, py - y0) < 0.0 {
            winding -= 1;
        }
    }
    winding
}

#[inline]
fn cross_2d(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    ax * by - ay * bx
}

/// Computes the unit normal of a closed polygon using Newell's method.
///
/// # Errors
///
/// Returns [`GeometryError::Degenerate`] for collinear or empty input.
pub fn newell_normal(points: &[Point3]) -> Result<Vector3> {
    let n = points.len();
    let mut normal = Vector3::zeros();
    for i in 0..n {
        let curr = &points[i];
        let next = &points[(i + 1) % n];
        normal.x += (curr.y - next.y) * (curr.z + next.z);
        normal.y += (curr.z - next.z) * (curr.x + next.x);
        normal.z += (curr.x - next.x) * (curr.y + next.y);
    }
    let len = normal.norm();
    if len < TOLERANCE {
        return Err(GeometryError::Degenerate("polygon has no area".into()).into());
    }
    Ok(normal / len)
}

/// Unsigned area of a planar 3D polygon measured along `normal`.
#[must_use]
pub fn polygon_area_3d(points: &[Point3], normal: &Vector3) -> f64 {
    signed_area_3d(points, normal).abs()
}

/// Signed area of a planar 3D polygon: positive when the loop winds
/// counter-clockwise around `normal`.
#[must_use]
pub fn signed_area_3d(points: &[Point3], normal: &Vector3) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let o = &points[0];
    let mut cross_sum = Vector3::zeros();
    for i in 1..points.len() {
        let a = points[i] - o;
        let b = points[(i + 1) % points.len()] - o;
        cross_sum += a.cross(&b);
    }
    0.5 * cross_sum.dot(normal)
}

/// Area-weighted centroid of a planar polygon (fan triangulation with signed
/// triangle areas, so concave loops are handled).
///
/// Returns the vertex average for degenerate input.
#[must_use]
pub fn polygon_centroid_3d(points: &[Point3], normal: &Vector3) -> Point3 {
    #[allow(clippy::cast_precision_loss)]
    let count = points.len().max(1) as f64;
    let vertex_average = || {
        let sum = points
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        Point3::from(sum / count)
    };
    if points.len() < 3 {
        return vertex_average();
    }

    let o = points[0];
    let mut weighted = Vector3::zeros();
    let mut total = 0.0;
    for i in 1..points.len() - 1 {
        let a = points[i];
        let b = points[i + 1];
        let area = 0.5 * (a - o).cross(&(b - o)).dot(normal);
        weighted += (o.coords + a.coords + b.coords) / 3.0 * area;
        total += area;
    }
    if total.abs() < TOLERANCE {
        return vertex_average();
    }
    Point3::from(weighted / total)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn xy_plane() -> Plane {
        Plane::from_normal(p(0.0, 0.0, 0.0), Vector3::z()).unwrap()
    }

    fn unit_square() -> Vec<Point3> {
        vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn point_inside_square() {
        assert!(point_in_polygon_3d(&p(0.5, 0.5, 0.0), &unit_square(), &xy_plane()));
    }

    #[test]
    fn point_outside_square() {
        assert!(!point_in_polygon_3d(&p(2.0, 0.5, 0.0), &unit_square(), &xy_plane()));
    }

    #[test]
    fn offset_point_projects_inside() {
        assert!(point_in_polygon_3d(&p(0.5, 0.5, 7.0), &unit_square(), &xy_plane()));
    }

    #[test]
    fn newell_normal_of_ccw_square() {
        let n = newell_normal(&unit_square()).unwrap();
        assert!((n - Vector3::z()).norm() < TOLERANCE);
    }

    #[test]
    fn collinear_points_have_no_normal() {
        let line = vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)];
        assert!(newell_normal(&line).is_err());
    }

    #[test]
    fn unit_square_area() {
        let area = polygon_area_3d(&unit_square(), &Vector3::z());
        assert!((area - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn clockwise_loop_has_negative_signed_area() {
        let cw: Vec<Point3> = unit_square().into_iter().rev().collect();
        assert!(signed_area_3d(&cw, &Vector3::z()) < 0.0);
    }

    #[test]
    fn l_shape_centroid() {
        // Two unit squares side by side plus one on top of the left one.
        let l = vec![
            p(0.0, 0.0, 0.0),
            p(2.0, 0.0, 0.0),
            p(2.0, 1.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(1.0, 2.0, 0.0),
            p(0.0, 2.0, 0.0),
        ];
        let c = polygon_centroid_3d(&l, &Vector3::z());
        // Squares centered at (0.5,0.5), (1.5,0.5), (0.5,1.5).
        assert!((c - p(2.5 / 3.0, 2.5 / 3.0, 0.0)).norm() < 1e-12);
    }
}

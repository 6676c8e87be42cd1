use super::{Point3, TOLERANCE};

/// Returns the closest point to `p` on the segment `a`-`b`.
#[must_use]
pub fn closest_point_on_segment(p: &Point3, a: &Point3, b: &Point3) -> Point3 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        // Degenerate segment (zero length).
        return *a;
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Returns the minimum distance from `p` to the segment `a`-`b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point3, a: &Point3, b: &Point3) -> f64 {
    (p - closest_point_on_segment(p, a, b)).norm()
}

/// Returns the minimum distance between segments `p1`-`q1` and `p2`-`q2`.
///
/// Solves for the closest parameters on both infinite lines, then clamps
/// them back onto the segments.
#[must_use]
pub fn segment_to_segment_dist(p1: &Point3, q1: &Point3, p2: &Point3, q2: &Point3) -> f64 {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.norm_squared();
    let e = d2.norm_squared();
    let f = d2.dot(&r);
    let eps = TOLERANCE * TOLERANCE;

    if a < eps && e < eps {
        return r.norm();
    }
    if a < eps {
        return point_to_segment_dist(p1, p2, q2);
    }
    if e < eps {
        return point_to_segment_dist(p2, p1, q1);
    }

    let c = d1.dot(&r);
    let b = d1.dot(&d2);
    let denom = a * e - b * b;

    // Parallel segments keep s = 0 and let the clamping below sort it out.
    let mut s = if denom > eps {
        ((b * f - c * e) / denom).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let mut t = (b * s + f) / e;
    if t < 0.0 {
        t = 0.0;
        s = (-c / a).clamp(0.0, 1.0);
    } else if t > 1.0 {
        t = 1.0;
        s = ((b - c) / a).clamp(0.0, 1.0);
    }

    let c1 = p1 + d1 * s;
    let c2 = p2 + d2 * t;
    (c1 - c2).norm()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn point_beside_segment() {
        let d = point_to_segment_dist(&p(0.5, 2.0, 0.0), &p(0.0, 0.0, 0.0), &p(1.0, 0.0, 0.0));
        assert!((d - 2.0).abs() < 1e-12);
    }

    #[test]
    fn point_past_segment_end() {
        let d = point_to_segment_dist(&p(4.0, 4.0, 0.0), &p(0.0, 0.0, 0.0), &p(1.0, 0.0, 0.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn zero_length_segment() {
        let d = point_to_segment_dist(&p(0.0, 3.0, 4.0), &p(0.0, 0.0, 0.0), &p(0.0, 0.0, 0.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn skew_segments() {
        let d = segment_to_segment_dist(
            &p(-1.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(0.0, -1.0, 3.0),
            &p(0.0, 1.0, 3.0),
        );
        assert!((d - 3.0).abs() < 1e-12);
    }

    #[test]
    fn parallel_offset_segments() {
        let d = segment_to_segment_dist(
            &p(0.0, 0.0, 0.0),
            &p(2.0, 0.0, 0.0),
            &p(1.0, 2.0, 0.0),
            &p(3.0, 2.0, 0.0),
        );
        assert!((d - 2.0).abs() < 1e-12);
    }

    #[test]
    fn collinear_disjoint_segments() {
        let d = segment_to_segment_dist(
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(3.0, 0.0, 0.0),
            &p(5.0, 0.0, 0.0),
        );
        assert!((d - 2.0).abs() < 1e-12);
    }
}

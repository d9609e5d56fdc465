//! Vector helpers and 2D orientation predicates.
//!
//! All predicates use a strict comparison: collinear triples are never
//! counter-clockwise. Overlap and gutter results depend on this exact
//! tie-breaking, so do not switch these to epsilon comparisons.

/// A 2D point in UV space.
pub type Point2 = [f64; 2];

/// A 3D vector.
pub type Vec3 = [f64; 3];

// ============================================================================
// 2D predicates
// ============================================================================

/// True when `p1 -> p2 -> p3` turns counter-clockwise (V axis pointing up).
pub fn is_counter_clockwise(p1: Point2, p2: Point2, p3: Point2) -> bool {
    (p3[1] - p1[1]) * (p2[0] - p1[0]) > (p2[1] - p1[1]) * (p3[0] - p1[0])
}

/// True when segment `p1-p2` crosses segment `q1-q2`.
pub fn segments_intersect(p1: Point2, p2: Point2, q1: Point2, q2: Point2) -> bool {
    is_counter_clockwise(p1, q1, q2) != is_counter_clockwise(p2, q1, q2)
        && is_counter_clockwise(p1, p2, q1) != is_counter_clockwise(p1, p2, q2)
}

/// True when `point` sits on the same side of all three edges of `a, b, c`.
pub fn point_in_triangle(point: Point2, a: Point2, b: Point2, c: Point2) -> bool {
    let ab = is_counter_clockwise(point, a, b);
    let bc = is_counter_clockwise(point, b, c);
    let ca = is_counter_clockwise(point, c, a);
    ab == bc && bc == ca
}

pub fn distance2(a: Point2, b: Point2) -> f64 {
    let du = b[0] - a[0];
    let dv = b[1] - a[1];
    (du * du + dv * dv).sqrt()
}

// ============================================================================
// 3D vectors
// ============================================================================

pub fn sub3(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn cross3(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn dot3(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn length3(v: Vec3) -> f64 {
    dot3(v, v).sqrt()
}

pub fn distance3(a: Vec3, b: Vec3) -> f64 {
    length3(sub3(a, b))
}

/// Unit vector in the direction of `v`, or `None` for a zero or non-finite vector.
pub fn normalize3(v: Vec3) -> Option<Vec3> {
    let len = length3(v);
    if len > 0.0 && len.is_finite() {
        Some([v[0] / len, v[1] / len, v[2] / len])
    } else {
        None
    }
}

/// Signed angle in radians between `v0` and `v1`.
///
/// The magnitude is the unsigned angle. It is positive when `v0 x v1`
/// points along `reference` and negative otherwise, so passing the cross
/// product itself yields a negative angle for parallel and opposite vectors.
pub fn signed_angle(v0: Vec3, v1: Vec3, reference: Vec3) -> f64 {
    let a = normalize3(v0).unwrap_or(v0);
    let b = normalize3(v1).unwrap_or(v1);
    let angle = dot3(a, b).clamp(-1.0, 1.0).acos();
    if dot3(cross3(a, b), reference) > 0.0 {
        angle
    } else {
        -angle
    }
}

/// Heron's formula from three side lengths.
///
/// Rounding can push the product slightly negative for collinear points;
/// those triangles report zero area.
pub fn heron_area(a: f64, b: f64, c: f64) -> f64 {
    let s = (a + b + c) / 2.0;
    let product = s * (s - a) * (s - b) * (s - c);
    if product > 0.0 {
        product.sqrt()
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_counter_clockwise() {
        assert!(is_counter_clockwise([0.0, 0.0], [1.0, 0.0], [0.0, 1.0]));
        assert!(!is_counter_clockwise([0.0, 0.0], [0.0, 1.0], [1.0, 0.0]));
        // collinear is never counter-clockwise
        assert!(!is_counter_clockwise([0.0, 0.0], [1.0, 1.0], [2.0, 2.0]));
    }

    #[test]
    fn test_segments_intersect() {
        assert!(segments_intersect([0.0, 0.0], [1.0, 1.0], [0.0, 1.0], [1.0, 0.0]));
        assert!(!segments_intersect([0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]));
        assert!(!segments_intersect([0.0, 0.0], [0.4, 0.4], [0.0, 1.0], [1.0, 0.0]));
    }

    #[test]
    fn test_point_in_triangle() {
        let (a, b, c) = ([0.0, 0.0], [1.0, 0.0], [0.0, 1.0]);
        assert!(point_in_triangle([0.2, 0.2], a, b, c));
        assert!(!point_in_triangle([0.8, 0.8], a, b, c));
        // winding does not matter
        assert!(point_in_triangle([0.2, 0.2], a, c, b));
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(normalize3([0.0, 0.0, 0.0]), None);
        assert_eq!(normalize3([0.0, 0.0, 4.0]), Some([0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_signed_angle_perpendicular() {
        let n0 = [0.0, 0.0, 1.0];
        let n1 = [1.0, 0.0, 0.0];
        let angle = signed_angle(n0, n1, cross3(n0, n1));
        assert!((angle - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_signed_angle_parallel_is_not_positive() {
        let n = [0.0, 1.0, 0.0];
        assert!(signed_angle(n, n, cross3(n, n)) <= 0.0);

        let opposite = [0.0, -1.0, 0.0];
        let angle = signed_angle(n, opposite, cross3(n, opposite));
        assert!((angle + std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_heron_area() {
        assert!((heron_area(3.0, 4.0, 5.0) - 6.0).abs() < 1e-12);
        assert_eq!(heron_area(1.0, 1.0, 2.0), 0.0);
    }
}

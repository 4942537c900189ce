//! Geometric queries used by the distance and parity passes.
//!
//! Distances run in `f32` like the grids they fill. The 2-D orientation
//! predicate runs in `f64` with symbolic tie-breaking so that a ray
//! passing exactly through a triangle edge or vertex is owned by exactly
//! one of the incident triangles; every caller must use the same
//! predicate for parity counts to stay consistent.

use mesh_types::Point3;

/// Gram-determinant threshold below which a triangle is treated as
/// degenerate and distance falls back to its edges.
const DEGENERATE_DET: f32 = 1e-30;

/// Distance from a point to a line segment.
///
/// Zero-length segments degrade to point-to-point distance.
#[must_use]
pub fn point_segment_distance(p: &Point3<f32>, a: &Point3<f32>, b: &Point3<f32>) -> f32 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq <= f32::MIN_POSITIVE {
        return (p - a).norm();
    }

    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    (p - closest).norm()
}

/// Exact distance from a point to the closed triangle (a, b, c).
///
/// Projects onto the triangle plane via barycentric coordinates; when the
/// projection falls outside, the result is the minimum distance to the
/// edges not excluded by the failing coordinate. Degenerate (zero-area)
/// triangles fall back to the minimum of the three point-segment
/// distances and never produce NaN.
///
/// # Example
///
/// ```
/// use mesh_sdf::query::point_triangle_distance;
/// use nalgebra::Point3;
///
/// let a = Point3::new(0.0, 0.0, 0.0);
/// let b = Point3::new(1.0, 0.0, 0.0);
/// let c = Point3::new(0.0, 1.0, 0.0);
///
/// let d = point_triangle_distance(&Point3::new(0.25, 0.25, 2.0), &a, &b, &c);
/// assert!((d - 2.0).abs() < 1e-6);
/// ```
#[must_use]
pub fn point_triangle_distance(
    p: &Point3<f32>,
    a: &Point3<f32>,
    b: &Point3<f32>,
    c: &Point3<f32>,
) -> f32 {
    let x13 = a - c;
    let x23 = b - c;
    let x03 = p - c;

    let m13 = x13.norm_squared();
    let m23 = x23.norm_squared();
    let d = x13.dot(&x23);

    let det = m13 * m23 - d * d;
    if det <= DEGENERATE_DET {
        return point_segment_distance(p, a, b)
            .min(point_segment_distance(p, b, c))
            .min(point_segment_distance(p, a, c));
    }

    let inv_det = 1.0 / det;
    let ra = x13.dot(&x03);
    let rb = x23.dot(&x03);

    // Barycentric weights of the closest point on the infinite plane
    let wa = inv_det * (m23 * ra - d * rb);
    let wb = inv_det * (m13 * rb - d * ra);
    let wc = 1.0 - wa - wb;

    if wa >= 0.0 && wb >= 0.0 && wc >= 0.0 {
        let closest = Point3::from(a.coords * wa + b.coords * wb + c.coords * wc);
        (p - closest).norm()
    } else if wa > 0.0 {
        // Closest feature excludes edge b-c
        point_segment_distance(p, a, b).min(point_segment_distance(p, a, c))
    } else if wb > 0.0 {
        // Excludes edge a-c
        point_segment_distance(p, a, b).min(point_segment_distance(p, b, c))
    } else {
        // Excludes edge a-b
        point_segment_distance(p, a, c).min(point_segment_distance(p, b, c))
    }
}

/// 2-D orientation predicate with symbolic tie-breaking.
///
/// Returns a sign and twice the signed area of the triangle (origin, p1,
/// p2) under this predicate's fixed convention (`y1*x2 - x1*y2`, the
/// negative of the usual cross product). When the area is exactly zero
/// the sign is decided by comparing coordinates, so only coincident
/// points return zero. The exact tie order matters: it guarantees a
/// single owner for rays through shared edges and vertices, and parity
/// counting relies on every triangle being tested with the same rule.
#[must_use]
pub fn orientation(x1: f64, y1: f64, x2: f64, y2: f64) -> (i32, f64) {
    let twice_signed_area = y1 * x2 - x1 * y2;

    if twice_signed_area > 0.0 {
        (1, twice_signed_area)
    } else if twice_signed_area < 0.0 {
        (-1, twice_signed_area)
    } else if y2 > y1 {
        (1, twice_signed_area)
    } else if y2 < y1 {
        (-1, twice_signed_area)
    } else if x1 > x2 {
        (1, twice_signed_area)
    } else if x1 < x2 {
        (-1, twice_signed_area)
    } else {
        (0, twice_signed_area) // only when p1 == p2
    }
}

/// Test whether (x0, y0) lies inside the 2-D triangle (p1, p2, p3).
///
/// All three edge orientations must agree and be non-zero. On success
/// returns the triangle's orientation sign and the normalized barycentric
/// coordinates of the query point.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn point_in_triangle_2d(
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x3: f64,
    y3: f64,
) -> Option<(i32, f64, f64, f64)> {
    let (x1, y1) = (x1 - x0, y1 - y0);
    let (x2, y2) = (x2 - x0, y2 - y0);
    let (x3, y3) = (x3 - x0, y3 - y0);

    let (sign_a, mut a) = orientation(x2, y2, x3, y3);
    if sign_a == 0 {
        return None;
    }
    let (sign_b, mut b) = orientation(x3, y3, x1, y1);
    if sign_b != sign_a {
        return None;
    }
    let (sign_c, mut c) = orientation(x1, y1, x2, y2);
    if sign_c != sign_a {
        return None;
    }

    let sum = a + b + c;
    if sum == 0.0 {
        // All three sub-areas vanished: degenerate triangle, no containment
        return None;
    }
    a /= sum;
    b /= sum;
    c /= sum;

    Some((sign_a, a, b, c))
}

//! Pure measurement calculators.
//!
//! All functions take world-space points and never fail; degenerate input
//! produces a degenerate (zero) result rather than NaN.

use bevy::math::Vec3;

/// Euclidean distance between two points.
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    (a - b).length()
}

/// Polygon area by fan triangulation from the last vertex, each triangle via Heron's formula.
///
/// Exact for convex polygons. Concave polygons are approximated: triangles
/// that fall outside the boundary are still counted.
pub fn area(points: &[Vec3]) -> f32 {
    let Some(&last) = points.last() else {
        return 0.0;
    };
    if points.len() < 3 {
        return 0.0;
    }

    points[..points.len() - 1]
        .windows(2)
        .map(|edge| heron(distance(edge[0], last), distance(edge[1], last), distance(edge[0], edge[1])))
        .sum()
}

fn heron(a: f32, b: f32, c: f32) -> f32 {
    let p = (a + b + c) * 0.5;
    // Collinear triangles can round to a tiny negative product.
    (p * (p - a) * (p - b) * (p - c)).max(0.0).sqrt()
}

/// Included angle at `p1` between the arms towards `p0` and `p2`, in degrees within [0, 180].
///
/// A zero-length arm has no direction; the angle is reported as 90°.
pub fn angle(p0: Vec3, p1: Vec3, p2: Vec3) -> f32 {
    let dir0 = p0 - p1;
    let dir2 = p2 - p1;
    let denominator = (dir0.length_squared() * dir2.length_squared()).sqrt();
    if denominator == 0.0 {
        return 90.0;
    }
    let cos = (dir0.dot(dir2) / denominator).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Unit direction halfway between the arms at `p1`.
///
/// Returns `Vec3::ZERO` when the arms point in exactly opposite directions
/// (or either arm has zero length); callers must handle that case.
pub fn angle_bisector(p0: Vec3, p1: Vec3, p2: Vec3) -> Vec3 {
    let dir0 = (p0 - p1).normalize_or_zero();
    let dir2 = (p2 - p1).normalize_or_zero();
    (dir0 + dir2).normalize_or_zero()
}

/// Formats a measured magnitude with precision adapted to its size.
///
/// Below 0.0001 the raw value is printed unrounded; below 0.01 four fraction
/// digits, below 0.1 three, otherwise two.
pub fn format_magnitude(value: f32) -> String {
    if value < 0.0001 {
        return value.to_string();
    }
    let fraction_digits = if value < 0.01 {
        4
    } else if value < 0.1 {
        3
    } else {
        2
    };
    format!("{value:.fraction_digits$}")
}

/// Index triples fanning a polygon of `vertex_count` vertices around its last vertex.
pub fn fan_indices(vertex_count: usize) -> Vec<u32> {
    if vertex_count < 3 {
        return Vec::new();
    }
    let last = (vertex_count - 1) as u32;
    (2..vertex_count as u32)
        .flat_map(|i| [last, i - 2, i - 1])
        .collect()
}

/// Samples the quadratic Bézier `start → control → end` into `segments + 1` points.
pub fn quadratic_bezier(start: Vec3, control: Vec3, end: Vec3, segments: usize) -> Vec<Vec3> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            let u = 1.0 - t;
            start * (u * u) + control * (2.0 * u * t) + end * (t * t)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        let a = Vec3::new(1.5, -2.0, 7.25);
        let b = Vec3::new(-3.0, 4.0, 0.5);
        assert_eq!(distance(a, b), distance(b, a));
        assert_eq!(distance(a, a), 0.0);
        assert!((distance(Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0)) - 5.0).abs() < EPS);
    }

    #[test]
    fn unit_square_area() {
        let square = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        assert!((area(&square) - 1.0).abs() < EPS);
    }

    #[test]
    fn right_triangle_area() {
        let tri = [Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0), Vec3::new(4.0, 3.0, 0.0)];
        assert!((area(&tri) - 6.0).abs() < EPS);
    }

    #[test]
    fn area_needs_three_points() {
        assert_eq!(area(&[]), 0.0);
        assert_eq!(area(&[Vec3::ZERO, Vec3::X]), 0.0);
    }

    #[test]
    fn collinear_area_is_zero_not_nan() {
        let line = [Vec3::ZERO, Vec3::X, Vec3::X * 2.0];
        let a = area(&line);
        assert!(!a.is_nan());
        assert!(a.abs() < 1e-3);
    }

    #[test]
    fn concave_area_keeps_fan_approximation() {
        // Reflex vertex at (1, 1): the true (shoelace) area is 4, the fan from (0, 4) counts 12.
        let dart = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
        ];
        assert!((area(&dart) - 12.0).abs() < 1e-4);
    }

    #[test]
    fn perpendicular_angle() {
        let a = angle(Vec3::X, Vec3::ZERO, Vec3::Y);
        assert!((a - 90.0).abs() < 1e-4);
    }

    #[test]
    fn collinear_angles() {
        assert!(angle(Vec3::X, Vec3::ZERO, Vec3::X * 3.0).abs() < 1e-4);
        assert!((angle(Vec3::X, Vec3::ZERO, -Vec3::X) - 180.0).abs() < 1e-4);
    }

    #[test]
    fn bisector_of_right_angle() {
        let b = angle_bisector(Vec3::X, Vec3::ZERO, Vec3::Y);
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((b - expected).length() < EPS);
    }

    #[test]
    fn bisector_degenerates_for_opposite_arms() {
        assert_eq!(angle_bisector(Vec3::X, Vec3::ZERO, -Vec3::X), Vec3::ZERO);
    }

    #[test]
    fn magnitude_precision() {
        assert_eq!(format_magnitude(0.00005), "0.00005");
        assert_eq!(format_magnitude(0.005), "0.0050");
        assert_eq!(format_magnitude(0.05), "0.050");
        assert_eq!(format_magnitude(5.0), "5.00");
        assert_eq!(format_magnitude(0.0), "0");
    }

    #[test]
    fn fan_indices_share_last_vertex() {
        assert!(fan_indices(2).is_empty());
        assert_eq!(fan_indices(3), vec![2, 0, 1]);
        assert_eq!(fan_indices(4), vec![3, 0, 1, 3, 1, 2]);
    }

    #[test]
    fn bezier_endpoints() {
        let pts = quadratic_bezier(Vec3::X, Vec3::ONE, Vec3::Y, 4);
        assert_eq!(pts.len(), 5);
        assert!((pts[0] - Vec3::X).length() < EPS);
        assert!((pts[4] - Vec3::Y).length() < EPS);
    }
}

//! 2D geometry primitives: vectors, points, and normalized implicit lines.
//!
//! Lines are stored in implicit form `A*x + B*y + C = 0` with `A^2 + B^2 = 1`,
//! so `(A, B)` is always a unit normal and `C` is the signed distance from the
//! origin to the line along that normal. All solver code should construct
//! lines through [`Line2::new`] or [`Line2::through_points`] so the
//! normalization invariant never has to be re-checked downstream.

use nalgebra::Vector2;

use crate::tolerance::{is_zero, TOLERANCE};

/// A 2D vector or point displacement.
///
/// Points in the sketch are represented with this same type; the distinction
/// between "point" and "vector" is purely one of interpretation at the call
/// site, matching how the reference engine treats a point as a vector from
/// the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }

    fn as_nalgebra(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    pub fn dot(self, other: Vec2) -> f64 {
        self.as_nalgebra().dot(&other.as_nalgebra())
    }

    pub fn square_magnitude(self) -> f64 {
        self.dot(self)
    }

    pub fn magnitude(self) -> f64 {
        self.square_magnitude().sqrt()
    }

    /// Unit vector in the same direction, or `None` if this vector is
    /// (numerically) the zero vector.
    pub fn unit_vector(self) -> Option<Vec2> {
        let mag = self.magnitude();
        if is_zero(mag) {
            return None;
        }
        Some(Vec2::new(self.x / mag, self.y / mag))
    }

    pub fn scaled(self, factor: f64) -> Vec2 {
        Vec2::new(self.x * factor, self.y * factor)
    }

    pub fn translated(self, dx: f64, dy: f64) -> Vec2 {
        Vec2::new(self.x + dx, self.y + dy)
    }

    pub fn plus(self, other: Vec2) -> Vec2 {
        self.translated(other.x, other.y)
    }

    pub fn minus(self, other: Vec2) -> Vec2 {
        self.translated(-other.x, -other.y)
    }

    /// Rotates this vector about the origin by `theta` radians (CCW positive).
    pub fn rotated(self, theta: f64) -> Vec2 {
        let (sin, cos) = theta.sin_cos();
        Vec2::new(
            self.x * cos - self.y * sin,
            self.x * sin + self.y * cos,
        )
    }

    pub fn distance_to(self, other: Vec2) -> f64 {
        self.minus(other).magnitude()
    }

    pub fn square_distance_to(self, other: Vec2) -> f64 {
        self.minus(other).square_magnitude()
    }

    /// Signed angle from `self` to `other`, normalized to `(-pi, pi]`,
    /// counter-clockwise positive.
    pub fn angle_to(self, other: Vec2) -> f64 {
        let a1 = self.y.atan2(self.x);
        let a2 = other.y.atan2(other.x);
        normalize_angle(a2 - a1)
    }
}

/// Normalizes an angle in radians to the interval `(-pi, pi]`.
pub fn normalize_angle(theta: f64) -> f64 {
    let mut a = theta % (2.0 * std::f64::consts::PI);
    if a <= -std::f64::consts::PI {
        a += 2.0 * std::f64::consts::PI;
    } else if a > std::f64::consts::PI {
        a -= 2.0 * std::f64::consts::PI;
    }
    a
}

/// An infinite line in normalized implicit form `A*x + B*y + C = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2 {
    a: f64,
    b: f64,
    c: f64,
}

impl Line2 {
    /// Builds a line from raw implicit coefficients, normalizing so that
    /// `A^2 + B^2 = 1`. Returns `None` if `(A, B)` is the zero vector.
    pub fn new(a: f64, b: f64, c: f64) -> Option<Self> {
        let mag = (a * a + b * b).sqrt();
        if is_zero(mag) {
            return None;
        }
        Some(Line2 {
            a: a / mag,
            b: b / mag,
            c: c / mag,
        })
    }

    /// Unchecked constructor for coefficients already known to be normalized
    /// (e.g. the result of a rotation, which preserves normalization).
    pub(crate) fn from_normalized(a: f64, b: f64, c: f64) -> Self {
        debug_assert!(((a * a + b * b) - 1.0).abs() < 1e-6);
        Line2 { a, b, c }
    }

    /// Builds the unique line through two distinct points.
    pub fn through_points(p1: Vec2, p2: Vec2) -> Option<Self> {
        let a = p2.y - p1.y;
        let b = p1.x - p2.x;
        let c = -a * p1.x - b * p1.y;
        Line2::new(a, b, c)
    }

    pub fn a(self) -> f64 {
        self.a
    }
    pub fn b(self) -> f64 {
        self.b
    }
    pub fn c(self) -> f64 {
        self.c
    }

    pub fn normal(self) -> Vec2 {
        Vec2::new(self.a, self.b)
    }

    /// Direction vector along the line (perpendicular to the normal).
    pub fn direction(self) -> Vec2 {
        Vec2::new(self.b, -self.a)
    }

    /// Signed distance from `(x, y)` to this line: positive on the side the
    /// normal points toward.
    pub fn signed_distance_to_point(self, p: Vec2) -> f64 {
        self.a * p.x + self.b * p.y + self.c
    }

    /// Nearest point on the line to an arbitrary point.
    pub fn nearest_point(self, p: Vec2) -> Vec2 {
        let d = self.signed_distance_to_point(p);
        Vec2::new(p.x - self.a * d, p.y - self.b * d)
    }

    /// The point on the line closest to the origin.
    pub fn point_nearest_origin(self) -> Vec2 {
        Vec2::new(-self.c * self.a, -self.c * self.b)
    }

    /// Signed distance from the origin to the line.
    pub fn origin_distance(self) -> f64 {
        self.c
    }

    /// Translates the line by `d` along its own normal, leaving `(A, B)`
    /// unchanged.
    pub fn translated_by_distance(self, d: f64) -> Line2 {
        Line2::from_normalized(self.a, self.b, self.c - d)
    }

    /// Translates the line by an arbitrary `(dx, dy)` offset.
    pub fn translated(self, dx: f64, dy: f64) -> Line2 {
        let through = self.point_nearest_origin().translated(dx, dy);
        Line2::from_normalized(self.a, self.b, -(self.a * through.x + self.b * through.y))
    }

    /// Rotates the line's normal about the origin by `theta`; `C` is
    /// preserved (the line's distance from the origin does not change under
    /// a pure rotation of its normal).
    pub fn rotated(self, theta: f64) -> Line2 {
        let rotated_normal = self.normal().rotated(theta);
        Line2::from_normalized(rotated_normal.x, rotated_normal.y, self.c)
    }

    /// Angle between this line's direction vector and another's, normalized
    /// to `(-pi, pi]`.
    pub fn angle_to_line(self, other: Line2) -> f64 {
        self.direction().angle_to(other.direction())
    }

    /// Intersection of two lines, or `None` if they are (numerically)
    /// parallel.
    pub fn intersect(self, other: Line2) -> Option<Vec2> {
        let det = self.a * other.b - other.a * self.b;
        if is_zero(det) {
            return None;
        }
        let x = (self.b * other.c - other.b * self.c) / det;
        let y = (other.a * self.c - self.a * other.c) / det;
        Some(Vec2::new(x, y))
    }

    /// The same line with its normal (and direction) flipped. Still
    /// normalized; represents the identical set of points, the opposite
    /// orientation.
    pub fn flipped(self) -> Line2 {
        Line2::from_normalized(-self.a, -self.b, -self.c)
    }

    /// Heuristic distance between two lines: the difference of their signed
    /// origin distances. This is a true geometric separation only when the
    /// two lines are parallel; for non-parallel lines it is a clustering
    /// heuristic only (see the clusterer's use of it) and must not be relied
    /// on as a geometric invariant.
    pub fn heuristic_distance_to(self, other: Line2) -> f64 {
        self.c - other.c
    }
}

/// Computes the (up to) two tangent lines to a pair of circles with centers
/// `p1`, `p2` and radii `r1`, `r2`, biased toward the external tangent family
/// (`r1 - r2`) or the internal family (`r1 + r2`) depending on `internal`.
/// Returns `None` (NonConvergent) if the circles are too close together for
/// the requested tangent family to exist.
///
/// Returns the two `(a, b, c)` raw (normalized) coefficient tuples for `k = 1`
/// and `k = -1`; the caller picks whichever is closer to an existing line.
pub fn tangent_lines_to_two_circles(
    p1: Vec2,
    r1: f64,
    p2: Vec2,
    r2: f64,
    internal: bool,
) -> Option<[(f64, f64, f64); 2]> {
    let d = p1.distance_to(p2);
    if is_zero(d) {
        return None;
    }
    let threshold = if internal { (r1 + r2).abs() } else { (r1 - r2).abs() };
    if d < threshold {
        return None;
    }

    let delta_r = if internal { -r2 - r1 } else { r2 - r1 };
    let r = delta_r / d;
    let r_squared = r * r;
    if r_squared > 1.0 {
        return None;
    }
    let x = (p2.x - p1.x) / d;
    let y = (p2.y - p1.y) / d;
    let root = (1.0 - r_squared).sqrt();

    let mut out = [(0.0, 0.0, 0.0); 2];
    for (slot, k) in out.iter_mut().zip([1.0f64, -1.0f64]) {
        let a = (r * x) - (k * y) * root;
        let b = (r * y) + (k * x) * root;
        let c = r1 - (a * p1.x + b * p1.y);
        *slot = (a, b, c);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn vec2_rotation_preserves_magnitude() {
        let v = Vec2::new(3.0, 4.0);
        let r = v.rotated(1.23);
        assert_abs_diff_eq!(v.magnitude(), r.magnitude(), epsilon = TOLERANCE);
    }

    #[test]
    fn angle_to_is_antisymmetric() {
        let a = Vec2::new(1.0, 0.0);
        let b = Vec2::new(0.0, 1.0);
        assert_abs_diff_eq!(a.angle_to(b), -b.angle_to(a), epsilon = TOLERANCE);
    }

    #[test]
    fn line_is_normalized() {
        let line = Line2::new(3.0, 4.0, 10.0).unwrap();
        assert_abs_diff_eq!(line.a() * line.a() + line.b() * line.b(), 1.0, epsilon = TOLERANCE);
    }

    #[test]
    fn line_through_points_contains_both() {
        let p1 = Vec2::new(0.0, 0.0);
        let p2 = Vec2::new(5.0, 5.0);
        let line = Line2::through_points(p1, p2).unwrap();
        assert_abs_diff_eq!(line.signed_distance_to_point(p1), 0.0, epsilon = TOLERANCE);
        assert_abs_diff_eq!(line.signed_distance_to_point(p2), 0.0, epsilon = TOLERANCE);
    }

    #[test]
    fn translated_by_distance_shifts_signed_distance() {
        let line = Line2::new(1.0, 0.0, 0.0).unwrap();
        let moved = line.translated_by_distance(3.0);
        let p = Vec2::new(3.0, 0.0);
        assert_abs_diff_eq!(moved.signed_distance_to_point(p), 0.0, epsilon = TOLERANCE);
    }

    #[test]
    fn intersect_axis_lines() {
        let x_axis = Line2::new(0.0, -1.0, 0.0).unwrap();
        let y_axis = Line2::new(1.0, 0.0, 0.0).unwrap();
        let p = x_axis.intersect(y_axis).unwrap();
        assert_abs_diff_eq!(p.x, 0.0, epsilon = TOLERANCE);
        assert_abs_diff_eq!(p.y, 0.0, epsilon = TOLERANCE);
    }

    #[test]
    fn intersect_lines_off_origin() {
        let vertical = Line2::new(1.0, 0.0, -10.0).unwrap(); // x = 10
        let horizontal = Line2::new(0.0, -1.0, 0.0).unwrap(); // y = 0
        let p = vertical.intersect(horizontal).unwrap();
        assert_abs_diff_eq!(p.x, 10.0, epsilon = TOLERANCE);
        assert_abs_diff_eq!(p.y, 0.0, epsilon = TOLERANCE);
    }

    #[test]
    fn parallel_lines_have_no_intersection() {
        let l1 = Line2::new(1.0, 0.0, 0.0).unwrap();
        let l2 = Line2::new(1.0, 0.0, -5.0).unwrap();
        assert!(l1.intersect(l2).is_none());
    }

    #[test]
    fn tangent_lines_fail_when_circles_too_close_for_internal() {
        let p1 = Vec2::new(0.0, 0.0);
        let p2 = Vec2::new(1.0, 0.0);
        assert!(tangent_lines_to_two_circles(p1, 3.0, p2, 3.0, true).is_none());
    }

    #[test]
    fn tangent_lines_external_exist_for_separated_circles() {
        let p1 = Vec2::new(0.0, 0.0);
        let p2 = Vec2::new(10.0, 0.0);
        assert!(tangent_lines_to_two_circles(p1, 2.0, p2, 2.0, false).is_some());
    }
}

//! Two-constraint construction primitives (§4.6.1): the closed-form geometry
//! that turns "this point/line has exactly these two primitive constraints"
//! into a concrete position. Every alternative-picking function here uses
//! *closest to current* as its deterministic tie-break, per the design
//! note that the solver is intentionally path-dependent.

use std::f64::consts::PI;

use crate::geometry::{normalize_angle, tangent_lines_to_two_circles, Line2, Vec2};
use crate::tolerance::{is_degenerate, is_zero, TOLERANCE};

/// Points on a line at chord-intersection with a circle, 0, 1, or 2 of them.
fn intersect_line_circle(line: Line2, center: Vec2, radius: f64) -> Vec<Vec2> {
    let signed = line.signed_distance_to_point(center);
    if signed.abs() > radius + TOLERANCE {
        return Vec::new();
    }
    let foot = line.nearest_point(center);
    let h_sq = (radius * radius - signed * signed).max(0.0);
    let h = h_sq.sqrt();
    if is_zero(h) {
        return vec![foot];
    }
    let dir = line.direction();
    vec![foot.plus(dir.scaled(h)), foot.minus(dir.scaled(h))]
}

fn pick_closest(candidates: &[Vec2], current: Vec2) -> Result<Vec2, String> {
    candidates
        .iter()
        .copied()
        .min_by(|a, b| {
            a.square_distance_to(current)
                .partial_cmp(&b.square_distance_to(current))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .ok_or_else(|| "no feasible candidate position".to_string())
}

/// One Distance constraint on a point against a fixed reference point (or,
/// for a point-to-line Distance, the line's nearest point to the current
/// position). Translates along the vector from the point to the reference,
/// scaled so the final distance equals `target`.
pub fn point_from_single_distance(current: Vec2, reference: Vec2, target: f64) -> Result<Vec2, String> {
    if is_zero(target) {
        return Ok(reference);
    }
    let delta = reference.minus(current);
    let current_dist = delta.magnitude();
    if is_zero(current_dist) {
        return Err("point coincides with its distance reference but target distance is nonzero".into());
    }
    let unit = delta.scaled(1.0 / current_dist);
    Ok(current.plus(unit.scaled(current_dist - target)))
}

/// Two Distance constraints on a point from two points: circle-circle
/// intersection.
pub fn point_from_two_points(p1: Vec2, r1: f64, p2: Vec2, r2: f64, current: Vec2) -> Result<Vec2, String> {
    let d = p1.distance_to(p2);
    if is_degenerate(d) {
        return Err("two distance references coincide".into());
    }
    if d > r1 + r2 + TOLERANCE {
        return Err(format!("circles of radius {r1} and {r2} are {d} apart: too far to intersect"));
    }
    let a = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let h_sq = (r1 * r1 - a * a).max(0.0);
    let h = h_sq.sqrt();
    let dir = p2.minus(p1).scaled(1.0 / d);
    let perp = Vec2::new(-dir.y, dir.x);
    let midpoint = p1.plus(dir.scaled(a));
    if is_zero(h) {
        return Ok(midpoint);
    }
    let candidates = [midpoint.plus(perp.scaled(h)), midpoint.minus(perp.scaled(h))];
    pick_closest(&candidates, current)
}

/// Two Distance constraints on a point from a point and a line.
pub fn point_from_point_line(p: Vec2, pd: f64, line: Line2, ld: f64, current: Vec2) -> Result<Vec2, String> {
    let mut candidates = Vec::new();
    for sign in [1.0, -1.0] {
        let offset = line.translated_by_distance(sign * ld);
        candidates.extend(intersect_line_circle(offset, p, pd));
    }
    pick_closest(&candidates, current)
}

/// Two Distance constraints on a point from two lines.
pub fn point_from_two_lines(l1: Line2, d1: f64, l2: Line2, d2: f64, current: Vec2) -> Result<Vec2, String> {
    let mut candidates = Vec::new();
    for s1 in [1.0, -1.0] {
        let t1 = l1.translated_by_distance(s1 * d1);
        for s2 in [1.0, -1.0] {
            let t2 = l2.translated_by_distance(s2 * d2);
            if let Some(p) = t1.intersect(t2) {
                candidates.push(p);
            }
        }
    }
    if candidates.is_empty() {
        return Err("two lines are parallel and the target separations are incompatible".into());
    }
    pick_closest(&candidates, current)
}

/// One Angle constraint for a line: find the orientation whose angle to
/// `other` is exactly `target`, of the four candidates (`+target`,
/// `-target`, `pi-target`, `-(pi-target)` — a line's direction is
/// unsigned, so both the target angle and its supplement admit two
/// rotation senses), picking whichever lands closest to `current`'s
/// present angle to `other`.
pub fn line_from_single_angle(current: Line2, other: Line2, target: f64) -> Line2 {
    let angle1 = other.angle_to_line(current);
    let candidates = [target, -target, PI - target, -(PI - target)];
    let mut best = candidates[0];
    let mut best_gap = normalize_angle(best - angle1).abs();
    for &c in &candidates[1..] {
        let gap = normalize_angle(c - angle1).abs();
        if gap < best_gap {
            best_gap = gap;
            best = c;
        }
    }
    other.rotated(best)
}

/// Single Distance constraint moving a line along its own normal so its
/// signed distance to `point` becomes `target`; of the two translations
/// that achieve `+-target`, picks the smaller in magnitude.
pub fn line_from_single_distance(current: Line2, point: Vec2, target: f64) -> Line2 {
    let dist = current.signed_distance_to_point(point);
    let translate1 = dist + target;
    let translate2 = dist - target;
    let chosen = if translate1.abs() < translate2.abs() {
        translate1
    } else {
        translate2
    };
    current.translated_by_distance(chosen)
}

/// Two constraints on a line: an Angle to `other` and a Distance to
/// `point`. Solves the angle first, then translates, picking whichever of
/// the two translation candidates keeps the line closest (by the
/// heuristic line-to-line distance) to its prior value.
pub fn line_from_angle_distance(
    current: Line2,
    other: Line2,
    angle_target: f64,
    point: Vec2,
    dist_target: f64,
) -> Line2 {
    let rotated = line_from_single_angle(current, other, angle_target);
    let dist = rotated.signed_distance_to_point(point);
    let translate1 = dist - dist_target;
    let translate2 = dist + dist_target;
    let line1 = rotated.translated_by_distance(translate1);
    let line2 = rotated.translated_by_distance(translate2);
    let d1 = current.heuristic_distance_to(line1).abs();
    let d2 = current.heuristic_distance_to(line2).abs();
    if d1 < d2 {
        line1
    } else {
        line2
    }
}

/// Two Distance constraints on a line from two points: the closed-form
/// tangent-lines-to-two-circles construction. Computes both the external
/// and internal tangent families (skipping whichever is geometrically
/// infeasible) and picks the candidate closest to `current` by slope, then
/// by origin-signed-distance.
pub fn line_from_two_points(current: Line2, p1: Vec2, d1: f64, p2: Vec2, d2: f64) -> Result<Line2, String> {
    if is_zero(d1) && is_zero(d2) {
        let line = Line2::through_points(p1, p2).ok_or("the two points coincide")?;
        let flipped = line.flipped();
        return Ok(
            if current.angle_to_line(line).abs() <= current.angle_to_line(flipped).abs() {
                line
            } else {
                flipped
            },
        );
    }

    let mut candidates: Vec<Line2> = Vec::new();
    for internal in [false, true] {
        if let Some(pair) = tangent_lines_to_two_circles(p1, d1, p2, d2, internal) {
            for (a, b, c) in pair {
                if let Some(line) = Line2::new(a, b, c) {
                    candidates.push(line);
                }
            }
        }
    }
    if candidates.is_empty() {
        return Err(format!(
            "points are too close together for either tangent family (distances {d1}, {d2})"
        ));
    }

    let current_slope = slope(current);
    let best = candidates
        .into_iter()
        .min_by(|a, b| {
            let a_key = (
                (slope(*a) - current_slope).abs(),
                (a.origin_distance() - current.origin_distance()).abs(),
            );
            let b_key = (
                (slope(*b) - current_slope).abs(),
                (b.origin_distance() - current.origin_distance()).abs(),
            );
            a_key.partial_cmp(&b_key).unwrap_or(std::cmp::Ordering::Equal)
        })
        .expect("candidates non-empty");
    Ok(best)
}

fn slope(line: Line2) -> f64 {
    if is_degenerate(line.a()) {
        f64::INFINITY
    } else {
        line.b() / line.a()
    }
}

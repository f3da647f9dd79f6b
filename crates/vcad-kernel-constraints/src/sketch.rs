//! Sketch façade (C3): the public surface callers actually use. Owns one
//! [`SketchStore`], bootstraps the origin and X/Y axes, and exposes entity
//! constructors, `constrain_*` wrapper calls, the derived convenience
//! operations, and [`Sketch::solve`] — the outer resolve/cluster/merge loop
//! that ties C4 through C8 together.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::cluster::{self, Cluster};
use crate::config::SolverConfig;
use crate::constraint::{ConstraintWrapper, PrimitiveConstraint, PrimitiveKind, WrapperId, WrapperKind};
use crate::diagnostics;
use crate::entity::{ConstraintLevel, EntityId, SketchArc, SketchCircle, SketchEntity, SketchLine, SketchPoint};
use crate::error::{ConstraintError, ConstraintResult};
use crate::geometry::{Line2, Vec2};
use crate::local_solve;
use crate::merge;
use crate::resolver;
use crate::store::SketchStore;

/// What a successful [`Sketch::solve`] call did: currently just the number
/// of outer resolve/cluster/merge passes it took, for callers who want to
/// watch a sketch approach its `max_passes` backstop.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolveReport {
    pub passes: usize,
}

/// A 2D sketch: an entity/constraint store plus the three entities every
/// sketch is bootstrapped with (the origin and the two axes), fixed from
/// the start so everything else has something absolute to measure against.
pub struct Sketch {
    store: SketchStore,
    config: SolverConfig,
    pub origin: EntityId,
    pub x_axis: EntityId,
    pub y_axis: EntityId,
}

impl Sketch {
    pub fn new() -> Self {
        Self::with_config(SolverConfig::default())
    }

    /// Builds a sketch with its origin at (0, 0), an X axis along `y = 0`
    /// and a Y axis along `x = 0`, both fixed. The bootstrap primitives
    /// (origin-on-each-axis, axes-at-90-degrees) hold by construction, so
    /// they're inserted pre-solved directly rather than routed through a
    /// `ConstraintWrapper` — there is nothing for the resolver to expand and
    /// nothing for `solve` to wait on.
    pub fn with_config(config: SolverConfig) -> Self {
        let mut store = SketchStore::new();

        let origin = store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::ZERO)));
        let x_end = store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::new(1.0, 0.0))));
        let y_end = store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::new(0.0, 1.0))));

        let x_line = Line2::new(0.0, -1.0, 0.0).expect("x-axis coefficients are non-degenerate");
        let y_line = Line2::new(1.0, 0.0, 0.0).expect("y-axis coefficients are non-degenerate");
        let x_axis = store.add_entity(SketchEntity::Line(SketchLine {
            line: x_line,
            start: origin,
            end: x_end,
            level: ConstraintLevel::Fully,
        }));
        let y_axis = store.add_entity(SketchEntity::Line(SketchLine {
            line: y_line,
            start: origin,
            end: y_end,
            level: ConstraintLevel::Fully,
        }));

        let mut origin_on_x = PrimitiveConstraint::new(PrimitiveKind::Distance, origin, x_axis, 0.0);
        origin_on_x.solved = true;
        store.add_primitive(origin_on_x);
        let mut origin_on_y = PrimitiveConstraint::new(PrimitiveKind::Distance, origin, y_axis, 0.0);
        origin_on_y.solved = true;
        store.add_primitive(origin_on_y);
        let mut axes_angle = PrimitiveConstraint::new(PrimitiveKind::Angle, x_axis, y_axis, FRAC_PI_2);
        axes_angle.solved = true;
        store.add_primitive(axes_angle);

        store.make_fixed(origin);
        store.make_fixed(x_axis);
        store.make_fixed(y_axis);
        store.mark_solved(origin);
        store.mark_solved(x_axis);
        store.mark_solved(y_axis);
        store.mark_solved(x_end);
        store.mark_solved(y_end);

        Sketch {
            store,
            config,
            origin,
            x_axis,
            y_axis,
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    // ---- entity constructors ----------------------------------------

    pub fn add_point(&mut self, x: f64, y: f64) -> EntityId {
        self.store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::new(x, y))))
    }

    /// Adds a line through `(x1, y1)` and `(x2, y2)`. Rejected synchronously
    /// if the two points coincide, since no implicit line coefficients can
    /// be derived from them.
    pub fn add_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> ConstraintResult<EntityId> {
        let p1 = Vec2::new(x1, y1);
        let p2 = Vec2::new(x2, y2);
        let line = Line2::through_points(p1, p2)
            .ok_or_else(|| ConstraintError::InputRejected { reason: "line endpoints coincide".into() })?;

        let start = self.store.add_entity(SketchEntity::Point(SketchPoint::new(p1)));
        let end = self.store.add_entity(SketchEntity::Point(SketchPoint::new(p2)));
        let line_id = self.store.add_entity(SketchEntity::Line(SketchLine {
            line,
            start,
            end,
            level: ConstraintLevel::Under,
        }));
        self.store.add_primitive(PrimitiveConstraint::new(PrimitiveKind::Distance, start, line_id, 0.0));
        self.store.add_primitive(PrimitiveConstraint::new(PrimitiveKind::Distance, end, line_id, 0.0));
        Ok(line_id)
    }

    pub fn add_circle(&mut self, cx: f64, cy: f64, radius: f64) -> EntityId {
        let center = self.store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::new(cx, cy))));
        self.store.add_entity(SketchEntity::Circle(SketchCircle {
            center,
            radius: Some(radius),
            level: ConstraintLevel::Under,
        }))
    }

    /// Adds an arc with its own center/start/end points. No anchor
    /// primitives are created between them (unlike a line's start/end
    /// Distance-0 anchors): an arc's radius is always derived from
    /// center/start once both are solved (see the resolver's `curve_radius`),
    /// so pinning start to the arc itself would be redundant bookkeeping
    /// with no primitive meaning of its own.
    pub fn add_arc(&mut self, cx: f64, cy: f64, sx: f64, sy: f64, ex: f64, ey: f64) -> EntityId {
        let center = self.store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::new(cx, cy))));
        let start = self.store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::new(sx, sy))));
        let end = self.store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::new(ex, ey))));
        self.store.add_entity(SketchEntity::Arc(SketchArc {
            center,
            start,
            end,
            level: ConstraintLevel::Under,
        }))
    }

    pub fn make_fixed(&mut self, entity: EntityId) {
        self.store.make_fixed(entity);
        self.store.mark_solved(entity);
        if let Some(e) = self.store.entity(entity) {
            for child in e.children() {
                self.store.mark_solved(child);
            }
        }
    }

    // ---- queries ------------------------------------------------------

    pub fn point(&self, id: EntityId) -> Option<(f64, f64)> {
        self.store.entity(id)?.as_point().map(|p| (p.position.x, p.position.y))
    }

    pub fn line_endpoints(&self, id: EntityId) -> Option<(EntityId, EntityId)> {
        self.store.entity(id)?.as_line().map(|l| (l.start, l.end))
    }

    pub fn line_coefficients(&self, id: EntityId) -> Option<(f64, f64, f64)> {
        self.store.entity(id)?.as_line().map(|l| (l.line.a(), l.line.b(), l.line.c()))
    }

    pub fn center_of(&self, curve: EntityId) -> Option<EntityId> {
        match self.store.entity(curve)? {
            SketchEntity::Circle(c) => Some(c.center),
            SketchEntity::Arc(a) => Some(a.center),
            SketchEntity::Point(_) => Some(curve),
            SketchEntity::Line(_) => None,
        }
    }

    /// A circle's stored radius, or an arc's radius derived from its solved
    /// center/start points.
    pub fn radius(&self, id: EntityId) -> Option<f64> {
        match self.store.entity(id)? {
            SketchEntity::Circle(c) => c.radius,
            SketchEntity::Arc(a) => {
                let center = self.store.entity(a.center)?.as_point()?.position;
                let start = self.store.entity(a.start)?.as_point()?.position;
                Some(center.distance_to(start))
            }
            _ => None,
        }
    }

    pub fn conflicting_constraints(&self) -> Vec<crate::constraint::ConstraintId> {
        diagnostics::conflicting_constraints(&self.store)
    }

    pub fn entity_levels(&self) -> Vec<(EntityId, ConstraintLevel)> {
        diagnostics::entity_levels(&self.store)
    }

    pub fn export_graphviz(&self, clusters: &[Cluster], path: &std::path::Path) -> ConstraintResult<()> {
        diagnostics::export_graphviz(&self.store, clusters, path)
    }

    pub fn export_image(&self, width: Option<u32>, height: Option<u32>, path: &std::path::Path) -> ConstraintResult<()> {
        diagnostics::export_image(&self.store, width, height, path)
    }

    // ---- user-facing constraints ---------------------------------------

    fn add_wrapper(&mut self, kind: WrapperKind, element_a: EntityId, element_b: Option<EntityId>, value: f64) -> WrapperId {
        let id = self.store.add_wrapper(ConstraintWrapper::new(kind, element_a, element_b, value));
        resolver::resolve_to_fixed_point(&mut self.store);
        id
    }

    pub fn constrain_coincident(&mut self, a: EntityId, b: EntityId) -> WrapperId {
        self.add_wrapper(WrapperKind::Coincident, a, Some(b), 0.0)
    }

    pub fn constrain_distance(&mut self, a: EntityId, b: EntityId, distance: f64) -> WrapperId {
        self.add_wrapper(WrapperKind::Distance, a, Some(b), distance)
    }

    /// `Distance(curve, null, radius)`: the circle/arc-radius form.
    pub fn constrain_radius(&mut self, curve: EntityId, radius: f64) -> WrapperId {
        self.add_wrapper(WrapperKind::Distance, curve, None, radius)
    }

    pub fn constrain_angle(&mut self, line_a: EntityId, line_b: EntityId, radians: f64, use_supplementary: bool) -> WrapperId {
        self.add_wrapper(WrapperKind::Angle { use_supplementary }, line_a, Some(line_b), radians)
    }

    pub fn constrain_perpendicular(&mut self, a: EntityId, b: EntityId) -> WrapperId {
        self.add_wrapper(WrapperKind::Perpendicular, a, Some(b), 0.0)
    }

    pub fn constrain_parallel(&mut self, a: EntityId, b: EntityId) -> WrapperId {
        self.add_wrapper(WrapperKind::Parallel, a, Some(b), 0.0)
    }

    pub fn constrain_horizontal(&mut self, line: EntityId) -> WrapperId {
        let x_axis = self.x_axis;
        self.add_wrapper(WrapperKind::Horizontal, line, Some(x_axis), 0.0)
    }

    pub fn constrain_vertical(&mut self, line: EntityId) -> WrapperId {
        let y_axis = self.y_axis;
        self.add_wrapper(WrapperKind::Vertical, line, Some(y_axis), 0.0)
    }

    pub fn constrain_tangent(&mut self, line: EntityId, curve: EntityId) -> WrapperId {
        self.add_wrapper(WrapperKind::Tangent, line, Some(curve), 0.0)
    }

    pub fn constrain_ratio(&mut self, a: EntityId, b: EntityId, k: f64) -> WrapperId {
        self.add_wrapper(WrapperKind::Ratio { k }, a, Some(b), 0.0)
    }

    pub fn constrain_midpoint(&mut self, point: EntityId, line_or_arc: EntityId) -> WrapperId {
        self.add_wrapper(WrapperKind::Midpoint, point, Some(line_or_arc), 0.0)
    }

    pub fn constrain_equal(&mut self, a: EntityId, b: EntityId) -> WrapperId {
        self.add_wrapper(WrapperKind::Equal, a, Some(b), 0.0)
    }

    // ---- derived convenience operations ---------------------------------

    pub fn length(&mut self, line: EntityId, value: f64) -> WrapperId {
        self.constrain_radius(line, value)
    }

    pub fn diameter(&mut self, curve: EntityId, value: f64) -> WrapperId {
        self.constrain_radius(curve, value / 2.0)
    }

    pub fn angle_degrees(&mut self, line_a: EntityId, line_b: EntityId, degrees: f64, use_supplementary: bool) -> WrapperId {
        self.constrain_angle(line_a, line_b, degrees * PI / 180.0, use_supplementary)
    }

    /// Erects a short auxiliary line through `point` in direction `(dx, dy)`,
    /// pinned to `point` by a Distance-0 primitive, for the derived
    /// horizontal/vertical/projected-distance operations below (§4.3a):
    /// none of them has a primitive form of its own, so each is expressed as
    /// an angle/distance pair against a hidden helper line.
    fn auxiliary_line_through(&mut self, point: EntityId, dx: f64, dy: f64) -> ConstraintResult<EntityId> {
        let (x, y) = self.point(point).ok_or(ConstraintError::EntityNotFound(point))?;
        let aux = self.add_line(x, y, x + dx, y + dy)?;
        self.store.add_primitive(PrimitiveConstraint::new(PrimitiveKind::Distance, point, aux, 0.0));
        Ok(aux)
    }

    /// Distance from `point` to the Y axis, measured along X: erects a
    /// vertical auxiliary line through `point` and measures its distance to
    /// the Y axis.
    pub fn distance_horizontal(&mut self, point: EntityId, target_x: f64) -> ConstraintResult<WrapperId> {
        let aux = self.auxiliary_line_through(point, 0.0, 1.0)?;
        self.constrain_vertical(aux);
        let y_axis = self.y_axis;
        Ok(self.add_wrapper(WrapperKind::Distance, aux, Some(y_axis), target_x))
    }

    /// Distance from `point` to the X axis, measured along Y.
    pub fn distance_vertical(&mut self, point: EntityId, target_y: f64) -> ConstraintResult<WrapperId> {
        let aux = self.auxiliary_line_through(point, 1.0, 0.0)?;
        self.constrain_horizontal(aux);
        let x_axis = self.x_axis;
        Ok(self.add_wrapper(WrapperKind::Distance, aux, Some(x_axis), target_y))
    }

    /// Distance from `point` to `target` measured along `target`'s own
    /// normal: erects a helper line through `point` perpendicular to
    /// `target` and measures the distance between `point` and that helper's
    /// foot. Imprecise by construction for any configuration the solver
    /// hasn't already pinned `target`'s orientation for — see the note on
    /// derived operations in the design ledger.
    pub fn distance_projected(&mut self, point: EntityId, target: EntityId, distance: f64) -> ConstraintResult<WrapperId> {
        let anchor = self
            .store
            .entity(target)
            .and_then(SketchEntity::as_line)
            .ok_or_else(|| ConstraintError::InputRejected { reason: "distance_projected's target must be a line".into() })?
            .line
            .point_nearest_origin();
        let aux = self.add_line(anchor.x, anchor.y, anchor.x, anchor.y + 1.0)?;
        self.constrain_perpendicular(aux, target);
        Ok(self.add_wrapper(WrapperKind::Distance, point, Some(aux), distance))
    }

    // ---- solve ----------------------------------------------------------

    /// Runs the outer resolve/cluster/merge loop until every wrapper reaches
    /// `Solved`, per §4.4: each pass resolves whatever wrappers can now
    /// expand, rebuilds clusters over the current primitive graph, locally
    /// solves and merges them, then checks whether that unlocked any further
    /// resolution. Halts with `OverConstrained` the moment the clusterer
    /// tags a surplus primitive conflicting, and with `NonConvergent` once a
    /// pass makes no progress at all or `max_passes` is exhausted.
    pub fn solve(&mut self) -> ConstraintResult<SolveReport> {
        let mut passes = 0;
        loop {
            passes += 1;
            let resolved_progress = resolver::resolve_to_fixed_point(&mut self.store);

            let solved_before = self.store.primitives.values().filter(|c| c.solved).count();

            let mut clusters = cluster::build_clusters(&mut self.store);
            for c in clusters.iter_mut() {
                local_solve::solve_cluster(c)?;
            }
            let merged = merge::merge_all(clusters)?;
            self.commit(&merged);

            let solved_after = self.store.primitives.values().filter(|c| c.solved).count();
            let solve_progress = solved_after > solved_before;

            let conflicting = diagnostics::conflicting_constraints(&self.store);
            if !conflicting.is_empty() {
                return Err(ConstraintError::OverConstrained { constraint_ids: conflicting });
            }

            resolver::mark_solved_wrappers(&mut self.store);
            if resolver::all_wrappers_solved(&self.store) {
                return Ok(SolveReport { passes });
            }

            if !resolved_progress && !solve_progress {
                return Err(ConstraintError::NonConvergent {
                    reason: "no resolution or local-solve progress; remaining constraints cannot be reached".into(),
                });
            }
            if passes >= self.config.max_passes {
                return Err(ConstraintError::NonConvergent {
                    reason: "exceeded the configured outer pass limit".into(),
                });
            }
        }
    }

    fn commit(&mut self, merged: &Cluster) {
        for &id in &merged.entity_order {
            if let Some(e) = self.store.entity_mut(id) {
                *e = merged.entities[&id];
            }
            self.store.mark_solved(id);
        }
        for &id in &merged.constraint_order {
            if merged.constraints[&id].solved {
                if let Some(c) = self.store.primitives.get_mut(id) {
                    c.solved = true;
                }
            }
        }
    }
}

impl Default for Sketch {
    fn default() -> Self {
        Sketch::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn axis_aligned_square_meets_its_length_and_orientation_constraints() {
        let mut sketch = Sketch::new();
        let l0 = sketch.add_line(0.0, 0.0, 5.0, 0.1).unwrap();
        let l1 = sketch.add_line(5.0, 0.1, 5.2, 5.0).unwrap();
        let l2 = sketch.add_line(5.2, 5.0, 0.1, 5.1).unwrap();
        let l3 = sketch.add_line(0.1, 5.1, 0.0, 0.0).unwrap();

        let (l0_start, l0_end) = sketch.line_endpoints(l0).unwrap();
        let (l1_start, l1_end) = sketch.line_endpoints(l1).unwrap();
        let (l2_start, l2_end) = sketch.line_endpoints(l2).unwrap();
        let (l3_start, l3_end) = sketch.line_endpoints(l3).unwrap();

        sketch.make_fixed(l0_start);
        sketch.constrain_coincident(l0_end, l1_start);
        sketch.constrain_coincident(l1_end, l2_start);
        sketch.constrain_coincident(l2_end, l3_start);
        sketch.constrain_coincident(l3_end, l0_start);

        sketch.constrain_horizontal(l0);
        sketch.constrain_horizontal(l2);
        sketch.constrain_vertical(l1);
        sketch.constrain_vertical(l3);
        sketch.length(l0, 10.0);
        sketch.length(l1, 10.0);
        sketch.length(l2, 10.0);
        sketch.length(l3, 10.0);

        sketch.solve().unwrap();

        let corners = [
            (sketch.point(l0_start).unwrap(), (0.0, 0.0)),
            (sketch.point(l0_end).unwrap(), (10.0, 0.0)),
            (sketch.point(l1_end).unwrap(), (10.0, 10.0)),
            (sketch.point(l2_end).unwrap(), (0.0, 10.0)),
        ];
        for ((x, y), (expected_x, expected_y)) in corners {
            assert_abs_diff_eq!(x, expected_x, epsilon = 1e-6);
            assert_abs_diff_eq!(y, expected_y, epsilon = 1e-6);
        }
        assert_eq!(sketch.point(l3_end).unwrap(), sketch.point(l0_start).unwrap());
    }

    #[test]
    fn unit_circle_pinned_to_origin_lands_exactly_there() {
        let mut sketch = Sketch::new();
        let circle = sketch.add_circle(3.0, 4.0, 1.0);
        let center = sketch.center_of(circle).unwrap();
        let origin = sketch.origin;

        sketch.constrain_coincident(center, origin);
        sketch.diameter(circle, 10.0);
        sketch.solve().unwrap();

        assert_eq!(sketch.point(origin).unwrap(), (0.0, 0.0));
        assert_abs_diff_eq!(sketch.radius(circle).unwrap(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn line_tangent_to_fixed_circle_sits_one_radius_away() {
        let mut sketch = Sketch::new();
        let circle = sketch.add_circle(5.0, 0.0, 3.0);
        let center = sketch.center_of(circle).unwrap();
        sketch.make_fixed(center);

        let line = sketch.add_line(0.0, 0.1, 10.0, -0.1).unwrap();
        sketch.constrain_tangent(line, circle);
        sketch.solve().unwrap();

        let (a, b, c) = sketch.line_coefficients(line).unwrap();
        let (cx, cy) = sketch.point(center).unwrap();
        assert_abs_diff_eq!((a * cx + b * cy + c).abs(), 3.0, epsilon = 1e-6);
    }

    #[test]
    fn midpoint_lands_exactly_at_the_line_center() {
        let mut sketch = Sketch::new();
        let line = sketch.add_line(0.0, 0.0, 10.0, 0.0).unwrap();
        let (start, _end) = sketch.line_endpoints(line).unwrap();
        sketch.make_fixed(start);
        sketch.constrain_horizontal(line);
        sketch.length(line, 10.0);

        let mid = sketch.add_point(1.0, 1.0);
        sketch.constrain_midpoint(mid, line);
        sketch.solve().unwrap();

        let (mx, my) = sketch.point(mid).unwrap();
        assert_abs_diff_eq!(mx, 5.0, epsilon = 1e-6);
        assert_abs_diff_eq!(my, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn point_at_distance_and_angle_from_origin_lands_on_the_expected_ray() {
        let mut sketch = Sketch::new();
        let origin = sketch.origin;
        let x_axis = sketch.x_axis;
        let ray = sketch.add_line(0.0, 0.0, 1.0, 0.0).unwrap();
        let (ray_start, ray_end) = sketch.line_endpoints(ray).unwrap();
        sketch.constrain_coincident(ray_start, origin);
        sketch.length(ray, 7.0);
        sketch.angle_degrees(ray, x_axis, 90.0, false);
        sketch.solve().unwrap();

        let (ex, ey) = sketch.point(ray_end).unwrap();
        assert_abs_diff_eq!(ex, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(ey, 7.0, epsilon = 1e-6);
    }

    #[test]
    fn redundant_constraint_between_two_fixed_points_is_over_constrained() {
        let mut sketch = Sketch::new();
        let a = sketch.add_point(0.0, 0.0);
        let b = sketch.add_point(3.0, 4.0);
        sketch.make_fixed(a);
        sketch.make_fixed(b);
        // b is already at distance 5 from a; a second, incompatible Distance
        // constraint between two already-fixed points cannot be satisfied by
        // moving anything, so the clusterer must flag it as surplus.
        sketch.constrain_distance(a, b, 999.0);

        let err = sketch.solve().unwrap_err();
        assert!(matches!(err, ConstraintError::OverConstrained { .. }));
    }

    #[test]
    fn resolving_an_already_solved_sketch_again_is_a_no_op() {
        let mut sketch = Sketch::new();
        let circle = sketch.add_circle(1.0, 1.0, 1.0);
        let center = sketch.center_of(circle).unwrap();
        let origin = sketch.origin;
        sketch.constrain_coincident(center, origin);
        sketch.diameter(circle, 4.0);

        sketch.solve().unwrap();
        let before = sketch.point(origin).unwrap();
        sketch.solve().unwrap();
        let after = sketch.point(origin).unwrap();
        assert_eq!(before, after);
    }
}

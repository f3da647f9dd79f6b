//! Constraint resolver (C4): expands [`ConstraintWrapper`]s into primitive
//! Distance/Angle constraints as soon as the values they depend on (a
//! circle's radius, a line's length, a merged cluster's solved coordinates)
//! become available.
//!
//! [`resolve_to_fixed_point`] repeats a single pass over every Unresolved
//! wrapper until a pass makes no further progress, matching the fixed-point
//! loop described for the resolver. Resolution never re-emits primitives for
//! a wrapper that already produced them; a wrapper with dependencies that
//! aren't available yet is simply left Unresolved for the next pass (likely
//! after a local-solve/merge pass has updated `SketchStore::is_solved`).

use std::f64::consts::{FRAC_PI_2, PI};

use crate::constraint::{
    ConstraintId, PrimitiveConstraint, PrimitiveKind, ResolutionState, WrapperId, WrapperKind,
};
use crate::entity::{EntityId, SketchEntity};
use crate::store::SketchStore;

/// Runs resolution passes until one makes no progress. Returns whether any
/// pass resolved at least one wrapper.
pub fn resolve_to_fixed_point(store: &mut SketchStore) -> bool {
    let mut any_progress = false;
    loop {
        if resolve_pass(store) {
            any_progress = true;
        } else {
            break;
        }
    }
    any_progress
}

/// One pass over every currently-Unresolved wrapper. Returns whether any
/// wrapper resolved during this pass.
fn resolve_pass(store: &mut SketchStore) -> bool {
    let ids: Vec<WrapperId> = store
        .wrappers
        .iter()
        .filter(|(_, w)| w.state == ResolutionState::Unresolved)
        .map(|(id, _)| id)
        .collect();

    let mut progress = false;
    for id in ids {
        if try_resolve(store, id) {
            progress = true;
        }
    }
    progress
}

/// The point entity a curve's radius is measured from: a circle's or arc's
/// center, or the entity itself if it's already a point.
fn center_of(store: &SketchStore, id: EntityId) -> Option<EntityId> {
    match store.entity(id)? {
        SketchEntity::Circle(c) => Some(c.center),
        SketchEntity::Arc(a) => Some(a.center),
        SketchEntity::Point(_) => Some(id),
        SketchEntity::Line(_) => None,
    }
}

/// A curve's radius, if currently known: stored directly for a circle, or
/// derived from its solved center/start points for an arc (it has no stored
/// radius field; see the `Arc` type).
fn curve_radius(store: &SketchStore, curve: EntityId) -> Option<f64> {
    match store.entity(curve)? {
        SketchEntity::Circle(c) => c.radius,
        SketchEntity::Arc(a) => {
            if store.is_solved(a.center) && store.is_solved(a.start) {
                let center = store.entity(a.center)?.as_point()?.position;
                let start = store.entity(a.start)?.as_point()?.position;
                Some(center.distance_to(start))
            } else {
                None
            }
        }
        _ => None,
    }
}

/// A line's length, if currently known: either an explicit Distance
/// primitive already sits between its start and end points, or both
/// endpoints are already solved and the length can be measured directly.
fn line_length(store: &SketchStore, line: EntityId) -> Option<f64> {
    let l = store.entity(line)?.as_line()?;
    let explicit = store.primitives_on(l.start).find_map(|id| {
        let c = store.primitives[id];
        (c.kind == PrimitiveKind::Distance && c.touches(l.end)).then_some(c.value)
    });
    if explicit.is_some() {
        return explicit;
    }
    if store.is_solved(l.start) && store.is_solved(l.end) {
        let start = store.entity(l.start)?.as_point()?.position;
        let end = store.entity(l.end)?.as_point()?.position;
        return Some(start.distance_to(end));
    }
    None
}

/// The magnitude an Equal/Ratio wrapper propagates: a curve's radius or a
/// line's length, whichever applies to `id`.
fn magnitude_of(store: &SketchStore, id: EntityId) -> Option<f64> {
    match store.entity(id)? {
        SketchEntity::Circle(_) | SketchEntity::Arc(_) => curve_radius(store, id),
        SketchEntity::Line(_) => line_length(store, id),
        SketchEntity::Point(_) => None,
    }
}

/// Sets `id`'s magnitude to `value`: a scalar write for a circle's radius, a
/// primitive Distance between the defining child points otherwise.
fn apply_magnitude(store: &mut SketchStore, id: EntityId, value: f64, out: &mut Vec<ConstraintId>) {
    match store.entity(id) {
        Some(SketchEntity::Circle(_)) => {
            if let Some(c) = store.entity_mut(id).and_then(SketchEntity::as_circle_mut) {
                c.radius = Some(value);
            }
        }
        Some(SketchEntity::Arc(a)) => {
            let (center, start) = (a.center, a.start);
            out.push(store.add_primitive(PrimitiveConstraint::new(PrimitiveKind::Distance, center, start, value)));
        }
        Some(SketchEntity::Line(l)) => {
            let (start, end) = (l.start, l.end);
            out.push(store.add_primitive(PrimitiveConstraint::new(PrimitiveKind::Distance, start, end, value)));
        }
        _ => {}
    }
}

/// Attempts to resolve one wrapper. Returns whether it transitioned to
/// `Resolved` this call.
fn try_resolve(store: &mut SketchStore, id: WrapperId) -> bool {
    let w = store.wrappers[id].clone();
    let mut children: Vec<ConstraintId> = Vec::new();
    let mut resolved = false;

    match w.kind {
        WrapperKind::Coincident => {
            let b = w.element_b.expect("coincident constraint always has a second element");
            let a_is_line = matches!(store.entity(w.element_a), Some(SketchEntity::Line(_)));
            let b_is_line = matches!(store.entity(b), Some(SketchEntity::Line(_)));
            if a_is_line || b_is_line {
                let (point_side, line_side) = if a_is_line { (b, w.element_a) } else { (w.element_a, b) };
                let point_id = center_of(store, point_side).unwrap_or(point_side);
                children.push(store.add_primitive(PrimitiveConstraint::new(
                    PrimitiveKind::Distance,
                    point_id,
                    line_side,
                    0.0,
                )));
            } else {
                let a_plain_point = matches!(store.entity(w.element_a), Some(SketchEntity::Point(_)));
                let b_plain_point = matches!(store.entity(b), Some(SketchEntity::Point(_)));
                let pa = center_of(store, w.element_a).unwrap_or(w.element_a);
                let pb = center_of(store, b).unwrap_or(b);
                if a_plain_point && b_plain_point {
                    store.fuse_points(pa, pb);
                } else if pa != pb {
                    children.push(store.add_primitive(PrimitiveConstraint::new(PrimitiveKind::Distance, pa, pb, 0.0)));
                }
            }
            resolved = true;
        }

        WrapperKind::Distance => match w.element_b {
            None => match store.entity(w.element_a) {
                Some(SketchEntity::Line(l)) => {
                    let (start, end) = (l.start, l.end);
                    children.push(store.add_primitive(PrimitiveConstraint::new(
                        PrimitiveKind::Distance,
                        start,
                        end,
                        w.value,
                    )));
                    resolved = true;
                }
                Some(SketchEntity::Circle(_)) => {
                    if let Some(c) = store.entity_mut(w.element_a).and_then(SketchEntity::as_circle_mut) {
                        c.radius = Some(w.value);
                    }
                    resolved = true;
                }
                Some(SketchEntity::Arc(a)) => {
                    let (center, start) = (a.center, a.start);
                    children.push(store.add_primitive(PrimitiveConstraint::new(
                        PrimitiveKind::Distance,
                        center,
                        start,
                        w.value,
                    )));
                    resolved = true;
                }
                _ => {}
            },
            Some(b) => {
                let a_is_curve = matches!(
                    store.entity(w.element_a),
                    Some(SketchEntity::Circle(_)) | Some(SketchEntity::Arc(_))
                );
                let b_is_curve = matches!(store.entity(b), Some(SketchEntity::Circle(_)) | Some(SketchEntity::Arc(_)));
                if a_is_curve || b_is_curve {
                    let (curve_id, other) = if a_is_curve { (w.element_a, b) } else { (b, w.element_a) };
                    if let Some(r) = curve_radius(store, curve_id) {
                        let center = center_of(store, curve_id).expect("curve always has a center");
                        children.push(store.add_primitive(PrimitiveConstraint::new(
                            PrimitiveKind::Distance,
                            center,
                            other,
                            r + w.value,
                        )));
                        resolved = true;
                    }
                } else {
                    children.push(store.add_primitive(PrimitiveConstraint::new(
                        PrimitiveKind::Distance,
                        w.element_a,
                        b,
                        w.value,
                    )));
                    resolved = true;
                }
            }
        },

        WrapperKind::Angle { use_supplementary } => {
            let b = w.element_b.expect("angle constraint always has a second line");
            let value = if use_supplementary { PI - w.value } else { w.value };
            children.push(store.add_primitive(PrimitiveConstraint::new(PrimitiveKind::Angle, w.element_a, b, value)));
            resolved = true;
        }
        WrapperKind::Perpendicular => {
            let b = w.element_b.expect("perpendicular constraint always has a second line");
            children.push(store.add_primitive(PrimitiveConstraint::new(
                PrimitiveKind::Angle,
                w.element_a,
                b,
                FRAC_PI_2,
            )));
            resolved = true;
        }
        WrapperKind::Parallel => {
            let b = w.element_b.expect("parallel constraint always has a second line");
            children.push(store.add_primitive(PrimitiveConstraint::new(PrimitiveKind::Angle, w.element_a, b, 0.0)));
            resolved = true;
        }
        WrapperKind::Horizontal => {
            let axis = w.element_b.expect("horizontal constraint carries the sketch's X axis");
            children.push(store.add_primitive(PrimitiveConstraint::new(PrimitiveKind::Angle, w.element_a, axis, 0.0)));
            resolved = true;
        }
        WrapperKind::Vertical => {
            let axis = w.element_b.expect("vertical constraint carries the sketch's Y axis");
            children.push(store.add_primitive(PrimitiveConstraint::new(PrimitiveKind::Angle, w.element_a, axis, 0.0)));
            resolved = true;
        }

        WrapperKind::Tangent => {
            let b = w.element_b.expect("tangent constraint always has a second element");
            let (line_id, curve_id) = if matches!(store.entity(w.element_a), Some(SketchEntity::Line(_))) {
                (w.element_a, b)
            } else {
                (b, w.element_a)
            };
            if let Some(r) = curve_radius(store, curve_id) {
                let center = center_of(store, curve_id).expect("curve always has a center");
                children.push(store.add_primitive(PrimitiveConstraint::new(PrimitiveKind::Distance, line_id, center, r)));
                resolved = true;
            }
        }

        WrapperKind::Equal => {
            let b = w.element_b.expect("equal constraint always has a second element");
            let val_a = magnitude_of(store, w.element_a);
            let val_b = magnitude_of(store, b);
            match (val_a, val_b) {
                (Some(v), None) => {
                    apply_magnitude(store, b, v, &mut children);
                    resolved = true;
                }
                (None, Some(v)) => {
                    apply_magnitude(store, w.element_a, v, &mut children);
                    resolved = true;
                }
                (Some(_), Some(_)) => resolved = true,
                (None, None) => {}
            }
        }
        WrapperKind::Ratio { k } => {
            let b = w.element_b.expect("ratio constraint always has a second element");
            let val_a = magnitude_of(store, w.element_a);
            let val_b = magnitude_of(store, b);
            match (val_a, val_b) {
                (Some(v), None) => {
                    apply_magnitude(store, b, v * k, &mut children);
                    resolved = true;
                }
                (None, Some(v)) => {
                    apply_magnitude(store, w.element_a, v / k, &mut children);
                    resolved = true;
                }
                (Some(_), Some(_)) => resolved = true,
                (None, None) => {}
            }
        }

        WrapperKind::Midpoint => {
            let b = w.element_b.expect("midpoint constraint always has a line or arc");
            match store.entity(b) {
                Some(SketchEntity::Line(l)) => {
                    let (start, _end) = (l.start, l.end);
                    if let Some(length) = line_length(store, b) {
                        children.push(store.add_primitive(PrimitiveConstraint::new(
                            PrimitiveKind::Distance,
                            w.element_a,
                            b,
                            0.0,
                        )));
                        children.push(store.add_primitive(PrimitiveConstraint::new(
                            PrimitiveKind::Distance,
                            start,
                            w.element_a,
                            length / 2.0,
                        )));
                        resolved = true;
                    }
                }
                Some(SketchEntity::Arc(a)) => {
                    let (center, start, end) = (a.center, a.start, a.end);
                    if store.is_solved(center) && store.is_solved(start) && store.is_solved(end) {
                        let cpos = store.entity(center).unwrap().as_point().unwrap().position;
                        let spos = store.entity(start).unwrap().as_point().unwrap().position;
                        let epos = store.entity(end).unwrap().as_point().unwrap().position;
                        let radius = cpos.distance_to(spos);
                        let to_start = spos.minus(cpos).unit_vector().unwrap_or(crate::geometry::Vec2::new(1.0, 0.0));
                        let to_end = epos.minus(cpos).unit_vector().unwrap_or(to_start);
                        let dir = to_start.plus(to_end).unit_vector().unwrap_or(to_start);
                        let midpoint = cpos.plus(dir.scaled(radius));
                        children.push(store.add_primitive(PrimitiveConstraint::new(
                            PrimitiveKind::Distance,
                            center,
                            w.element_a,
                            radius,
                        )));
                        let chord = midpoint.distance_to(spos);
                        children.push(store.add_primitive(PrimitiveConstraint::new(
                            PrimitiveKind::Distance,
                            start,
                            w.element_a,
                            chord,
                        )));
                        resolved = true;
                    }
                }
                _ => {}
            }
        }
    }

    if resolved {
        let wrapper = &mut store.wrappers[id];
        wrapper.state = ResolutionState::Resolved;
        wrapper.primitive_children.extend(children);
    }
    resolved
}

/// Promotes every `Resolved` wrapper whose primitive children are all
/// individually solved (or which has none, the point-fusion case) to
/// `Solved`, per the Resolved/Solved distinction in the data model.
pub fn mark_solved_wrappers(store: &mut SketchStore) {
    let ids: Vec<WrapperId> = store
        .wrappers
        .iter()
        .filter(|(_, w)| w.state == ResolutionState::Resolved)
        .map(|(id, _)| id)
        .collect();
    for id in ids {
        let all_solved = store.wrappers[id]
            .primitive_children
            .iter()
            .all(|cid| store.primitives.get(*cid).map(|c| c.solved).unwrap_or(false));
        if all_solved {
            store.wrappers[id].state = ResolutionState::Solved;
        }
    }
}

/// Whether every wrapper in the store has reached `Solved`.
pub fn all_wrappers_solved(store: &SketchStore) -> bool {
    store.wrappers.values().all(|w| w.state == ResolutionState::Solved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::ConstraintWrapper;
    use crate::entity::{ConstraintLevel, SketchCircle, SketchLine, SketchPoint};
    use crate::geometry::{Line2, Vec2};

    fn point(store: &mut SketchStore, x: f64, y: f64) -> EntityId {
        store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::new(x, y))))
    }

    #[test]
    fn distance_between_two_points_resolves_immediately() {
        let mut store = SketchStore::new();
        let a = point(&mut store, 0.0, 0.0);
        let b = point(&mut store, 1.0, 0.0);
        let wrapper_id = store.add_wrapper(ConstraintWrapper::new(WrapperKind::Distance, a, Some(b), 5.0));

        assert!(resolve_to_fixed_point(&mut store));
        let w = &store.wrappers[wrapper_id];
        assert_eq!(w.state, ResolutionState::Resolved);
        assert_eq!(w.primitive_children.len(), 1);
        assert_eq!(store.primitives[w.primitive_children[0]].value, 5.0);
    }

    #[test]
    fn coincident_two_points_fuses_without_emitting_a_primitive() {
        let mut store = SketchStore::new();
        let a = point(&mut store, 0.0, 0.0);
        let b = point(&mut store, 1.0, 1.0);
        let wrapper_id = store.add_wrapper(ConstraintWrapper::new(WrapperKind::Coincident, a, Some(b), 0.0));

        resolve_to_fixed_point(&mut store);
        assert!(store.wrappers[wrapper_id].primitive_children.is_empty());
        assert_eq!(store.entities.len(), 1);
    }

    #[test]
    fn coincident_point_and_line_emits_distance_zero_primitive() {
        let mut store = SketchStore::new();
        let start = point(&mut store, 0.0, 0.0);
        let end = point(&mut store, 1.0, 0.0);
        let line = Line2::through_points(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)).unwrap();
        let line_id = store.add_entity(SketchEntity::Line(SketchLine {
            line,
            start,
            end,
            level: ConstraintLevel::Under,
        }));
        let p = point(&mut store, 3.0, 3.0);
        let wrapper_id = store.add_wrapper(ConstraintWrapper::new(WrapperKind::Coincident, p, Some(line_id), 0.0));

        resolve_to_fixed_point(&mut store);
        let w = &store.wrappers[wrapper_id];
        assert_eq!(w.primitive_children.len(), 1);
        let primitive = store.primitives[w.primitive_children[0]];
        assert_eq!(primitive.value, 0.0);
        assert!(primitive.touches(line_id));
        assert!(primitive.touches(p));
    }

    #[test]
    fn tangent_waits_for_circle_radius_then_resolves() {
        let mut store = SketchStore::new();
        let center = point(&mut store, 5.0, 0.0);
        let circle_id = store.add_entity(SketchEntity::Circle(SketchCircle {
            center,
            radius: None,
            level: ConstraintLevel::Under,
        }));
        let start = point(&mut store, 0.0, 0.0);
        let end = point(&mut store, 10.0, 0.0);
        let line = Line2::through_points(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)).unwrap();
        let line_id = store.add_entity(SketchEntity::Line(SketchLine {
            line,
            start,
            end,
            level: ConstraintLevel::Under,
        }));
        let tangent_id = store.add_wrapper(ConstraintWrapper::new(WrapperKind::Tangent, line_id, Some(circle_id), 0.0));

        // Radius not yet known: the tangent constraint cannot resolve.
        assert!(!resolve_to_fixed_point(&mut store));
        assert_eq!(store.wrappers[tangent_id].state, ResolutionState::Unresolved);

        // Radius becomes known.
        store.add_wrapper(ConstraintWrapper::new(WrapperKind::Distance, circle_id, None, 3.0));
        assert!(resolve_to_fixed_point(&mut store));
        let w = &store.wrappers[tangent_id];
        assert_eq!(w.state, ResolutionState::Resolved);
        let primitive = store.primitives[w.primitive_children[0]];
        assert_eq!(primitive.value, 3.0);
    }

    #[test]
    fn mark_solved_wrappers_promotes_once_children_are_solved() {
        let mut store = SketchStore::new();
        let a = point(&mut store, 0.0, 0.0);
        let b = point(&mut store, 1.0, 0.0);
        let wrapper_id = store.add_wrapper(ConstraintWrapper::new(WrapperKind::Distance, a, Some(b), 1.0));
        resolve_to_fixed_point(&mut store);
        assert!(!all_wrappers_solved(&store));

        let child = store.wrappers[wrapper_id].primitive_children[0];
        store.primitives[child].solved = true;
        mark_solved_wrappers(&mut store);
        assert_eq!(store.wrappers[wrapper_id].state, ResolutionState::Solved);
        assert!(all_wrappers_solved(&store));
    }
}

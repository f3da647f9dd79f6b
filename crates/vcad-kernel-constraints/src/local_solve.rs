//! Local cluster solver (C6): given one closed [`Cluster`], pins its first
//! entity where it already sits, solves its pair partner from the single
//! seed constraint, then sweeps the remaining entities one at a time from
//! whichever two unsolved constraints reach them, dispatching to the
//! two-constraint construction primitives in [`crate::construct`].

use std::collections::HashSet;

use crate::cluster::Cluster;
use crate::constraint::{ConstraintId, PrimitiveConstraint, PrimitiveKind};
use crate::construct;
use crate::entity::{EntityId, SketchEntity};
use crate::error::ConstraintError;
use crate::geometry::{Line2, Vec2};
use crate::tolerance::TOLERANCE;

/// A primitive constraint's "other side" reduced to the shape the
/// construction primitives expect: a point's position, or a line.
enum RefKind {
    Point(Vec2),
    Line(Line2),
}

fn ref_kind(cluster: &Cluster, id: EntityId) -> RefKind {
    match cluster.entities.get(&id).expect("cluster entity referenced by its own constraint") {
        SketchEntity::Point(p) => RefKind::Point(p.position),
        SketchEntity::Line(l) => RefKind::Line(l.line),
        other => panic!("primitive constraints never reference a {other:?} directly, only its child points"),
    }
}

fn nonconvergent(reason: impl Into<String>) -> ConstraintError {
    ConstraintError::NonConvergent { reason: reason.into() }
}

fn to_nonconvergent(reason: String) -> ConstraintError {
    ConstraintError::NonConvergent { reason }
}

fn point_position(cluster: &Cluster, id: EntityId) -> Vec2 {
    cluster.entities[&id]
        .as_point()
        .expect("expected a point entity")
        .position
}

fn line_of(cluster: &Cluster, id: EntityId) -> Line2 {
    cluster.entities[&id].as_line().expect("expected a line entity").line
}

fn set_point(cluster: &mut Cluster, id: EntityId, position: Vec2) {
    if let Some(p) = cluster.entities.get_mut(&id).and_then(SketchEntity::as_point_mut) {
        p.position = position;
    }
}

fn set_line(cluster: &mut Cluster, id: EntityId, line: Line2) {
    if let Some(l) = cluster.entities.get_mut(&id).and_then(SketchEntity::as_line_mut) {
        l.line = line;
    }
}

/// Solves `cluster` in place. Cluster 0 (the base cluster) holds only
/// already-fixed entities, so there is nothing to construct — its
/// constraints are marked solved directly and verified, which catches the
/// case of a user fixing two entities with an incompatible constraint
/// between them. Non-base clusters with fewer than two entities need no
/// solving either.
pub fn solve_cluster(cluster: &mut Cluster) -> Result<(), ConstraintError> {
    if cluster.id == 0 {
        for id in cluster.constraint_order.clone() {
            mark_solved(cluster, id);
        }
        return verify_all_met(cluster);
    }
    if cluster.entity_order.len() < 2 {
        return Ok(());
    }

    let first = cluster.entity_order[0];
    let second = cluster.entity_order[1];

    let seed_id = cluster
        .constraint_order
        .iter()
        .copied()
        .find(|id| {
            let c = cluster.constraints[id];
            c.touches(first) && c.touches(second)
        })
        .ok_or_else(|| nonconvergent("cluster has no seed constraint connecting its first two entities"))?;

    solve_one_from_single(cluster, first, second, seed_id)?;
    mark_solved(cluster, seed_id);

    let mut solved: HashSet<EntityId> = HashSet::new();
    solved.insert(first);
    solved.insert(second);

    for entity in cluster.entity_order[2..].to_vec() {
        if solved_constraint_count(cluster, entity) >= 2 {
            solved.insert(entity);
            continue;
        }

        let unsolved: Vec<ConstraintId> = cluster
            .constraint_order
            .iter()
            .copied()
            .filter(|id| {
                let c = cluster.constraints[id];
                !c.solved && c.touches(entity)
            })
            .collect();
        if unsolved.len() < 2 {
            return Err(nonconvergent(format!(
                "entity has only {} unsolved constraint(s) in its cluster, needs two",
                unsolved.len()
            )));
        }
        let (id1, id2) = (unsolved[0], unsolved[1]);
        solve_entity_from_two(cluster, entity, id1, id2)?;
        mark_solved(cluster, id1);
        mark_solved(cluster, id2);
        solved.insert(entity);
    }

    verify_all_met(cluster)
}

fn mark_solved(cluster: &mut Cluster, id: ConstraintId) {
    if let Some(c) = cluster.constraints.get_mut(&id) {
        c.solved = true;
    }
}

fn solved_constraint_count(cluster: &Cluster, entity: EntityId) -> usize {
    cluster
        .constraint_order
        .iter()
        .filter(|id| {
            let c = cluster.constraints[*id];
            c.solved && c.touches(entity)
        })
        .count()
}

/// Solves `target` from a single constraint against `fixed`, which keeps its
/// current cluster-local position.
fn solve_one_from_single(
    cluster: &mut Cluster,
    fixed: EntityId,
    target: EntityId,
    seed_id: ConstraintId,
) -> Result<(), ConstraintError> {
    let seed = cluster.constraints[&seed_id];
    let is_target_point = matches!(cluster.entities[&target], SketchEntity::Point(_));

    if is_target_point {
        let current = point_position(cluster, target);
        let reference = match ref_kind(cluster, fixed) {
            RefKind::Point(p) => p,
            RefKind::Line(l) => l.nearest_point(current),
        };
        let new_pos = construct::point_from_single_distance(current, reference, seed.value).map_err(to_nonconvergent)?;
        set_point(cluster, target, new_pos);
    } else {
        let current_line = line_of(cluster, target);
        let new_line = match ref_kind(cluster, fixed) {
            RefKind::Line(other) => construct::line_from_single_angle(current_line, other, seed.value),
            RefKind::Point(p) => construct::line_from_single_distance(current_line, p, seed.value),
        };
        set_line(cluster, target, new_line);
    }
    Ok(())
}

/// Solves `entity` from two already-chosen primitives touching it.
fn solve_entity_from_two(
    cluster: &mut Cluster,
    entity: EntityId,
    id1: ConstraintId,
    id2: ConstraintId,
) -> Result<(), ConstraintError> {
    let c1 = cluster.constraints[&id1];
    let c2 = cluster.constraints[&id2];
    let is_point = matches!(cluster.entities[&entity], SketchEntity::Point(_));

    if is_point {
        let current = point_position(cluster, entity);
        let new_pos = solve_point_from_two(cluster, entity, c1, c2, current)?;
        set_point(cluster, entity, new_pos);
    } else {
        let current = line_of(cluster, entity);
        let new_line = solve_line_from_two(cluster, entity, c1, c2, current)?;
        set_line(cluster, entity, new_line);
    }
    Ok(())
}

fn solve_point_from_two(
    cluster: &Cluster,
    entity: EntityId,
    c1: PrimitiveConstraint,
    c2: PrimitiveConstraint,
    current: Vec2,
) -> Result<Vec2, ConstraintError> {
    let other1 = c1.other(entity).expect("constraint touches entity");
    let other2 = c2.other(entity).expect("constraint touches entity");
    match (ref_kind(cluster, other1), ref_kind(cluster, other2)) {
        (RefKind::Point(p1), RefKind::Point(p2)) => {
            construct::point_from_two_points(p1, c1.value, p2, c2.value, current).map_err(to_nonconvergent)
        }
        (RefKind::Point(p), RefKind::Line(l)) => {
            construct::point_from_point_line(p, c1.value, l, c2.value, current).map_err(to_nonconvergent)
        }
        (RefKind::Line(l), RefKind::Point(p)) => {
            construct::point_from_point_line(p, c2.value, l, c1.value, current).map_err(to_nonconvergent)
        }
        (RefKind::Line(l1), RefKind::Line(l2)) => {
            construct::point_from_two_lines(l1, c1.value, l2, c2.value, current).map_err(to_nonconvergent)
        }
    }
}

fn solve_line_from_two(
    cluster: &Cluster,
    entity: EntityId,
    c1: PrimitiveConstraint,
    c2: PrimitiveConstraint,
    current: Line2,
) -> Result<Line2, ConstraintError> {
    let other1 = c1.other(entity).expect("constraint touches entity");
    let other2 = c2.other(entity).expect("constraint touches entity");

    let (angle_c, angle_other, dist_c, dist_other) = if c1.kind == PrimitiveKind::Angle {
        (c1, other1, c2, other2)
    } else if c2.kind == PrimitiveKind::Angle {
        (c2, other2, c1, other1)
    } else {
        let p1 = match ref_kind(cluster, other1) {
            RefKind::Point(p) => p,
            RefKind::Line(_) => return Err(nonconvergent("two-distance line construction needs two point references")),
        };
        let p2 = match ref_kind(cluster, other2) {
            RefKind::Point(p) => p,
            RefKind::Line(_) => return Err(nonconvergent("two-distance line construction needs two point references")),
        };
        return construct::line_from_two_points(current, p1, c1.value, p2, c2.value).map_err(to_nonconvergent);
    };

    let other_line = match ref_kind(cluster, angle_other) {
        RefKind::Line(l) => l,
        RefKind::Point(_) => return Err(nonconvergent("angle constraint on a line must reference another line")),
    };
    let point = match ref_kind(cluster, dist_other) {
        RefKind::Point(p) => p,
        RefKind::Line(l) => l.nearest_point(current.point_nearest_origin()),
    };
    Ok(construct::line_from_angle_distance(current, other_line, angle_c.value, point, dist_c.value))
}

/// Checks every constraint in the cluster is met within tolerance, per the
/// post-sweep verification step.
fn verify_all_met(cluster: &Cluster) -> Result<(), ConstraintError> {
    for id in &cluster.constraint_order {
        let c = cluster.constraints[id];
        let ok = match c.kind {
            PrimitiveKind::Distance => {
                let measured = measured_distance(cluster, c.element_a, c.element_b);
                (measured - c.value).abs() <= TOLERANCE
            }
            PrimitiveKind::Angle => {
                let measured = measured_angle(cluster, c.element_a, c.element_b);
                let diff = (measured - c.value).abs() % std::f64::consts::PI;
                diff.min(std::f64::consts::PI - diff) <= TOLERANCE
            }
        };
        if !ok {
            return Err(nonconvergent(format!(
                "{} constraint not met after local solve (target {})",
                c.kind, c.value
            )));
        }
    }
    Ok(())
}

fn measured_distance(cluster: &Cluster, a: EntityId, b: EntityId) -> f64 {
    match (ref_kind(cluster, a), ref_kind(cluster, b)) {
        (RefKind::Point(p1), RefKind::Point(p2)) => p1.distance_to(p2),
        (RefKind::Point(p), RefKind::Line(l)) | (RefKind::Line(l), RefKind::Point(p)) => {
            l.signed_distance_to_point(p).abs()
        }
        (RefKind::Line(l1), RefKind::Line(l2)) => l1.heuristic_distance_to(l2).abs(),
    }
}

fn measured_angle(cluster: &Cluster, a: EntityId, b: EntityId) -> f64 {
    match (ref_kind(cluster, a), ref_kind(cluster, b)) {
        (RefKind::Line(l1), RefKind::Line(l2)) => l1.angle_to_line(l2),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::PrimitiveConstraint;
    use crate::entity::SketchPoint;
    use approx::assert_abs_diff_eq;

    fn cluster_with_points(id: usize, positions: &[(f64, f64)]) -> (Cluster, Vec<EntityId>) {
        let mut store = crate::store::SketchStore::new();
        let mut ids = Vec::new();
        for &(x, y) in positions {
            ids.push(store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::new(x, y)))));
        }
        let mut cluster = Cluster::new(id);
        for &entity_id in &ids {
            cluster.add_entity(entity_id, *store.entity(entity_id).unwrap());
        }
        (cluster, ids)
    }

    /// Mints distinct `ConstraintId`s for constraints built directly against
    /// a `Cluster` in tests, bypassing the `SketchStore`/clusterer pipeline.
    fn constraint_ids() -> slotmap::SlotMap<ConstraintId, ()> {
        slotmap::SlotMap::with_key()
    }

    #[test]
    fn seed_pair_solves_second_point_from_single_distance() {
        let (mut cluster, ids) = cluster_with_points(1, &[(0.0, 0.0), (2.0, 0.0)]);
        let mut minter = constraint_ids();
        let seed_id = minter.insert(());
        let seed = PrimitiveConstraint::new(PrimitiveKind::Distance, ids[0], ids[1], 5.0);
        cluster.add_constraint(seed_id, seed);

        solve_cluster(&mut cluster).unwrap();
        let solved = cluster.entities[&ids[1]].as_point().unwrap().position;
        assert_abs_diff_eq!(solved.x, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(solved.y, 0.0, epsilon = 1e-9);
        assert!(cluster.constraints[&seed_id].solved);
    }

    #[test]
    fn sweep_solves_third_point_from_two_distances() {
        let (mut cluster, ids) = cluster_with_points(1, &[(0.0, 0.0), (10.0, 0.0), (5.0, 1.0)]);
        let mut minter = constraint_ids();
        let seed = PrimitiveConstraint::new(PrimitiveKind::Distance, ids[0], ids[1], 10.0);
        cluster.add_constraint(minter.insert(()), seed);
        let d1 = PrimitiveConstraint::new(PrimitiveKind::Distance, ids[0], ids[2], 5.0);
        let d2 = PrimitiveConstraint::new(PrimitiveKind::Distance, ids[1], ids[2], 5.0);
        cluster.add_constraint(minter.insert(()), d1);
        cluster.add_constraint(minter.insert(()), d2);

        solve_cluster(&mut cluster).unwrap();
        let solved = cluster.entities[&ids[2]].as_point().unwrap().position;
        // Equidistant from (0,0) and (10,0) puts the point on x = 5.
        assert_abs_diff_eq!(solved.x, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn entity_with_one_connecting_constraint_is_nonconvergent() {
        let (mut cluster, ids) = cluster_with_points(1, &[(0.0, 0.0), (10.0, 0.0), (5.0, 1.0)]);
        let mut minter = constraint_ids();
        let seed = PrimitiveConstraint::new(PrimitiveKind::Distance, ids[0], ids[1], 10.0);
        cluster.add_constraint(minter.insert(()), seed);
        let d1 = PrimitiveConstraint::new(PrimitiveKind::Distance, ids[0], ids[2], 5.0);
        cluster.add_constraint(minter.insert(()), d1);

        assert!(solve_cluster(&mut cluster).is_err());
    }

    #[test]
    fn base_cluster_is_left_untouched() {
        let (mut cluster, ids) = cluster_with_points(0, &[(1.0, 2.0)]);
        solve_cluster(&mut cluster).unwrap();
        let p = cluster.entities[&ids[0]].as_point().unwrap().position;
        assert_abs_diff_eq!(p.x, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y, 2.0, epsilon = 1e-9);
    }
}

//! Cluster merger (C7): rigidly aligns clusters sharing one, two, or three
//! entities onto a single growing rigid body (cluster 0), until every
//! cluster has been folded in.
//!
//! Clusters never move their shared entities by anything other than a rigid
//! motion (rotation about the origin followed by translation); this is what
//! lets two independently-solved clusters agree on where their common
//! entities sit.

use crate::cluster::Cluster;
use crate::entity::{EntityId, SketchEntity};
use crate::error::ConstraintError;
use crate::geometry::{Line2, Vec2};
use crate::tolerance::TOLERANCE;

fn nonconvergent(reason: impl Into<String>) -> ConstraintError {
    ConstraintError::NonConvergent { reason: reason.into() }
}

fn to_nonconvergent(reason: String) -> ConstraintError {
    ConstraintError::NonConvergent { reason }
}

fn is_line(cluster: &Cluster, id: EntityId) -> bool {
    matches!(cluster.entities.get(&id), Some(SketchEntity::Line(_)))
}

/// A representative position for an entity: its own coordinates for a
/// point, or its closest-to-origin point for a line.
fn position_of(cluster: &Cluster, id: EntityId) -> Vec2 {
    match &cluster.entities[&id] {
        SketchEntity::Point(p) => p.position,
        SketchEntity::Line(l) => l.line.point_nearest_origin(),
        _ => Vec2::ZERO,
    }
}

fn apply_transform(cluster: &mut Cluster, theta: f64, translation: Vec2) {
    for entity in cluster.entities.values_mut() {
        match entity {
            SketchEntity::Point(p) => p.position = p.position.rotated(theta).plus(translation),
            SketchEntity::Line(l) => {
                let rotated: Line2 = l.line.rotated(theta);
                l.line = rotated.translated(translation.x, translation.y);
            }
            SketchEntity::Circle(_) | SketchEntity::Arc(_) => {}
        }
    }
}

fn rotate_about(cluster: &mut Cluster, pivot: Vec2, theta: f64) {
    apply_transform(cluster, 0.0, pivot.scaled(-1.0));
    apply_transform(cluster, theta, Vec2::ZERO);
    apply_transform(cluster, 0.0, pivot);
}

/// Copies every entity and constraint of `other` into `base`, assuming
/// `other` has already been rigidly aligned so its shared entities coincide
/// with `base`'s.
fn commit(base: &mut Cluster, other: &Cluster) {
    for &id in &other.entity_order {
        base.add_entity(id, other.entities[&id]);
    }
    for &id in &other.constraint_order {
        base.add_constraint(id, other.constraints[&id]);
    }
}

fn verify_shared(base: &Cluster, other: &Cluster, shared: &[EntityId]) -> Result<(), ConstraintError> {
    for &id in shared {
        match (&base.entities[&id], &other.entities[&id]) {
            (SketchEntity::Point(p1), SketchEntity::Point(p2)) => {
                if p1.position.distance_to(p2.position) > TOLERANCE {
                    return Err(nonconvergent("merged clusters disagree on a shared point's position"));
                }
            }
            (SketchEntity::Line(l1), SketchEntity::Line(l2)) => {
                let da = (l1.line.a() - l2.line.a()).abs();
                let db = (l1.line.b() - l2.line.b()).abs();
                let dc = (l1.line.c() - l2.line.c()).abs();
                if da > TOLERANCE || db > TOLERANCE || dc > TOLERANCE {
                    return Err(nonconvergent("merged clusters disagree on a shared line's coefficients"));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Aligns `moving` onto `base` through their single shared entity `shared`,
/// by translation alone if it's a point, or by rotating the lines parallel
/// first if it's a line.
fn align_on_one(base: &Cluster, moving: &mut Cluster, shared: EntityId) {
    let theta = if is_line(base, shared) {
        let base_line = base.entities[&shared].as_line().expect("checked is_line").line;
        let moving_line = moving.entities[&shared].as_line().expect("checked is_line").line;
        moving_line.angle_to_line(base_line)
    } else {
        0.0
    };
    apply_transform(moving, theta, Vec2::ZERO);
    let translation = position_of(base, shared).minus(position_of(moving, shared));
    apply_transform(moving, 0.0, translation);
}

/// Rigidly aligns `other` onto `base` through two shared entities and folds
/// it in. Prefers `shared[0]` to be a point; fails if both shared entities
/// are lines (their relative position can't be pinned by two parallel
/// constraints alone).
pub fn two_entity_merge(base: &mut Cluster, other: &mut Cluster, shared: &[EntityId]) -> Result<(), ConstraintError> {
    if shared.len() < 2 {
        return Err(nonconvergent("two-entity merge needs two shared entities"));
    }
    let (mut a, mut b) = (shared[0], shared[1]);
    if is_line(base, a) && !is_line(base, b) {
        std::mem::swap(&mut a, &mut b);
    }
    if is_line(base, a) && is_line(base, b) {
        return Err(nonconvergent("two-entity merge cannot align two shared lines"));
    }

    let theta = if is_line(base, b) {
        let base_line = base.entities[&b].as_line().expect("checked is_line").line;
        let other_line = other.entities[&b].as_line().expect("checked is_line").line;
        other_line.angle_to_line(base_line)
    } else {
        let base_a = position_of(base, a);
        let base_b = position_of(base, b);
        let other_a = position_of(other, a);
        let other_b = position_of(other, b);
        other_b.minus(other_a).angle_to(base_b.minus(base_a))
    };
    apply_transform(other, theta, Vec2::ZERO);
    let translation = position_of(base, a).minus(position_of(other, a));
    apply_transform(other, 0.0, translation);

    verify_shared(base, other, shared)?;
    commit(base, other);
    Ok(())
}

/// Folds `other` into `base` by translation alone through a single shared
/// entity, used when no richer merge is available (§4.7 step 4).
pub fn one_entity_merge(base: &mut Cluster, other: &mut Cluster, shared: EntityId) -> Result<(), ConstraintError> {
    align_on_one(base, other, shared);
    commit(base, other);
    Ok(())
}

/// Merges two clusters that each share exactly one entity with `base` and
/// one entity with each other (three distinct shared entities total). `base`
/// is always treated as the alignment root, a simplification of the general
/// "prefer most lines" rule since `base` here is always the already-settled
/// growing rigid body.
pub fn three_cluster_merge(
    base: &mut Cluster,
    first: &mut Cluster,
    second: &mut Cluster,
    shared_base_first: EntityId,
    shared_base_second: EntityId,
    shared_first_second: EntityId,
) -> Result<(), ConstraintError> {
    align_on_one(base, first, shared_base_first);
    align_on_one(base, second, shared_base_second);

    let third = shared_first_second;
    if is_line(first, third) {
        // Spec'd fallback: when the third shared entity is a line, a pure
        // translation pivot is used rather than rotating about a point.
        let translation = position_of(first, third).minus(position_of(second, third));
        apply_transform(second, 0.0, translation);
    } else {
        let anchor_first = position_of(first, shared_base_first);
        let anchor_second = position_of(second, shared_base_second);
        let r1 = anchor_first.distance_to(position_of(first, third));
        let r2 = anchor_second.distance_to(position_of(second, third));
        let current = position_of(first, third).plus(position_of(second, third)).scaled(0.5);
        let solved = crate::construct::point_from_two_points(anchor_first, r1, anchor_second, r2, current)
            .map_err(to_nonconvergent)?;

        let first_theta = position_of(first, third).minus(anchor_first).angle_to(solved.minus(anchor_first));
        rotate_about(first, anchor_first, first_theta);
        let second_theta = position_of(second, third).minus(anchor_second).angle_to(solved.minus(anchor_second));
        rotate_about(second, anchor_second, second_theta);
    }

    verify_shared(base, first, &[shared_base_first])?;
    verify_shared(base, second, &[shared_base_second])?;
    verify_shared(first, second, &[third])?;

    commit(base, first);
    commit(base, second);
    Ok(())
}

/// Finds a cluster other than `base` sharing at least two entities with it.
fn find_two_entity_candidate(base: &Cluster, clusters: &[Cluster]) -> Option<(usize, Vec<EntityId>)> {
    clusters.iter().enumerate().find_map(|(i, c)| {
        let shared = base.shared_entities(c);
        (shared.len() >= 2).then_some((i, shared))
    })
}

/// Finds two clusters, each sharing exactly one entity with `base` and
/// exactly one with each other, with all three shared entities distinct.
fn find_three_cluster_candidate(base: &Cluster, clusters: &[Cluster]) -> Option<(usize, usize, EntityId, EntityId, EntityId)> {
    for i in 0..clusters.len() {
        let shared_i = base.shared_entities(&clusters[i]);
        if shared_i.len() != 1 {
            continue;
        }
        for j in (i + 1)..clusters.len() {
            let shared_j = base.shared_entities(&clusters[j]);
            if shared_j.len() != 1 {
                continue;
            }
            let shared_ij = clusters[i].shared_entities(&clusters[j]);
            if shared_ij.len() != 1 {
                continue;
            }
            let (a, b, c) = (shared_i[0], shared_j[0], shared_ij[0]);
            if a != b && a != c && b != c {
                return Some((i, j, a, b, c));
            }
        }
    }
    None
}

/// Folds every cluster into cluster 0 (`clusters[0]`, assumed already
/// locally solved) following §4.7's priority: two-entity merges first, then
/// three-cluster merges, then a translation-only fallback.
pub fn merge_all(mut clusters: Vec<Cluster>) -> Result<Cluster, ConstraintError> {
    if clusters.is_empty() {
        return Err(nonconvergent("no clusters to merge"));
    }
    let mut base = clusters.remove(0);

    while !clusters.is_empty() {
        if let Some((i, shared)) = find_two_entity_candidate(&base, &clusters) {
            let mut other = clusters.remove(i);
            two_entity_merge(&mut base, &mut other, &shared)?;
            continue;
        }

        if let Some((i, j, shared_bi, shared_bj, shared_ij)) = find_three_cluster_candidate(&base, &clusters) {
            let mut second = clusters.remove(j);
            let mut first = clusters.remove(i);
            three_cluster_merge(&mut base, &mut first, &mut second, shared_bi, shared_bj, shared_ij)?;
            continue;
        }

        if let Some(i) = clusters
            .iter()
            .position(|c| !base.shared_entities(c).is_empty())
        {
            let shared = base.shared_entities(&clusters[i])[0];
            let mut other = clusters.remove(i);
            one_entity_merge(&mut base, &mut other, shared)?;
            continue;
        }

        return Err(nonconvergent("remaining clusters share no entities with the merged body"));
    }

    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::SketchPoint;

    fn cluster_with_points(id: usize, positions: &[(EntityId, f64, f64)]) -> Cluster {
        let mut cluster = Cluster::new(id);
        for &(entity_id, x, y) in positions {
            cluster.add_entity(entity_id, SketchEntity::Point(SketchPoint::new(Vec2::new(x, y))));
        }
        cluster
    }

    #[test]
    fn two_entity_merge_aligns_shared_points() {
        let mut store = crate::store::SketchStore::new();
        let a = store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::ZERO)));
        let b = store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::ZERO)));
        let c = store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::ZERO)));

        let mut base = cluster_with_points(0, &[(a, 0.0, 0.0), (b, 10.0, 0.0)]);
        let mut other = cluster_with_points(1, &[(a, 0.0, 0.0), (b, 0.0, 10.0), (c, 0.0, 20.0)]);

        two_entity_merge(&mut base, &mut other, &[a, b]).unwrap();
        let merged_c = base.entities[&c].as_point().unwrap().position;
        assert!((merged_c.x - 20.0).abs() < 1e-6 || (merged_c.x + 20.0).abs() < 1e-6);
    }

    #[test]
    fn one_entity_merge_translates_only() {
        let mut store = crate::store::SketchStore::new();
        let a = store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::ZERO)));
        let d = store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::ZERO)));

        let mut base = cluster_with_points(0, &[(a, 5.0, 5.0)]);
        let mut other = cluster_with_points(1, &[(a, 0.0, 0.0), (d, 1.0, 0.0)]);

        one_entity_merge(&mut base, &mut other, a).unwrap();
        let merged_d = base.entities[&d].as_point().unwrap().position;
        assert!((merged_d.x - 6.0).abs() < 1e-6);
        assert!((merged_d.y - 5.0).abs() < 1e-6);
    }

    #[test]
    fn merge_all_folds_every_cluster_into_the_base() {
        let mut store = crate::store::SketchStore::new();
        let a = store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::ZERO)));
        let b = store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::ZERO)));
        let c = store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::ZERO)));

        let base = cluster_with_points(0, &[(a, 0.0, 0.0), (b, 10.0, 0.0)]);
        let other = cluster_with_points(1, &[(a, 0.0, 0.0), (b, 0.0, 10.0), (c, 0.0, 20.0)]);

        let merged = merge_all(vec![base, other]).unwrap();
        assert!(merged.contains_entity(c));
    }
}

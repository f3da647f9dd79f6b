//! Clusterer (C5): partitions the primitive constraint graph into rigid
//! clusters by greedy constraint accretion.
//!
//! Cluster 0 is always the base cluster: the origin, the axes, and anything
//! the caller made fixed. Every other cluster is grown from a seed
//! constraint and closed once no entity outside it has two or more
//! unassigned primitive constraints connecting it back in.

use std::collections::{HashMap, HashSet};

use crate::constraint::{ConstraintId, PrimitiveConstraint};
use crate::entity::{ConstraintLevel, EntityId, SketchEntity};
use crate::store::SketchStore;

/// A closed cluster: a deep copy of the entities and primitive constraints
/// it owns, so local solving and merging can mutate them without touching
/// the authoritative store until they commit back.
#[derive(Debug, Clone)]
pub struct Cluster {
    pub id: usize,
    /// Entities in the order they were added to the cluster; the local
    /// solver's seed pair and sweep both depend on this order.
    pub entity_order: Vec<EntityId>,
    pub entities: HashMap<EntityId, SketchEntity>,
    /// Primitive constraints in the order they were assigned to the
    /// cluster.
    pub constraint_order: Vec<ConstraintId>,
    pub constraints: HashMap<ConstraintId, PrimitiveConstraint>,
}

impl Cluster {
    pub(crate) fn new(id: usize) -> Self {
        Cluster {
            id,
            entity_order: Vec::new(),
            entities: HashMap::new(),
            constraint_order: Vec::new(),
            constraints: HashMap::new(),
        }
    }

    pub(crate) fn add_entity(&mut self, id: EntityId, entity: SketchEntity) {
        if !self.entities.contains_key(&id) {
            self.entity_order.push(id);
        }
        self.entities.insert(id, entity);
    }

    pub(crate) fn add_constraint(&mut self, id: ConstraintId, constraint: PrimitiveConstraint) {
        if !self.constraints.contains_key(&id) {
            self.constraint_order.push(id);
        }
        self.constraints.insert(id, constraint);
    }

    pub fn contains_entity(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn shared_entities<'a>(&'a self, other: &'a Cluster) -> Vec<EntityId> {
        self.entity_order
            .iter()
            .filter(|id| other.contains_entity(**id))
            .copied()
            .collect()
    }
}

/// Builds the cluster list for the current state of `store`: cluster 0 is
/// the base cluster, followed by clusters grown from the remaining
/// unassigned primitive constraints.
pub fn build_clusters(store: &mut SketchStore) -> Vec<Cluster> {
    let mut clusters = Vec::new();
    let mut used_entities: HashSet<EntityId> = HashSet::new();

    let mut base = Cluster::new(0);
    for fixed in store.fixed_entities().collect::<Vec<_>>() {
        if let Some(e) = store.entity(fixed) {
            base.add_entity(fixed, *e);
            used_entities.insert(fixed);
        }
    }

    let mut assigned: HashSet<ConstraintId> = HashSet::new();
    let all_ids: Vec<ConstraintId> = store.primitives.keys().collect();
    for id in &all_ids {
        let c = store.primitives[*id];
        if base.contains_entity(c.element_a) && base.contains_entity(c.element_b) {
            base.add_constraint(*id, c);
            assigned.insert(*id);
        }
    }
    clusters.push(base);

    loop {
        let unassigned: Vec<ConstraintId> = all_ids
            .iter()
            .copied()
            .filter(|id| !assigned.contains(id))
            .collect();
        if unassigned.is_empty() {
            break;
        }

        let seed = find_seed(store, &unassigned, &used_entities);
        let seed_id = match seed {
            Some(id) => id,
            None => break,
        };

        let cluster_index = clusters.len();
        let mut cluster = Cluster::new(cluster_index);
        let seed_constraint = store.primitives[seed_id];
        add_entity_to_cluster(store, &mut cluster, seed_constraint.element_a);
        add_entity_to_cluster(store, &mut cluster, seed_constraint.element_b);
        cluster.add_constraint(seed_id, seed_constraint);
        assigned.insert(seed_id);
        used_entities.insert(seed_constraint.element_a);
        used_entities.insert(seed_constraint.element_b);

        grow_cluster(store, &mut cluster, &mut assigned, &all_ids);
        for id in &cluster.entity_order {
            used_entities.insert(*id);
        }
        clusters.push(cluster);
    }

    clusters
}

fn add_entity_to_cluster(store: &SketchStore, cluster: &mut Cluster, id: EntityId) {
    if let Some(e) = store.entity(id) {
        cluster.add_entity(id, *e);
    }
}

/// Finds the next seed constraint: prefer one whose two entities are both
/// already used by a prior cluster (helps later merges find shared
/// entities); otherwise the one touching already-used entities with the
/// highest-degree outside entity, ties broken by ascending id; otherwise
/// the lowest-id unassigned constraint (a fresh, disconnected component).
fn find_seed(
    store: &SketchStore,
    unassigned: &[ConstraintId],
    used_entities: &HashSet<EntityId>,
) -> Option<ConstraintId> {
    if let Some(id) = unassigned.iter().find(|id| {
        let c = store.primitives[**id];
        used_entities.contains(&c.element_a) && used_entities.contains(&c.element_b)
    }) {
        return Some(*id);
    }

    let mut best: Option<(usize, ConstraintId)> = None;
    for id in unassigned {
        let c = store.primitives[*id];
        let outside = if used_entities.contains(&c.element_a) && !used_entities.contains(&c.element_b) {
            Some(c.element_b)
        } else if used_entities.contains(&c.element_b) && !used_entities.contains(&c.element_a) {
            Some(c.element_a)
        } else {
            None
        };
        let Some(outside) = outside else { continue };
        let degree = unassigned
            .iter()
            .filter(|other| store.primitives[**other].touches(outside))
            .count();
        let candidate = (degree, *id);
        best = Some(match best {
            None => candidate,
            Some((best_degree, best_id)) => {
                if degree > best_degree || (degree == best_degree && *id < best_id) {
                    candidate
                } else {
                    (best_degree, best_id)
                }
            }
        });
    }
    if let Some((_, id)) = best {
        return Some(id);
    }

    unassigned.iter().copied().min()
}

/// Grows `cluster` by repeatedly pulling in an outside entity connected by
/// at least two unassigned primitive constraints, per §4.5 step 3.
fn grow_cluster(
    store: &mut SketchStore,
    cluster: &mut Cluster,
    assigned: &mut HashSet<ConstraintId>,
    all_ids: &[ConstraintId],
) {
    loop {
        let mut candidate: Option<(EntityId, Vec<ConstraintId>)> = None;

        // Collect, for each outside entity, the unassigned primitives that
        // connect it to an entity already in the cluster.
        let mut by_entity: HashMap<EntityId, Vec<ConstraintId>> = HashMap::new();
        for id in all_ids {
            if assigned.contains(id) {
                continue;
            }
            let c = store.primitives[*id];
            let a_in = cluster.contains_entity(c.element_a);
            let b_in = cluster.contains_entity(c.element_b);
            if a_in && !b_in {
                by_entity.entry(c.element_b).or_default().push(*id);
            } else if b_in && !a_in {
                by_entity.entry(c.element_a).or_default().push(*id);
            }
        }

        let mut entities: Vec<EntityId> = by_entity.keys().copied().collect();
        entities.sort();
        for entity in entities {
            let mut constraints = by_entity.remove(&entity).unwrap();
            if constraints.len() >= 2 {
                constraints.sort();
                candidate = Some((entity, constraints));
                break;
            }
        }

        let Some((entity, constraints)) = candidate else {
            break;
        };

        add_entity_to_cluster(store, cluster, entity);
        for (i, id) in constraints.iter().enumerate() {
            let mut c = store.primitives[*id];
            if i >= 2 {
                c.conflicting = true;
                store.primitives[*id].conflicting = true;
                if let Some(e) = store.entity_mut(entity) {
                    e.set_level(ConstraintLevel::Over);
                }
            }
            cluster.add_constraint(*id, c);
            assigned.insert(*id);
        }
        if constraints.len() == 2 {
            if let Some(e) = store.entity_mut(entity) {
                if e.level() != ConstraintLevel::Over {
                    e.set_level(ConstraintLevel::Fully);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::PrimitiveKind;
    use crate::entity::SketchPoint;
    use crate::geometry::Vec2;

    fn point(store: &mut SketchStore, x: f64, y: f64) -> EntityId {
        store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::new(x, y))))
    }

    #[test]
    fn base_cluster_contains_fixed_entities() {
        let mut store = SketchStore::new();
        let origin = point(&mut store, 0.0, 0.0);
        store.make_fixed(origin);
        let clusters = build_clusters(&mut store);
        assert_eq!(clusters[0].id, 0);
        assert!(clusters[0].contains_entity(origin));
    }

    #[test]
    fn two_points_with_one_distance_form_their_own_cluster() {
        let mut store = SketchStore::new();
        let origin = point(&mut store, 0.0, 0.0);
        store.make_fixed(origin);
        let a = point(&mut store, 1.0, 0.0);
        store.add_primitive(PrimitiveConstraint::new(PrimitiveKind::Distance, origin, a, 5.0));
        let clusters = build_clusters(&mut store);
        assert!(clusters.len() >= 2);
    }
}

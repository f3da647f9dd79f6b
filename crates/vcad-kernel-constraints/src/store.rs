//! Element & constraint store (C2).
//!
//! Owns the entity table, the primitive-constraint table, and the
//! high-level wrapper table, plus the entity -> primitive-constraint
//! adjacency index the clusterer walks. The store is the only thing in the
//! crate allowed to mutate these tables directly; everything else goes
//! through [`SketchStore`]'s methods.

use std::collections::{HashMap, HashSet};

use slotmap::SlotMap;

use crate::constraint::{ConstraintId, ConstraintWrapper, PrimitiveConstraint, WrapperId};
use crate::entity::{EntityId, SketchEntity};

/// Owns entities, primitive constraints, and constraint wrappers for one
/// sketch, along with the adjacency index the clusterer needs.
#[derive(Debug, Clone, Default)]
pub struct SketchStore {
    pub entities: SlotMap<EntityId, SketchEntity>,
    pub primitives: SlotMap<ConstraintId, PrimitiveConstraint>,
    pub wrappers: SlotMap<WrapperId, ConstraintWrapper>,
    /// entity id -> primitive constraint ids touching it. Rebuilt
    /// incrementally as primitives are added or fused away.
    adjacency: HashMap<EntityId, Vec<ConstraintId>>,
    /// Entities that belong to the base cluster (origin, axes, anything the
    /// caller made fixed via `make_fixed`).
    fixed: HashSet<EntityId>,
    /// Entities whose coordinates are currently known-good: fixed entities,
    /// plus anything a completed local-solve/merge pass has committed. Used
    /// by the resolver's availability checks (e.g. "is this arc's radius
    /// derivable yet").
    solved: HashSet<EntityId>,
}

impl SketchStore {
    pub fn new() -> Self {
        SketchStore::default()
    }

    pub fn add_entity(&mut self, entity: SketchEntity) -> EntityId {
        self.entities.insert(entity)
    }

    pub fn entity(&self, id: EntityId) -> Option<&SketchEntity> {
        self.entities.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut SketchEntity> {
        self.entities.get_mut(id)
    }

    pub fn add_primitive(&mut self, constraint: PrimitiveConstraint) -> ConstraintId {
        let a = constraint.element_a;
        let b = constraint.element_b;
        let id = self.primitives.insert(constraint);
        self.adjacency.entry(a).or_default().push(id);
        self.adjacency.entry(b).or_default().push(id);
        id
    }

    pub fn add_wrapper(&mut self, wrapper: ConstraintWrapper) -> WrapperId {
        self.wrappers.insert(wrapper)
    }

    /// Primitive constraints touching `entity`.
    pub fn primitives_on(&self, entity: EntityId) -> impl Iterator<Item = ConstraintId> + '_ {
        self.adjacency
            .get(&entity)
            .into_iter()
            .flatten()
            .copied()
            .filter(|id| self.primitives.contains_key(*id))
    }

    pub fn make_fixed(&mut self, entity: EntityId) {
        self.fixed.insert(entity);
        if let Some(e) = self.entities.get(entity) {
            for child in e.children() {
                self.fixed.insert(child);
            }
        }
    }

    pub fn is_fixed(&self, entity: EntityId) -> bool {
        self.fixed.contains(&entity)
    }

    pub fn mark_solved(&mut self, entity: EntityId) {
        self.solved.insert(entity);
    }

    pub fn is_solved(&self, entity: EntityId) -> bool {
        self.fixed.contains(&entity) || self.solved.contains(&entity)
    }

    pub fn fixed_entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.fixed.iter().copied()
    }

    /// Fuses two point entities into one, per §4.2: the survivor absorbs
    /// every reference to the victim (primitive constraints, wrapper
    /// endpoints, and the adjacency index), then the victim is removed from
    /// the entity table. The fixed entity (if either is fixed) always
    /// survives.
    pub fn fuse_points(&mut self, a: EntityId, b: EntityId) -> EntityId {
        if a == b {
            return a;
        }
        let (survivor, victim) = if self.is_fixed(b) && !self.is_fixed(a) {
            (b, a)
        } else {
            (a, b)
        };

        for constraint in self.primitives.values_mut() {
            if constraint.element_a == victim {
                constraint.element_a = survivor;
            }
            if constraint.element_b == victim {
                constraint.element_b = survivor;
            }
        }
        for wrapper in self.wrappers.values_mut() {
            if wrapper.element_a == victim {
                wrapper.element_a = survivor;
            }
            if wrapper.element_b == Some(victim) {
                wrapper.element_b = Some(survivor);
            }
        }
        // A fused-away point may also be some compound entity's child
        // (a line's start/end, a circle's center, an arc's center/start/end).
        for entity in self.entities.values_mut() {
            match entity {
                SketchEntity::Line(l) => {
                    if l.start == victim {
                        l.start = survivor;
                    }
                    if l.end == victim {
                        l.end = survivor;
                    }
                }
                SketchEntity::Circle(c) => {
                    if c.center == victim {
                        c.center = survivor;
                    }
                }
                SketchEntity::Arc(a) => {
                    if a.center == victim {
                        a.center = survivor;
                    }
                    if a.start == victim {
                        a.start = survivor;
                    }
                    if a.end == victim {
                        a.end = survivor;
                    }
                }
                SketchEntity::Point(_) => {}
            }
        }

        if let Some(victim_adj) = self.adjacency.remove(&victim) {
            let entry = self.adjacency.entry(survivor).or_default();
            for id in victim_adj {
                if !entry.contains(&id) {
                    entry.push(id);
                }
            }
        }
        if self.fixed.remove(&victim) {
            self.fixed.insert(survivor);
        }

        self.entities.remove(victim);
        survivor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::SketchPoint;
    use crate::geometry::Vec2;

    fn point(store: &mut SketchStore, x: f64, y: f64) -> EntityId {
        store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::new(x, y))))
    }

    #[test]
    fn fuse_points_rewrites_constraint_references() {
        let mut store = SketchStore::new();
        let a = point(&mut store, 0.0, 0.0);
        let b = point(&mut store, 1.0, 1.0);
        let c = point(&mut store, 2.0, 2.0);
        let constraint = crate::constraint::PrimitiveConstraint::new(
            crate::constraint::PrimitiveKind::Distance,
            b,
            c,
            5.0,
        );
        store.add_primitive(constraint);

        let survivor = store.fuse_points(a, b);
        assert!(store.entities.get(b).is_none() || survivor != b);
        assert!(store.entities.contains_key(survivor));

        let touching: Vec<_> = store.primitives_on(survivor).collect();
        assert_eq!(touching.len(), 1);
    }

    #[test]
    fn make_fixed_also_fixes_children() {
        let mut store = SketchStore::new();
        let start = point(&mut store, 0.0, 0.0);
        let end = point(&mut store, 1.0, 0.0);
        let line = crate::geometry::Line2::through_points(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)).unwrap();
        let line_id = store.add_entity(SketchEntity::Line(crate::entity::SketchLine {
            line,
            start,
            end,
            level: crate::entity::ConstraintLevel::Under,
        }));
        store.make_fixed(line_id);
        assert!(store.is_fixed(line_id));
        assert!(store.is_fixed(start));
        assert!(store.is_fixed(end));
    }
}

//! Constraint types for the solver.
//!
//! There are two layers. A [`PrimitiveConstraint`] is a Distance or an Angle
//! between two entities — the only things the clusterer (C5) and local
//! solver (C6) ever see. A [`ConstraintWrapper`] is what the sketch façade
//! (C3) hands back from every `constrain_*` call: it carries the kind the
//! caller actually asked for (Coincident, Tangent, Midpoint, ...), and is
//! expanded into zero or more primitive children by the resolver (C4) once
//! its dependencies become known.

use slotmap::new_key_type;

use crate::entity::EntityId;

new_key_type! {
    /// Identifier for a primitive (Distance/Angle) constraint.
    pub struct ConstraintId;
}

new_key_type! {
    /// Identifier for a high-level constraint wrapper.
    pub struct WrapperId;
}

/// A primitive constraint: the only kinds the clusterer and local solver
/// understand.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveConstraint {
    pub kind: PrimitiveKind,
    pub element_a: EntityId,
    pub element_b: EntityId,
    pub value: f64,
    pub solved: bool,
    /// Set by the clusterer when this primitive was surplus on an
    /// already-fully-constrained entity (C5 step 3).
    pub conflicting: bool,
}

impl PrimitiveConstraint {
    pub fn new(kind: PrimitiveKind, element_a: EntityId, element_b: EntityId, value: f64) -> Self {
        PrimitiveConstraint {
            kind,
            element_a,
            element_b,
            value,
            solved: false,
            conflicting: false,
        }
    }

    /// Returns the entity id paired with `this`, if `this` is one of the
    /// constraint's two elements.
    pub fn other(&self, this: EntityId) -> Option<EntityId> {
        if self.element_a == this {
            Some(self.element_b)
        } else if self.element_b == this {
            Some(self.element_a)
        } else {
            None
        }
    }

    pub fn touches(&self, entity: EntityId) -> bool {
        self.element_a == entity || self.element_b == entity
    }
}

/// Distance or Angle — the only primitive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Distance,
    Angle,
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrimitiveKind::Distance => write!(f, "Distance"),
            PrimitiveKind::Angle => write!(f, "Angle"),
        }
    }
}

/// Where a [`ConstraintWrapper`] is in its resolution lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    /// Dependencies not yet known; no primitives emitted.
    Unresolved,
    /// Primitive children have been emitted.
    Resolved,
    /// All primitive children are individually solved.
    Solved,
}

/// The full set of constraint kinds a caller can ask the sketch façade for.
/// Distance and Angle wrappers are themselves primitive once their entities
/// are plain points/lines; the other kinds always expand into Distance or
/// Angle children.
#[derive(Debug, Clone, Copy)]
pub enum WrapperKind {
    Coincident,
    Distance,
    Angle { use_supplementary: bool },
    Perpendicular,
    Parallel,
    Horizontal,
    Vertical,
    Tangent,
    Ratio { k: f64 },
    Midpoint,
    Equal,
}

impl WrapperKind {
    pub fn name(&self) -> &'static str {
        match self {
            WrapperKind::Coincident => "Coincident",
            WrapperKind::Distance => "Distance",
            WrapperKind::Angle { .. } => "Angle",
            WrapperKind::Perpendicular => "Perpendicular",
            WrapperKind::Parallel => "Parallel",
            WrapperKind::Horizontal => "Horizontal",
            WrapperKind::Vertical => "Vertical",
            WrapperKind::Tangent => "Tangent",
            WrapperKind::Ratio { .. } => "Ratio",
            WrapperKind::Midpoint => "Midpoint",
            WrapperKind::Equal => "Equal",
        }
    }
}

/// A high-level constraint as the caller expressed it, plus the bookkeeping
/// the resolver needs to expand it lazily.
#[derive(Debug, Clone)]
pub struct ConstraintWrapper {
    pub kind: WrapperKind,
    /// First entity; always present.
    pub element_a: EntityId,
    /// Second entity; absent only for the circle/arc-radius form of
    /// Distance (`Distance(curve, null, d)`).
    pub element_b: Option<EntityId>,
    pub value: f64,
    pub state: ResolutionState,
    /// Primitive constraints this wrapper has emitted so far. Re-emitting is
    /// forbidden once non-empty for a given dependency (resolution is
    /// idempotent).
    pub primitive_children: Vec<ConstraintId>,
}

impl ConstraintWrapper {
    pub fn new(kind: WrapperKind, element_a: EntityId, element_b: Option<EntityId>, value: f64) -> Self {
        ConstraintWrapper {
            kind,
            element_a,
            element_b,
            value,
            state: ResolutionState::Unresolved,
            primitive_children: Vec::new(),
        }
    }

    pub fn is_conflicting(&self, primitives: &slotmap::SlotMap<ConstraintId, PrimitiveConstraint>) -> bool {
        self.primitive_children
            .iter()
            .filter_map(|id| primitives.get(*id))
            .any(|p| p.conflicting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::SketchEntity;
    use crate::entity::SketchPoint;
    use crate::geometry::Vec2;

    fn dummy_id() -> EntityId {
        let mut map: slotmap::SlotMap<EntityId, SketchEntity> = slotmap::SlotMap::with_key();
        map.insert(SketchEntity::Point(SketchPoint::new(Vec2::ZERO)))
    }

    #[test]
    fn other_returns_the_paired_element() {
        let a = dummy_id();
        let b = dummy_id();
        let c = PrimitiveConstraint::new(PrimitiveKind::Distance, a, b, 1.0);
        assert_eq!(c.other(a), Some(b));
        assert_eq!(c.other(b), Some(a));
    }

    #[test]
    fn wrapper_starts_unresolved() {
        let a = dummy_id();
        let w = ConstraintWrapper::new(WrapperKind::Tangent, a, None, 0.0);
        assert_eq!(w.state, ResolutionState::Unresolved);
        assert!(w.primitive_children.is_empty());
    }
}

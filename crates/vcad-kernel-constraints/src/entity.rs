//! Sketch entity types for the constraint solver.
//!
//! Entities are the geometric objects in a 2D sketch: points, lines, arcs,
//! and circles. Lines, circles, and arcs own child points (their own
//! start/end/center) by id; the compound's own fields carry only what isn't
//! already captured by a child (a line's implicit coefficients, a circle's
//! resolved radius). Never hold an owning reference to another entity —
//! always go through [`EntityId`] and the store.

use slotmap::new_key_type;

use crate::geometry::{Line2, Vec2};

new_key_type! {
    /// Unique identifier for a sketch entity.
    pub struct EntityId;
}

/// How well-constrained an entity currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConstraintLevel {
    /// Fewer than two primitive constraints place the entity in a cluster.
    #[default]
    Under,
    /// Exactly two primitive constraints place the entity.
    Fully,
    /// The clusterer found more than two and tagged the surplus as conflicting.
    Over,
}

/// A point entity: the only entity kind with independent (x, y) state.
#[derive(Debug, Clone, Copy)]
pub struct SketchPoint {
    pub position: Vec2,
    pub level: ConstraintLevel,
}

impl SketchPoint {
    pub fn new(position: Vec2) -> Self {
        SketchPoint {
            position,
            level: ConstraintLevel::Under,
        }
    }
}

/// An infinite line entity in normalized implicit form, anchored by two
/// child points (its visible start and end).
#[derive(Debug, Clone, Copy)]
pub struct SketchLine {
    pub line: Line2,
    pub start: EntityId,
    pub end: EntityId,
    pub level: ConstraintLevel,
}

/// A circle entity: a child center point plus a radius that only becomes
/// known once a Distance constraint resolves it (see the resolver, C4).
#[derive(Debug, Clone, Copy)]
pub struct SketchCircle {
    pub center: EntityId,
    pub radius: Option<f64>,
    pub level: ConstraintLevel,
}

/// An arc entity: center, start, and end child points. The arc always
/// sweeps clockwise from start to end around center; this convention is not
/// configurable (see the open question on arc sweep direction).
#[derive(Debug, Clone, Copy)]
pub struct SketchArc {
    pub center: EntityId,
    pub start: EntityId,
    pub end: EntityId,
    pub level: ConstraintLevel,
}

/// A sketch entity, tagged by kind. Matches on this enum replace the
/// interface polymorphism of the reference engine; there is no dynamic
/// dispatch in the solver's inner loops.
#[derive(Debug, Clone, Copy)]
pub enum SketchEntity {
    Point(SketchPoint),
    Line(SketchLine),
    Circle(SketchCircle),
    Arc(SketchArc),
}

impl SketchEntity {
    pub fn is_point(&self) -> bool {
        matches!(self, SketchEntity::Point(_))
    }

    pub fn is_line(&self) -> bool {
        matches!(self, SketchEntity::Line(_))
    }

    pub fn is_circle(&self) -> bool {
        matches!(self, SketchEntity::Circle(_))
    }

    pub fn is_arc(&self) -> bool {
        matches!(self, SketchEntity::Arc(_))
    }

    pub fn as_point(&self) -> Option<&SketchPoint> {
        match self {
            SketchEntity::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_point_mut(&mut self) -> Option<&mut SketchPoint> {
        match self {
            SketchEntity::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&SketchLine> {
        match self {
            SketchEntity::Line(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_line_mut(&mut self) -> Option<&mut SketchLine> {
        match self {
            SketchEntity::Line(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_circle(&self) -> Option<&SketchCircle> {
        match self {
            SketchEntity::Circle(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_circle_mut(&mut self) -> Option<&mut SketchCircle> {
        match self {
            SketchEntity::Circle(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_arc(&self) -> Option<&SketchArc> {
        match self {
            SketchEntity::Arc(a) => Some(a),
            _ => None,
        }
    }

    /// Child entity ids owned by this entity, in canonical order
    /// (start, end, center as applicable). Points have no children.
    pub fn children(&self) -> Vec<EntityId> {
        match self {
            SketchEntity::Point(_) => vec![],
            SketchEntity::Line(l) => vec![l.start, l.end],
            SketchEntity::Circle(c) => vec![c.center],
            SketchEntity::Arc(a) => vec![a.center, a.start, a.end],
        }
    }

    pub fn level(&self) -> ConstraintLevel {
        match self {
            SketchEntity::Point(p) => p.level,
            SketchEntity::Line(l) => l.level,
            SketchEntity::Circle(c) => c.level,
            SketchEntity::Arc(a) => a.level,
        }
    }

    pub fn set_level(&mut self, level: ConstraintLevel) {
        match self {
            SketchEntity::Point(p) => p.level = level,
            SketchEntity::Line(l) => l.level = level,
            SketchEntity::Circle(c) => c.level = level,
            SketchEntity::Arc(a) => a.level = level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_default_level_is_under() {
        let p = SketchPoint::new(Vec2::new(1.0, 2.0));
        assert_eq!(p.level, ConstraintLevel::Under);
    }

    #[test]
    fn entity_type_checks() {
        let p = SketchEntity::Point(SketchPoint::new(Vec2::ZERO));
        assert!(p.is_point());
        assert!(!p.is_line());
    }
}

#![warn(missing_docs)]

//! 2D sketch constraint solver for the vcad kernel.
//!
//! This crate provides a constraint-based sketch system where geometric and
//! dimensional constraints are satisfied by decomposition-and-merge: each
//! user-facing constraint expands into one or more primitive distance/angle
//! constraints between entities, the resulting constraint graph is broken
//! into rigid clusters, each cluster is solved in closed form, and the
//! clusters are merged back together by aligning their shared entities.
//!
//! # Overview
//!
//! 1. Constraints arrive as [`constraint::WrapperKind`] variants
//!    (`Coincident`, `Distance`, `Perpendicular`, ...) and get rewritten by
//!    the resolver into primitive `Distance`/`Angle` constraints, or fuse
//!    two points together directly.
//! 2. The clusterer groups entities and their primitive constraints into
//!    minimal rigid clusters.
//! 3. Each cluster is solved directly, with no iterative optimization: two
//!    constraints on an entity are enough to construct its position or
//!    orientation in closed form.
//! 4. Clusters are merged pairwise (or three at a time, for the
//!    circle/circle/circle case) by aligning on their shared entities.
//!
//! This repeats to a fixed point: as clusters solve, previously-blocked
//! wrappers become expandable, which can unlock further clustering.
//!
//! # Example
//!
//! ```
//! use vcad_kernel_constraints::Sketch;
//!
//! let mut sketch = Sketch::new();
//!
//! let l0 = sketch.add_line(0.0, 0.0, 10.0, 0.1).unwrap();
//! let l1 = sketch.add_line(10.0, 0.1, 10.2, 5.0).unwrap();
//!
//! let (l0_start, l0_end) = sketch.line_endpoints(l0).unwrap();
//! let (l1_start, l1_end) = sketch.line_endpoints(l1).unwrap();
//!
//! sketch.make_fixed(l0_start);
//! sketch.constrain_coincident(l0_end, l1_start);
//! sketch.constrain_horizontal(l0);
//! sketch.constrain_vertical(l1);
//! sketch.length(l0, 10.0);
//! sketch.length(l1, 5.0);
//!
//! sketch.solve().unwrap();
//!
//! let (x, y) = sketch.point(l1_end).unwrap();
//! assert!((x - 10.0).abs() < 1e-6);
//! assert!((y - 5.0).abs() < 1e-6);
//! ```
//!
//! # Constraint levels
//!
//! Every entity carries a [`entity::ConstraintLevel`]: `Under` (still has
//! free parameters), `Fully` (pinned down exactly), or `Over` (a surplus
//! primitive constraint could not be absorbed into its cluster). A sketch
//! is ready to use once every entity reports `Fully` and
//! [`Sketch::conflicting_constraints`] is empty.

mod cluster;
mod config;
mod constraint;
mod construct;
mod diagnostics;
mod entity;
mod error;
mod geometry;
mod local_solve;
mod log;
mod merge;
mod resolver;
mod sketch;
mod store;
mod tolerance;

pub use cluster::Cluster;
pub use config::SolverConfig;
pub use constraint::{ConstraintId, ConstraintWrapper, PrimitiveConstraint, PrimitiveKind, ResolutionState, WrapperId, WrapperKind};
pub use entity::{ConstraintLevel, EntityId, SketchArc, SketchCircle, SketchEntity, SketchLine, SketchPoint};
pub use error::{ConstraintError, ConstraintResult};
pub use geometry::{Line2, Vec2};
pub use log::{LogSink, NullSink, TracingSink};
pub use sketch::{Sketch, SolveReport};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_with_equal_opposite_sides_solves_without_error() {
        let mut sketch = Sketch::new();

        let p0 = sketch.origin;
        let l0 = sketch.add_line(0.0, 0.0, 10.0, 0.0).unwrap();
        let l1 = sketch.add_line(10.0, 0.0, 10.0, 5.0).unwrap();
        let l2 = sketch.add_line(10.0, 5.0, 0.0, 5.0).unwrap();
        let l3 = sketch.add_line(0.0, 5.0, 0.0, 0.0).unwrap();

        let (l0_start, l0_end) = sketch.line_endpoints(l0).unwrap();
        let (l1_start, l1_end) = sketch.line_endpoints(l1).unwrap();
        let (l2_start, l2_end) = sketch.line_endpoints(l2).unwrap();
        let (l3_start, l3_end) = sketch.line_endpoints(l3).unwrap();

        sketch.constrain_coincident(l0_start, p0);
        sketch.constrain_coincident(l0_end, l1_start);
        sketch.constrain_coincident(l1_end, l2_start);
        sketch.constrain_coincident(l2_end, l3_start);
        sketch.constrain_coincident(l3_end, p0);

        sketch.constrain_horizontal(l0);
        sketch.constrain_horizontal(l2);
        sketch.constrain_vertical(l1);
        sketch.constrain_vertical(l3);
        sketch.length(l0, 10.0);
        sketch.length(l1, 5.0);
        sketch.constrain_equal(l0, l2);
        sketch.constrain_equal(l1, l3);

        let report = sketch.solve().unwrap();
        assert!(report.passes >= 1);
        assert!(sketch
            .entity_levels()
            .iter()
            .all(|(_, level)| *level != ConstraintLevel::Over));
    }

    #[test]
    fn fresh_sketch_starts_with_only_its_bootstrap_entities() {
        let sketch = Sketch::new();
        // origin, x_end, y_end: the origin point plus each axis's far endpoint.
        assert_eq!(sketch.entity_levels().len(), 3);
        assert!(sketch.conflicting_constraints().is_empty());
    }

    #[test]
    fn circle_with_fixed_center_and_radius_constraint_is_consistent() {
        let mut sketch = Sketch::new();
        let circle = sketch.add_circle(5.0, 5.0, 3.0);
        let center = sketch.center_of(circle).unwrap();

        sketch.make_fixed(center);
        sketch.constrain_radius(circle, 5.0);

        sketch.solve().unwrap();

        let (cx, cy) = sketch.point(center).unwrap();
        assert_eq!((cx, cy), (5.0, 5.0));
        assert!((sketch.radius(circle).unwrap() - 5.0).abs() < 1e-6);
    }
}

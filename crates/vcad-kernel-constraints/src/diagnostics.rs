//! Diagnostics (C8): conflicting-constraint enumeration, per-entity
//! constraint-level reporting, and the two debug emission hooks named in
//! the external interface (a textual constraint graph, and a scalable
//! drawing of the current entity coordinates).

use std::path::Path;

use crate::cluster::Cluster;
use crate::constraint::{ConstraintId, PrimitiveKind};
use crate::entity::{ConstraintLevel, EntityId, SketchEntity};
use crate::error::ConstraintError;
use crate::store::SketchStore;

/// Every primitive constraint currently tagged conflicting: surplus
/// constraints the clusterer found on an already-fully-constrained entity.
/// A met-check failure during local solving surfaces as a `NonConvergent`
/// error from `solve` instead, since by that point the failing constraint's
/// cluster may never be committed back to the store.
pub fn conflicting_constraints(store: &SketchStore) -> Vec<ConstraintId> {
    store
        .primitives
        .iter()
        .filter(|(_, c)| c.conflicting)
        .map(|(id, _)| id)
        .collect()
}

/// Constraint level for every entity currently in the store.
pub fn entity_levels(store: &SketchStore) -> Vec<(EntityId, ConstraintLevel)> {
    store.entities.iter().map(|(id, e)| (id, e.level())).collect()
}

/// Writes a GraphViz `dot` description of the clustered constraint graph to
/// `path`: one node per entity (named `clusterId-entityId` inside a
/// cluster, bare `entityId` if free), one edge per primitive constraint,
/// labeled with its kind and id.
pub fn export_graphviz(store: &SketchStore, clusters: &[Cluster], path: &Path) -> Result<(), ConstraintError> {
    let mut dot = String::from("graph constraints {\n");

    for cluster in clusters {
        for &entity in &cluster.entity_order {
            dot.push_str(&format!(
                "  \"{}\" [label=\"{:?}\"];\n",
                node_name(cluster.id, entity, true),
                entity
            ));
        }
    }

    let clustered: std::collections::HashSet<EntityId> =
        clusters.iter().flat_map(|c| c.entity_order.iter().copied()).collect();
    for (id, _) in store.entities.iter() {
        if !clustered.contains(&id) {
            dot.push_str(&format!("  \"{}\" [label=\"{:?}\"];\n", node_name(0, id, false), id));
        }
    }

    for (id, primitive) in store.primitives.iter() {
        let a = find_entity_label(clusters, primitive.element_a);
        let b = find_entity_label(clusters, primitive.element_b);
        let kind = match primitive.kind {
            PrimitiveKind::Distance => "Distance",
            PrimitiveKind::Angle => "Angle",
        };
        dot.push_str(&format!(
            "  \"{a}\" -- \"{b}\" [label=\"{kind}#{id:?}={:.4}\"];\n",
            primitive.value
        ));
    }

    dot.push_str("}\n");
    std::fs::write(path, dot).map_err(|e| ConstraintError::ExportFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn node_name(cluster_id: usize, entity: EntityId, in_cluster: bool) -> String {
    if in_cluster {
        format!("{cluster_id}-{entity:?}")
    } else {
        format!("{entity:?}")
    }
}

fn find_entity_label(clusters: &[Cluster], entity: EntityId) -> String {
    for cluster in clusters {
        if cluster.contains_entity(entity) {
            return node_name(cluster.id, entity, true);
        }
    }
    node_name(0, entity, false)
}

/// Writes an SVG drawing of the sketch's current coordinates to `path`: one
/// glyph per entity (a circle for points, a segment for lines, a circle
/// outline for circles/arcs), colored by constraint level (gray =
/// under-constrained, black = fully, red = over-constrained).
pub fn export_image(store: &SketchStore, width: Option<u32>, height: Option<u32>, path: &Path) -> Result<(), ConstraintError> {
    let w = width.unwrap_or(800);
    let h = height.unwrap_or(600);
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"-50 -50 100 100\">\n"
    );

    for (_, entity) in store.entities.iter() {
        let color = level_color(entity.level());
        match entity {
            SketchEntity::Point(p) => {
                svg.push_str(&format!(
                    "  <circle cx=\"{:.4}\" cy=\"{:.4}\" r=\"0.5\" fill=\"{color}\" />\n",
                    p.position.x, p.position.y
                ));
            }
            SketchEntity::Line(l) => {
                if let (Some(start), Some(end)) = (store.entity(l.start), store.entity(l.end)) {
                    if let (Some(s), Some(e)) = (start.as_point(), end.as_point()) {
                        svg.push_str(&format!(
                            "  <line x1=\"{:.4}\" y1=\"{:.4}\" x2=\"{:.4}\" y2=\"{:.4}\" stroke=\"{color}\" stroke-width=\"0.2\" />\n",
                            s.position.x, s.position.y, e.position.x, e.position.y
                        ));
                    }
                }
            }
            SketchEntity::Circle(c) => {
                if let Some(center) = store.entity(c.center).and_then(SketchEntity::as_point) {
                    let r = c.radius.unwrap_or(0.0);
                    svg.push_str(&format!(
                        "  <circle cx=\"{:.4}\" cy=\"{:.4}\" r=\"{r:.4}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"0.2\" />\n",
                        center.position.x, center.position.y
                    ));
                }
            }
            SketchEntity::Arc(a) => {
                if let (Some(center), Some(start)) =
                    (store.entity(a.center).and_then(SketchEntity::as_point), store.entity(a.start).and_then(SketchEntity::as_point))
                {
                    let r = center.position.distance_to(start.position);
                    svg.push_str(&format!(
                        "  <circle cx=\"{:.4}\" cy=\"{:.4}\" r=\"{r:.4}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"0.2\" stroke-dasharray=\"1,1\" />\n",
                        center.position.x, center.position.y
                    ));
                }
            }
        }
    }

    svg.push_str("</svg>\n");
    std::fs::write(path, svg).map_err(|e| ConstraintError::ExportFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn level_color(level: ConstraintLevel) -> &'static str {
    match level {
        ConstraintLevel::Under => "gray",
        ConstraintLevel::Fully => "black",
        ConstraintLevel::Over => "red",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::SketchPoint;
    use crate::geometry::Vec2;

    #[test]
    fn conflicting_constraints_lists_only_tagged_primitives() {
        let mut store = SketchStore::new();
        let a = store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::ZERO)));
        let b = store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::new(1.0, 0.0))));
        let id = store.add_primitive(crate::constraint::PrimitiveConstraint::new(
            PrimitiveKind::Distance,
            a,
            b,
            1.0,
        ));
        assert!(conflicting_constraints(&store).is_empty());
        store.primitives[id].conflicting = true;
        assert_eq!(conflicting_constraints(&store), vec![id]);
    }

    #[test]
    fn entity_levels_reports_every_entity() {
        let mut store = SketchStore::new();
        store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::ZERO)));
        store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::ZERO)));
        assert_eq!(entity_levels(&store).len(), 2);
    }

    #[test]
    fn export_graphviz_writes_a_dot_file() {
        let mut store = SketchStore::new();
        let a = store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::ZERO)));
        let b = store.add_entity(SketchEntity::Point(SketchPoint::new(Vec2::new(1.0, 0.0))));
        store.add_primitive(crate::constraint::PrimitiveConstraint::new(PrimitiveKind::Distance, a, b, 1.0));

        let dir = std::env::temp_dir().join(format!("vcad-constraints-test-{:?}", a));
        export_graphviz(&store, &[], &dir).unwrap();
        let content = std::fs::read_to_string(&dir).unwrap();
        assert!(content.starts_with("graph constraints"));
        let _ = std::fs::remove_file(&dir);
    }
}

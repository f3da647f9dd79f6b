//! Error types for the constraint solver.
//!
//! One `thiserror`-derived enum per the three failure kinds named in the
//! error-handling design: input rejected synchronously at an add-call,
//! over-constrained (detected during solve, partial coordinates still
//! valid), and non-convergent (a construction step had no solution).

use thiserror::Error;

use crate::constraint::ConstraintId;
use crate::entity::EntityId;

/// Errors the constraint solver can report.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConstraintError {
    /// The caller's add-call was rejected synchronously; no state changed.
    #[error("rejected constraint: {reason}")]
    InputRejected { reason: String },

    /// The clusterer or the post-solve met-check found more primitive
    /// constraints on an entity than it has degrees of freedom for.
    #[error("over-constrained: {} surplus primitive constraint(s)", constraint_ids.len())]
    OverConstrained { constraint_ids: Vec<ConstraintId> },

    /// A local-solve or merge step had no valid geometric solution.
    #[error("non-convergent: {reason}")]
    NonConvergent { reason: String },

    /// Defensive lookup failure at the public API boundary.
    #[error("entity {0:?} not found")]
    EntityNotFound(EntityId),

    /// Defensive lookup failure at the public API boundary.
    #[error("constraint {0:?} not found")]
    ConstraintNotFound(ConstraintId),

    /// A diagnostics export (`export_graphviz`/`export_image`) could not
    /// write its target file.
    #[error("failed to write {path}: {reason}")]
    ExportFailed { path: String, reason: String },
}

/// Result alias used throughout the crate's public API.
pub type ConstraintResult<T> = Result<T, ConstraintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_constrained_message_counts_ids() {
        let mut map: slotmap::SlotMap<ConstraintId, ()> = slotmap::SlotMap::with_key();
        let id = map.insert(());
        let err = ConstraintError::OverConstrained {
            constraint_ids: vec![id],
        };
        assert!(err.to_string().contains('1'));
    }
}

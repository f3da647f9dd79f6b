//! Solver configuration.
//!
//! Unlike the teacher's `SolverConfig` (tuned for a damped Gauss-Newton
//! iteration: lambda, iteration caps, convergence tolerance), this solver is
//! a deterministic single pass through resolve/cluster/merge. The knobs
//! that remain are the float tolerance and a backstop on how many outer
//! resolve-cluster-merge passes `solve` will run before giving up.

use std::sync::Arc;

use crate::log::{LogSink, NullSink};
use crate::tolerance::TOLERANCE;

/// Configuration for a single `solve()` call.
#[derive(Clone)]
pub struct SolverConfig {
    /// Absolute tolerance for all float equality comparisons.
    pub tolerance: f64,
    /// Hard cap on outer resolve/cluster/merge passes (§4.4's added
    /// backstop), independent of whether progress is still being made.
    pub max_passes: usize,
    /// Where to send trace/debug events. `None` behaves like [`NullSink`].
    pub log_sink: Option<Arc<dyn LogSink>>,
}

impl SolverConfig {
    pub fn log(&self, level: crate::log::LogLevel, message: &str, fields: &[(&str, &dyn std::fmt::Display)]) {
        match &self.log_sink {
            Some(sink) => sink.log(level, message, fields),
            None => NullSink.log(level, message, fields),
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            tolerance: TOLERANCE,
            max_passes: 64,
            log_sink: None,
        }
    }
}

impl std::fmt::Debug for SolverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverConfig")
            .field("tolerance", &self.tolerance)
            .field("max_passes", &self.max_passes)
            .field("log_sink", &self.log_sink.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_spec_numbers() {
        let config = SolverConfig::default();
        assert_eq!(config.tolerance, 1e-6);
        assert_eq!(config.max_passes, 64);
        assert!(config.log_sink.is_none());
    }
}

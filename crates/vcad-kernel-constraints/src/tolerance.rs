//! Centralized float tolerance. Every comparison in the solver that needs to
//! treat "close enough" as "equal" goes through here rather than scattering
//! literal epsilons across modules.

/// Absolute tolerance used for all float equality comparisons in the solver.
pub const TOLERANCE: f64 = 1e-6;

/// Threshold below which a denominator is treated as degenerate (turning a
/// construction step into `NonConvergent` rather than producing `NaN` or
/// `inf`).
pub const DEGENERATE_DENOMINATOR: f64 = 1e-12;

/// Whether two values are equal within [`TOLERANCE`].
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= TOLERANCE
}

/// Whether a value is (numerically) zero within [`TOLERANCE`].
pub fn is_zero(v: f64) -> bool {
    v.abs() <= TOLERANCE
}

/// Whether a value is degenerate as a denominator (too close to zero to
/// divide by safely).
pub fn is_degenerate(v: f64) -> bool {
    v.abs() < DEGENERATE_DENOMINATOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approx_eq_respects_tolerance() {
        assert!(approx_eq(1.0, 1.0 + TOLERANCE / 2.0));
        assert!(!approx_eq(1.0, 1.1));
    }
}

//! Convergence criteria for the nested operating-point solves.
//!
//! Every iterative solve in cmosopt (substrate factor, effective voltage,
//! differential-pair balance, compression point) is bounded by the same
//! iteration cap. A solve that reaches the cap reports a convergence error
//! tagged with the [`Solver`] that failed; no solve ever hands back a
//! partially converged value.
//!
//! # Example
//!
//! ```
//! use cmosopt_devices::ConvergenceCriteria;
//!
//! let criteria = ConvergenceCriteria::default();
//! assert_eq!(criteria.max_iterations, 100);
//! assert!(criteria.is_converged(0.5e-3, criteria.current_reltol));
//! assert!(!criteria.is_converged(2e-3, criteria.current_reltol));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one of the iterative solvers, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Solver {
    /// Fixed-point solve for the body-effect-corrected substrate factor.
    SubstrateFactor,
    /// Newton inversion of the drain-current model.
    EffectiveVoltage,
    /// Newton solve for the second device of a differential pair.
    DifferentialPair,
    /// Outer solve for the 1-dB compression input voltage.
    CompressionPoint,
}

impl Solver {
    /// Short, stable name used in log lines and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Solver::SubstrateFactor => "substrate factor solve",
            Solver::EffectiveVoltage => "effective voltage solve",
            Solver::DifferentialPair => "differential pair solve",
            Solver::CompressionPoint => "compression point solve",
        }
    }
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Convergence criteria shared by all solves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceCriteria {
    /// Maximum iterations before a solve fails.
    pub max_iterations: usize,
    /// Relative tolerance on successive substrate-factor iterates.
    pub n_reltol: f64,
    /// Relative tolerance on drain-current residuals.
    pub current_reltol: f64,
    /// Effective-voltage step for finite-difference slopes (V).
    pub fd_step: f64,
    /// Starting value for the substrate-factor fixed point.
    pub n_seed: f64,
}

impl Default for ConvergenceCriteria {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            n_reltol: 1e-4,
            current_reltol: 1e-3,
            fd_step: 1e-4,
            n_seed: 1.4,
        }
    }
}

impl ConvergenceCriteria {
    /// Returns true if a relative residual is inside `tol`.
    ///
    /// NaN residuals never count as converged.
    #[inline]
    pub fn is_converged(&self, relative_residual: f64, tol: f64) -> bool {
        relative_residual.abs() < tol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = ConvergenceCriteria::default();
        assert_eq!(c.max_iterations, 100);
        assert_eq!(c.n_reltol, 1e-4);
        assert_eq!(c.current_reltol, 1e-3);
        assert_eq!(c.fd_step, 1e-4);
        assert_eq!(c.n_seed, 1.4);
    }

    #[test]
    fn test_nan_never_converges() {
        let c = ConvergenceCriteria::default();
        assert!(!c.is_converged(f64::NAN, 1.0));
    }

    #[test]
    fn test_solver_display() {
        assert_eq!(Solver::SubstrateFactor.to_string(), "substrate factor solve");
        assert_eq!(
            Solver::CompressionPoint.to_string(),
            "compression point solve"
        );
    }
}

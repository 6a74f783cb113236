//! Scalar Newton-Raphson with a finite-difference slope.
//!
//! Both the effective-voltage inversion and the differential-pair balance
//! solve `f(x) = target` for a monotonically increasing current function.
//! The slope is estimated with a forward difference, since the current
//! model has no closed-form derivative once the substrate factor is
//! resolved by iteration.

use cmosopt_devices::{ConvergenceCriteria, Solver};

use crate::error::{Error, Result};

/// Outcome of a converged scalar Newton solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonResult {
    /// Solution.
    pub x: f64,
    /// Function value at the solution.
    pub value: f64,
    /// Iterations taken, including the one that met the tolerance.
    pub iterations: usize,
}

/// Solve `f(x) = target` starting from `x`.
///
/// Converges when `|f(x) - target| / target` is inside the current
/// tolerance of `criteria`. A non-positive or non-finite slope cannot
/// produce a useful step and is reported as a convergence failure.
pub(crate) fn solve_increasing<F>(
    solver: Solver,
    criteria: &ConvergenceCriteria,
    mut x: f64,
    target: f64,
    mut f: F,
) -> Result<NewtonResult>
where
    F: FnMut(f64) -> cmosopt_devices::Result<f64>,
{
    let h = criteria.fd_step;

    for iteration in 1..=criteria.max_iterations {
        let value = f(x)?;
        let error = value - target;

        if criteria.is_converged(error / target, criteria.current_reltol) {
            return Ok(NewtonResult {
                x,
                value,
                iterations: iteration,
            });
        }

        let slope = (f(x + h)? - value) / h;
        if !(slope > 0.0 && slope.is_finite()) {
            log::debug!(
                "{}: unusable slope {:e} at x = {:.6} (value {:.6e}, target {:.6e})",
                solver,
                slope,
                x,
                value,
                target
            );
            return Err(Error::Convergence {
                solver,
                iterations: iteration,
            });
        }

        x -= error / slope;
        log::trace!("{} iteration {}: x = {:.6}", solver, iteration, x);
    }

    Err(Error::Convergence {
        solver,
        iterations: criteria.max_iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic() {
        let c = ConvergenceCriteria::default();
        let r = solve_increasing(Solver::EffectiveVoltage, &c, 1.0, 4.0, |x| Ok(x * x)).unwrap();
        assert!((r.value - 4.0).abs() / 4.0 < c.current_reltol);
        assert!((r.x - 2.0).abs() < 1e-2);
        assert!(r.iterations <= 10);
    }

    #[test]
    fn test_converged_seed_takes_one_iteration() {
        let c = ConvergenceCriteria::default();
        let r = solve_increasing(Solver::EffectiveVoltage, &c, 3.0, 3.0, |x| Ok(x)).unwrap();
        assert_eq!(r.iterations, 1);
        assert_eq!(r.x, 3.0);
    }

    #[test]
    fn test_flat_function_fails() {
        let c = ConvergenceCriteria::default();
        let err = solve_increasing(Solver::DifferentialPair, &c, 0.0, 2.0, |_| Ok(1.0))
            .unwrap_err();
        assert_eq!(err.solver(), Some(Solver::DifferentialPair));
    }

    #[test]
    fn test_iteration_cap() {
        let c = ConvergenceCriteria {
            max_iterations: 3,
            ..ConvergenceCriteria::default()
        };
        // Newton steps on a cube root overshoot and diverge.
        let err = solve_increasing(Solver::EffectiveVoltage, &c, 100.0, 1.0, |x: f64| {
            Ok(x.cbrt())
        })
        .unwrap_err();
        assert_eq!(
            err,
            Error::Convergence {
                solver: Solver::EffectiveVoltage,
                iterations: 3
            }
        );
    }

    #[test]
    fn test_device_errors_propagate() {
        let c = ConvergenceCriteria::default();
        let err = solve_increasing(Solver::EffectiveVoltage, &c, 0.0, 1.0, |_| {
            Err(cmosopt_devices::Error::Convergence {
                solver: Solver::SubstrateFactor,
                iterations: 100,
            })
        })
        .unwrap_err();
        assert_eq!(err.solver(), Some(Solver::SubstrateFactor));
    }
}

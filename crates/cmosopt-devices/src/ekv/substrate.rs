//! Self-consistent substrate factor.
//!
//! The substrate factor depends on the surface potential, which in turn
//! depends on the pinch-off voltage `Veff/n`. The two are resolved together
//! by fixed-point iteration:
//!
//! ```text
//! n[k+1] = 1 + (gamma / 2) / sqrt(phi + 4*Ut + Veff/n[k] + Vsb)
//! ```

use crate::convergence::{ConvergenceCriteria, Solver};
use crate::error::{Error, Result};
use crate::temperature::AdjustedParams;

/// Floor on the surface-potential argument (V).
///
/// Keeps far-negative trial points from a Newton step out of the square
/// root's domain.
const MIN_SURFACE_POTENTIAL: f64 = 1e-6;

/// Solve for the substrate factor at effective voltage `veff` and
/// source-body bias `vsb`.
pub fn substrate_factor(
    params: &AdjustedParams,
    veff: f64,
    vsb: f64,
    criteria: &ConvergenceCriteria,
) -> Result<f64> {
    let base = params.phi + 4.0 * params.ut + vsb;
    let mut n = criteria.n_seed;

    for iteration in 1..=criteria.max_iterations {
        let psi = (base + veff / n).max(MIN_SURFACE_POTENTIAL);
        let next = 1.0 + 0.5 * params.gamma / psi.sqrt();
        let change = (next - n) / n;
        n = next;

        if criteria.is_converged(change, criteria.n_reltol) {
            log::trace!(
                "substrate factor n = {:.6} after {} iterations (veff = {:.4} V, vsb = {:.3} V)",
                n,
                iteration,
                veff,
                vsb
            );
            return Ok(n);
        }
    }

    Err(Error::Convergence {
        solver: Solver::SubstrateFactor,
        iterations: criteria.max_iterations,
    })
}

//! Effective voltage from drain current, and transconductance.
//!
//! The current-versus-`Veff` curve spans many decades between weak and
//! strong inversion, so the Newton inversion is seeded from a table indexed
//! by a rough inversion coefficient rather than from a single guess.

use cmosopt_devices::{EkvDevice, Solver};

use crate::error::{Error, Result};
use crate::newton::solve_increasing;

/// Substrate factor assumed when estimating the seed inversion coefficient.
pub const SEED_SUBSTRATE_FACTOR: f64 = 1.4;

/// Seed table: (upper inversion-coefficient bound, starting Veff in V).
///
/// The last bin, for inversion coefficients at or above the final bound,
/// starts from [`SEED_VEFF_STRONG`].
pub const SEED_TABLE: [(f64, f64); 7] = [
    (0.0003, -0.33),
    (0.003, -0.20),
    (0.03, -0.12),
    (0.3, -0.04),
    (3.0, 0.05),
    (30.0, 0.30),
    (3000.0, 1.50),
];

/// Starting Veff for deep strong inversion (V).
pub const SEED_VEFF_STRONG: f64 = 5.0;

/// Starting effective voltage for a target drain current `id` (uA).
pub fn seed_veff(device: &EkvDevice<'_>, id: f64) -> f64 {
    let ic_fixed = device.inversion_coefficient(id, SEED_SUBSTRATE_FACTOR);
    SEED_TABLE
        .iter()
        .find(|(bound, _)| ic_fixed < *bound)
        .map(|&(_, veff)| veff)
        .unwrap_or(SEED_VEFF_STRONG)
}

/// Effective voltage (V) at which `device` conducts `id` (uA).
pub fn veff_from_id(device: &EkvDevice<'_>, id: f64) -> Result<f64> {
    if !(id > 0.0 && id.is_finite()) {
        return Err(Error::InvalidInput {
            parameter: "id",
            reason: format!("target drain current must be positive, got {}", id),
        });
    }

    let seed = seed_veff(device, id);
    let result = solve_increasing(
        Solver::EffectiveVoltage,
        &device.criteria,
        seed,
        id,
        |veff| device.drain_current(veff),
    )?;

    log::debug!(
        "Veff = {:.6} V for Id = {:.6e} uA (model {:.6e} uA, seed {:.2} V, {} iterations)",
        result.x,
        id,
        result.value,
        seed,
        result.iterations
    );
    Ok(result.x)
}

/// Transconductance (uS) at effective voltage `veff`, by central difference.
pub fn transconductance(device: &EkvDevice<'_>, veff: f64) -> Result<f64> {
    let h = device.criteria.fd_step;
    let upper = device.drain_current(veff + 0.5 * h)?;
    let lower = device.drain_current(veff - 0.5 * h)?;
    Ok((upper - lower) / h)
}

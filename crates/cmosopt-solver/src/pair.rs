//! Differential pair balance and 1-dB compression point.
//!
//! A differential pair of two matched devices shares a tail current of
//! `2 * Id`. Applying a differential input `Vindif` moves the effective
//! voltages of the two devices apart by `Vindif`; the common-mode shift
//! is whatever keeps the branch currents summing to the tail current.
//!
//! The compression search wraps the balance solve: the differential output
//! current `I1 - I2` grows linearly as `gm * Vindif` for small inputs and
//! saturates toward `2 * Id`. The 1-dB point is the input at which the
//! output has fallen to 0.89125 of the linear prediction.

use cmosopt_devices::{EkvDevice, Solver};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::newton::solve_increasing;

/// Amplitude ratio for a 1 dB drop, 10^(-1/20).
pub const COMPRESSION_RATIO_1DB: f64 = 0.89125;

/// Balanced differential pair at one differential input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairBalance {
    /// Differential input voltage (V).
    pub vindif: f64,
    /// Effective voltage of the second device (V); the first sits at `veff2 + vindif`.
    pub veff2: f64,
    /// Drain current of the first device (uA).
    pub id1: f64,
    /// Drain current of the second device (uA).
    pub id2: f64,
    /// Newton iterations taken.
    pub iterations: usize,
}

impl PairBalance {
    /// Effective voltage of the first device (V).
    #[inline]
    pub fn veff1(&self) -> f64 {
        self.veff2 + self.vindif
    }

    /// Differential output current I1 - I2 (uA).
    #[inline]
    pub fn id_dif(&self) -> f64 {
        self.id1 - self.id2
    }

    /// Tail current I1 + I2 (uA).
    #[inline]
    pub fn id_sum(&self) -> f64 {
        self.id1 + self.id2
    }
}

/// Input-referred 1-dB compression point of a differential pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressionPoint {
    /// Differential input voltage at 1 dB compression (V).
    pub vindif: f64,
    /// Differential output current at that input (uA).
    pub id_dif: f64,
    /// Output current predicted by the small-signal gain (uA).
    pub id_dif_linear: f64,
    /// Pair balance at the compression point.
    pub balance: PairBalance,
    /// Outer iterations taken.
    pub iterations: usize,
}

/// Balance a differential pair biased at `id` (uA) per device.
///
/// Finds the second device's effective voltage such that
/// `Id(veff2 + vindif) + Id(veff2) = 2 * id`, starting from the split
/// around the quiescent effective voltage `veff1`.
pub fn balance_pair(
    device: &EkvDevice<'_>,
    id: f64,
    veff1: f64,
    vindif: f64,
) -> Result<PairBalance> {
    let seed = veff1 - 0.5 * vindif;
    let tail = 2.0 * id;

    let result = solve_increasing(
        Solver::DifferentialPair,
        &device.criteria,
        seed,
        tail,
        |veff2| Ok(device.drain_current(veff2 + vindif)? + device.drain_current(veff2)?),
    )?;

    let veff2 = result.x;
    let balance = PairBalance {
        vindif,
        veff2,
        id1: device.drain_current(veff2 + vindif)?,
        id2: device.drain_current(veff2)?,
        iterations: result.iterations,
    };

    log::trace!(
        "pair balanced at Vindif = {:.6} V: I1 = {:.6e}, I2 = {:.6e} uA ({} iterations)",
        vindif,
        balance.id1,
        balance.id2,
        balance.iterations
    );
    Ok(balance)
}

/// Find the 1-dB compression input of a pair biased at `id` (uA) per
/// device, quiescent effective voltage `veff` and transconductance `gm` (uS).
///
/// The outer iteration uses the fixed small-signal `gm` as its slope,
/// which converges linearly without a finite difference around the
/// nested balance solve.
pub fn compression_point(
    device: &EkvDevice<'_>,
    id: f64,
    veff: f64,
    gm: f64,
) -> Result<CompressionPoint> {
    if !(gm > 0.0 && gm.is_finite()) {
        return Err(Error::InvalidInput {
            parameter: "gm",
            reason: format!("transconductance must be positive, got {}", gm),
        });
    }

    let criteria = &device.criteria;
    let mut vindif = id / gm;

    for iteration in 1..=criteria.max_iterations {
        let balance = balance_pair(device, id, veff, vindif)?;
        let id_dif = balance.id_dif();
        let target = COMPRESSION_RATIO_1DB * gm * vindif;
        let error = target - id_dif;

        if criteria.is_converged(error / target, criteria.current_reltol) {
            log::debug!(
                "1-dB compression at Vindif = {:.6} V ({} iterations)",
                vindif,
                iteration
            );
            return Ok(CompressionPoint {
                vindif,
                id_dif,
                id_dif_linear: gm * vindif,
                balance,
                iterations: iteration,
            });
        }

        vindif -= error / gm;
        log::trace!(
            "compression iteration {}: Vindif = {:.6} V",
            iteration,
            vindif
        );
    }

    Err(Error::Convergence {
        solver: Solver::CompressionPoint,
        iterations: criteria.max_iterations,
    })
}

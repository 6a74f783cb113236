//! Small-signal figures of merit at a solved operating point.
//!
//! Intrinsic capacitances follow the EKV charge model in saturation,
//! expressed through the normalized source charge
//! `qs = sqrt(IC + 1/4) - 1/2`. Units follow the rest of the crate:
//! uS for conductances, fF for capacitances, GHz for fT.

use std::f64::consts::PI;

use cmosopt_devices::ProcessParams;
use serde::{Deserialize, Serialize};

use crate::operating_point::Design;

/// Figures of merit derived from an operating point and its `gm`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Figures {
    /// Gate transconductance (uS).
    pub gm: f64,
    /// Transconductance efficiency gm/Id (1/V).
    pub gm_over_id: f64,
    /// Body transconductance (uS).
    pub gmb: f64,
    /// Normalized source charge at the operating point.
    pub qs: f64,
    /// Intrinsic gate-source capacitance (fF).
    pub cgsi: f64,
    /// Intrinsic gate-body capacitance (fF).
    pub cgbi: f64,
    /// Gate-source overlap capacitance (fF).
    pub cgso: f64,
    /// Gate-drain overlap capacitance (fF).
    pub cgdo: f64,
    /// Transit frequency (GHz).
    pub ft: f64,
    /// Thermal-noise excess factor.
    pub gamma_noise: f64,
    /// Input-referred thermal noise density (nV/sqrt(Hz)).
    pub thermal_noise: f64,
    /// Input-referred flicker noise PSD at the requested frequency (nV^2/Hz).
    pub flicker_psd: Option<f64>,
    /// Frequency where flicker and thermal noise are equal (Hz).
    pub flicker_corner: f64,
}

/// Derivative term of the saturation gate-source charge partition.
fn charge_partition(q: f64) -> f64 {
    ((2.0 / 3.0) * q * q + (4.0 / 3.0) * q + 0.5) / ((q + 1.0) * (q + 1.0))
}

impl Figures {
    /// Compute the figures for `design` with transconductance `gm` (uS).
    pub fn new(process: &ProcessParams, design: &Design, gm: f64) -> Self {
        let op = &design.op;
        let geom = &design.geometry;
        let adj = &design.adjusted;
        let id = design.conditions.id;

        let gmb = (op.n - 1.0) * gm;

        let cox_area = adj.cox * geom.w * geom.l;
        let qs = (op.ic + 0.25).sqrt() - 0.5;
        let cgsi = cox_area * 2.0 * qs * charge_partition(qs) / (2.0 * qs + 1.0);
        let cgbi = (op.n - 1.0) / op.n * (cox_area - cgsi);
        let cgso = process.cgso * geom.w;
        let cgdo = process.cgdo * geom.w;

        let ft = gm / (2.0 * PI * (cgsi + cgbi + cgso));

        // 4kT*Gamma/gm with gm in S, reported in nV.
        let gamma_noise = op.n * (0.5 + op.ic / (6.0 * (1.0 + op.ic)));
        let thermal_psd = 4.0 * ProcessParams::KB * adj.temp * gamma_noise / (gm * 1e-6) * 1e18;

        let area = geom.w * geom.l;
        let f = design.conditions.f_flicker;
        let flicker_psd = (f > 0.0).then(|| process.kf / (area * f.powf(process.af)));
        let flicker_corner = (process.kf / (area * thermal_psd)).powf(1.0 / process.af);

        Self {
            gm,
            gm_over_id: gm / id,
            gmb,
            qs,
            cgsi,
            cgbi,
            cgso,
            cgdo,
            ft,
            gamma_noise,
            thermal_noise: thermal_psd.sqrt(),
            flicker_psd,
            flicker_corner,
        }
    }

    /// Total gate capacitance seen from the input with the drain at AC ground (fF).
    pub fn cgg(&self) -> f64 {
        self.cgsi + self.cgbi + self.cgso + self.cgdo
    }
}

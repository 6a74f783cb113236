//! Continuous EKV drain-current model.
//!
//! The model expresses drain current in saturation as a function of the
//! effective gate voltage `Veff = Vgs - Vt`, blending the weak-inversion
//! exponential and strong-inversion square law through a single
//! `ln(1 + exp(x))^2` interpolation:
//!
//! ```text
//! Id = Ispec * mob * vsat * ln(1 + exp(Veff / (2 n Ut)))^2
//! Ispec = 2 n (u0 Cox) Ut^2 (W/L)
//! ```
//!
//! Mobility reduction and velocity saturation derate the current through
//! the smoothed inversion voltage `Veffs`, which tracks `Veff` in strong
//! inversion and goes to zero in weak inversion.
//!
//! # Usage
//!
//! ```
//! use cmosopt_devices::{AdjustedParams, EkvDevice, ProcessParams, VelocitySaturation};
//!
//! let process = ProcessParams::default();
//! let params = AdjustedParams::at_temperature(&process, VelocitySaturation::Enhanced, 27.0);
//! let device = EkvDevice::new(&params, 20.0, 0.5, 0.0);
//!
//! let weak = device.drain_current(0.0).unwrap();
//! let strong = device.drain_current(0.5).unwrap();
//! assert!(strong > weak);
//! ```

pub mod substrate;

pub use substrate::substrate_factor;

use crate::convergence::ConvergenceCriteria;
use crate::error::Result;
use crate::temperature::AdjustedParams;

/// Numerically stable `ln(1 + exp(x))`.
#[inline]
pub fn softplus(x: f64) -> f64 {
    if x > 50.0 {
        x
    } else if x < -50.0 {
        x.exp()
    } else {
        x.exp().ln_1p()
    }
}

/// One MOSFET at a fixed geometry and source-body bias.
///
/// The device borrows its temperature-adjusted parameters; every
/// evaluation is a pure function of `veff`.
#[derive(Debug, Clone, Copy)]
pub struct EkvDevice<'a> {
    /// Temperature-adjusted process parameters.
    pub params: &'a AdjustedParams,
    /// Effective channel width (um).
    pub w: f64,
    /// Effective channel length (um).
    pub l: f64,
    /// Source-body voltage (V).
    pub vsb: f64,
    /// Convergence criteria for the substrate-factor solve.
    pub criteria: ConvergenceCriteria,
}

impl<'a> EkvDevice<'a> {
    /// Create a device with default convergence criteria.
    pub fn new(params: &'a AdjustedParams, w: f64, l: f64, vsb: f64) -> Self {
        Self {
            params,
            w,
            l,
            vsb,
            criteria: ConvergenceCriteria::default(),
        }
    }

    /// Replace the convergence criteria.
    pub fn with_criteria(mut self, criteria: ConvergenceCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    /// Aspect ratio W/L.
    #[inline]
    pub fn aspect_ratio(&self) -> f64 {
        self.w / self.l
    }

    /// Specific current 2*n*u0*Cox*Ut^2*(W/L) for a given substrate factor (uA).
    #[inline]
    pub fn specific_current(&self, n: f64) -> f64 {
        self.params.technology_current(n) * self.aspect_ratio()
    }

    /// Self-consistent substrate factor at `veff`.
    pub fn substrate_factor(&self, veff: f64) -> Result<f64> {
        substrate_factor(self.params, veff, self.vsb, &self.criteria)
    }

    /// Inversion coefficient of a drain current `id` (uA) for a given `n`.
    #[inline]
    pub fn inversion_coefficient(&self, id: f64, n: f64) -> f64 {
        id / self.specific_current(n)
    }

    /// Drain current (uA) at effective voltage `veff` (V).
    pub fn drain_current(&self, veff: f64) -> Result<f64> {
        let p = self.params;
        let n = self.substrate_factor(veff)?;
        let nut = n * p.ut;

        // Smoothed inversion voltage: ~Veff in strong inversion, ~0 in weak.
        let veffs = 0.5 * nut * softplus(2.0 * veff / nut);

        let mobility = 1.0 / (1.0 + p.theta * veffs);

        let lateral = (p.theta1 + 1.0 / (self.l * p.ecrit)) * veffs;
        let vsat = 1.0 / (1.0 + lateral.powf(p.vsat_exp)).powf(1.0 / p.vsat_exp);

        let ifwd = softplus(veff / (2.0 * nut));
        Ok(self.specific_current(n) * mobility * vsat * ifwd * ifwd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{ProcessParams, VelocitySaturation};

    fn params(model: VelocitySaturation) -> AdjustedParams {
        AdjustedParams::at_nominal(&ProcessParams::default(), model)
    }

    #[test]
    fn test_softplus() {
        assert!((softplus(0.0) - std::f64::consts::LN_2).abs() < 1e-15);
        assert_eq!(softplus(100.0), 100.0);
        assert!(softplus(-100.0) > 0.0);
        assert!((softplus(10.0) - (1.0 + 10.0_f64.exp()).ln()).abs() < 1e-12);
    }

    #[test]
    fn test_monotonic_across_inversion() {
        let p = params(VelocitySaturation::Enhanced);
        let dev = EkvDevice::new(&p, 10.0, 0.5, 0.0);
        let samples = [-0.3, 0.0, 0.5, 2.0];
        let currents: Vec<f64> = samples
            .iter()
            .map(|&v| dev.drain_current(v).unwrap())
            .collect();
        for pair in currents.windows(2) {
            assert!(pair[1] > pair[0], "{:?}", currents);
        }
    }

    #[test]
    fn test_square_law_limit() {
        // Without derating terms the strong-inversion current approaches
        // (u0 Cox / 2n) (W/L) Veff^2.
        let mut p = params(VelocitySaturation::None);
        p.theta = 0.0;
        let dev = EkvDevice::new(&p, 10.0, 1.0, 0.0);
        let veff = 1.0;
        let n = dev.substrate_factor(veff).unwrap();
        let expected = p.kprime() / (2.0 * n) * dev.aspect_ratio() * veff * veff;
        let id = dev.drain_current(veff).unwrap();
        assert!((id - expected).abs() / expected < 1e-3);
    }

    #[test]
    fn test_weak_inversion_slope() {
        // Deep in weak inversion the current rises by roughly e per n*Ut;
        // n itself falls slightly over the step.
        let p = params(VelocitySaturation::Enhanced);
        let dev = EkvDevice::new(&p, 10.0, 1.0, 0.0);
        let v = -0.3;
        let n = dev.substrate_factor(v).unwrap();
        let i1 = dev.drain_current(v).unwrap();
        let i2 = dev.drain_current(v + n * p.ut).unwrap();
        let ratio = i2 / i1;
        assert!(ratio > 2.4 && ratio < std::f64::consts::E, "ratio = {}", ratio);
    }

    #[test]
    fn test_velocity_saturation_derates_short_channel() {
        let none = params(VelocitySaturation::None);
        let simple = params(VelocitySaturation::Simple);
        let enhanced = params(VelocitySaturation::Enhanced);

        let i_none = EkvDevice::new(&none, 10.0, 0.18, 0.0)
            .drain_current(0.8)
            .unwrap();
        let i_simple = EkvDevice::new(&simple, 10.0, 0.18, 0.0)
            .drain_current(0.8)
            .unwrap();
        let i_enh = EkvDevice::new(&enhanced, 10.0, 0.18, 0.0)
            .drain_current(0.8)
            .unwrap();

        assert!(i_simple < i_enh);
        assert!(i_enh < i_none);
    }

    #[test]
    fn test_current_scales_with_width() {
        let p = params(VelocitySaturation::Enhanced);
        let i1 = EkvDevice::new(&p, 10.0, 1.0, 0.0)
            .drain_current(0.2)
            .unwrap();
        let i2 = EkvDevice::new(&p, 20.0, 1.0, 0.0)
            .drain_current(0.2)
            .unwrap();
        assert!((i2 / i1 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_inversion_coefficient() {
        let p = params(VelocitySaturation::Enhanced);
        let dev = EkvDevice::new(&p, 10.0, 1.0, 0.0);
        let i0 = dev.specific_current(1.35);
        assert!((dev.inversion_coefficient(i0, 1.35) - 1.0).abs() < 1e-12);
    }
}

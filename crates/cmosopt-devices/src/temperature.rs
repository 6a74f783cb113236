//! Temperature-adjusted process parameters.
//!
//! These are computed once per operating-point solve from a
//! [`ProcessParams`] record, an operating temperature and a
//! velocity-saturation variant, and then read by every device evaluation
//! in that solve.

use serde::{Deserialize, Serialize};

use crate::process::{ProcessParams, VelocitySaturation};

/// Process parameters corrected to the operating temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedParams {
    /// Velocity-saturation variant the coefficients below were taken from.
    pub model: VelocitySaturation,
    /// Operating temperature (K)
    pub temp: f64,
    /// Nominal temperature (K)
    pub tnom: f64,
    /// Thermal voltage kT/q at the operating temperature (V)
    pub ut: f64,
    /// Silicon bandgap at the operating temperature (eV)
    pub eg: f64,
    /// Silicon bandgap at the nominal temperature (eV)
    pub eg_nom: f64,
    /// Fermi potential term, 2*phiF (V)
    pub phi: f64,
    /// Low-field mobility (cm^2/V-s)
    pub u0: f64,
    /// Critical lateral field (V/um)
    pub ecrit: f64,
    /// Zero-bias threshold voltage (V)
    pub vto: f64,
    /// Body-effect factor (V^0.5)
    pub gamma: f64,
    /// Oxide capacitance (fF/um^2)
    pub cox: f64,
    /// Nominal substrate factor
    pub n0: f64,
    /// Mobility reduction (1/V)
    pub theta: f64,
    /// Lateral-field term (1/V)
    pub theta1: f64,
    /// Velocity-saturation transition exponent
    pub vsat_exp: f64,
}

/// Silicon bandgap (eV) at temperature `t` (K).
#[inline]
pub fn silicon_bandgap(t: f64) -> f64 {
    1.16 - 7.02e-4 * t * t / (t + 1108.0)
}

impl AdjustedParams {
    /// Adjust a parameter set to `temp_c` degrees Celsius.
    ///
    /// The caller is responsible for keeping `temp_c` in a physical range.
    pub fn at_temperature(p: &ProcessParams, model: VelocitySaturation, temp_c: f64) -> Self {
        let coeffs = p.coefficients(model);

        let temp = temp_c + ProcessParams::KELVIN;
        let tnom = p.tnom();
        let ratio = temp / tnom;
        let ut = ProcessParams::KB * temp / ProcessParams::Q;

        let eg = silicon_bandgap(temp);
        let eg_nom = silicon_bandgap(tnom);

        let phi = p.phi * ratio - 3.0 * ut * ratio.ln() - eg_nom * ratio + eg;
        let u0 = p.u0 * ratio.powf(p.bex);
        let ecrit = coeffs.ecrit * ratio.powf(p.ucex);
        let vto = p.vto - p.tcv * (temp - tnom);

        Self {
            model,
            temp,
            tnom,
            ut,
            eg,
            eg_nom,
            phi,
            u0,
            ecrit,
            vto,
            gamma: p.gamma,
            cox: p.cox,
            n0: p.n0,
            theta: coeffs.theta,
            theta1: coeffs.theta1,
            vsat_exp: coeffs.vsat_exp,
        }
    }

    /// Adjust a parameter set to its own nominal temperature.
    pub fn at_nominal(p: &ProcessParams, model: VelocitySaturation) -> Self {
        Self::at_temperature(p, model, p.tnom_c)
    }

    /// Operating temperature in Celsius.
    #[inline]
    pub fn temp_c(&self) -> f64 {
        self.temp - ProcessParams::KELVIN
    }

    /// Temperature-adjusted u0*Cox (uA/V^2).
    #[inline]
    pub fn kprime(&self) -> f64 {
        0.1 * self.u0 * self.cox
    }

    /// Technology current 2*n*u0*Cox*Ut^2 for a given substrate factor (uA).
    ///
    /// Multiplying by W/L gives the specific current of a device.
    #[inline]
    pub fn technology_current(&self, n: f64) -> f64 {
        2.0 * n * self.kprime() * self.ut * self.ut
    }

    /// Threshold voltage including the body effect at source-body bias `vsb` (V).
    #[inline]
    pub fn threshold(&self, vsb: f64) -> f64 {
        self.vto + self.gamma * ((self.phi + vsb).sqrt() - self.phi.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nominal() -> AdjustedParams {
        AdjustedParams::at_nominal(&ProcessParams::default(), VelocitySaturation::Enhanced)
    }

    #[test]
    fn test_nominal_is_identity() {
        let p = ProcessParams::default();
        let a = nominal();
        assert!((a.phi - p.phi).abs() < 1e-12);
        assert!((a.u0 - p.u0).abs() < 1e-12);
        assert!((a.vto - p.vto).abs() < 1e-12);
        assert!((a.ecrit - p.enhanced_vsat.ecrit).abs() < 1e-12);
        assert!((a.temp_c() - 27.0).abs() < 1e-12);
    }

    #[test]
    fn test_thermal_voltage() {
        let a = nominal();
        assert!((a.ut - 0.025865).abs() < 1e-5);
    }

    #[test]
    fn test_bandgap() {
        // ~1.115 eV at room temperature
        assert!((silicon_bandgap(300.15) - 1.1151).abs() < 1e-3);
        assert!(silicon_bandgap(400.0) < silicon_bandgap(300.0));
    }

    #[test]
    fn test_hot_device() {
        let p = ProcessParams::default();
        let nom = nominal();
        let hot = AdjustedParams::at_temperature(&p, VelocitySaturation::Enhanced, 125.0);

        // Mobility falls (Bex < 0), critical field rises (UCex > 0),
        // threshold and Fermi potential fall.
        assert!(hot.u0 < nom.u0);
        assert!(hot.ecrit > nom.ecrit);
        assert!(hot.vto < nom.vto);
        assert!(hot.phi < nom.phi);
        assert!(hot.ut > nom.ut);

        // Vto falls by TCV per kelvin.
        assert!((nom.vto - hot.vto - 98.0 * p.tcv).abs() < 1e-12);
    }

    #[test]
    fn test_body_effect_threshold() {
        let a = nominal();
        assert!((a.threshold(0.0) - a.vto).abs() < 1e-15);
        let vt1 = a.threshold(1.0);
        let expected = 0.42 + 0.56 * ((1.85_f64).sqrt() - (0.85_f64).sqrt());
        assert!((vt1 - expected).abs() < 1e-12);
    }

    #[test]
    fn test_model_selects_coefficients() {
        let p = ProcessParams::default();
        let none = AdjustedParams::at_nominal(&p, VelocitySaturation::None);
        let simple = AdjustedParams::at_nominal(&p, VelocitySaturation::Simple);
        assert_eq!(none.ecrit, ProcessParams::ECRIT_DISABLED);
        assert_eq!(simple.vsat_exp, 1.0);
        assert_eq!(simple.model, VelocitySaturation::Simple);
    }
}

//! Process (technology) parameters.
//!
//! A [`ProcessParams`] record holds the technology constants for one MOS
//! device type at the nominal temperature. Records are created once per
//! technology, typically by deserializing a JSON file, and are only ever
//! read by the solvers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Velocity-saturation model variant.
///
/// Each variant selects one [`ModelCoefficients`] set from the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VelocitySaturation {
    /// Mobility reduction only; the velocity-saturation term is inactive.
    None,
    /// First-order velocity saturation (transition exponent 1).
    Simple,
    /// Velocity saturation with a sharper, fitted transition exponent.
    #[default]
    Enhanced,
}

impl VelocitySaturation {
    /// All variants, in increasing model complexity.
    pub const ALL: [VelocitySaturation; 3] = [
        VelocitySaturation::None,
        VelocitySaturation::Simple,
        VelocitySaturation::Enhanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VelocitySaturation::None => "none",
            VelocitySaturation::Simple => "simple",
            VelocitySaturation::Enhanced => "enhanced",
        }
    }
}

impl fmt::Display for VelocitySaturation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VelocitySaturation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "no-vsat" | "novsat" => Ok(VelocitySaturation::None),
            "simple" => Ok(VelocitySaturation::Simple),
            "enhanced" => Ok(VelocitySaturation::Enhanced),
            other => Err(format!(
                "unknown velocity saturation model '{}' (expected none, simple or enhanced)",
                other
            )),
        }
    }
}

/// Coefficients for one velocity-saturation variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelCoefficients {
    /// Critical lateral field at Tnom (V/um).
    pub ecrit: f64,
    /// Velocity-saturation transition exponent.
    pub vsat_exp: f64,
    /// Vertical-field mobility reduction (1/V).
    pub theta: f64,
    /// Additional lateral-field term (1/V).
    pub theta1: f64,
}

/// Technology parameters for one device type.
///
/// Units follow the design-spreadsheet conventions used throughout the
/// crate: currents in uA, lengths in um, capacitances in fF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessParams {
    /// Technology name. Default: "cmos180n"
    pub name: String,

    // ========================================
    // Nominal-temperature Parameters
    // ========================================
    /// Nominal temperature at which the parameters were extracted (C). Default: 27
    pub tnom_c: f64,
    /// Low-field mobility (cm^2/V-s). Default: 422
    pub u0: f64,
    /// Gate oxide capacitance per unit area (fF/um^2). Default: 8.41
    pub cox: f64,
    /// Body-effect factor (V^0.5). Default: 0.56
    pub gamma: f64,
    /// Fermi potential term, 2*phiF (V). Default: 0.85
    pub phi: f64,
    /// Zero-bias threshold voltage (V). Default: 0.42
    pub vto: f64,
    /// Nominal substrate factor used to size the device. Default: 1.35
    pub n0: f64,

    // ========================================
    // Temperature Coefficients
    // ========================================
    /// Threshold voltage temperature coefficient (V/K). Default: 1.0e-3
    pub tcv: f64,
    /// Mobility temperature exponent. Default: -1.5
    pub bex: f64,
    /// Critical field temperature exponent. Default: 0.8
    pub ucex: f64,

    // ========================================
    // Velocity Saturation / Mobility Reduction
    // ========================================
    /// Coefficients with velocity saturation disabled.
    pub no_vsat: ModelCoefficients,
    /// Coefficients for the simple velocity saturation model.
    pub simple_vsat: ModelCoefficients,
    /// Coefficients for the enhanced velocity saturation model.
    pub enhanced_vsat: ModelCoefficients,

    // ========================================
    // Geometry
    // ========================================
    /// Minimum drawn channel length (um). Default: 0.18
    pub ldrawmin: f64,
    /// Minimum drawn width per finger (um). Default: 0.22
    pub wdrawmin: f64,
    /// Length reduction from drawn to effective, lateral diffusion (um). Default: 0.028
    pub dl: f64,
    /// Width reduction from drawn to effective (um). Default: 0.0
    pub dw: f64,

    // ========================================
    // Supply
    // ========================================
    /// Maximum supply voltage (V). Default: 1.8
    pub vddmax: f64,

    // ========================================
    // Capacitance and Noise
    // ========================================
    /// Gate-source overlap capacitance per unit width (fF/um). Default: 0.34
    pub cgso: f64,
    /// Gate-drain overlap capacitance per unit width (fF/um). Default: 0.34
    pub cgdo: f64,
    /// Flicker-noise coefficient, gate-referred at 1 Hz (nV^2 um^2 / Hz). Default: 5.0e6
    pub kf: f64,
    /// Flicker-noise frequency exponent. Default: 0.85
    pub af: f64,
}

impl Default for ProcessParams {
    fn default() -> Self {
        Self::cmos180n()
    }
}

impl ProcessParams {
    /// Elementary charge (C).
    pub const Q: f64 = 1.602176634e-19;
    /// Boltzmann constant (J/K).
    pub const KB: f64 = 1.380649e-23;
    /// Offset between Celsius and Kelvin.
    pub const KELVIN: f64 = 273.15;
    /// Critical field used for the "none" variant; large enough that the
    /// velocity-saturation factor evaluates to 1.
    pub const ECRIT_DISABLED: f64 = 1.0e12;

    /// NMOS parameters for a generic 180 nm process.
    pub fn cmos180n() -> Self {
        let theta = 0.28;
        Self {
            name: "cmos180n".to_string(),

            tnom_c: 27.0,
            u0: 422.0,
            cox: 8.41,
            gamma: 0.56,
            phi: 0.85,
            vto: 0.42,
            n0: 1.35,

            tcv: 1.0e-3,
            bex: -1.5,
            ucex: 0.8,

            no_vsat: ModelCoefficients {
                ecrit: Self::ECRIT_DISABLED,
                vsat_exp: 1.0,
                theta,
                theta1: 0.0,
            },
            simple_vsat: ModelCoefficients {
                ecrit: 5.6,
                vsat_exp: 1.0,
                theta,
                theta1: 0.0,
            },
            enhanced_vsat: ModelCoefficients {
                ecrit: 5.6,
                vsat_exp: 1.3,
                theta,
                theta1: 0.0,
            },

            ldrawmin: 0.18,
            wdrawmin: 0.22,
            dl: 0.028,
            dw: 0.0,

            vddmax: 1.8,

            cgso: 0.34,
            cgdo: 0.34,
            kf: 5.0e6,
            af: 0.85,
        }
    }

    /// Coefficients selected by a velocity-saturation variant.
    pub fn coefficients(&self, model: VelocitySaturation) -> ModelCoefficients {
        match model {
            VelocitySaturation::None => self.no_vsat,
            VelocitySaturation::Simple => self.simple_vsat,
            VelocitySaturation::Enhanced => self.enhanced_vsat,
        }
    }

    /// Nominal temperature (K).
    #[inline]
    pub fn tnom(&self) -> f64 {
        self.tnom_c + Self::KELVIN
    }

    /// Transconductance parameter u0*Cox in uA/V^2.
    ///
    /// cm^2/V-s times fF/um^2 is 1e-7 A/V^2, i.e. 0.1 uA/V^2.
    #[inline]
    pub fn kprime(&self) -> f64 {
        0.1 * self.u0 * self.cox
    }

    /// Check that the record describes a physical process.
    pub fn validate(&self) -> Result<()> {
        positive("u0", self.u0)?;
        positive("cox", self.cox)?;
        positive("phi", self.phi)?;
        positive("n0", self.n0)?;
        positive("ldrawmin", self.ldrawmin)?;
        positive("wdrawmin", self.wdrawmin)?;
        positive("vddmax", self.vddmax)?;
        non_negative("gamma", self.gamma)?;
        non_negative("dl", self.dl)?;
        non_negative("kf", self.kf)?;
        positive("af", self.af)?;
        if !(self.tnom() > 0.0) {
            return Err(Error::InvalidParameter {
                name: "tnom_c",
                reason: format!("{} C is below absolute zero", self.tnom_c),
            });
        }
        if !(self.dl < self.ldrawmin) {
            return Err(Error::InvalidParameter {
                name: "dl",
                reason: format!(
                    "length reduction {} um leaves no channel at ldrawmin {} um",
                    self.dl, self.ldrawmin
                ),
            });
        }

        for (name, c) in [
            ("no_vsat", &self.no_vsat),
            ("simple_vsat", &self.simple_vsat),
            ("enhanced_vsat", &self.enhanced_vsat),
        ] {
            if !(c.ecrit > 0.0) || !(c.vsat_exp > 0.0) || !(c.theta >= 0.0) || !(c.theta1 >= 0.0)
            {
                return Err(Error::InvalidParameter {
                    name,
                    reason: format!(
                        "need ecrit > 0, vsat_exp > 0, theta >= 0, theta1 >= 0 (got {:?})",
                        c
                    ),
                });
            }
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name,
            reason: format!("must be positive, got {}", value),
        })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name,
            reason: format!("must be non-negative, got {}", value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_180n_defaults() {
        let p = ProcessParams::default();
        assert_eq!(p.u0, 422.0);
        assert_eq!(p.cox, 8.41);
        assert_eq!(p.gamma, 0.56);
        assert_eq!(p.phi, 0.85);
        assert_eq!(p.vto, 0.42);
        assert_eq!(p.ldrawmin, 0.18);
        assert_eq!(p.vddmax, 1.8);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_kprime() {
        let p = ProcessParams::default();
        // 0.1 * 422 * 8.41 = 354.9 uA/V^2
        assert!((p.kprime() - 354.922).abs() < 1e-9);
    }

    #[test]
    fn test_tnom_kelvin() {
        let p = ProcessParams::default();
        assert!((p.tnom() - 300.15).abs() < 1e-12);
    }

    #[test]
    fn test_coefficients_by_variant() {
        let p = ProcessParams::default();
        assert_eq!(p.coefficients(VelocitySaturation::Simple).vsat_exp, 1.0);
        assert_eq!(p.coefficients(VelocitySaturation::Enhanced).theta1, 0.0);
        assert_eq!(
            p.coefficients(VelocitySaturation::None).ecrit,
            ProcessParams::ECRIT_DISABLED
        );
        assert_eq!(VelocitySaturation::default(), VelocitySaturation::Enhanced);
    }

    #[test]
    fn test_variant_parse() {
        assert_eq!(
            "Enhanced".parse::<VelocitySaturation>(),
            Ok(VelocitySaturation::Enhanced)
        );
        assert_eq!(
            "none".parse::<VelocitySaturation>(),
            Ok(VelocitySaturation::None)
        );
        assert!("fast".parse::<VelocitySaturation>().is_err());
        for v in VelocitySaturation::ALL {
            assert_eq!(v.to_string().parse::<VelocitySaturation>(), Ok(v));
        }
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut p = ProcessParams::default();
        p.cox = 0.0;
        assert!(matches!(
            p.validate(),
            Err(Error::InvalidParameter { name: "cox", .. })
        ));

        let mut p = ProcessParams::default();
        p.u0 = f64::NAN;
        assert!(p.validate().is_err());

        let mut p = ProcessParams::default();
        p.simple_vsat.ecrit = -1.0;
        assert!(matches!(
            p.validate(),
            Err(Error::InvalidParameter {
                name: "simple_vsat",
                ..
            })
        ));

        let mut p = ProcessParams::default();
        p.dl = 0.2;
        assert!(matches!(
            p.validate(),
            Err(Error::InvalidParameter { name: "dl", .. })
        ));
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let p: ProcessParams =
            serde_json::from_str(r#"{ "name": "custom", "vto": 0.5 }"#).unwrap();
        assert_eq!(p.name, "custom");
        assert_eq!(p.vto, 0.5);
        assert_eq!(p.u0, 422.0);
        assert_eq!(p.enhanced_vsat.vsat_exp, 1.3);
    }
}

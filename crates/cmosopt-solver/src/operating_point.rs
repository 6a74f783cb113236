//! Operating-point orchestration.
//!
//! [`calc_mos_params`] turns a drain-current and inversion-coefficient
//! target into a device geometry and a solved bias point:
//!
//! 1. validate the process and the operating conditions
//! 2. round the multiplicity to a whole finger count
//! 3. adjust the process to the operating temperature
//! 4. size the channel from the target inversion coefficient
//! 5. compute the body-effect threshold
//! 6. invert the drain-current model for `Veff` and check the supply
//! 7. resolve `n` and the actual inversion coefficient at that `Veff`
//! 8. estimate the saturation voltage
//!
//! The result is a [`Design`], from which transconductance, the 1-dB
//! compression point and the figures of merit can be derived on demand.

use std::fmt;

use cmosopt_devices::{
    AdjustedParams, ConvergenceCriteria, EkvDevice, ProcessParams, VelocitySaturation,
};
use serde::{Deserialize, Serialize};

use crate::conditions::OperatingConditions;
use crate::error::{Error, Result};
use crate::figures::Figures;
use crate::inversion::{transconductance, veff_from_id};
use crate::pair::{CompressionPoint, compression_point};

/// Solver configuration for one operating-point solve.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolveOptions {
    /// Velocity-saturation variant.
    pub model: VelocitySaturation,
    /// Convergence criteria for every nested solve.
    pub criteria: ConvergenceCriteria,
}

/// Channel dimensions derived from the sizing targets (um).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceGeometry {
    /// Effective width.
    pub w: f64,
    /// Effective length.
    pub l: f64,
    /// Drawn width, all fingers together.
    pub w_drawn: f64,
    /// Drawn length.
    pub l_drawn: f64,
    /// Drawn width of one finger.
    pub w_finger: f64,
    /// Number of fingers.
    pub fingers: u32,
}

impl DeviceGeometry {
    /// Effective aspect ratio W/L.
    #[inline]
    pub fn aspect_ratio(&self) -> f64 {
        self.w / self.l
    }
}

/// Solved bias point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingPoint {
    /// Threshold voltage including body effect (V).
    pub vt: f64,
    /// Effective gate voltage Vgs - Vt (V).
    pub veff: f64,
    /// Gate-source voltage (V).
    pub vgs: f64,
    /// Substrate factor at `veff`.
    pub n: f64,
    /// Inversion coefficient at the solved `n`.
    pub ic: f64,
    /// Drain-source saturation voltage (V).
    pub vdsat: f64,
}

/// Non-fatal conditions noticed while solving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// The requested multiplicity was not a whole number.
    MultiplicityRounded { requested: f64, fingers: u32 },
    /// Each finger is narrower than the process allows.
    FingerWidthBelowMinimum { w_finger: f64, w_min: f64 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MultiplicityRounded { requested, fingers } => {
                write!(f, "multiplicity {} rounded to {}", requested, fingers)
            }
            Warning::FingerWidthBelowMinimum { w_finger, w_min } => write!(
                f,
                "drawn finger width {:.4} um is below the process minimum {} um",
                w_finger, w_min
            ),
        }
    }
}

/// A sized device at its solved operating point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Design {
    /// Conditions as solved, with the multiplicity rounded.
    pub conditions: OperatingConditions,
    /// Process parameters at the operating temperature.
    pub adjusted: AdjustedParams,
    pub geometry: DeviceGeometry,
    pub op: OperatingPoint,
    pub warnings: Vec<Warning>,
    #[serde(skip)]
    pub criteria: ConvergenceCriteria,
}

impl Design {
    /// The sized device, ready for further evaluation.
    pub fn device(&self) -> EkvDevice<'_> {
        EkvDevice::new(
            &self.adjusted,
            self.geometry.w,
            self.geometry.l,
            self.conditions.vsb,
        )
        .with_criteria(self.criteria)
    }

    /// Transconductance at the operating point (uS).
    pub fn transconductance(&self) -> Result<f64> {
        transconductance(&self.device(), self.op.veff)
    }

    /// 1-dB compression point of a differential pair of two such devices.
    pub fn compression_point(&self) -> Result<CompressionPoint> {
        let gm = self.transconductance()?;
        compression_point(&self.device(), self.conditions.id, self.op.veff, gm)
    }

    /// Figures of merit at the operating point.
    pub fn figures(&self, process: &ProcessParams) -> Result<Figures> {
        let gm = self.transconductance()?;
        Ok(Figures::new(process, self, gm))
    }
}

/// Size a device and solve its operating point.
pub fn calc_mos_params(
    process: &ProcessParams,
    conditions: &OperatingConditions,
    options: &SolveOptions,
) -> Result<Design> {
    process.validate()?;
    conditions.validate(process)?;

    let mut warnings = Vec::new();

    let fingers = conditions.fingers();
    if conditions.m != f64::from(fingers) {
        warnings.push(Warning::MultiplicityRounded {
            requested: conditions.m,
            fingers,
        });
    }
    let conditions = OperatingConditions {
        m: f64::from(fingers),
        ..conditions.clone()
    };

    let adjusted = AdjustedParams::at_temperature(process, options.model, conditions.temp_c);

    let l = conditions.l_drawn - process.dl;
    if !(l > 0.0) {
        return Err(Error::InvalidInput {
            parameter: "l_drawn",
            reason: format!(
                "effective length {} um is not positive after removing {} um",
                l, process.dl
            ),
        });
    }
    let i0 = adjusted.technology_current(adjusted.n0);
    let w = (l / conditions.ic) * (conditions.id / i0);
    if !(w > 0.0 && w.is_finite()) {
        return Err(Error::InvalidInput {
            parameter: "ic",
            reason: format!("derived effective width {} um is not usable", w),
        });
    }
    let w_drawn = w + process.dw;
    let w_finger = w_drawn / f64::from(fingers);
    if w_finger < process.wdrawmin {
        warnings.push(Warning::FingerWidthBelowMinimum {
            w_finger,
            w_min: process.wdrawmin,
        });
    }
    let geometry = DeviceGeometry {
        w,
        l,
        w_drawn,
        l_drawn: conditions.l_drawn,
        w_finger,
        fingers,
    };

    let vt = adjusted.threshold(conditions.vsb);

    let device = EkvDevice::new(&adjusted, w, l, conditions.vsb).with_criteria(options.criteria);
    let veff = veff_from_id(&device, conditions.id)?;
    let vgs = vt + veff;
    let vgb = vgs + conditions.vsb;
    if vgb > process.vddmax {
        return Err(Error::SupplyExceeded {
            vgb,
            vdd_max: process.vddmax,
        });
    }

    let n = device.substrate_factor(veff)?;
    let ic = device.inversion_coefficient(conditions.id, n);
    let vdsat = 2.0 * adjusted.ut * (ic + 0.25).sqrt() + 3.0 * adjusted.ut;

    let op = OperatingPoint {
        vt,
        veff,
        vgs,
        n,
        ic,
        vdsat,
    };

    for warning in &warnings {
        log::warn!("{}", warning);
    }
    log::debug!(
        "W = {:.4} um, L = {:.4} um: Vgs = {:.4} V, n = {:.4}, IC = {:.4}",
        w,
        l,
        vgs,
        n,
        ic
    );

    Ok(Design {
        conditions,
        adjusted,
        geometry,
        op,
        warnings,
        criteria: options.criteria,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(conditions: OperatingConditions) -> Result<Design> {
        calc_mos_params(&ProcessParams::default(), &conditions, &SolveOptions::default())
    }

    #[test]
    fn test_geometry_from_inversion_coefficient() {
        let d = solve(OperatingConditions {
            id: 100.0,
            l_drawn: 1.0,
            ..Default::default()
        })
        .unwrap();
        assert!((d.geometry.l - 0.972).abs() < 1e-12);
        assert!((d.geometry.w - 151.6).abs() < 0.1, "W = {}", d.geometry.w);
        assert_eq!(d.geometry.fingers, 1);
        assert!(d.warnings.is_empty());
    }

    #[test]
    fn test_multiplicity_rounded() {
        let d = solve(OperatingConditions {
            id: 100.0,
            m: 2.4,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(d.geometry.fingers, 2);
        assert_eq!(d.conditions.m, 2.0);
        assert_eq!(
            d.warnings,
            vec![Warning::MultiplicityRounded {
                requested: 2.4,
                fingers: 2
            }]
        );
        assert!((d.geometry.w_finger * 2.0 - d.geometry.w_drawn).abs() < 1e-12);
    }

    #[test]
    fn test_narrow_finger_warns() {
        let d = solve(OperatingConditions {
            id: 0.01,
            ic: 10.0,
            l_drawn: 0.18,
            ..Default::default()
        })
        .unwrap();
        assert!(matches!(
            d.warnings.as_slice(),
            [Warning::FingerWidthBelowMinimum { .. }]
        ));
    }

    #[test]
    fn test_supply_exceeded() {
        let err = solve(OperatingConditions {
            vsb: 1.5,
            ..Default::default()
        })
        .unwrap_err();
        match err {
            Error::SupplyExceeded { vgb, vdd_max } => {
                assert!(vgb > vdd_max);
                assert_eq!(vdd_max, 1.8);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_invalid_process_rejected() {
        let process = ProcessParams {
            cox: 0.0,
            ..ProcessParams::default()
        };
        let err = calc_mos_params(
            &process,
            &OperatingConditions::default(),
            &SolveOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidProcess { name: "cox", .. }));
    }

    #[test]
    fn test_warning_display() {
        let w = Warning::MultiplicityRounded {
            requested: 2.4,
            fingers: 2,
        };
        assert_eq!(w.to_string(), "multiplicity 2.4 rounded to 2");
    }
}

//! Per-call operating conditions and their validation gate.

use cmosopt_devices::ProcessParams;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Smallest accepted target drain current (uA).
pub const MIN_DRAIN_CURRENT: f64 = 1e-6;
/// Smallest accepted target inversion coefficient.
pub const MIN_INVERSION_COEFFICIENT: f64 = 1e-6;
/// Largest accepted multiplicity; the finger count must fit a `u32`.
pub const MAX_MULTIPLICITY: f64 = u32::MAX as f64;
/// Accepted operating temperature range (Celsius).
pub const TEMPERATURE_RANGE: (f64, f64) = (-200.0, 200.0);

/// Targets for one operating-point solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingConditions {
    /// Target drain current (uA). Default: 10
    pub id: f64,
    /// Target inversion coefficient IC'. Default: 1
    pub ic: f64,
    /// Drawn channel length (um). Default: 0.5
    pub l_drawn: f64,
    /// Multiplicity (number of fingers). Rounded to the nearest integer. Default: 1
    pub m: f64,
    /// Source-body voltage (V). Default: 0
    pub vsb: f64,
    /// Frequency for the flicker-noise figure (Hz). Default: 1
    pub f_flicker: f64,
    /// Operating temperature (Celsius). Default: 27
    pub temp_c: f64,
}

impl Default for OperatingConditions {
    fn default() -> Self {
        Self {
            id: 10.0,
            ic: 1.0,
            l_drawn: 0.5,
            m: 1.0,
            vsb: 0.0,
            f_flicker: 1.0,
            temp_c: 27.0,
        }
    }
}

fn invalid(parameter: &'static str, reason: String) -> Error {
    Error::InvalidInput { parameter, reason }
}

impl OperatingConditions {
    /// Check every condition against `process`, reporting the first failure.
    ///
    /// Comparisons are written so that NaN fails every check.
    pub fn validate(&self, process: &ProcessParams) -> Result<()> {
        if !(self.id >= MIN_DRAIN_CURRENT && self.id.is_finite()) {
            return Err(invalid(
                "id",
                format!(
                    "drain current {} uA must be finite and at least {} uA",
                    self.id, MIN_DRAIN_CURRENT
                ),
            ));
        }
        if !(self.ic >= MIN_INVERSION_COEFFICIENT && self.ic.is_finite()) {
            return Err(invalid(
                "ic",
                format!(
                    "inversion coefficient {} must be finite and at least {}",
                    self.ic, MIN_INVERSION_COEFFICIENT
                ),
            ));
        }
        if !(self.l_drawn >= process.ldrawmin) {
            return Err(invalid(
                "l_drawn",
                format!(
                    "drawn length {} um is below the process minimum {} um",
                    self.l_drawn, process.ldrawmin
                ),
            ));
        }
        if !(self.m >= 1.0 && self.m <= MAX_MULTIPLICITY) {
            return Err(invalid(
                "m",
                format!("multiplicity {} is outside [1, {}]", self.m, MAX_MULTIPLICITY),
            ));
        }
        if !(self.vsb >= 0.0 && self.vsb <= process.vddmax) {
            return Err(invalid(
                "vsb",
                format!(
                    "source-body voltage {} V is outside [0, {}] V",
                    self.vsb, process.vddmax
                ),
            ));
        }
        if !(self.f_flicker >= 0.0) {
            return Err(invalid(
                "f_flicker",
                format!("flicker-noise frequency {} Hz is negative", self.f_flicker),
            ));
        }
        let (t_min, t_max) = TEMPERATURE_RANGE;
        if !(self.temp_c >= t_min && self.temp_c <= t_max) {
            return Err(invalid(
                "temp_c",
                format!(
                    "temperature {} C is outside [{}, {}] C",
                    self.temp_c, t_min, t_max
                ),
            ));
        }
        Ok(())
    }

    /// Multiplicity rounded to a whole finger count.
    ///
    /// Only meaningful after [`validate`](Self::validate) has accepted `m`.
    pub fn fingers(&self) -> u32 {
        self.m.round() as u32
    }
}

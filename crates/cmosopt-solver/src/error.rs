//! Error types for operating-point solving.

use cmosopt_devices::Solver;
use thiserror::Error;

/// Errors that can occur while solving an operating point.
///
/// Every variant aborts the whole solve; no partial operating point is
/// returned alongside an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// An operating condition failed validation before solving began.
    #[error("Invalid {parameter}: {reason}")]
    InvalidInput {
        parameter: &'static str,
        reason: String,
    },

    /// The process parameter set is not physical.
    #[error("Invalid process parameter {name}: {reason}")]
    InvalidProcess { name: &'static str, reason: String },

    /// The solved gate-body voltage does not fit under the supply.
    #[error("Vgs + Vsb = {vgb:.4} V exceeds the maximum supply voltage {vdd_max} V")]
    SupplyExceeded { vgb: f64, vdd_max: f64 },

    /// An iterative solve hit its iteration cap.
    #[error("{solver} did not converge after {iterations} iterations")]
    Convergence { solver: Solver, iterations: usize },
}

impl Error {
    /// Returns true for numerical (as opposed to input) failures.
    pub fn is_convergence(&self) -> bool {
        matches!(self, Error::Convergence { .. })
    }

    /// The solver that failed, for convergence errors.
    pub fn solver(&self) -> Option<Solver> {
        match self {
            Error::Convergence { solver, .. } => Some(*solver),
            _ => None,
        }
    }
}

impl From<cmosopt_devices::Error> for Error {
    fn from(e: cmosopt_devices::Error) -> Self {
        match e {
            cmosopt_devices::Error::Convergence { solver, iterations } => {
                Error::Convergence { solver, iterations }
            }
            cmosopt_devices::Error::InvalidParameter { name, reason } => {
                Error::InvalidProcess { name, reason }
            }
        }
    }
}

/// Result type for solver operations.
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for device evaluation.

use thiserror::Error;

use crate::convergence::Solver;

/// Errors that can occur while evaluating the device model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// An iterative solve hit its iteration cap without converging.
    #[error("{solver} did not converge after {iterations} iterations")]
    Convergence { solver: Solver, iterations: usize },

    /// A process parameter is outside its physical range.
    #[error("Invalid process parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Result type for device operations.
pub type Result<T> = std::result::Result<T, Error>;

//! Device model and process parameters for cmosopt.
//!
//! This crate provides:
//! - Technology parameter sets ([`ProcessParams`]) with a default 180 nm process
//! - Temperature adjustment of those parameters ([`AdjustedParams`])
//! - The continuous EKV drain-current model, valid from weak through strong
//!   inversion, with its self-consistent substrate factor ([`EkvDevice`])
//! - Convergence criteria shared by every iterative solve

pub mod convergence;
pub mod ekv;
pub mod error;
pub mod process;
pub mod temperature;

pub use convergence::{ConvergenceCriteria, Solver};
pub use ekv::{EkvDevice, softplus};
pub use error::{Error, Result};
pub use process::{ModelCoefficients, ProcessParams, VelocitySaturation};
pub use temperature::AdjustedParams;

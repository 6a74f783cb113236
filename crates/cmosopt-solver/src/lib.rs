//! Operating-point solvers for cmosopt.
//!
//! This crate sizes a MOSFET for a target drain current and inversion
//! coefficient and solves its bias point with the continuous EKV model from
//! [`cmosopt_devices`]. It provides:
//!
//! - Newton inversion of the drain-current model for `Veff` ([`veff_from_id`])
//! - Central-difference transconductance ([`transconductance`])
//! - Differential-pair balance and 1-dB compression ([`balance_pair`],
//!   [`compression_point`])
//! - The sizing and operating-point orchestrator ([`calc_mos_params`])
//! - Small-signal figures of merit ([`Figures`])
//!
//! # Example
//!
//! ```
//! use cmosopt_devices::ProcessParams;
//! use cmosopt_solver::{OperatingConditions, SolveOptions, calc_mos_params};
//!
//! let process = ProcessParams::default();
//! let conditions = OperatingConditions {
//!     id: 100.0,
//!     l_drawn: 1.0,
//!     ..Default::default()
//! };
//! let design = calc_mos_params(&process, &conditions, &SolveOptions::default()).unwrap();
//!
//! assert!(design.op.vgs < process.vddmax);
//! let gm = design.transconductance().unwrap();
//! assert!(gm > 0.0);
//! ```

pub mod conditions;
pub mod error;
pub mod figures;
pub mod inversion;
mod newton;
pub mod operating_point;
pub mod pair;

pub use conditions::OperatingConditions;
pub use error::{Error, Result};
pub use figures::Figures;
pub use inversion::{seed_veff, transconductance, veff_from_id};
pub use operating_point::{
    Design, DeviceGeometry, OperatingPoint, SolveOptions, Warning, calc_mos_params,
};
pub use pair::{
    COMPRESSION_RATIO_1DB, CompressionPoint, PairBalance, balance_pair, compression_point,
};

//! cmosopt command-line tool.
//!
//! Sizes a MOSFET for a target drain current and inversion coefficient and
//! prints the resulting operating point.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use cmosopt_devices::{ProcessParams, VelocitySaturation};
use cmosopt_solver::OperatingConditions;

mod op;
mod output;

#[derive(Parser)]
#[command(name = "cmosopt")]
#[command(about = "Analog MOSFET sizing and operating-point calculator (EKV model)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Size a device and solve its operating point
    Op(OpArgs),

    /// Print a process parameter set as JSON
    Process {
        /// Process parameter file (JSON); the built-in 180 nm set if omitted
        #[arg(long)]
        process: Option<PathBuf>,
    },
}

#[derive(Args)]
pub(crate) struct OpArgs {
    /// Target drain current (uA)
    #[arg(long, default_value = "10")]
    id: f64,

    /// Target inversion coefficient
    #[arg(long, default_value = "1")]
    ic: f64,

    /// Drawn channel length (um)
    #[arg(short = 'l', long, default_value = "0.5")]
    length: f64,

    /// Multiplicity (fingers)
    #[arg(short, long, default_value = "1")]
    m: f64,

    /// Source-body voltage (V)
    #[arg(long, default_value = "0")]
    vsb: f64,

    /// Flicker-noise frequency (Hz)
    #[arg(long, default_value = "1")]
    f_flicker: f64,

    /// Temperature (C)
    #[arg(short, long, default_value = "27")]
    temp: f64,

    /// Velocity-saturation model: none, simple or enhanced
    #[arg(long, default_value = "enhanced")]
    model: VelocitySaturation,

    /// Process parameter file (JSON)
    #[arg(long)]
    process: Option<PathBuf>,

    /// Report transconductance
    #[arg(long)]
    gm: bool,

    /// Report the 1-dB compression point of a differential pair
    #[arg(long)]
    compression: bool,

    /// Report capacitances, fT and noise
    #[arg(long)]
    figures: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,
}

impl OpArgs {
    fn conditions(&self) -> OperatingConditions {
        OperatingConditions {
            id: self.id,
            ic: self.ic,
            l_drawn: self.length,
            m: self.m,
            vsb: self.vsb,
            f_flicker: self.f_flicker,
            temp_c: self.temp,
        }
    }
}

/// Load a process parameter file, or the default set when `path` is `None`.
fn load_process(path: Option<&Path>) -> Result<ProcessParams> {
    let Some(path) = path else {
        return Ok(ProcessParams::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read process file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse process file: {}", path.display()))
}

fn cmd_process(path: Option<&Path>) -> Result<()> {
    let process = load_process(path)?;
    println!("{}", serde_json::to_string_pretty(&process)?);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Op(args) => load_process(args.process.as_deref())
            .and_then(|process| op::run(&process, args)),
        Commands::Process { process } => cmd_process(process.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

//! Operating-point command.

use anyhow::{Context, Result};
use cmosopt_devices::ProcessParams;
use cmosopt_solver::{CompressionPoint, Design, Figures, SolveOptions, calc_mos_params};
use serde::Serialize;

use crate::OpArgs;
use crate::output::{print_report, print_warnings};

/// Everything the `op` command reports.
#[derive(Serialize)]
pub struct OpReport<'a> {
    pub process: &'a str,
    pub design: &'a Design,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<CompressionPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub figures: Option<Figures>,
}

/// Solve and print one operating point.
pub fn run(process: &ProcessParams, args: &OpArgs) -> Result<()> {
    let options = SolveOptions {
        model: args.model,
        ..Default::default()
    };
    let design = calc_mos_params(process, &args.conditions(), &options)
        .context("Operating point solve failed")?;
    print_warnings(&design.warnings);

    let gm = if args.gm || args.figures {
        Some(design.transconductance()?)
    } else {
        None
    };
    let compression = if args.compression {
        Some(
            design
                .compression_point()
                .context("Compression point search failed")?,
        )
    } else {
        None
    };
    let figures = if args.figures {
        Some(design.figures(process)?)
    } else {
        None
    };

    let report = OpReport {
        process: &process.name,
        design: &design,
        gm,
        compression,
        figures,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

//! Text output formatting.

use cmosopt_solver::Warning;

use crate::op::OpReport;

/// Print non-fatal warnings to stderr.
pub fn print_warnings(warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
}

fn row(label: &str, value: f64, unit: &str) {
    println!("  {:<24} {:>14.6} {}", label, value, unit);
}

/// Print the operating-point report as a labelled table.
pub fn print_report(report: &OpReport<'_>) {
    let design = report.design;
    let c = &design.conditions;
    let g = &design.geometry;
    let op = &design.op;

    println!("Operating Point ({}, {} model)", report.process, design.adjusted.model);
    println!("=========================================");
    println!();

    println!("Conditions:");
    row("Id", c.id, "uA");
    row("IC'", c.ic, "");
    row("Vsb", c.vsb, "V");
    row("Temperature", c.temp_c, "C");
    println!();

    println!("Geometry:");
    row("W", g.w, "um");
    row("L", g.l, "um");
    row("W drawn", g.w_drawn, "um");
    row("L drawn", g.l_drawn, "um");
    row("W per finger", g.w_finger, "um");
    println!("  {:<24} {:>14}", "Fingers", g.fingers);
    row("W/L", g.aspect_ratio(), "");
    println!();

    println!("Bias:");
    row("Vt", op.vt, "V");
    row("Veff", op.veff, "V");
    row("Vgs", op.vgs, "V");
    row("n", op.n, "");
    row("IC", op.ic, "");
    row("Vdsat", op.vdsat, "V");

    if let Some(gm) = report.gm {
        row("gm", gm, "uS");
    }

    if let Some(cp) = &report.compression {
        println!();
        println!("Differential pair:");
        row("Vindif (1 dB)", cp.vindif, "V");
        row("Idif", cp.id_dif, "uA");
        row("Idif (linear)", cp.id_dif_linear, "uA");
    }

    if let Some(f) = &report.figures {
        println!();
        println!("Figures of merit:");
        row("gm/Id", f.gm_over_id, "1/V");
        row("gmb", f.gmb, "uS");
        row("Cgsi", f.cgsi, "fF");
        row("Cgbi", f.cgbi, "fF");
        row("Cgso", f.cgso, "fF");
        row("Cgdo", f.cgdo, "fF");
        row("Cgg", f.cgg(), "fF");
        row("fT", f.ft, "GHz");
        row("Thermal noise", f.thermal_noise, "nV/rtHz");
        match f.flicker_psd {
            Some(psd) => row("Flicker noise", psd.sqrt(), "nV/rtHz"),
            None => println!("  {:<24} {:>14}", "Flicker noise", "-"),
        }
        row("Flicker corner", f.flicker_corner, "Hz");
    }
}

use super::{load_session, save_session};
use crate::cli::DoseResponseArgs;
use crate::error::{CliError, Result};
use tracing::info;
use wellplate::core::io::concentrations::{dilution_series, parse_concentrations};
use wellplate::core::models::error::StateError;
use wellplate::core::models::experiment::Experiment;
use wellplate::workflows::dose_response::{self, DoseResponseReport};

pub fn run(args: DoseResponseArgs) -> Result<()> {
    let mut experiment = load_session(&args.session.path)?;
    let concentrations = resolve_concentrations(&experiment, &args)?;
    info!("Fitting '{}' over {} dose levels", args.group, concentrations.len());

    let report = dose_response::run(&experiment, &args.group, &concentrations)?;
    print_report(&report);

    if args.save {
        experiment.set_concentrations(&args.group, concentrations)?;
        save_session(&experiment, &args.session.path)?;
        println!("  Concentrations saved to: {}", args.session.path.display());
    }
    Ok(())
}

/// Concentrations from `--concentrations` or `--series`, falling back to the
/// series already stored on the group.
fn resolve_concentrations(experiment: &Experiment, args: &DoseResponseArgs) -> Result<Vec<f64>> {
    if let Some(list) = &args.concentrations {
        return Ok(parse_concentrations(list));
    }
    if let Some(series) = &args.series {
        return parse_series(series);
    }
    let group = experiment
        .group(&args.group)
        .ok_or_else(|| StateError::UnknownGroup(args.group.clone()))?;
    if group.kind.concentrations().is_empty() {
        return Err(CliError::Argument(format!(
            "group '{}' has no stored concentrations; pass --concentrations or --series",
            args.group
        )));
    }
    Ok(group.kind.concentrations().to_vec())
}

fn parse_series(text: &str) -> Result<Vec<f64>> {
    let invalid = || {
        CliError::Argument(format!(
            "Invalid --series '{}'. Expected START,FACTOR,POINTS (e.g., 1000,10,4).",
            text
        ))
    };
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    let [start, factor, points] = parts.as_slice() else {
        return Err(invalid());
    };
    let start: f64 = start.parse().map_err(|_| invalid())?;
    let factor: f64 = factor.parse().map_err(|_| invalid())?;
    let points: usize = points.parse().map_err(|_| invalid())?;
    dilution_series(start, factor, points).map_err(|e| CliError::Argument(e.to_string()))
}

fn print_report(report: &DoseResponseReport) {
    println!(
        "Dose response for '{}' ({} replicates per level):",
        report.group, report.replicates
    );
    println!("{:>14} {:>12}", "Concentration", "Response %");
    for point in &report.points {
        println!("{:>14} {:>12.2}", point.concentration, point.response);
    }
    let fit = &report.fit;
    match fit.ic50 {
        Some(ic50) => println!("  IC50:       {:.4}", ic50),
        None => println!("  IC50:       not determined"),
    }
    println!("  Hill slope: {:.3}", fit.hill_slope);
    println!("  Top:        {:.2}", fit.top);
    println!("  Bottom:     {:.2}", fit.bottom);
}

use super::{create_output, load_session};
use crate::cli::AnalyzeArgs;
use crate::error::Result;
use std::collections::HashMap;
use std::fmt::Write;
use tracing::info;
use wellplate::core::io::export;
use wellplate::core::models::error::StateError;
use wellplate::core::models::experiment::Experiment;
use wellplate::engine::statistics;
use wellplate::workflows::analyze::{self, AnalysisReport};

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let mut experiment = load_session(&args.session.path)?;
    apply_overrides(&mut experiment, &args)?;

    let report = analyze::run(&experiment);
    print!("{}", render_report(&report));

    if let Some(mode) = args.heatmap {
        println!("\nHeatmap ({}):", mode);
        print!("{}", render_heatmap(&experiment));
    }

    if let Some(path) = &args.output {
        let rows = export::write_results_csv(&report.summaries, create_output(path)?)?;
        println!("  Results CSV ({} rows) written to: {}", rows, path.display());
    }
    Ok(())
}

fn apply_overrides(experiment: &mut Experiment, args: &AnalyzeArgs) -> Result<()> {
    for group in [&args.blank, &args.positive].into_iter().flatten() {
        if !experiment.has_group(group) {
            return Err(StateError::UnknownGroup(group.clone()).into());
        }
    }
    if let Some(blank) = &args.blank {
        info!("Using '{}' as the blank control", blank);
        experiment.analysis.blank_control_group = Some(blank.clone());
    }
    if let Some(positive) = &args.positive {
        info!("Using '{}' as the positive control", positive);
        experiment.analysis.positive_control_group = Some(positive.clone());
    }
    if let Some(target) = &args.target {
        experiment.data.set_active_target(target)?;
    }
    if let Some(mode) = args.heatmap {
        experiment.analysis.heatmap_mode = mode;
    }
    Ok(())
}

fn render_report(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Target '{}': blank {:.4}, positive {:.4}, range {:.4}",
        report.target, report.blank_average, report.positive_average, report.range
    );
    if report.summaries.is_empty() {
        let _ = writeln!(out, "No group has measured wells for this target.");
        return out;
    }
    let _ = writeln!(
        out,
        "{:<20} {:>4} {:>12} {:>12} {:>12}",
        "Group", "n", "Mean", "StdDev", "Normalized %"
    );
    for summary in &report.summaries {
        let _ = writeln!(
            out,
            "{:<20} {:>4} {:>12.4} {:>12.4} {:>12.2}",
            summary.group, summary.count, summary.mean, summary.std_dev, summary.normalized_mean
        );
    }
    out
}

/// Plate-shaped grid of the heatmap values; unmeasured wells show as `.`.
fn render_heatmap(experiment: &Experiment) -> String {
    let values: HashMap<String, f64> = statistics::heatmap_values(experiment).into_iter().collect();
    let plate = experiment.plate();
    let geometry = plate.geometry();

    let mut out = String::from("  ");
    for col in 1..=geometry.cols {
        let _ = write!(out, " {:>9}", col);
    }
    out.push('\n');
    for row in 0..geometry.rows {
        out.push(geometry.row_labels[row]);
        out.push(' ');
        for col in 0..geometry.cols {
            let cell = plate
                .well_name(row, col)
                .and_then(|well| values.get(&well).copied());
            match cell {
                Some(value) => {
                    let _ = write!(out, " {:>9.2}", value);
                }
                None => {
                    let _ = write!(out, " {:>9}", ".");
                }
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use wellplate::core::models::experiment::HeatmapMode;
    use wellplate::core::models::layout::WellAssignment;
    use wellplate::core::models::plate::PlateFormat;

    fn experiment() -> Experiment {
        let mut exp = Experiment::new(PlateFormat::Six);
        exp.add_group("Blank").unwrap();
        exp.add_group("Pos").unwrap();
        for (well, group, value) in [("A1", "Blank", 10.0), ("A2", "Pos", 110.0), ("B3", "Pos", 90.0)] {
            exp.layout.insert(well, WellAssignment::new(group, 1));
            exp.data.set_value(well, "Default", value).unwrap();
        }
        exp.analysis.blank_control_group = Some("Blank".to_string());
        exp.analysis.positive_control_group = Some("Pos".to_string());
        exp
    }

    #[test]
    fn heatmap_is_plate_shaped() {
        let mut exp = experiment();
        exp.analysis.heatmap_mode = HeatmapMode::Normalized;
        let grid = render_heatmap(&exp);
        let lines: Vec<&str> = grid.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("A "));
        assert!(lines[1].contains("0.00"));
        assert!(lines[1].contains("111.11"));
        assert!(lines[2].trim_end().ends_with("88.89"));
        assert!(lines[2].contains('.'));
    }

    #[test]
    fn report_lists_groups_in_order() {
        let report = analyze::run(&experiment());
        let text = render_report(&report);
        let blank = text.find("Blank").unwrap();
        let pos = text.find("Pos ").unwrap();
        assert!(blank < pos);
        assert!(text.contains("range 90.0000"));
    }

    #[test]
    fn overrides_must_name_existing_groups() {
        let mut exp = experiment();
        let args = AnalyzeArgs {
            session: crate::cli::SessionArg {
                path: "unused.json".into(),
            },
            blank: Some("Ghost".to_string()),
            positive: None,
            target: None,
            heatmap: None,
            output: None,
        };
        assert!(apply_overrides(&mut exp, &args).is_err());
        assert_eq!(exp.analysis.blank_control_group.as_deref(), Some("Blank"));
    }
}

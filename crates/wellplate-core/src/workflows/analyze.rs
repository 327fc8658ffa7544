use crate::core::models::experiment::Experiment;
use crate::engine::statistics::{self, GroupSummary, Normalizer};
use serde::Serialize;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub target: String,
    pub blank_average: f64,
    pub positive_average: f64,
    pub range: f64,
    pub summaries: Vec<GroupSummary>,
}

/// Summarizes every measured group for the experiment's active target.
#[instrument(skip_all, name = "analysis_workflow")]
pub fn run(experiment: &Experiment) -> AnalysisReport {
    let target = experiment.data.active_target().to_string();
    let normalizer = Normalizer::for_target(experiment, &target);
    if normalizer.range() == 0.0 {
        warn!(
            "Blank and positive controls give a zero range for '{}'; normalized values are all 0",
            target
        );
    }

    let summaries = statistics::analyze(experiment);
    info!(
        "Analyzed {} of {} groups for target '{}'",
        summaries.len(),
        experiment.groups.len(),
        target
    );

    AnalysisReport {
        target,
        blank_average: normalizer.blank_average,
        positive_average: normalizer.positive_average,
        range: normalizer.range(),
        summaries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::layout::WellAssignment;
    use crate::core::models::plate::PlateFormat;

    #[test]
    fn report_carries_control_averages_and_summaries() {
        let mut exp = Experiment::new(PlateFormat::Six);
        exp.add_group("Blank").unwrap();
        exp.add_group("Pos").unwrap();
        exp.add_group("Empty").unwrap();
        for (well, group, rep, value) in [
            ("A1", "Blank", 1, 2.0),
            ("A2", "Blank", 2, 4.0),
            ("B1", "Pos", 1, 50.0),
            ("B2", "Pos", 2, 54.0),
        ] {
            exp.layout.insert(well, WellAssignment::new(group, rep));
            exp.data.set_value(well, "Default", value).unwrap();
        }
        exp.analysis.blank_control_group = Some("Blank".to_string());
        exp.analysis.positive_control_group = Some("Pos".to_string());

        let report = run(&exp);
        assert_eq!(report.target, "Default");
        assert_eq!(report.blank_average, 3.0);
        assert_eq!(report.positive_average, 52.0);
        assert_eq!(report.range, 49.0);
        assert_eq!(report.summaries.len(), 2);
        assert!((report.summaries[1].normalized_mean - 100.0).abs() < 1e-9);
    }
}

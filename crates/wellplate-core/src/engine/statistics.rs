//! Descriptive statistics and control-based normalization.

use crate::core::models::experiment::{Experiment, HeatmapMode};
use crate::core::models::layout::LayoutAssignment;
use crate::core::models::measurements::MeasurementTable;
use crate::core::models::plate::PlateFormat;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupStats {
    pub mean: f64,
    pub std_dev: f64,
}

/// Arithmetic mean and sample (n − 1) standard deviation.
///
/// The standard deviation is `0` for fewer than two values, and the mean of an
/// empty slice is `0`.
pub fn group_stats(values: &[f64]) -> GroupStats {
    let n = values.len();
    if n == 0 {
        return GroupStats {
            mean: 0.0,
            std_dev: 0.0,
        };
    }
    let mean = mean(values);
    let std_dev = if n > 1 {
        let sum_sq: f64 = values.iter().map(|x| (x - mean).powi(2)).sum();
        (sum_sq / (n - 1) as f64).sqrt()
    } else {
        0.0
    };
    GroupStats { mean, std_dev }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Measured values of `group`'s wells for `target`, in canonical well order.
/// Wells without a value are skipped.
pub fn raw_values(
    plate: PlateFormat,
    layout: &LayoutAssignment,
    table: &MeasurementTable,
    group: &str,
    target: &str,
) -> Vec<f64> {
    layout
        .wells_of(plate, group)
        .iter()
        .filter_map(|well| table.value(well, target))
        .collect()
}

/// Average of the measured values of a control group, or `0` when the group is
/// unset or has no measured wells.
pub fn control_average(
    plate: PlateFormat,
    layout: &LayoutAssignment,
    table: &MeasurementTable,
    group: Option<&str>,
    target: &str,
) -> f64 {
    let Some(group) = group else {
        return 0.0;
    };
    let values = raw_values(plate, layout, table, group, target);
    if values.is_empty() {
        0.0
    } else {
        mean(&values)
    }
}

/// Rescales `raw` to percent of the blank → positive control range.
///
/// A zero range (flat or missing controls) maps every value to `0`.
pub fn normalize(raw: f64, blank_average: f64, positive_average: f64) -> f64 {
    let range = positive_average - blank_average;
    if range != 0.0 {
        (raw - blank_average) / range * 100.0
    } else {
        0.0
    }
}

/// Blank and positive control averages for one target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Normalizer {
    pub blank_average: f64,
    pub positive_average: f64,
}

impl Normalizer {
    pub fn new(blank_average: f64, positive_average: f64) -> Self {
        Self {
            blank_average,
            positive_average,
        }
    }

    /// Control averages for the experiment's active target.
    pub fn for_experiment(experiment: &Experiment) -> Self {
        Self::for_target(experiment, experiment.data.active_target())
    }

    pub fn for_target(experiment: &Experiment, target: &str) -> Self {
        let plate = experiment.plate();
        let average = |group: &Option<String>| {
            control_average(
                plate,
                &experiment.layout,
                &experiment.data,
                group.as_deref(),
                target,
            )
        };
        Self {
            blank_average: average(&experiment.analysis.blank_control_group),
            positive_average: average(&experiment.analysis.positive_control_group),
        }
    }

    pub fn range(&self) -> f64 {
        self.positive_average - self.blank_average
    }

    pub fn normalize(&self, raw: f64) -> f64 {
        normalize(raw, self.blank_average, self.positive_average)
    }

    pub fn normalize_all(&self, raw: &[f64]) -> Vec<f64> {
        raw.iter().map(|&v| self.normalize(v)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub group: String,
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub normalized_mean: f64,
}

/// Per-group statistics for the active target, in group-list order.
///
/// Groups without a single measured well are left out. `normalized_mean` is
/// the mean of the per-well normalized values.
pub fn analyze(experiment: &Experiment) -> Vec<GroupSummary> {
    let target = experiment.data.active_target();
    let normalizer = Normalizer::for_target(experiment, target);
    let plate = experiment.plate();

    experiment
        .groups
        .iter()
        .filter_map(|group| {
            let raw = raw_values(
                plate,
                &experiment.layout,
                &experiment.data,
                &group.name,
                target,
            );
            if raw.is_empty() {
                return None;
            }
            let stats = group_stats(&raw);
            let normalized = normalizer.normalize_all(&raw);
            Some(GroupSummary {
                group: group.name.clone(),
                count: raw.len(),
                mean: stats.mean,
                std_dev: stats.std_dev,
                normalized_mean: mean(&normalized),
            })
        })
        .collect()
}

/// Per-well values for a heatmap of the active target, in canonical well order.
pub fn heatmap_values(experiment: &Experiment) -> Vec<(String, f64)> {
    let target = experiment.data.active_target();
    let normalizer = Normalizer::for_target(experiment, target);
    experiment
        .plate()
        .well_order()
        .filter_map(|well| {
            let raw = experiment.data.value(&well, target)?;
            let value = match experiment.analysis.heatmap_mode {
                HeatmapMode::Raw => raw,
                HeatmapMode::Normalized => normalizer.normalize(raw),
            };
            Some((well, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::layout::WellAssignment;

    const EPS: f64 = 1e-9;

    fn experiment() -> Experiment {
        let mut exp = Experiment::new(PlateFormat::Six);
        for name in ["Blank", "Pos", "Drug", "Unmeasured"] {
            exp.add_group(name).unwrap();
        }
        let wells = [
            ("A1", "Blank", 10.0),
            ("A2", "Blank", 12.0),
            ("A3", "Pos", 110.0),
            ("B1", "Pos", 112.0),
            ("B2", "Drug", 36.0),
            ("B3", "Drug", 86.0),
        ];
        for (i, (well, group, value)) in wells.iter().enumerate() {
            exp.layout.insert(well, WellAssignment::new(group, i % 2 + 1));
            exp.data.set_value(well, "Default", *value).unwrap();
        }
        exp
    }

    #[test]
    fn group_stats_uses_sample_standard_deviation() {
        let stats = group_stats(&[2.0, 4.0, 6.0]);
        assert!((stats.mean - 4.0).abs() < EPS);
        assert!((stats.std_dev - 2.0).abs() < EPS);
    }

    #[test]
    fn group_stats_defines_zero_spread_for_short_inputs() {
        let empty = group_stats(&[]);
        assert_eq!(empty.std_dev, 0.0);
        assert!(!empty.mean.is_nan());
        let single = group_stats(&[7.5]);
        assert_eq!(single.mean, 7.5);
        assert_eq!(single.std_dev, 0.0);
    }

    #[test]
    fn normalize_maps_controls_to_zero_and_hundred() {
        assert!((normalize(10.0, 10.0, 110.0) - 0.0).abs() < EPS);
        assert!((normalize(110.0, 10.0, 110.0) - 100.0).abs() < EPS);
        assert!((normalize(60.0, 10.0, 110.0) - 50.0).abs() < EPS);
    }

    #[test]
    fn normalize_with_flat_controls_returns_zero() {
        for raw in [-5.0, 0.0, 3.0, 1e9] {
            assert_eq!(normalize(raw, 4.0, 4.0), 0.0);
        }
    }

    #[test]
    fn control_average_is_zero_when_unset_or_unmeasured() {
        let exp = experiment();
        let plate = exp.plate();
        assert_eq!(
            control_average(plate, &exp.layout, &exp.data, None, "Default"),
            0.0
        );
        assert_eq!(
            control_average(plate, &exp.layout, &exp.data, Some("Unmeasured"), "Default"),
            0.0
        );
        let blank = control_average(plate, &exp.layout, &exp.data, Some("Blank"), "Default");
        assert!((blank - 11.0).abs() < EPS);
    }

    #[test]
    fn analyze_reports_measured_groups_only() {
        let mut exp = experiment();
        exp.analysis.blank_control_group = Some("Blank".to_string());
        exp.analysis.positive_control_group = Some("Pos".to_string());

        let summaries = analyze(&exp);
        let names: Vec<&str> = summaries.iter().map(|s| s.group.as_str()).collect();
        assert_eq!(names, vec!["Blank", "Pos", "Drug"]);

        let drug = &summaries[2];
        assert_eq!(drug.count, 2);
        assert!((drug.mean - 61.0).abs() < EPS);
        // Blank 11, positive 111: drug wells normalize to 25% and 75%.
        assert!((drug.normalized_mean - 50.0).abs() < EPS);
        assert!((summaries[0].normalized_mean - 0.0).abs() < EPS);
        assert!((summaries[1].normalized_mean - 100.0).abs() < EPS);
    }

    #[test]
    fn normalized_mean_matches_normalized_raw_mean() {
        let mut exp = experiment();
        exp.analysis.blank_control_group = Some("Blank".to_string());
        exp.analysis.positive_control_group = Some("Pos".to_string());
        let normalizer = Normalizer::for_experiment(&exp);
        for summary in analyze(&exp) {
            assert!((summary.normalized_mean - normalizer.normalize(summary.mean)).abs() < 1e-6);
        }
    }

    #[test]
    fn analyze_without_controls_reports_zero_normalized_means() {
        let exp = experiment();
        for summary in analyze(&exp) {
            assert_eq!(summary.normalized_mean, 0.0);
        }
    }

    #[test]
    fn analyze_uses_active_target_only() {
        let mut exp = experiment();
        exp.data.add_target("IL-6").unwrap();
        exp.data.set_value("B2", "IL-6", 5.0).unwrap();
        let summaries = analyze(&exp);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].group, "Drug");
        assert_eq!(summaries[0].mean, 5.0);
    }

    #[test]
    fn heatmap_values_follow_mode() {
        let mut exp = experiment();
        exp.analysis.blank_control_group = Some("Blank".to_string());
        exp.analysis.positive_control_group = Some("Pos".to_string());

        let raw = heatmap_values(&exp);
        assert_eq!(raw.len(), 6);
        assert_eq!(raw[0], ("A1".to_string(), 10.0));

        exp.analysis.heatmap_mode = HeatmapMode::Normalized;
        let normalized = heatmap_values(&exp);
        assert!((normalized[4].1 - 25.0).abs() < EPS);
    }
}

use crate::core::models::error::StateError;
use crate::core::models::experiment::Experiment;
use crate::engine::dose_response::{DosePoint, FourPlFit, fit_four_pl};
use crate::engine::error::AnalysisError;
use crate::engine::statistics::{Normalizer, mean, raw_values};
use serde::Serialize;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoseResponseReport {
    pub group: String,
    pub replicates: usize,
    pub points: Vec<DosePoint>,
    pub fit: FourPlFit,
}

/// Collapses per-well values into one point per concentration.
///
/// `values` are split into `concentrations.len()` contiguous runs of equal
/// length, in order, and each run is averaged. The value count must be a
/// whole multiple of the concentration count.
pub fn average_replicates(
    values: &[f64],
    concentrations: &[f64],
) -> Result<Vec<DosePoint>, AnalysisError> {
    let levels = concentrations.len();
    if levels == 0 || values.is_empty() || values.len() % levels != 0 {
        return Err(AnalysisError::DataMismatch(format!(
            "the number of data points ({}) is not an even multiple of the number of concentrations ({})",
            values.len(),
            levels
        )));
    }
    let replicates = values.len() / levels;
    Ok(values
        .chunks(replicates)
        .zip(concentrations)
        .map(|(run, &concentration)| DosePoint::new(concentration, mean(run)))
        .collect())
}

/// Normalizes a dose-response group's readings, averages replicates per
/// concentration, and estimates the 4PL parameters.
///
/// Readings are taken in canonical well order, so the first run of wells
/// belongs to the first concentration.
#[instrument(skip(experiment, concentrations), name = "dose_response_workflow")]
pub fn run(
    experiment: &Experiment,
    group: &str,
    concentrations: &[f64],
) -> Result<DoseResponseReport, AnalysisError> {
    if !experiment.has_group(group) {
        return Err(StateError::UnknownGroup(group.to_string()).into());
    }
    let target = experiment.data.active_target();
    let raw = raw_values(
        experiment.plate(),
        &experiment.layout,
        &experiment.data,
        group,
        target,
    );
    let normalizer = Normalizer::for_target(experiment, target);
    let normalized = normalizer.normalize_all(&raw);
    debug!(
        "Normalized {} readings with blank {:.4} and range {:.4}",
        normalized.len(),
        normalizer.blank_average,
        normalizer.range()
    );

    let points = average_replicates(&normalized, concentrations)?;
    let fit = fit_four_pl(&points)?;
    info!(
        "4PL estimate for '{}': IC50 {:?}, Hill slope {:.2}",
        group, fit.ic50, fit.hill_slope
    );

    Ok(DoseResponseReport {
        group: group.to_string(),
        replicates: raw.len() / concentrations.len(),
        points,
        fit,
    })
}

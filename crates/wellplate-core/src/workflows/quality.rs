use crate::core::models::error::StateError;
use crate::core::models::experiment::Experiment;
use crate::engine::error::AnalysisError;
use crate::engine::quality::{self, ZFactor};
use crate::engine::statistics::raw_values;
use tracing::{info, instrument};

/// Z′-factor of two groups' raw readings for the active target.
#[instrument(skip(experiment), name = "assay_quality_workflow")]
pub fn run(experiment: &Experiment, positive: &str, negative: &str) -> Result<ZFactor, AnalysisError> {
    for group in [positive, negative] {
        if !experiment.has_group(group) {
            return Err(StateError::UnknownGroup(group.to_string()).into());
        }
    }
    let target = experiment.data.active_target();
    let values = |group: &str| {
        raw_values(
            experiment.plate(),
            &experiment.layout,
            &experiment.data,
            group,
            target,
        )
    };

    let result = quality::z_factor(&values(positive), &values(negative))?;
    info!(
        "Z'-factor for '{}' vs '{}' on '{}': {:.3} ({})",
        positive, negative, target, result.value, result.classification
    );
    Ok(result)
}

use super::traits::ExperimentFile;
use crate::core::models::experiment::Experiment;
use std::collections::HashSet;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed session JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Inconsistent session: {0}")]
    Inconsistency(String),
}

/// JSON session snapshot: `{ settings, groups, layout, data, analysis }`.
pub struct SessionFile;

impl SessionFile {
    pub fn from_json_str(json: &str) -> Result<Experiment, SessionError> {
        let experiment: Experiment = serde_json::from_str(json)?;
        validate(&experiment)?;
        Ok(experiment)
    }

    pub fn to_json_string(experiment: &Experiment) -> Result<String, SessionError> {
        Ok(serde_json::to_string_pretty(experiment)?)
    }
}

impl ExperimentFile for SessionFile {
    type Error = SessionError;

    fn read_from(reader: &mut impl BufRead) -> Result<Experiment, Self::Error> {
        let experiment: Experiment = serde_json::from_reader(reader)?;
        validate(&experiment)?;
        debug!(
            "Loaded session '{}' with {} groups and {} occupied wells",
            experiment.settings.exp_name,
            experiment.groups.len(),
            experiment.layout.len()
        );
        Ok(experiment)
    }

    fn write_to(experiment: &Experiment, writer: &mut impl Write) -> Result<(), Self::Error> {
        serde_json::to_writer_pretty(&mut *writer, experiment)?;
        writeln!(writer)?;
        Ok(())
    }
}

fn validate(experiment: &Experiment) -> Result<(), SessionError> {
    let plate = experiment.plate();

    let mut names = HashSet::new();
    for group in &experiment.groups {
        if group.name.trim().is_empty() {
            return Err(SessionError::Inconsistency(
                "group with an empty name".to_string(),
            ));
        }
        if !names.insert(group.name.as_str()) {
            return Err(SessionError::Inconsistency(format!(
                "group '{}' is defined more than once",
                group.name
            )));
        }
    }

    for (well, assignment) in experiment.layout.iter() {
        if !plate.contains(well) {
            return Err(SessionError::Inconsistency(format!(
                "layout well '{}' is not on a {} plate",
                well, plate
            )));
        }
        if !names.contains(assignment.group.as_str()) {
            return Err(SessionError::Inconsistency(format!(
                "well '{}' references unknown group '{}'",
                well, assignment.group
            )));
        }
    }

    for group in &experiment.groups {
        let replicates: Vec<usize> = experiment
            .layout
            .wells_of(plate, &group.name)
            .iter()
            .filter_map(|well| experiment.layout.get(well).map(|a| a.replicate))
            .collect();
        if replicates.iter().copied().ne(1..=replicates.len()) {
            return Err(SessionError::Inconsistency(format!(
                "replicates of group '{}' are {:?}, expected 1..={} in well order",
                group.name,
                replicates,
                replicates.len()
            )));
        }
    }

    let data = &experiment.data;
    let mut targets = HashSet::new();
    if let Some(duplicate) = data.targets().iter().find(|t| !targets.insert(t.as_str())) {
        return Err(SessionError::Inconsistency(format!(
            "target '{}' is listed more than once",
            duplicate
        )));
    }
    if let Some(well) = data.wells().find(|well| !plate.contains(well)) {
        return Err(SessionError::Inconsistency(format!(
            "measured well '{}' is not on a {} plate",
            well, plate
        )));
    }
    if data.targets().is_empty() || !data.has_target(data.active_target()) {
        return Err(SessionError::Inconsistency(format!(
            "active target '{}' is not among the data targets",
            data.active_target()
        )));
    }
    Ok(())
}

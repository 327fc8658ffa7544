use crate::core::models::layout::LayoutAssignment;
use crate::core::models::plate::PlateFormat;
use crate::engine::statistics::GroupSummary;
use serde::Serialize;
use std::io::Write;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Serialize)]
struct LayoutRow<'a> {
    #[serde(rename = "Well")]
    well: &'a str,
    #[serde(rename = "Group")]
    group: &'a str,
    #[serde(rename = "Replicate")]
    replicate: usize,
}

#[derive(Serialize)]
struct ResultRow<'a> {
    #[serde(rename = "Group")]
    group: &'a str,
    #[serde(rename = "Mean")]
    mean: f64,
    #[serde(rename = "StdDev")]
    std_dev: f64,
    #[serde(rename = "NormalizedMean")]
    normalized_mean: f64,
}

/// Writes `Well,Group,Replicate` rows for occupied wells in canonical order.
pub fn write_layout_csv(
    plate: PlateFormat,
    layout: &LayoutAssignment,
    writer: impl Write,
) -> Result<usize, ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    let entries = layout.entries(plate);
    if entries.is_empty() {
        csv.write_record(["Well", "Group", "Replicate"])?;
    }
    for (well, assignment) in &entries {
        csv.serialize(LayoutRow {
            well,
            group: &assignment.group,
            replicate: assignment.replicate,
        })?;
    }
    csv.flush()?;
    Ok(entries.len())
}

/// Writes `Group,Mean,StdDev,NormalizedMean` rows, one per summary.
pub fn write_results_csv(
    summaries: &[GroupSummary],
    writer: impl Write,
) -> Result<usize, ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    if summaries.is_empty() {
        csv.write_record(["Group", "Mean", "StdDev", "NormalizedMean"])?;
    }
    for summary in summaries {
        csv.serialize(ResultRow {
            group: &summary.group,
            mean: summary.mean,
            std_dev: summary.std_dev,
            normalized_mean: summary.normalized_mean,
        })?;
    }
    csv.flush()?;
    Ok(summaries.len())
}

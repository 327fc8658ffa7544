use super::error::StateError;
use super::plate::PlateFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

pub const DEFAULT_TARGET: &str = "Default";

/// Per-well measured values, keyed by target name.
///
/// A missing entry means "not measured"; it is never read as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementTable {
    targets: Vec<String>,
    values: BTreeMap<String, BTreeMap<String, f64>>,
    active_target: String,
}

impl Default for MeasurementTable {
    fn default() -> Self {
        Self {
            targets: vec![DEFAULT_TARGET.to_string()],
            values: BTreeMap::new(),
            active_target: DEFAULT_TARGET.to_string(),
        }
    }
}

impl MeasurementTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn active_target(&self) -> &str {
        &self.active_target
    }

    pub fn has_target(&self, name: &str) -> bool {
        self.targets.iter().any(|t| t == name)
    }

    /// Adds a target and makes it active.
    pub fn add_target(&mut self, name: &str) -> Result<(), StateError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StateError::EmptyName);
        }
        if self.has_target(name) {
            return Err(StateError::DuplicateTarget(name.to_string()));
        }
        self.targets.push(name.to_string());
        self.active_target = name.to_string();
        Ok(())
    }

    /// Removes a target and every value recorded for it.
    pub fn remove_target(&mut self, name: &str) -> Result<(), StateError> {
        if !self.has_target(name) {
            return Err(StateError::UnknownTarget(name.to_string()));
        }
        if self.targets.len() <= 1 {
            return Err(StateError::LastTarget);
        }
        self.targets.retain(|t| t != name);
        if self.active_target == name {
            self.active_target = self.targets[0].clone();
        }
        for well_values in self.values.values_mut() {
            well_values.remove(name);
        }
        self.values.retain(|_, v| !v.is_empty());
        Ok(())
    }

    pub fn set_active_target(&mut self, name: &str) -> Result<(), StateError> {
        if !self.has_target(name) {
            return Err(StateError::UnknownTarget(name.to_string()));
        }
        self.active_target = name.to_string();
        Ok(())
    }

    pub fn value(&self, well: &str, target: &str) -> Option<f64> {
        self.values.get(well).and_then(|v| v.get(target)).copied()
    }

    pub fn set_value(&mut self, well: &str, target: &str, value: f64) -> Result<(), StateError> {
        if !self.has_target(target) {
            return Err(StateError::UnknownTarget(target.to_string()));
        }
        if !value.is_finite() {
            return Err(StateError::NonFiniteValue(well.to_string()));
        }
        self.values
            .entry(well.to_string())
            .or_default()
            .insert(target.to_string(), value);
        Ok(())
    }

    pub fn clear_value(&mut self, well: &str, target: &str) -> Option<f64> {
        let removed = self.values.get_mut(well)?.remove(target);
        if self.values.get(well).is_some_and(|v| v.is_empty()) {
            self.values.remove(well);
        }
        removed
    }

    /// Wells holding at least one value, in lexical order.
    pub fn wells(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of wells holding a value for `target`.
    pub fn measured_count(&self, target: &str) -> usize {
        self.values.values().filter(|v| v.contains_key(target)).count()
    }

    /// Writes a pasted grid of values into the active target.
    ///
    /// Rows are separated by newlines and cells by tabs or commas; cell `(r, c)`
    /// lands on well `<row label r><c + 1>`. Cells that do not parse as numbers
    /// are skipped. A grid taller than the plate, or whose first row is wider
    /// than the plate, is rejected without writing anything.
    ///
    /// Returns the number of values written.
    pub fn paste_grid(&mut self, plate: PlateFormat, text: &str) -> Result<usize, StateError> {
        let rows: Vec<Vec<&str>> = text
            .trim()
            .lines()
            .map(|line| line.split(['\t', ',']).collect())
            .collect();

        let geometry = plate.geometry();
        let first_width = rows.first().map_or(0, Vec::len);
        if rows.len() > geometry.rows || first_width > geometry.cols {
            return Err(StateError::DataMismatch(format!(
                "pasted data is {}x{} but a {} plate is {}x{}",
                rows.len(),
                first_width,
                plate,
                geometry.rows,
                geometry.cols
            )));
        }

        let mut parsed = Vec::new();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let Some(well) = plate.well_name(r, c) else {
                    continue;
                };
                match cell.trim().parse::<f64>() {
                    Ok(value) if value.is_finite() => parsed.push((well, value)),
                    _ => debug!("Skipping non-numeric cell {:?} at {}", cell, well),
                }
            }
        }

        let target = self.active_target.clone();
        let written = parsed.len();
        for (well, value) in parsed {
            self.values
                .entry(well)
                .or_default()
                .insert(target.clone(), value);
        }
        Ok(written)
    }
}

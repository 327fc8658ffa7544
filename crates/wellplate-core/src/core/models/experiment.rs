use super::error::StateError;
use super::group::{Group, GroupKind, palette_color};
use super::layout::LayoutAssignment;
use super::measurements::MeasurementTable;
use super::plate::PlateFormat;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutDirection {
    #[default]
    ByRow,
    ByColumn,
}

impl FromStr for LayoutDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "by-row" | "row" => Ok(LayoutDirection::ByRow),
            "by-column" | "column" => Ok(LayoutDirection::ByColumn),
            other => Err(format!(
                "Unknown layout direction '{}'. Expected 'by-row' or 'by-column'.",
                other
            )),
        }
    }
}

impl fmt::Display for LayoutDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutDirection::ByRow => f.write_str("by-row"),
            LayoutDirection::ByColumn => f.write_str("by-column"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatmapMode {
    #[default]
    Raw,
    Normalized,
}

impl FromStr for HeatmapMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "raw" => Ok(HeatmapMode::Raw),
            "normalized" => Ok(HeatmapMode::Normalized),
            other => Err(format!(
                "Unknown heatmap mode '{}'. Expected 'raw' or 'normalized'.",
                other
            )),
        }
    }
}

impl fmt::Display for HeatmapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeatmapMode::Raw => f.write_str("raw"),
            HeatmapMode::Normalized => f.write_str("normalized"),
        }
    }
}

/// Control-group selections used for normalization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    #[serde(rename = "blankControl", default, with = "empty_as_none")]
    pub blank_control_group: Option<String>,
    #[serde(rename = "positiveControl", default, with = "empty_as_none")]
    pub positive_control_group: Option<String>,
    #[serde(default)]
    pub heatmap_mode: HeatmapMode,
}

// Sessions store an unset control as "".
mod empty_as_none {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        Ok(raw.filter(|s| !s.trim().is_empty()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentSettings {
    #[serde(default)]
    pub exp_name: String,
    #[serde(default)]
    pub plate_format: PlateFormat,
    #[serde(default = "default_replicates")]
    pub replicates: usize,
    #[serde(default)]
    pub layout_direction: LayoutDirection,
    #[serde(default)]
    pub notes: String,
}

fn default_replicates() -> usize {
    3
}

impl Default for ExperimentSettings {
    fn default() -> Self {
        Self {
            exp_name: String::new(),
            plate_format: PlateFormat::default(),
            replicates: default_replicates(),
            layout_direction: LayoutDirection::default(),
            notes: String::new(),
        }
    }
}

/// A complete experiment snapshot: plate settings, groups, layout, data and
/// analysis selections. This is the shape saved to and loaded from session files.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Experiment {
    #[serde(default)]
    pub settings: ExperimentSettings,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub layout: LayoutAssignment,
    #[serde(default)]
    pub data: MeasurementTable,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl Experiment {
    pub fn new(plate_format: PlateFormat) -> Self {
        Self {
            settings: ExperimentSettings {
                plate_format,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn plate(&self) -> PlateFormat {
        self.settings.plate_format
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.name == name)
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.group(name).is_some()
    }

    /// Adds a `Normal` group, named after the trimmed input, with the next palette color.
    pub fn add_group(&mut self, name: &str) -> Result<&Group, StateError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StateError::EmptyName);
        }
        if self.has_group(name) {
            return Err(StateError::DuplicateGroup(name.to_string()));
        }
        let color = palette_color(self.groups.len());
        self.groups.push(Group::new(name, color));
        debug!("Added group '{}' with color {}", name, color);
        let index = self.groups.len() - 1;
        Ok(&self.groups[index])
    }

    /// Removes a group, every layout entry that references it, and any control
    /// selection pointing at it. Remaining groups are renumbered.
    pub fn remove_group(&mut self, name: &str) -> Result<Group, StateError> {
        let index = self
            .groups
            .iter()
            .position(|g| g.name == name)
            .ok_or_else(|| StateError::UnknownGroup(name.to_string()))?;
        let removed = self.groups.remove(index);

        let cleared = self.layout.remove_group(name);
        let plate = self.plate();
        for group in &self.groups {
            self.layout.renumber(plate, &group.name);
        }

        if self.analysis.blank_control_group.as_deref() == Some(name) {
            self.analysis.blank_control_group = None;
        }
        if self.analysis.positive_control_group.as_deref() == Some(name) {
            self.analysis.positive_control_group = None;
        }

        info!("Removed group '{}' and {} layout entries", name, cleared);
        Ok(removed)
    }

    pub fn set_group_kind(&mut self, name: &str, kind: GroupKind) -> Result<(), StateError> {
        let group = self
            .group_mut(name)
            .ok_or_else(|| StateError::UnknownGroup(name.to_string()))?;
        group.kind = kind;
        Ok(())
    }

    /// Records a dose series on a group, turning it into a dose-response group.
    pub fn set_concentrations(
        &mut self,
        name: &str,
        concentrations: Vec<f64>,
    ) -> Result<(), StateError> {
        self.set_group_kind(name, GroupKind::DoseResponse { concentrations })
    }

    /// Switches plate format. The existing layout and measurements no longer
    /// fit the new geometry and are discarded.
    pub fn set_plate_format(&mut self, format: PlateFormat) {
        if format == self.settings.plate_format {
            return;
        }
        info!(
            "Plate format changed from {} to {}; clearing layout and data",
            self.settings.plate_format, format
        );
        self.settings.plate_format = format;
        self.layout.clear();
        self.data = MeasurementTable::default();
    }

    pub fn clear_layout(&mut self) {
        self.layout.clear();
        self.data = MeasurementTable::default();
    }
}

use crate::cli::DesignArgs;
use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;
use wellplate::core::models::experiment::{Experiment, LayoutDirection};
use wellplate::core::models::group::GroupKind;
use wellplate::core::models::plate::PlateFormat;
use wellplate::engine::config::{LayoutConfig, LayoutConfigBuilder, RandomizationConfig};

const DEFAULT_REPLICATES: usize = 3;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialExperimentSection {
    name: Option<String>,
    notes: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialPlateSection {
    format: Option<String>,
    replicates: Option<usize>,
    direction: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialRandomizationSection {
    enabled: Option<bool>,
    seed: Option<u64>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
struct FileGroup {
    name: String,
    color: Option<String>,
    kind: Option<String>,
    #[serde(default)]
    concentrations: Vec<f64>,
}

/// A design file as written on disk. Every field is optional until merged
/// with the command line.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialDesignConfig {
    experiment: Option<PartialExperimentSection>,
    plate: Option<PartialPlateSection>,
    randomization: Option<PartialRandomizationSection>,
    #[serde(default)]
    groups: Vec<FileGroup>,
}

/// A fully resolved design: the experiment skeleton with its groups, and the
/// layout parameters to generate it with.
#[derive(Debug)]
pub struct DesignPlan {
    pub experiment: Experiment,
    pub layout: LayoutConfig,
}

impl PartialDesignConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading design from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn merge_with_cli(mut self, args: &DesignArgs) -> Result<DesignPlan> {
        self.apply_set_values(&args.set_values)?;

        let experiment_section = self.experiment.take().unwrap_or_default();
        let plate_section = self.plate.take().unwrap_or_default();
        let randomization_section = self.randomization.take().unwrap_or_default();

        let plate_format = match (args.plate_format, plate_section.format) {
            (Some(format), _) => format,
            (None, Some(key)) => PlateFormat::from_str(&key)
                .map_err(|e| CliError::Config(format!("`plate.format`: {}", e)))?,
            (None, None) => PlateFormat::default(),
        };
        let direction = match (args.direction, plate_section.direction) {
            (Some(direction), _) => direction,
            (None, Some(text)) => LayoutDirection::from_str(&text)
                .map_err(|e| CliError::Config(format!("`plate.direction`: {}", e)))?,
            (None, None) => LayoutDirection::default(),
        };
        let replicates = args
            .replicates
            .or(plate_section.replicates)
            .unwrap_or(DEFAULT_REPLICATES);

        let layout = LayoutConfigBuilder::new()
            .plate_format(plate_format)
            .replicates(replicates)
            .direction(direction)
            .randomization(Self::merge_randomization(args, randomization_section))
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        if self.groups.is_empty() {
            return Err(CliError::Config(
                "At least one `[[groups]]` entry is required.".to_string(),
            ));
        }

        let mut experiment = Experiment::new(plate_format);
        experiment.settings.replicates = replicates;
        experiment.settings.layout_direction = direction;
        if let Some(name) = experiment_section.name {
            experiment.settings.exp_name = name;
        }
        if let Some(notes) = experiment_section.notes {
            experiment.settings.notes = notes;
        }
        for group in self.groups {
            Self::add_file_group(&mut experiment, group)?;
        }

        Ok(DesignPlan { experiment, layout })
    }

    fn merge_randomization(
        args: &DesignArgs,
        file: PartialRandomizationSection,
    ) -> Option<RandomizationConfig> {
        let enabled = if args.randomize.no_randomize {
            false
        } else if args.randomize.randomize || args.seed.is_some() {
            true
        } else {
            file.enabled.unwrap_or(false)
        };
        enabled.then(|| RandomizationConfig {
            seed: args.seed.or(file.seed),
        })
    }

    fn add_file_group(experiment: &mut Experiment, group: FileGroup) -> Result<()> {
        let name = experiment.add_group(&group.name)?.name.clone();

        let kind = match group.kind.as_deref() {
            Some(text) => GroupKind::from_str(text)
                .map_err(|e| CliError::Config(format!("group '{}': {}", name, e)))?,
            None if !group.concentrations.is_empty() => GroupKind::DoseResponse {
                concentrations: Vec::new(),
            },
            None => GroupKind::Normal,
        };
        match kind {
            GroupKind::DoseResponse { .. } => {
                experiment.set_concentrations(&name, group.concentrations)?
            }
            GroupKind::Normal if !group.concentrations.is_empty() => {
                return Err(CliError::Config(format!(
                    "group '{}' lists concentrations but is not a dose-response group",
                    name
                )));
            }
            GroupKind::Normal => {}
        }

        if let (Some(color), Some(stored)) = (group.color, experiment.group_mut(&name)) {
            stored.color = color;
        }
        Ok(())
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;

            match key {
                "experiment.name" => {
                    self.experiment.get_or_insert_with(Default::default).name =
                        Some(value_str.to_string());
                }
                "experiment.notes" => {
                    self.experiment.get_or_insert_with(Default::default).notes =
                        Some(value_str.to_string());
                }
                "plate.format" => {
                    self.plate.get_or_insert_with(Default::default).format =
                        Some(value_str.to_string());
                }
                "plate.direction" => {
                    self.plate.get_or_insert_with(Default::default).direction =
                        Some(value_str.to_string());
                }
                "plate.replicates" => {
                    self.plate.get_or_insert_with(Default::default).replicates =
                        Some(parse_value(key, value_str, "integer")?);
                }
                "randomization.enabled" => {
                    self.randomization
                        .get_or_insert_with(Default::default)
                        .enabled = Some(parse_value(key, value_str, "boolean")?);
                }
                "randomization.seed" => {
                    self.randomization.get_or_insert_with(Default::default).seed =
                        Some(parse_value(key, value_str, "integer")?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value))
    })
}

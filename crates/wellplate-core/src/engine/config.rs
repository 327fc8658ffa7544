use crate::core::models::experiment::LayoutDirection;
use crate::core::models::plate::PlateFormat;
use thiserror::Error;

pub use crate::core::models::experiment::{AnalysisConfig, HeatmapMode};

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Parameters for bulk layout generation.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub plate_format: PlateFormat,
    pub replicates: usize,
    pub direction: LayoutDirection,
    pub randomization: Option<RandomizationConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RandomizationConfig {
    /// Fixed seed for a reproducible shuffle; `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

#[derive(Default)]
pub struct LayoutConfigBuilder {
    plate_format: Option<PlateFormat>,
    replicates: Option<usize>,
    direction: Option<LayoutDirection>,
    randomization: Option<RandomizationConfig>,
}

impl LayoutConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plate_format(mut self, format: PlateFormat) -> Self {
        self.plate_format = Some(format);
        self
    }
    pub fn replicates(mut self, replicates: usize) -> Self {
        self.replicates = Some(replicates);
        self
    }
    pub fn direction(mut self, direction: LayoutDirection) -> Self {
        self.direction = Some(direction);
        self
    }
    pub fn randomization(mut self, randomization: Option<RandomizationConfig>) -> Self {
        self.randomization = randomization;
        self
    }

    pub fn build(self) -> Result<LayoutConfig, ConfigError> {
        let replicates = self
            .replicates
            .ok_or(ConfigError::MissingParameter("replicates"))?;
        if replicates == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "replicates",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(LayoutConfig {
            plate_format: self
                .plate_format
                .ok_or(ConfigError::MissingParameter("plate_format"))?,
            replicates,
            direction: self.direction.unwrap_or_default(),
            randomization: self.randomization,
        })
    }
}

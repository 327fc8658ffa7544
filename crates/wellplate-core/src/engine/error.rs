use crate::core::models::error::StateError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum AnalysisError {
    #[error("Not enough wells for this layout: {required} required, {available} available")]
    Capacity { required: usize, available: usize },

    #[error("Data mismatch: {0}")]
    DataMismatch(String),

    #[error("Not enough data: {0}")]
    InsufficientData(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    State(#[from] StateError),
}

use thiserror::Error;

/// Rejected edits to an experiment's groups, layout or measurement table.
///
/// None of these leave partial state behind: an operation that fails has not
/// modified its receiver.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum StateError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Group '{0}' already exists")]
    DuplicateGroup(String),

    #[error("Group '{0}' does not exist")]
    UnknownGroup(String),

    #[error("Target '{0}' already exists")]
    DuplicateTarget(String),

    #[error("Target '{0}' does not exist")]
    UnknownTarget(String),

    #[error("Cannot remove the last data target")]
    LastTarget,

    #[error("Well '{well}' is not on a {plate} plate")]
    UnknownWell { well: String, plate: String },

    #[error("Data mismatch: {0}")]
    DataMismatch(String),

    #[error("Value for well '{0}' is not a finite number")]
    NonFiniteValue(String),
}

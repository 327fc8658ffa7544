//! Input/output for experiment data.
//!
//! Session snapshots are read and written as JSON through the
//! [`traits::ExperimentFile`] interface; layouts and analysis results are
//! exported as CSV; free-text concentration lists are parsed here too.

pub mod concentrations;
pub mod export;
pub mod session;
pub mod traits;

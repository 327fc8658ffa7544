//! # Core Models Module
//!
//! Plain value types describing a plate experiment. Nothing here performs
//! analysis; the types only enforce their own bookkeeping invariants.
//!
//! ## Key Components
//!
//! - [`plate`] - Plate formats, their geometry, and canonical well ordering
//! - [`group`] - Treatment groups and the normal / dose-response distinction
//! - [`layout`] - The well → (group, replicate) assignment
//! - [`measurements`] - Per-well, per-target measured values
//! - [`experiment`] - The full experiment snapshot persisted in session files
//! - [`error`] - Errors raised by rejected state edits
//!
//! ```ignore
//! use wellplate::core::models::{experiment::Experiment, plate::PlateFormat};
//!
//! let mut experiment = Experiment::new(PlateFormat::NinetySix);
//! experiment.add_group("Blank")?;
//! experiment.data.add_target("IL-6")?;
//! ```

pub mod error;
pub mod experiment;
pub mod group;
pub mod layout;
pub mod measurements;
pub mod plate;

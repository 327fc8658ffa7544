//! # Workflows Module
//!
//! High-level entry points that combine the [`crate::core`] models with the
//! [`crate::engine`] algorithms to carry out one experiment task end to end.
//!
//! - **Design** ([`design`]) - Generates, optionally shuffles, and hand-edits the
//!   plate layout of an [`Experiment`](crate::core::models::experiment::Experiment).
//! - **Analysis** ([`analyze`]) - Per-group summaries normalized against the
//!   blank and positive controls of the active target.
//! - **Assay quality** ([`quality`]) - Z′-factor between two control groups.
//! - **Dose response** ([`dose_response`]) - Replicate averaging followed by a
//!   closed-form 4PL estimate.

pub mod analyze;
pub mod design;
pub mod dose_response;
pub mod quality;

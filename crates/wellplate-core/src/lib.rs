//! # WellPlate Core Library
//!
//! Experiment design and analysis for multi-well microplate assays: plate
//! geometry, sample-group layouts, per-well measurements, control-based
//! normalization, assay quality and dose-response estimation.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Plain data models (`PlateFormat`, `Group`,
//!   `LayoutAssignment`, `MeasurementTable`, `Experiment`) together with the
//!   session, CSV and concentration-list I/O.
//!
//! - **[`engine`]: The Logic Core.** Stateless algorithms over those models:
//!   layout generation and randomization, well painting, group statistics,
//!   normalization, the Z′-factor and the 4PL estimator.
//!
//! - **[`workflows`]: The Public API.** Complete procedures that validate their
//!   inputs, drive the engine against an `Experiment`, and report what they did.

pub mod core;
pub mod engine;
pub mod workflows;

//! # Core Module
//!
//! The data layer of the library: plate geometry, experiment state, and
//! file formats.
//!
//! ## Architecture
//!
//! - **Experiment Representation** ([`models`]) - Plates, groups, layouts, measurements
//! - **File I/O** ([`io`]) - Session JSON, CSV exports, concentration parsing
//!
//! Types here are plain values. They keep their own invariants (unique group
//! names, contiguous replicate numbers, at least one data target) but carry no
//! analysis logic; that lives in [`crate::engine`].

pub mod io;
pub mod models;

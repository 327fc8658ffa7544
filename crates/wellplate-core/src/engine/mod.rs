//! # Engine Module
//!
//! The numerical and algorithmic core of the analysis: everything here is a
//! pure function of its inputs (plus a caller-supplied RNG for layout
//! randomization) and owns no state between calls.
//!
//! ## Architecture
//!
//! - **Layout** ([`layout`]) - Bulk generation, Fisher–Yates randomization, paint and erase
//! - **Statistics** ([`statistics`]) - Group mean / sample SD, control averages, normalization
//! - **Assay Quality** ([`quality`]) - Z′-factor and its quality bands
//! - **Dose Response** ([`dose_response`]) - Closed-form 4PL parameter estimation
//! - **Configuration** ([`config`]) - Layout parameters and analysis selections
//! - **Error Handling** ([`error`]) - The capacity / mismatch / insufficient-data taxonomy

pub mod config;
pub mod dose_response;
pub mod error;
pub mod layout;
pub mod quality;
pub mod statistics;

//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - sieve series and their presets (`SieveSeries`, `SievePreset`)
//! - per-sieve measurements (`Measurement`)
//! - calculator outputs (`DistributionRow`, `Distribution`, `SmoothedCurve`)
//! - run configuration and the saved report format (`AnalysisConfig`, `ReportFile`)

pub mod types;

pub use types::*;

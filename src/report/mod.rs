//! Reporting utilities: formatted terminal output for an analysis.

pub mod format;

pub use format::*;

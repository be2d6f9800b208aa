//! `granulo` library crate.
//!
//! The binary (`granulo`) is a thin wrapper around this library so that:
//!
//! - the distribution math is testable without spawning processes
//! - modules are reusable (e.g., a future GUI form or batch importer)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod distribution;
pub mod domain;
pub mod error;
pub mod form;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;

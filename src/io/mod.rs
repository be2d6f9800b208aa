//! Input/output helpers.
//!
//! - CSV measurement sheets (`ingest`)
//! - distribution table export (`export`)
//! - report JSON read/write (`curve`)

pub mod curve;
pub mod export;
pub mod ingest;

pub use curve::*;
pub use export::*;
pub use ingest::*;

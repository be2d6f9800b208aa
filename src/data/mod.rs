//! Data sources other than user input.
//!
//! - `sample`: seeded synthetic sieve sheets

pub mod sample;

pub use sample::{SampleConfig, SampleSheet, generate_sample, write_sheet_csv};

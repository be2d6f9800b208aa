//! The distribution calculator.
//!
//! Responsibilities:
//!
//! - turn per-sieve retained masses into the cumulative distribution table
//! - smooth the passing percentages over a log-spaced diameter grid
//!
//! Both operations are pure: every input is a parameter and every result is a
//! new value.

pub mod smoothing;
pub mod table;

pub use smoothing::*;
pub use table::*;

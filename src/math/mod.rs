//! Mathematical utilities: log grids, interpolation, and dense linear solves.

pub mod grid;
pub mod pchip;
pub mod solve;
pub mod spline;

pub use grid::*;
pub use pchip::*;
pub use solve::*;
pub use spline::*;

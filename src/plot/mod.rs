//! Rendering: terminal (`ascii`) and SVG (`svg`) grading charts.

pub mod ascii;
pub mod svg;

pub use ascii::render_ascii_plot;
pub use svg::{GradingChart, render_svg_string, write_svg};

use crate::domain::DistributionRow;

/// Measured `(diameter, passing)` pairs for plotting, pan excluded, fine to coarse.
pub fn measured_points(rows: &[DistributionRow]) -> Vec<(f64, f64)> {
    let mut points: Vec<(f64, f64)> = rows
        .iter()
        .filter(|r| r.diameter_mm > 0.0)
        .map(|r| (r.diameter_mm, r.passing_percent))
        .collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    points
}

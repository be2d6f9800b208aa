//! Smoothed passing curve in log-diameter space.
//!
//! Steps:
//! 1. drop the pan row (diameter `0`, log undefined)
//! 2. stable-sort by diameter, keeping the first row of any repeated diameter
//! 3. fit `passing = f(log10 d)` with the chosen interpolator
//! 4. evaluate on `sample_count` log-spaced diameters over the measured range

use crate::domain::{CurvePoint, DistributionRow, SmoothedCurve};
use crate::error::DistributionError;
use crate::math::{Interpolator, log_space};

/// Grid density used when the caller does not ask for one.
pub const DEFAULT_SAMPLE_COUNT: usize = 300;

/// Fit and sample the smoothed passing curve.
pub fn compute_smoothed_curve(
    rows: &[DistributionRow],
    sample_count: usize,
    interpolator: &dyn Interpolator,
) -> Result<SmoothedCurve, DistributionError> {
    if sample_count < 2 {
        return Err(DistributionError::invalid(format!(
            "Curve sample count must be >= 2 (got {sample_count})."
        )));
    }

    let mut sieves: Vec<&DistributionRow> = rows.iter().filter(|r| r.diameter_mm != 0.0).collect();
    if sieves.len() < 2 {
        return Err(DistributionError::insufficient(format!(
            "Need at least 2 sieves above the pan to draw a curve (got {}).",
            sieves.len()
        )));
    }
    if let Some(bad) = sieves.iter().find(|r| !(r.diameter_mm.is_finite() && r.diameter_mm > 0.0)) {
        return Err(DistributionError::insufficient(format!(
            "Sieve opening {} mm cannot be placed on a log axis.",
            bad.diameter_mm
        )));
    }

    // `sort_by` is stable, so the first of any repeated diameter stays first.
    sieves.sort_by(|a, b| a.diameter_mm.total_cmp(&b.diameter_mm));
    sieves.dedup_by(|later, earlier| later.diameter_mm == earlier.diameter_mm);

    let d_min = sieves[0].diameter_mm;
    let d_max = sieves[sieves.len() - 1].diameter_mm;
    if sieves.len() < 2 {
        return Err(DistributionError::insufficient(format!(
            "All sieves share the same opening ({d_min} mm); the curve has no span."
        )));
    }
    if sieves.len() < interpolator.min_points() {
        return Err(DistributionError::insufficient(format!(
            "The {} needs at least {} distinct sieve openings, got {}.",
            interpolator.kind().display_name(),
            interpolator.min_points(),
            sieves.len()
        )));
    }

    let xs: Vec<f64> = sieves.iter().map(|r| r.diameter_mm.log10()).collect();
    let ys: Vec<f64> = sieves.iter().map(|r| r.passing_percent).collect();
    let curve = interpolator.fit(&xs, &ys)?;

    let points = log_space(d_min, d_max, sample_count)?
        .into_iter()
        .map(|d| CurvePoint {
            diameter_mm: d,
            passing_percent: curve.eval(d.log10()),
        })
        .collect();

    Ok(SmoothedCurve {
        method: interpolator.kind(),
        points,
    })
}

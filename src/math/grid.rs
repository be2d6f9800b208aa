//! Log-spaced evaluation grids.

use crate::error::DistributionError;

/// Generate `steps` log-spaced points between `min` and `max` (inclusive).
///
/// The first and last points are exactly `min` and `max`, so callers can rely
/// on the grid spanning the measured range without round-off at the ends.
pub fn log_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, DistributionError> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && max > 0.0 && max > min) {
        return Err(DistributionError::insufficient(format!(
            "Invalid diameter range: min={min}, max={max} (must be finite, >0, and max>min)."
        )));
    }
    if steps < 2 {
        return Err(DistributionError::invalid("Grid sample count must be >= 2."));
    }

    let ln_min = min.ln();
    let ln_max = max.ln();
    let step = (ln_max - ln_min) / (steps as f64 - 1.0);

    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push((ln_min + step * i as f64).exp());
    }
    out[0] = min;
    out[steps - 1] = max;
    Ok(out)
}

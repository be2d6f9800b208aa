//! Cumulative distribution table.

use crate::domain::{Distribution, DistributionRow, Measurement, SieveSeries};
use crate::error::DistributionError;

/// Mass loss above this percentage is logged as suspicious.
pub const MASS_LOSS_WARN_PERCENT: f64 = 1.0;

/// Compute the distribution table and mass loss for one analysis.
///
/// The running sum follows `series` in the order given; nothing is re-sorted.
/// Diameters missing from `measurement` count as nothing retained.
pub fn compute_distribution(
    initial_mass: f64,
    series: &SieveSeries,
    measurement: &Measurement,
) -> Result<Distribution, DistributionError> {
    if !(initial_mass.is_finite() && initial_mass > 0.0) {
        return Err(DistributionError::invalid(format!(
            "Initial mass must be a positive number of grams (got {initial_mass})."
        )));
    }
    if series.len() < 2 || series.diameters_mm.last().copied() != Some(0.0) {
        return Err(DistributionError::invalid(
            "A sieve series needs at least 2 entries and must end with the pan (diameter 0).",
        ));
    }

    for &(d, _) in measurement.entries() {
        if !series.contains(d) {
            log::warn!("Ignoring retained mass for {d} mm: not part of series '{}'.", series.name);
        }
    }

    let mut rows = Vec::with_capacity(series.len());
    let mut cumulative = 0.0;
    for &d in &series.diameters_mm {
        let retained = measurement.retained_at(d);
        if retained < 0.0 {
            return Err(DistributionError::invalid(format!(
                "Retained mass on sieve {d} mm is negative ({retained} g)."
            )));
        }
        cumulative += retained;
        let cumulative_percent = cumulative / initial_mass * 100.0;
        rows.push(DistributionRow {
            diameter_mm: d,
            retained_g: retained,
            cumulative_retained_g: cumulative,
            cumulative_retained_percent: cumulative_percent,
            passing_percent: 100.0 - cumulative_percent,
        });
    }

    let retained_total: f64 = rows.iter().map(|r| r.retained_g).sum();
    let mass_loss_percent = (initial_mass - retained_total).abs() / initial_mass * 100.0;
    if mass_loss_percent > MASS_LOSS_WARN_PERCENT {
        log::warn!(
            "Mass loss is {mass_loss_percent:.3}% ({retained_total:.2} g retained of {initial_mass:.2} g)."
        );
    }

    Ok(Distribution {
        initial_mass_g: initial_mass,
        rows,
        retained_total_g: retained_total,
        mass_loss_percent,
    })
}

//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the distribution math stays clean and testable
//! - output changes are localized (important for snapshot tests)

use chrono::NaiveDate;

use crate::domain::{Distribution, DistributionRow, SieveSeries, SmoothedCurve};
use crate::io::ingest::RowError;

/// Header block: series, masses, mass loss, and smoothing method.
pub fn format_summary(
    series: &SieveSeries,
    distribution: &Distribution,
    curve: &SmoothedCurve,
    test_date: Option<NaiveDate>,
    label: Option<&str>,
) -> String {
    let mut out = String::new();

    out.push_str("=== granulo - Particle-size distribution ===\n");
    if let Some(label) = label {
        out.push_str(&format!("Sample: {label}\n"));
    }
    if let Some(date) = test_date {
        out.push_str(&format!("Date: {date}\n"));
    }
    out.push_str(&format!(
        "Series: {} ({} sieves + pan)\n",
        series.name,
        series.len().saturating_sub(1)
    ));
    out.push_str(&format!(
        "Initial mass: {:.2} g | Retained total: {:.2} g | Mass loss: {:.3}%\n",
        distribution.initial_mass_g, distribution.retained_total_g, distribution.mass_loss_percent
    ));
    out.push_str(&format!(
        "Curve: {} over {} log-spaced diameters\n",
        curve.method.display_name(),
        curve.points.len()
    ));

    out
}

/// The distribution table, one line per sieve in series order.
pub fn format_table(rows: &[DistributionRow]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>10} {:>13} {:>13} {:>13} {:>11}\n",
        "Sieve(mm)", "Retained(g)", "CumRet(g)", "CumRet(%)", "Passing(%)"
    ));
    out.push_str(&format!("{}\n", "-".repeat(64)));

    for r in rows {
        let sieve = if r.diameter_mm == 0.0 {
            "pan".to_string()
        } else {
            format!("{}", r.diameter_mm)
        };
        out.push_str(&format!(
            "{:>10} {:>13.2} {:>13.2} {:>13.2} {:>11.2}\n",
            sieve, r.retained_g, r.cumulative_retained_g, r.cumulative_retained_percent, r.passing_percent
        ));
    }

    out
}

/// Skipped rows and adjustments made while reading a sheet.
pub fn format_sheet_notes(row_errors: &[RowError], notes: &[String]) -> String {
    let mut out = String::new();
    for e in row_errors {
        out.push_str(&format!("  (skipped line {}) {}\n", e.line, e.message));
    }
    for note in notes {
        out.push_str(&format!("  note: {note}\n"));
    }
    out
}

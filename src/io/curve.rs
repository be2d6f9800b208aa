//! Read/write report JSON files.
//!
//! A report is the portable record of one analysis:
//! - run metadata (date, label, series, interpolation method)
//! - the distribution table and mass loss
//! - the sampled smoothed curve, so `granulo plot` can redraw it without refitting
//!
//! The schema is defined by `domain::ReportFile`.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;

use crate::domain::{CurveGrid, Distribution, ReportFile, SieveSeries, SmoothedCurve};
use crate::error::AppError;

/// Assemble a report from one analysis' outputs.
pub fn build_report(
    series: &SieveSeries,
    distribution: &Distribution,
    curve: &SmoothedCurve,
    test_date: NaiveDate,
    label: Option<&str>,
) -> ReportFile {
    ReportFile {
        tool: "granulo".to_string(),
        test_date,
        label: label.map(str::to_string),
        series: series.name.clone(),
        method: curve.method,
        initial_mass_g: distribution.initial_mass_g,
        retained_total_g: distribution.retained_total_g,
        mass_loss_percent: distribution.mass_loss_percent,
        rows: distribution.rows.clone(),
        curve: CurveGrid {
            diameter_mm: curve.points.iter().map(|p| p.diameter_mm).collect(),
            passing_percent: curve.points.iter().map(|p| p.passing_percent).collect(),
        },
    }
}

/// Write a report JSON file.
pub fn write_report_json(path: &Path, report: &ReportFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;

    log::info!("Wrote report to {}", path.display());
    Ok(())
}

/// Read a report JSON file.
pub fn read_report_json(path: &Path) -> Result<ReportFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open report JSON '{}': {e}", path.display())))?;
    let report: ReportFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid report JSON: {e}")))?;

    if report.curve.diameter_mm.len() != report.curve.passing_percent.len() {
        return Err(AppError::new(
            2,
            "Invalid report JSON: curve diameter and passing arrays differ in length.",
        ));
    }
    Ok(report)
}

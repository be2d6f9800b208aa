//! CSV measurement sheets.
//!
//! A sheet is one row per sieve:
//!
//! ```text
//! diameter_mm,retained_g
//! 5,12.4
//! 4,30.1
//! ...
//! 0,8.2
//! ```
//!
//! Design goals:
//! - **Row order is series order**: the cumulative sum runs down the sheet
//! - **Row-level validation** (skip rows with unusable diameters, but report what happened)
//! - **Same leniency as the form**: an unreadable retained mass is `0`
//! - **Separation of concerns**: no distribution math here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Measurement, SieveSeries};
use crate::error::AppError;
use crate::form::parse_retained;

const DIAMETER_COLUMNS: [&str; 4] = ["diameter_mm", "diameter", "sieve", "d"];
const RETAINED_COLUMNS: [&str; 4] = ["retained_g", "retained", "mass", "refus"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: series + measurement + what was skipped or adjusted.
#[derive(Debug, Clone)]
pub struct SieveSheet {
    pub series: SieveSeries,
    pub measurement: Measurement,
    pub row_errors: Vec<RowError>,
    pub notes: Vec<String>,
}

/// Load a measurement sheet from disk.
pub fn load_sheet(path: &Path) -> Result<SieveSheet, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open sheet '{}': {e}", path.display())))?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("sheet")
        .to_string();
    read_sheet(file, name)
}

/// Read a measurement sheet from any reader.
pub fn read_sheet<R: Read>(input: R, name: impl Into<String>) -> Result<SieveSheet, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read sheet headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let d_idx = find_column(&header_map, &DIAMETER_COLUMNS)?;
    let m_idx = find_column(&header_map, &RETAINED_COLUMNS)?;

    let mut sieves: Vec<(f64, f64)> = Vec::new();
    let mut pan: Option<(usize, f64)> = None;
    let mut row_errors = Vec::new();
    let mut notes = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // Headers are line 1.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let diameter = match parse_diameter(&record, d_idx) {
            Ok(d) => d,
            Err(message) => {
                row_errors.push(RowError { line, message });
                continue;
            }
        };
        let retained = parse_retained(record.get(m_idx).unwrap_or(""));

        if diameter == 0.0 {
            if pan.is_some() {
                row_errors.push(RowError {
                    line,
                    message: "Duplicate pan row (diameter 0).".to_string(),
                });
            } else {
                pan = Some((line, retained));
            }
            continue;
        }
        if sieves.iter().any(|&(d, _)| d == diameter) {
            row_errors.push(RowError {
                line,
                message: format!("Duplicate sieve {diameter} mm."),
            });
            continue;
        }
        if pan.is_some() {
            notes.push(format!("Sieve {diameter} mm listed after the pan; the pan is moved last."));
        }
        sieves.push((diameter, retained));
    }

    for e in &row_errors {
        log::warn!("Sheet line {}: {}", e.line, e.message);
    }

    if sieves.is_empty() {
        return Err(AppError::new(3, "The sheet has no usable sieve rows."));
    }

    let pan_mass = match pan {
        Some((_, m)) => m,
        None => {
            notes.push("No pan row (diameter 0) found; assuming nothing passed the finest sieve.".to_string());
            0.0
        }
    };

    let mut diameters: Vec<f64> = sieves.iter().map(|&(d, _)| d).collect();
    diameters.push(0.0);
    let series = SieveSeries::new(name, diameters).map_err(AppError::from)?;
    if !series.is_descending() {
        log::warn!("Sheet sieves are not listed coarse to fine; the cumulative sum follows the sheet order.");
    }

    let measurement = Measurement::from_pairs(sieves.into_iter().chain(std::iter::once((0.0, pan_mass))));

    log::info!(
        "Read {rows_read} sheet rows: {} sieves, {} skipped.",
        series.len() - 1,
        row_errors.len()
    );

    Ok(SieveSheet {
        series,
        measurement,
        row_errors,
        notes,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn find_column(header_map: &HashMap<String, usize>, names: &[&str]) -> Result<usize, AppError> {
    names
        .iter()
        .find_map(|n| header_map.get(*n).copied())
        .ok_or_else(|| {
            AppError::new(
                2,
                format!("Missing required column: one of {}", names.join(", ")),
            )
        })
}

fn parse_diameter(record: &StringRecord, idx: usize) -> Result<f64, String> {
    let raw = record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Missing sieve diameter.".to_string())?;
    let value = raw
        .parse::<f64>()
        .or_else(|_| raw.replacen(',', ".", 1).parse::<f64>())
        .map_err(|_| format!("Invalid sieve diameter '{raw}'."))?;
    if !(value.is_finite() && value >= 0.0) {
        return Err(format!("Sieve diameter must be finite and >= 0 (got {raw})."));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_sheet_in_file_order_with_aliases_and_bom() {
        let csv = "\u{feff}Sieve,Refus\n5,10\n2.5,\n1.25,abc\n0.5,\"7,5\"\n0,3\n";
        let sheet = read_sheet(csv.as_bytes(), "lab").unwrap();

        assert_eq!(sheet.series.name, "lab");
        assert_eq!(sheet.series.diameters_mm, vec![5.0, 2.5, 1.25, 0.5, 0.0]);
        assert_eq!(sheet.measurement.retained_at(5.0), 10.0);
        assert_eq!(sheet.measurement.retained_at(2.5), 0.0);
        assert_eq!(sheet.measurement.retained_at(1.25), 0.0);
        assert_eq!(sheet.measurement.retained_at(0.5), 7.5);
        assert_eq!(sheet.measurement.retained_at(0.0), 3.0);
        assert!(sheet.row_errors.is_empty());
    }

    #[test]
    fn bad_diameters_are_row_errors() {
        let csv = "diameter_mm,retained_g\n4,1\nx,2\n-1,3\n4,9\n2,5\n";
        let sheet = read_sheet(csv.as_bytes(), "s").unwrap();
        assert_eq!(sheet.series.diameters_mm, vec![4.0, 2.0, 0.0]);
        let lines: Vec<usize> = sheet.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
    }

    #[test]
    fn missing_pan_is_appended_with_a_note() {
        let csv = "diameter_mm,retained_g\n2,1\n1,1\n";
        let sheet = read_sheet(csv.as_bytes(), "s").unwrap();
        assert_eq!(sheet.series.diameters_mm.last().copied(), Some(0.0));
        assert_eq!(sheet.measurement.retained_at(0.0), 0.0);
        assert_eq!(sheet.notes.len(), 1);
    }

    #[test]
    fn pan_listed_first_is_moved_last() {
        let csv = "diameter_mm,retained_g\n0,4\n2,1\n1,1\n";
        let sheet = read_sheet(csv.as_bytes(), "s").unwrap();
        assert_eq!(sheet.series.diameters_mm, vec![2.0, 1.0, 0.0]);
        assert_eq!(sheet.measurement.retained_at(0.0), 4.0);
    }

    #[test]
    fn missing_columns_fail_with_exit_code_two() {
        let err = read_sheet("size,weight\n1,2\n".as_bytes(), "s").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn sheet_without_sieves_is_insufficient() {
        let err = read_sheet("diameter_mm,retained_g\n0,5\n".as_bytes(), "s").unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}

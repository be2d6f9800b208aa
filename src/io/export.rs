//! Export the distribution table to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::Distribution;
use crate::error::AppError;

/// Write one CSV row per sieve to `path`.
pub fn write_table_csv(path: &Path, distribution: &Distribution) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_table(file, distribution)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV '{}': {e}", path.display())))?;
    log::info!("Wrote distribution table to {}", path.display());
    Ok(())
}

fn write_table<W: Write>(mut out: W, distribution: &Distribution) -> std::io::Result<()> {
    writeln!(
        out,
        "diameter_mm,retained_g,cumulative_retained_g,cumulative_retained_percent,passing_percent"
    )?;
    for r in &distribution.rows {
        writeln!(
            out,
            "{},{:.4},{:.4},{:.4},{:.4}",
            r.diameter_mm, r.retained_g, r.cumulative_retained_g, r.cumulative_retained_percent, r.passing_percent,
        )?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::compute_distribution;
    use crate::domain::{Measurement, SieveSeries};

    #[test]
    fn table_has_header_and_one_line_per_sieve() {
        let series = SieveSeries::new("t", vec![2.0, 1.0, 0.0]).unwrap();
        let m = Measurement::from_pairs([(2.0, 25.0), (1.0, 50.0), (0.0, 25.0)]);
        let dist = compute_distribution(100.0, &series, &m).unwrap();

        let mut buf = Vec::new();
        write_table(&mut buf, &dist).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "2,25.0000,25.0000,25.0000,75.0000");
        assert_eq!(lines[3], "0,25.0000,100.0000,100.0000,0.0000");
    }
}

//! Shared analysis pipeline used by the `analyze` command.
//!
//! Keeping this in one place avoids mixing the core workflow with presentation:
//! collect inputs -> distribution table -> smoothed curve
//!
//! The command handlers can then focus on printing and exporting.

use crate::distribution::{compute_distribution, compute_smoothed_curve};
use crate::domain::{AnalysisConfig, Distribution, InputSource, SieveSeries, SmoothedCurve};
use crate::error::AppError;
use crate::form::{collect_form, parse_initial_mass};
use crate::io::ingest::{RowError, load_sheet};
use crate::math::interpolator_for;

/// All computed outputs of a single analysis.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub series: SieveSeries,
    pub distribution: Distribution,
    pub curve: SmoothedCurve,
    /// Sheet rows that were skipped (empty for form input).
    pub row_errors: Vec<RowError>,
    /// Adjustments made while reading the input.
    pub notes: Vec<String>,
}

/// Execute the full analysis and return the computed outputs.
///
/// Any error aborts the whole analysis; no partial output is produced.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    // 1) Collect and validate inputs.
    let (initial_mass, series, measurement, row_errors, notes) = match &config.source {
        InputSource::Form { preset, retained } => {
            let form = collect_form(*preset, &config.initial_mass, retained)?;
            (form.initial_mass, form.series, form.measurement, Vec::new(), Vec::new())
        }
        InputSource::Sheet(path) => {
            // Validate the mass before touching the file.
            let initial_mass = parse_initial_mass(&config.initial_mass)?;
            let sheet = load_sheet(path)?;
            (initial_mass, sheet.series, sheet.measurement, sheet.row_errors, sheet.notes)
        }
    };

    // 2) Distribution table + mass loss.
    let distribution = compute_distribution(initial_mass, &series, &measurement)?;

    // 3) Smoothed passing curve.
    let interpolator = interpolator_for(config.method);
    let curve = compute_smoothed_curve(&distribution.rows, config.sample_count, interpolator.as_ref())?;

    log::info!(
        "Analysed {} sieves of '{}' with {}: mass loss {:.3}%",
        series.len(),
        series.name,
        config.method.display_name(),
        distribution.mass_loss_percent
    );

    Ok(RunOutput {
        series,
        distribution,
        curve,
        row_errors,
        notes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InterpolationKind, SievePreset};

    fn config(source: InputSource, mass: &str, method: InterpolationKind) -> AnalysisConfig {
        AnalysisConfig {
            source,
            initial_mass: mass.to_string(),
            method,
            sample_count: 300,
            label: None,
            test_date: None,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            svg: None,
            export_table: None,
            export_report: None,
        }
    }

    fn fields(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn form_input_runs_end_to_end() {
        let source = InputSource::Form {
            preset: SievePreset::Fine,
            retained: fields(&[
                "5", "12", "30", "45", "20", "25", "30", "40", "45", "50", "40", "35", "30", "25", "20", "15", "31",
            ]),
        };
        let run = run_analysis(&config(source, "500", InterpolationKind::Cubic)).unwrap();
        assert_eq!(run.distribution.rows.len(), 17);
        assert!((run.distribution.mass_loss_percent - 0.4).abs() < 1e-9);
        assert_eq!(run.curve.points.len(), 300);
        assert!(run.row_errors.is_empty());
    }

    #[test]
    fn bad_mass_is_invalid_input() {
        let source = InputSource::Form {
            preset: SievePreset::Coarse,
            retained: fields(&["1"]),
        };
        let err = run_analysis(&config(source, "-3", InterpolationKind::Cubic)).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn bad_mass_is_reported_before_missing_sheet() {
        let source = InputSource::Sheet("/no/such/sheet.csv".into());
        let err = run_analysis(&config(source, "", InterpolationKind::Cubic)).unwrap_err();
        assert!(err.to_string().starts_with("Invalid input"));
    }

    #[test]
    fn three_sieve_sheet_is_insufficient_for_cubic() {
        let path = std::env::temp_dir().join(format!("granulo-three-{}.csv", std::process::id()));
        std::fs::write(&path, "diameter_mm,retained_g\n4,10\n2,40\n1,30\n0,20\n").unwrap();

        let cubic = run_analysis(&config(InputSource::Sheet(path.clone()), "100", InterpolationKind::Cubic));
        let pchip = run_analysis(&config(InputSource::Sheet(path.clone()), "100", InterpolationKind::Pchip));
        let _ = std::fs::remove_file(&path);

        assert_eq!(cubic.unwrap_err().exit_code(), 3);
        assert_eq!(pchip.unwrap().series.len(), 4);
    }
}

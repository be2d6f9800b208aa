//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs the analysis pipeline
//! - prints reports/plots
//! - writes optional exports

use std::fs::File;

use clap::Parser;

use crate::cli::{AnalyzeArgs, Command, PlotArgs, SampleArgs};
use crate::domain::{AnalysisConfig, InputSource, SievePreset};
use crate::error::AppError;
use crate::plot::{GradingChart, measured_points};

pub mod pipeline;

/// Entry point for the `granulo` binary.
pub fn run() -> Result<(), AppError> {
    // A missing `.env` is the normal case.
    let dotenv = dotenvy::dotenv();
    init_logging();
    if let Err(err) = dotenv {
        if !err.not_found() {
            log::warn!("Ignoring unreadable .env file: {err}");
        }
    }

    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Plot(args) => handle_plot(args),
        Command::Sample(args) => handle_sample(args),
        Command::Presets => {
            print!("{}", format_presets());
            Ok(())
        }
    }
}

/// Log filter comes from `GRANULO_LOG` (env_logger syntax), default `warn`.
fn init_logging() {
    let env = env_logger::Env::default().filter_or("GRANULO_LOG", "warn");
    // A second init (e.g. from tests) is harmless.
    let _ = env_logger::Builder::from_env(env).format_timestamp(None).try_init();
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args);
    let run = pipeline::run_analysis(&config)?;

    println!(
        "{}",
        crate::report::format_summary(
            &run.series,
            &run.distribution,
            &run.curve,
            config.test_date,
            config.label.as_deref(),
        )
    );
    if !run.row_errors.is_empty() || !run.notes.is_empty() {
        println!("Sheet:");
        println!("{}", crate::report::format_sheet_notes(&run.row_errors, &run.notes));
    }
    println!("{}", crate::report::format_table(&run.distribution.rows));

    let points = measured_points(&run.distribution.rows);
    let curve = run.curve.as_xy();

    if config.plot {
        let plot = crate::plot::render_ascii_plot(&points, &curve, config.plot_width, config.plot_height);
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.svg {
        let chart = GradingChart {
            series_name: &run.series.name,
            mass_loss_percent: run.distribution.mass_loss_percent,
            curve: &curve,
            points: &points,
        };
        crate::plot::write_svg(path, &chart)?;
    }
    if let Some(path) = &config.export_table {
        crate::io::export::write_table_csv(path, &run.distribution)?;
    }
    if let Some(path) = &config.export_report {
        let test_date = config
            .test_date
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        let report = crate::io::curve::build_report(
            &run.series,
            &run.distribution,
            &run.curve,
            test_date,
            config.label.as_deref(),
        );
        crate::io::curve::write_report_json(path, &report)?;
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let report = crate::io::curve::read_report_json(&args.report)?;

    let curve: Vec<(f64, f64)> = report
        .curve
        .diameter_mm
        .iter()
        .zip(report.curve.passing_percent.iter())
        .map(|(&d, &y)| (d, y))
        .collect();
    let points = measured_points(&report.rows);

    println!(
        "{} | {} | {} | mass loss {:.3}%",
        report.label.as_deref().unwrap_or("(unlabelled)"),
        report.series,
        report.test_date,
        report.mass_loss_percent
    );
    println!("{}", crate::plot::render_ascii_plot(&points, &curve, args.width, args.height));

    if let Some(path) = &args.svg {
        let chart = GradingChart {
            series_name: &report.series,
            mass_loss_percent: report.mass_loss_percent,
            curve: &curve,
            points: &points,
        };
        crate::plot::write_svg(path, &chart)?;
    }
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = crate::data::SampleConfig {
        preset: args.preset,
        initial_mass: args.mass,
        d50_mm: args.d50,
        spread: args.spread,
        loss: args.loss,
        seed: args.seed,
    };
    let sheet = crate::data::generate_sample(&config)?;
    log::info!(
        "Generated {} sieves, {:.2} g retained of {:.2} g.",
        sheet.series.len(),
        sheet.total_retained(),
        config.initial_mass
    );

    match &args.out {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| AppError::new(2, format!("Failed to create sheet '{}': {e}", path.display())))?;
            crate::data::write_sheet_csv(file, &sheet)?;
            log::info!("Wrote synthetic sheet to {}", path.display());
        }
        None => crate::data::write_sheet_csv(std::io::stdout().lock(), &sheet)?,
    }
    Ok(())
}

pub fn analysis_config_from_args(args: &AnalyzeArgs) -> AnalysisConfig {
    let source = match &args.sheet {
        Some(path) => InputSource::Sheet(path.clone()),
        None => InputSource::Form {
            preset: args.preset,
            retained: args.retained.clone(),
        },
    };

    AnalysisConfig {
        source,
        initial_mass: args.mass.clone(),
        method: args.method,
        sample_count: args.samples,
        label: args.label.clone(),
        test_date: args.date,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        svg: args.svg.clone(),
        export_table: args.export.clone(),
        export_report: args.export_report.clone(),
    }
}

/// One line per preset: name, CLI value, and openings coarse to fine.
pub fn format_presets() -> String {
    let mut out = String::new();
    for preset in [SievePreset::Fine, SievePreset::Coarse] {
        let openings: Vec<String> = preset
            .diameters_mm()
            .iter()
            .map(|d| if *d == 0.0 { "pan".to_string() } else { format!("{d}") })
            .collect();
        let key = if preset == SievePreset::Fine { "fine" } else { "coarse" };
        out.push_str(&format!(
            "{:<13} (--preset {key}): {} mm\n",
            preset.display_name(),
            openings.join(", ")
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    #[test]
    fn sheet_takes_precedence_in_config() {
        let cli = Cli::try_parse_from(["granulo", "analyze", "-m", "250", "--sheet", "a.csv", "--no-plot"]).unwrap();
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        let config = analysis_config_from_args(&args);
        assert!(matches!(config.source, InputSource::Sheet(_)));
        assert!(!config.plot);
        assert_eq!(config.initial_mass, "250");
    }

    #[test]
    fn presets_listing() {
        let text = format_presets();
        assert_eq!(
            text.lines().nth(1),
            Some("Coarse soils  (--preset coarse): 20, 16, 12.5, 10, 8, 6.3, 5, 4, 2.5, 1.25, pan mm")
        );
    }
}

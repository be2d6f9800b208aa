//! Command-line parsing for the grading-curve tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the distribution math.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::distribution::DEFAULT_SAMPLE_COUNT;
use crate::domain::{InterpolationKind, SievePreset};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "granulo", version, about = "Particle-size distribution from sieve analysis")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute the distribution table and smoothed curve, print them, and optionally plot/export.
    Analyze(AnalyzeArgs),
    /// Redraw a previously exported report JSON.
    Plot(PlotArgs),
    /// Generate a synthetic measurement sheet (CSV).
    Sample(SampleArgs),
    /// List the built-in sieve series.
    Presets,
}

/// Options for a single analysis.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// Initial (dry) sample mass in grams, as written on the lab sheet.
    #[arg(short = 'm', long, value_name = "GRAMS", allow_hyphen_values = true)]
    pub mass: String,

    /// Sieve series used with `--retained`.
    #[arg(short = 'p', long, value_enum, default_value_t = SievePreset::Fine)]
    pub preset: SievePreset,

    /// Retained mass (g) per sieve of the preset, coarse to fine, pan last.
    ///
    /// Blank or unreadable values count as 0; missing trailing values too.
    #[arg(
        short = 'r',
        long,
        num_args = 1..,
        value_name = "GRAMS",
        allow_negative_numbers = true,
        conflicts_with = "sheet",
        required_unless_present = "sheet"
    )]
    pub retained: Vec<String>,

    /// CSV sheet with `diameter_mm,retained_g` rows (row order = series order).
    #[arg(short = 's', long, value_name = "CSV")]
    pub sheet: Option<PathBuf>,

    /// Interpolation used for the smoothed curve.
    #[arg(long, value_enum, env = "GRANULO_METHOD", default_value_t = InterpolationKind::Cubic)]
    pub method: InterpolationKind,

    /// Number of log-spaced diameters the curve is sampled at.
    #[arg(long, env = "GRANULO_SAMPLES", default_value_t = DEFAULT_SAMPLE_COUNT)]
    pub samples: usize,

    /// Sample label for reports.
    #[arg(long)]
    pub label: Option<String>,

    /// Test date (YYYY-MM-DD); defaults to today in exported reports.
    #[arg(long, value_name = "DATE")]
    pub date: Option<NaiveDate>,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Write the chart as SVG.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,

    /// Export the distribution table to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the full report (table + curve) to JSON.
    #[arg(long = "export-report", value_name = "JSON")]
    pub export_report: Option<PathBuf>,
}

/// Options for plotting a saved report.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Report JSON file produced by `granulo analyze --export-report`.
    #[arg(long, value_name = "JSON")]
    pub report: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Also write the chart as SVG.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,
}

/// Options for synthetic sheet generation.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// Sieve series to generate for.
    #[arg(short = 'p', long, value_enum, default_value_t = SievePreset::Fine)]
    pub preset: SievePreset,

    /// Initial sample mass (g).
    #[arg(short = 'm', long, default_value_t = 500.0)]
    pub mass: f64,

    /// Median particle size (mm).
    #[arg(long, default_value_t = 0.5)]
    pub d50: f64,

    /// Standard deviation of ln(size).
    #[arg(long, default_value_t = 0.8)]
    pub spread: f64,

    /// Fraction of mass lost during sieving.
    #[arg(long, default_value_t = 0.005)]
    pub loss: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output file (stdout if omitted).
    #[arg(short = 'o', long, value_name = "CSV")]
    pub out: Option<PathBuf>,
}

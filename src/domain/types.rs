//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during an analysis
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::DistributionError;

/// Diameters closer than this are treated as the same sieve.
const DIAMETER_EPS: f64 = 1e-9;

/// The two sieve stacks the lab keeps on the shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SievePreset {
    /// Fine soils: 5 mm down to 0.06 mm.
    Fine,
    /// Coarse soils: 20 mm down to 1.25 mm.
    Coarse,
}

impl SievePreset {
    /// Human-readable label for terminal output and chart titles.
    pub fn display_name(self) -> &'static str {
        match self {
            SievePreset::Fine => "Fine soils",
            SievePreset::Coarse => "Coarse soils",
        }
    }

    /// Sieve openings (mm), coarse to fine, terminated by the pan (`0`).
    pub fn diameters_mm(self) -> &'static [f64] {
        match self {
            SievePreset::Fine => &[
                5.0, 4.0, 2.5, 1.25, 1.0, 0.8, 0.63, 0.5, 0.4, 0.315, 0.25, 0.2, 0.16, 0.125, 0.08, 0.06,
                0.0,
            ],
            SievePreset::Coarse => &[20.0, 16.0, 12.5, 10.0, 8.0, 6.3, 5.0, 4.0, 2.5, 1.25, 0.0],
        }
    }

    pub fn series(self) -> SieveSeries {
        SieveSeries {
            name: self.display_name().to_string(),
            diameters_mm: self.diameters_mm().to_vec(),
        }
    }
}

/// Which interpolant smooths the passing curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationKind {
    /// C2 cubic spline with not-a-knot end conditions (needs >= 4 sieves).
    Cubic,
    /// Monotone piecewise cubic Hermite (needs >= 2 sieves, never overshoots).
    Pchip,
}

impl InterpolationKind {
    pub fn display_name(self) -> &'static str {
        match self {
            InterpolationKind::Cubic => "cubic spline",
            InterpolationKind::Pchip => "PCHIP",
        }
    }
}

/// An ordered stack of sieve openings (mm) ending with the pan (`0`).
///
/// The order is the order the cumulative sum runs in. Presets are coarse to
/// fine; user sheets keep whatever order they were written in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SieveSeries {
    pub name: String,
    pub diameters_mm: Vec<f64>,
}

impl SieveSeries {
    pub fn new(name: impl Into<String>, diameters_mm: Vec<f64>) -> Result<Self, DistributionError> {
        if diameters_mm.len() < 2 {
            return Err(DistributionError::invalid(format!(
                "A sieve series needs at least 2 entries (got {}).",
                diameters_mm.len()
            )));
        }
        if let Some(bad) = diameters_mm.iter().find(|d| !d.is_finite() || **d < 0.0) {
            return Err(DistributionError::invalid(format!(
                "Sieve openings must be finite and >= 0 (got {bad})."
            )));
        }
        if diameters_mm.last().copied() != Some(0.0) {
            return Err(DistributionError::invalid(
                "A sieve series must end with the pan (diameter 0).",
            ));
        }
        Ok(Self {
            name: name.into(),
            diameters_mm,
        })
    }

    pub fn len(&self) -> usize {
        self.diameters_mm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diameters_mm.is_empty()
    }

    /// True when openings strictly decrease down to the pan.
    pub fn is_descending(&self) -> bool {
        self.diameters_mm.windows(2).all(|w| w[0] > w[1])
    }

    pub fn contains(&self, diameter_mm: f64) -> bool {
        self.diameters_mm.iter().any(|&d| same_diameter(d, diameter_mm))
    }
}

/// Retained mass (g) per sieve opening.
///
/// Lookups for a diameter without an entry read as `0`, as does any stored
/// non-finite value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    entries: Vec<(f64, f64)>,
}

impl Measurement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a measurement from `(diameter_mm, retained_g)` pairs.
    ///
    /// Later pairs overwrite earlier ones for the same diameter.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let mut out = Self::new();
        for (d, m) in pairs {
            out.insert(d, m);
        }
        out
    }

    pub fn insert(&mut self, diameter_mm: f64, retained_g: f64) {
        match self.entries.iter_mut().find(|(d, _)| same_diameter(*d, diameter_mm)) {
            Some(entry) => entry.1 = retained_g,
            None => self.entries.push((diameter_mm, retained_g)),
        }
    }

    pub fn retained_at(&self, diameter_mm: f64) -> f64 {
        self.entries
            .iter()
            .find(|(d, _)| same_diameter(*d, diameter_mm))
            .map(|&(_, m)| if m.is_finite() { m } else { 0.0 })
            .unwrap_or(0.0)
    }

    pub fn entries(&self) -> &[(f64, f64)] {
        &self.entries
    }
}

fn same_diameter(a: f64, b: f64) -> bool {
    (a - b).abs() <= DIAMETER_EPS
}

/// One line of the distribution table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionRow {
    pub diameter_mm: f64,
    pub retained_g: f64,
    pub cumulative_retained_g: f64,
    pub cumulative_retained_percent: f64,
    pub passing_percent: f64,
}

/// Output of `compute_distribution`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub initial_mass_g: f64,
    pub rows: Vec<DistributionRow>,
    /// Sum of the (unaccumulated) retained masses.
    pub retained_total_g: f64,
    /// `|initial - total| / initial * 100`; reported, never fatal.
    pub mass_loss_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub diameter_mm: f64,
    pub passing_percent: f64,
}

/// Passing percentage sampled on a log-spaced diameter grid.
///
/// Values may leave `[0, 100]` near the ends (spline overshoot); they are
/// reported as computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothedCurve {
    pub method: InterpolationKind,
    pub points: Vec<CurvePoint>,
}

impl SmoothedCurve {
    pub fn as_xy(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.diameter_mm, p.passing_percent)).collect()
    }
}

/// Where an analysis gets its measurements from.
#[derive(Debug, Clone)]
pub enum InputSource {
    /// One raw text field per sieve of a preset, in series order.
    Form {
        preset: SievePreset,
        retained: Vec<String>,
    },
    /// A CSV sheet of `diameter_mm,retained_g` rows.
    Sheet(PathBuf),
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults and environment).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub source: InputSource,
    /// Initial mass exactly as typed; validated by the form collector.
    pub initial_mass: String,
    pub method: InterpolationKind,
    pub sample_count: usize,

    pub label: Option<String>,
    pub test_date: Option<NaiveDate>,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub svg: Option<PathBuf>,
    pub export_table: Option<PathBuf>,
    pub export_report: Option<PathBuf>,
}

/// A saved analysis (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportFile {
    pub tool: String,
    pub test_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub series: String,
    pub method: InterpolationKind,
    pub initial_mass_g: f64,
    pub retained_total_g: f64,
    pub mass_loss_percent: f64,
    pub rows: Vec<DistributionRow>,
    pub curve: CurveGrid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveGrid {
    pub diameter_mm: Vec<f64>,
    pub passing_percent: Vec<f64>,
}

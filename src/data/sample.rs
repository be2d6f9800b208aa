//! Synthetic sieve sheets.
//!
//! Generates a plausible measurement for a preset stack: the sample is split
//! into equal-mass parcels whose sizes follow a log-normal around `d50_mm`;
//! each parcel lands on the first sieve (coarse to fine) whose opening it
//! cannot pass, or in the pan. A configurable fraction of the mass is lost.
//!
//! Useful for demos and for exercising the pipeline without lab data.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::Write;

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::LogNormal;

use crate::domain::{SievePreset, SieveSeries};
use crate::error::AppError;

/// Number of equal-mass parcels drawn per sample.
const PARCELS: usize = 20_000;

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub preset: SievePreset,
    pub initial_mass: f64,
    /// Median particle size (mm).
    pub d50_mm: f64,
    /// Standard deviation of `ln(size)`.
    pub spread: f64,
    /// Fraction of the initial mass lost during sieving, in `[0, 1)`.
    pub loss: f64,
    pub seed: u64,
}

/// A generated sheet: the preset series with one retained mass per sieve.
#[derive(Debug, Clone)]
pub struct SampleSheet {
    pub series: SieveSeries,
    /// `(diameter_mm, retained_g)` in series order.
    pub retained: Vec<(f64, f64)>,
}

impl SampleSheet {
    pub fn total_retained(&self) -> f64 {
        self.retained.iter().map(|&(_, m)| m).sum()
    }
}

pub fn generate_sample(config: &SampleConfig) -> Result<SampleSheet, AppError> {
    if !(config.initial_mass.is_finite() && config.initial_mass > 0.0) {
        return Err(AppError::new(2, "Sample mass must be > 0."));
    }
    if !(config.d50_mm.is_finite() && config.d50_mm > 0.0) {
        return Err(AppError::new(2, "D50 must be > 0 mm."));
    }
    if !(config.spread.is_finite() && config.spread > 0.0) {
        return Err(AppError::new(2, "Spread must be > 0."));
    }
    if !(0.0..1.0).contains(&config.loss) {
        return Err(AppError::new(2, "Loss fraction must be in [0, 1)."));
    }

    let series = config.preset.series();
    let mut rng = StdRng::seed_from_u64(sample_seed(config));
    let sizes = LogNormal::new(config.d50_mm.ln(), config.spread)
        .map_err(|e| AppError::new(2, format!("Size distribution error: {e}")))?;

    let mut counts = vec![0usize; series.len()];
    for _ in 0..PARCELS {
        let size = sizes.sample(&mut rng);
        // The pan (0) always matches, so every parcel lands somewhere.
        let idx = series
            .diameters_mm
            .iter()
            .position(|&d| d <= size)
            .unwrap_or(series.len() - 1);
        counts[idx] += 1;
    }

    let kept = config.initial_mass * (1.0 - config.loss);
    let retained = series
        .diameters_mm
        .iter()
        .zip(counts)
        .map(|(&d, n)| (d, round2(kept * n as f64 / PARCELS as f64)))
        .collect();

    Ok(SampleSheet { series, retained })
}

/// Write a sheet in the format `io::ingest::read_sheet` reads.
pub fn write_sheet_csv<W: Write>(mut out: W, sheet: &SampleSheet) -> Result<(), AppError> {
    let io_err = |e: std::io::Error| AppError::new(2, format!("Failed to write sample sheet: {e}"));
    writeln!(out, "diameter_mm,retained_g").map_err(io_err)?;
    for &(d, m) in &sheet.retained {
        writeln!(out, "{d},{m:.2}").map_err(io_err)?;
    }
    out.flush().map_err(io_err)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn sample_seed(config: &SampleConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    config.preset.hash(&mut hasher);
    config.initial_mass.to_bits().hash(&mut hasher);
    config.d50_mm.to_bits().hash(&mut hasher);
    config.spread.to_bits().hash(&mut hasher);
    config.loss.to_bits().hash(&mut hasher);
    config.seed.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::read_sheet;

    fn config() -> SampleConfig {
        SampleConfig {
            preset: SievePreset::Fine,
            initial_mass: 500.0,
            d50_mm: 0.4,
            spread: 0.9,
            loss: 0.01,
            seed: 7,
        }
    }

    #[test]
    fn same_seed_same_sheet() {
        let a = generate_sample(&config()).unwrap();
        let b = generate_sample(&config()).unwrap();
        assert_eq!(a.retained, b.retained);

        let mut other = config();
        other.seed = 8;
        let c = generate_sample(&other).unwrap();
        assert_ne!(a.retained, c.retained);
    }

    #[test]
    fn total_matches_mass_after_loss() {
        let sheet = generate_sample(&config()).unwrap();
        assert_eq!(sheet.retained.len(), 17);
        // Rounding to 0.01 g per sieve bounds the drift.
        assert!((sheet.total_retained() - 495.0).abs() <= 0.005 * 17.0 + 1e-9);
    }

    #[test]
    fn median_lands_near_d50() {
        let sheet = generate_sample(&config()).unwrap();
        // Mass retained on sieves coarser than d50 should be close to half.
        let coarse: f64 = sheet.retained.iter().filter(|&&(d, _)| d >= 0.4).map(|&(_, m)| m).sum();
        assert!((coarse / 495.0 - 0.5).abs() < 0.05, "coarse fraction {}", coarse / 495.0);
    }

    #[test]
    fn written_sheet_reads_back() {
        let sheet = generate_sample(&config()).unwrap();
        let mut buf = Vec::new();
        write_sheet_csv(&mut buf, &sheet).unwrap();

        let back = read_sheet(buf.as_slice(), "synthetic").unwrap();
        assert_eq!(back.series.diameters_mm, sheet.series.diameters_mm);
        assert!(back.row_errors.is_empty());
        for &(d, m) in &sheet.retained {
            assert!((back.measurement.retained_at(d) - m).abs() < 1e-9);
        }
    }

    #[test]
    fn rejects_bad_settings() {
        let cases: [fn(&mut SampleConfig); 4] = [
            |c| c.loss = 1.0,
            |c| c.d50_mm = 0.0,
            |c| c.spread = f64::NAN,
            |c| c.initial_mass = -1.0,
        ];
        for tweak in cases {
            let mut bad = config();
            tweak(&mut bad);
            let err = generate_sample(&bad).unwrap_err();
            assert_eq!(err.exit_code(), 2, "{err}");
        }
    }
}

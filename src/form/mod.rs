//! Form collection: raw text fields in, validated calculator inputs out.
//!
//! Leniency policy:
//! - the initial mass must parse as a positive number, otherwise the analysis
//!   stops with `InvalidInput`
//! - a retained-mass field that is blank or unparsable means "nothing retained"
//!   and reads as `0`
//!
//! Decimal commas (`"12,5"`) are accepted in both kinds of field.

use crate::domain::{Measurement, SievePreset, SieveSeries};
use crate::error::DistributionError;

/// Validated inputs for one analysis.
#[derive(Debug, Clone)]
pub struct FormInput {
    pub initial_mass: f64,
    pub series: SieveSeries,
    pub measurement: Measurement,
}

/// Parse the initial-mass field.
pub fn parse_initial_mass(text: &str) -> Result<f64, DistributionError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DistributionError::invalid("Please enter an initial mass (g)."));
    }
    let value = parse_number(trimmed).ok_or_else(|| {
        DistributionError::invalid(format!("Initial mass '{trimmed}' is not a valid number."))
    })?;
    if !(value.is_finite() && value > 0.0) {
        return Err(DistributionError::invalid(format!(
            "Initial mass must be > 0 g (got {trimmed})."
        )));
    }
    Ok(value)
}

/// Parse a retained-mass field; anything unreadable is `0`.
pub fn parse_retained(text: &str) -> f64 {
    let trimmed = text.trim();
    match parse_number(trimmed) {
        Some(v) if v.is_finite() => v,
        _ => {
            if !trimmed.is_empty() {
                log::debug!("Retained mass '{trimmed}' is not a number; using 0.");
            }
            0.0
        }
    }
}

/// Collect a preset's form: one text field per sieve, in series order.
///
/// Missing trailing fields count as blank; extra fields are ignored.
pub fn collect_form(
    preset: SievePreset,
    initial_mass: &str,
    fields: &[String],
) -> Result<FormInput, DistributionError> {
    let initial_mass = parse_initial_mass(initial_mass)?;
    let series = preset.series();

    if fields.len() > series.len() {
        log::warn!(
            "{} retained values given for {} sieves; ignoring the last {}.",
            fields.len(),
            series.len(),
            fields.len() - series.len()
        );
    }

    let measurement = Measurement::from_pairs(
        series
            .diameters_mm
            .iter()
            .enumerate()
            .map(|(i, &d)| (d, fields.get(i).map(|f| parse_retained(f)).unwrap_or(0.0))),
    );

    Ok(FormInput {
        initial_mass,
        series,
        measurement,
    })
}

fn parse_number(text: &str) -> Option<f64> {
    if let Ok(v) = text.parse::<f64>() {
        return Some(v);
    }
    if text.contains(',') && !text.contains('.') {
        return text.replacen(',', ".", 1).parse::<f64>().ok();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_mass_accepts_plain_and_comma_decimals() {
        assert_eq!(parse_initial_mass(" 500 ").unwrap(), 500.0);
        assert_eq!(parse_initial_mass("512,5").unwrap(), 512.5);
    }

    #[test]
    fn initial_mass_rejects_blank_text_and_non_positive() {
        for text in ["", "   ", "abc", "0", "-10", "inf", "NaN", "1,2,3"] {
            let err = parse_initial_mass(text).unwrap_err();
            assert!(matches!(err, DistributionError::InvalidInput(_)), "text={text:?}");
        }
    }

    #[test]
    fn retained_fields_are_lenient() {
        assert_eq!(parse_retained(""), 0.0);
        assert_eq!(parse_retained("n/a"), 0.0);
        assert_eq!(parse_retained("inf"), 0.0);
        assert_eq!(parse_retained(" 12.5 "), 12.5);
        assert_eq!(parse_retained("7,25"), 7.25);
    }

    #[test]
    fn collect_form_maps_fields_onto_preset_series() {
        let fields: Vec<String> = ["10", "", "oops", "30"].iter().map(|s| s.to_string()).collect();
        let input = collect_form(SievePreset::Coarse, "1000", &fields).unwrap();

        assert_eq!(input.initial_mass, 1000.0);
        assert_eq!(input.series.len(), 11);
        assert_eq!(input.measurement.retained_at(20.0), 10.0);
        assert_eq!(input.measurement.retained_at(16.0), 0.0);
        assert_eq!(input.measurement.retained_at(12.5), 0.0);
        assert_eq!(input.measurement.retained_at(10.0), 30.0);
        // Fields not supplied at all read as blank.
        assert_eq!(input.measurement.retained_at(0.0), 0.0);
    }

    #[test]
    fn collect_form_stops_on_bad_mass() {
        let err = collect_form(SievePreset::Fine, "heavy", &[]).unwrap_err();
        assert!(matches!(err, DistributionError::InvalidInput(_)));
    }
}

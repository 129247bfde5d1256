//! Derived agronomic features.
//!
//! Adds nutrient ratios, a nutrient average, two climate indices and a
//! categorical pH class to a [`RawSample`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PipelineError;
use crate::sample::RawSample;
use crate::schema;

/// Upper bound of the acidic range (exclusive).
pub const ACIDIC_BELOW: f64 = 5.5;
/// Upper bound of the neutral range (inclusive).
pub const NEUTRAL_UP_TO: f64 = 7.5;

/// Soil pH class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PhCategory {
    Acidic,
    Neutral,
    Alkaline,
}

impl PhCategory {
    pub const ALL: [PhCategory; 3] = [PhCategory::Acidic, PhCategory::Neutral, PhCategory::Alkaline];

    /// Classify a pH value; both neutral bounds are inclusive.
    pub fn from_ph(ph: f64) -> Self {
        if ph < ACIDIC_BELOW {
            PhCategory::Acidic
        } else if ph <= NEUTRAL_UP_TO {
            PhCategory::Neutral
        } else {
            PhCategory::Alkaline
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PhCategory::Acidic => "Acidic",
            PhCategory::Neutral => "Neutral",
            PhCategory::Alkaline => "Alkaline",
        }
    }
}

impl fmt::Display for PhCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhCategory {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PhCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PipelineError::UnknownCategory(format!("pH category '{}'", s)))
    }
}

/// A raw sample together with its engineered features.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DerivedSample {
    pub raw: RawSample,
    pub np_ratio: f64,
    pub nk_ratio: f64,
    pub pk_ratio: f64,
    pub npk_average: f64,
    pub temp_humidity_index: f64,
    pub rainfall_humidity_index: f64,
    pub ph_category: PhCategory,
}

impl DerivedSample {
    /// Numeric columns in [`schema::ENCODED_COLUMNS`] order, without the pH class.
    pub fn numeric_values(&self) -> [f64; 13] {
        let r = &self.raw;
        [
            r.nitrogen,
            r.phosphorus,
            r.potassium,
            r.temperature,
            r.humidity,
            r.ph_value,
            r.rainfall,
            self.np_ratio,
            self.nk_ratio,
            self.pk_ratio,
            self.npk_average,
            self.temp_humidity_index,
            self.rainfall_humidity_index,
        ]
    }
}

fn ratio(
    numerator: f64,
    denominator: f64,
    denominator_name: &str,
    ratio_name: &str,
) -> Result<f64, PipelineError> {
    if denominator == 0.0 {
        return Err(PipelineError::invalid_input(
            denominator_name,
            format!("must be non-zero to compute {}", ratio_name),
        ));
    }
    Ok(numerator / denominator)
}

/// Compute the derived features of a raw sample.
///
/// Validates the raw sample first. Ratios with a zero denominator are
/// rejected rather than propagated as infinities.
///
/// # Errors
/// [`PipelineError::InvalidInput`] for an invalid raw field, a zero
/// Phosphorus or Potassium, or a derived value that overflows.
pub fn engineer(raw: &RawSample) -> Result<DerivedSample, PipelineError> {
    raw.validate()?;

    let derived = DerivedSample {
        raw: *raw,
        np_ratio: ratio(raw.nitrogen, raw.phosphorus, schema::PHOSPHORUS, schema::NP_RATIO)?,
        nk_ratio: ratio(raw.nitrogen, raw.potassium, schema::POTASSIUM, schema::NK_RATIO)?,
        pk_ratio: ratio(raw.phosphorus, raw.potassium, schema::POTASSIUM, schema::PK_RATIO)?,
        npk_average: (raw.nitrogen + raw.phosphorus + raw.potassium) / 3.0,
        temp_humidity_index: raw.temperature * raw.humidity,
        rainfall_humidity_index: raw.rainfall * raw.humidity,
        ph_category: PhCategory::from_ph(raw.ph_value),
    };

    for (name, value) in schema::ENCODED_COLUMNS
        .iter()
        .zip(derived.numeric_values().iter())
        .skip(schema::RAW_COLUMNS.len())
    {
        if !value.is_finite() {
            return Err(PipelineError::invalid_input(
                *name,
                format!("derived value is not finite ({})", value),
            ));
        }
    }

    log::debug!(
        "engineered features: NP={:.4} NK={:.4} PK={:.4} pH class={}",
        derived.np_ratio,
        derived.nk_ratio,
        derived.pk_ratio,
        derived.ph_category
    );
    Ok(derived)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn raw() -> RawSample {
        RawSample::new(90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9)
    }

    #[test]
    fn test_engineer_values() {
        let d = engineer(&raw()).unwrap();
        assert_relative_eq!(d.np_ratio, 90.0 / 42.0);
        assert_relative_eq!(d.nk_ratio, 90.0 / 43.0);
        assert_relative_eq!(d.pk_ratio, 42.0 / 43.0);
        assert_relative_eq!(d.npk_average, 175.0 / 3.0);
        assert_relative_eq!(d.temp_humidity_index, 20.8 * 82.0);
        assert_relative_eq!(d.rainfall_humidity_index, 202.9 * 82.0);
        assert_eq!(d.ph_category, PhCategory::Neutral);
    }

    #[test]
    fn test_engineer_is_pure() {
        let a = engineer(&raw()).unwrap();
        let b = engineer(&raw()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_ph_category_boundaries() {
        assert_eq!(PhCategory::from_ph(5.4), PhCategory::Acidic);
        assert_eq!(PhCategory::from_ph(5.5), PhCategory::Neutral);
        assert_eq!(PhCategory::from_ph(7.5), PhCategory::Neutral);
        assert_eq!(PhCategory::from_ph(7.6), PhCategory::Alkaline);
        assert_eq!(PhCategory::from_ph(0.0), PhCategory::Acidic);
    }

    #[test]
    fn test_engineer_zero_phosphorus() {
        let mut r = raw();
        r.phosphorus = 0.0;
        let err = engineer(&r).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput { ref field, .. } if field == "Phosphorus"));
    }

    #[test]
    fn test_engineer_zero_potassium() {
        let mut r = raw();
        r.potassium = 0.0;
        let err = engineer(&r).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput { ref field, .. } if field == "Potassium"));
    }

    #[test]
    fn test_engineer_zero_nitrogen_is_fine() {
        let mut r = raw();
        r.nitrogen = 0.0;
        let d = engineer(&r).unwrap();
        assert_eq!(d.np_ratio, 0.0);
        assert_eq!(d.nk_ratio, 0.0);
    }

    #[test]
    fn test_engineer_overflow_rejected() {
        let mut r = raw();
        r.rainfall = f64::MAX;
        assert!(matches!(
            engineer(&r),
            Err(PipelineError::InvalidInput { ref field, .. }) if field == "Rainfall_Humidity_Index"
        ));
    }

    #[test]
    fn test_engineer_validates_raw() {
        let mut r = raw();
        r.ph_value = f64::NAN;
        assert!(matches!(engineer(&r), Err(PipelineError::InvalidInput { .. })));
    }

    #[test]
    fn test_ph_category_from_str() {
        assert_eq!("neutral".parse::<PhCategory>().unwrap(), PhCategory::Neutral);
        assert_eq!(" Alkaline ".parse::<PhCategory>().unwrap(), PhCategory::Alkaline);
        assert!(matches!(
            "basic".parse::<PhCategory>(),
            Err(PipelineError::UnknownCategory(_))
        ));
    }
}

//! Raw soil and climate measurements.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::schema;

/// The seven measurements a recommendation is computed from.
///
/// Field names serialize as the training column names, so the same struct
/// reads JSON bodies and CSV rows.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Nitrogen content, kg/ha.
    #[serde(rename = "Nitrogen")]
    pub nitrogen: f64,
    /// Phosphorus content, kg/ha.
    #[serde(rename = "Phosphorus")]
    pub phosphorus: f64,
    /// Potassium content, kg/ha.
    #[serde(rename = "Potassium")]
    pub potassium: f64,
    /// Air temperature, degrees Celsius.
    #[serde(rename = "Temperature")]
    pub temperature: f64,
    /// Relative humidity, percent.
    #[serde(rename = "Humidity")]
    pub humidity: f64,
    /// Soil pH.
    #[serde(rename = "pH_Value")]
    pub ph_value: f64,
    /// Rainfall, mm.
    #[serde(rename = "Rainfall")]
    pub rainfall: f64,
}

/// Lowest accepted value for each raw column.
const DOMAIN_FLOORS: [f64; 7] = [0.0, 0.0, 0.0, -50.0, 0.0, 0.0, 0.0];

impl RawSample {
    pub fn new(
        nitrogen: f64,
        phosphorus: f64,
        potassium: f64,
        temperature: f64,
        humidity: f64,
        ph_value: f64,
        rainfall: f64,
    ) -> Self {
        Self {
            nitrogen,
            phosphorus,
            potassium,
            temperature,
            humidity,
            ph_value,
            rainfall,
        }
    }

    /// Values in [`schema::RAW_COLUMNS`] order.
    pub fn values(&self) -> [f64; 7] {
        [
            self.nitrogen,
            self.phosphorus,
            self.potassium,
            self.temperature,
            self.humidity,
            self.ph_value,
            self.rainfall,
        ]
    }

    /// Check every field is finite and at or above its domain floor.
    ///
    /// # Errors
    /// [`PipelineError::InvalidInput`] naming the first offending field.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let values = self.values();
        for ((name, value), floor) in schema::RAW_COLUMNS
            .iter()
            .zip(values.iter())
            .zip(DOMAIN_FLOORS.iter())
        {
            if !value.is_finite() {
                return Err(PipelineError::invalid_input(
                    *name,
                    format!("expected a finite number, got {}", value),
                ));
            }
            if value < floor {
                return Err(PipelineError::invalid_input(
                    *name,
                    format!("{} is below the minimum of {}", value, floor),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RawSample {
        RawSample::new(90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9)
    }

    #[test]
    fn test_raw_sample_validate_ok() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_raw_sample_rejects_nan() {
        let mut s = sample();
        s.humidity = f64::NAN;
        let err = s.validate().unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput { ref field, .. } if field == "Humidity"));
    }

    #[test]
    fn test_raw_sample_rejects_infinite() {
        let mut s = sample();
        s.rainfall = f64::INFINITY;
        assert!(matches!(
            s.validate(),
            Err(PipelineError::InvalidInput { ref field, .. }) if field == "Rainfall"
        ));
    }

    #[test]
    fn test_raw_sample_domain_floors() {
        let mut s = sample();
        s.nitrogen = -0.1;
        assert!(s.validate().is_err());

        let mut s = sample();
        s.temperature = -50.0;
        assert!(s.validate().is_ok());
        s.temperature = -50.5;
        assert!(matches!(
            s.validate(),
            Err(PipelineError::InvalidInput { ref field, .. }) if field == "Temperature"
        ));
    }

    #[test]
    fn test_raw_sample_json_field_names() {
        let json = r#"{"Nitrogen":90,"Phosphorus":42,"Potassium":43,"Temperature":20.8,
                       "Humidity":82,"pH_Value":6.5,"Rainfall":202.9}"#;
        let parsed: RawSample = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, sample());
    }
}

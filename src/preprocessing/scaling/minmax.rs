//! Min-max scaler.
//!
//! Uses the fitted `min_`/`scale_` form, so the forward map is a single
//! multiply-add:
//! ```text
//! x_scaled = x * scale + min
//! ```
//! with `scale = (range_max - range_min) / (data_max - data_min)`.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::preprocessing::frame::{Frame, Scaled, Transformed};
use crate::preprocessing::traits::FittedTransformer;

use super::{aligned_values, validate_vectors};

/// Serializable parameters for a fitted min-max scaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScalerParams {
    pub feature_names: Vec<String>,
    /// Additive offset per column.
    pub min: Vec<f64>,
    /// Multiplicative factor per column.
    pub scale: Vec<f64>,
}

/// Fitted min-max scaler ready for inference.
#[derive(Clone, Debug)]
pub struct FittedMinMaxScaler {
    params: MinMaxScalerParams,
}

impl FittedTransformer for FittedMinMaxScaler {
    type Input = Frame<Transformed>;
    type Output = Frame<Scaled>;
    type Params = MinMaxScalerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PipelineError> {
        let values = aligned_values(data, &self.params.feature_names)?
            .iter()
            .zip(self.params.scale.iter().zip(&self.params.min))
            .map(|(x, (s, m))| x * s + m)
            .collect();
        Frame::new(self.params.feature_names.clone(), values)
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PipelineError> {
        let values = aligned_values(data, &self.params.feature_names)?
            .iter()
            .zip(self.params.scale.iter().zip(&self.params.min))
            .map(|(z, (s, m))| (z - m) / s)
            .collect();
        Frame::new(self.params.feature_names.clone(), values)
    }

    fn extract_params(&self) -> Self::Params {
        self.params.clone()
    }

    fn from_params(params: Self::Params) -> Result<Self, PipelineError> {
        validate_vectors(
            "min_max",
            &params.feature_names,
            &[("min", &params.min[..]), ("scale", &params.scale[..])],
        )?;
        // A zero factor would make the inverse undefined.
        if let Some(i) = params.scale.iter().position(|&s| s == 0.0) {
            return Err(PipelineError::InvalidArtifact(format!(
                "min_max scaler scale for {} is zero",
                params.feature_names[i]
            )));
        }
        Ok(Self { params })
    }

    fn feature_names_in(&self) -> Vec<String> {
        self.params.feature_names.clone()
    }
}

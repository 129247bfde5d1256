//! Standard scaler (z-score).
//!
//! ```text
//! z = (x - mean) / scale
//! ```
//! where `mean` and `scale` were measured on the training set. A zero
//! `scale` marks a constant training column and is treated as 1.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::preprocessing::frame::{Frame, Scaled, Transformed};
use crate::preprocessing::traits::FittedTransformer;

use super::{aligned_values, validate_vectors};

/// Serializable parameters for a fitted standard scaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerParams {
    /// Columns in fitted order.
    pub feature_names: Vec<String>,
    /// Mean of each column.
    pub mean: Vec<f64>,
    /// Standard deviation of each column.
    pub scale: Vec<f64>,
}

/// Fitted standard scaler ready for inference.
#[derive(Clone, Debug)]
pub struct FittedStandardScaler {
    params: StandardScalerParams,
    divisors: Vec<f64>,
}

impl FittedStandardScaler {
    pub fn mean(&self) -> &[f64] {
        &self.params.mean
    }

    /// Effective divisors, with zero scales replaced by 1.
    pub fn scale(&self) -> &[f64] {
        &self.divisors
    }
}

impl FittedTransformer for FittedStandardScaler {
    type Input = Frame<Transformed>;
    type Output = Frame<Scaled>;
    type Params = StandardScalerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PipelineError> {
        let values = aligned_values(data, &self.params.feature_names)?
            .iter()
            .zip(self.params.mean.iter().zip(&self.divisors))
            .map(|(x, (mean, s))| (x - mean) / s)
            .collect();
        Frame::new(self.params.feature_names.clone(), values)
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PipelineError> {
        let values = aligned_values(data, &self.params.feature_names)?
            .iter()
            .zip(self.params.mean.iter().zip(&self.divisors))
            .map(|(z, (mean, s))| z * s + mean)
            .collect();
        Frame::new(self.params.feature_names.clone(), values)
    }

    fn extract_params(&self) -> Self::Params {
        self.params.clone()
    }

    fn from_params(params: Self::Params) -> Result<Self, PipelineError> {
        validate_vectors(
            "standard",
            &params.feature_names,
            &[("mean", &params.mean[..]), ("scale", &params.scale[..])],
        )?;
        let divisors = params
            .scale
            .iter()
            .map(|&s| if s == 0.0 { 1.0 } else { s })
            .collect();
        Ok(Self { params, divisors })
    }

    fn feature_names_in(&self) -> Vec<String> {
        self.params.feature_names.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn names() -> Vec<String> {
        vec!["x".to_string(), "y".to_string()]
    }

    fn fitted() -> FittedStandardScaler {
        FittedStandardScaler::from_params(StandardScalerParams {
            feature_names: names(),
            mean: vec![1.0 / 3.0, 5.0 / 3.0],
            scale: vec![0.4714045207910317, 0.9428090415820634],
        })
        .unwrap()
    }

    #[test]
    fn test_standard_scaler_transform() {
        let frame = Frame::<Transformed>::new(names(), vec![1.0, 3.0]).unwrap();
        let scaled = fitted().transform(&frame).unwrap();
        assert_relative_eq!(scaled.values()[0], (1.0 - 1.0 / 3.0) / 0.4714045207910317);
        assert_relative_eq!(scaled.values()[1], (3.0 - 5.0 / 3.0) / 0.9428090415820634);
    }

    #[test]
    fn test_standard_scaler_inverse_transform() {
        let s = fitted();
        let frame = Frame::<Transformed>::new(names(), vec![-2.5, 7.0]).unwrap();
        let back = s.inverse_transform(&s.transform(&frame).unwrap()).unwrap();
        for (a, b) in back.values().iter().zip(frame.values()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_standard_scaler_constant_feature() {
        let s = FittedStandardScaler::from_params(StandardScalerParams {
            feature_names: names(),
            mean: vec![5.0, 0.0],
            scale: vec![0.0, 1.0],
        })
        .unwrap();
        assert_eq!(s.scale(), &[1.0, 1.0]);
        let frame = Frame::<Transformed>::new(names(), vec![5.0, 2.0]).unwrap();
        let scaled = s.transform(&frame).unwrap();
        assert_eq!(scaled.values(), &[0.0, 2.0]);
        assert!(scaled.ensure_finite().is_ok());
    }

    #[test]
    fn test_standard_scaler_length_mismatch() {
        let result = FittedStandardScaler::from_params(StandardScalerParams {
            feature_names: names(),
            mean: vec![0.0],
            scale: vec![1.0, 1.0],
        });
        assert!(matches!(result, Err(PipelineError::InvalidArtifact(_))));
    }

    #[test]
    fn test_standard_scaler_feature_mismatch() {
        let frame = Frame::<Transformed>::new(vec!["x".to_string()], vec![1.0]).unwrap();
        assert!(matches!(
            fitted().transform(&frame),
            Err(PipelineError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_standard_scaler_save_load_file() {
        let s = fitted();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("standard.bin");
        s.save_to_file(&path).unwrap();

        let loaded = FittedStandardScaler::load_from_file(&path).unwrap();
        assert_eq!(loaded.extract_params(), s.extract_params());
        assert_eq!(loaded.feature_names_in(), names());
    }
}

//! Per-column affine scalers.
//!
//! | Scaler | Forward | Inverse |
//! |--------|---------|---------|
//! | [`FittedStandardScaler`] | `(x - mean) / scale` | `z * scale + mean` |
//! | [`FittedMinMaxScaler`] | `x * scale + min` | `(z - min) / scale` |
//!
//! Both are fitted at training time over a named column set. A sample must
//! carry exactly that set; order does not matter on input, and the output
//! follows the scaler's own column order.

pub mod minmax;
pub mod standard;

pub use minmax::{FittedMinMaxScaler, MinMaxScalerParams};
pub use standard::{FittedStandardScaler, StandardScalerParams};

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::preprocessing::frame::{Frame, Scaled, State, Transformed};
use crate::preprocessing::traits::FittedTransformer;
use crate::schema;

/// Serializable parameters of either scaler kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalerParams {
    Standard(StandardScalerParams),
    MinMax(MinMaxScalerParams),
}

/// A fitted scaler of either kind.
#[derive(Clone, Debug)]
pub enum FittedScaler {
    Standard(FittedStandardScaler),
    MinMax(FittedMinMaxScaler),
}

impl FittedScaler {
    pub fn kind(&self) -> &'static str {
        match self {
            FittedScaler::Standard(_) => "standard",
            FittedScaler::MinMax(_) => "min_max",
        }
    }
}

/// Scale a transformed sample.
pub fn scale(sample: &Frame<Transformed>, scaler: &FittedScaler) -> Result<Frame<Scaled>, PipelineError> {
    scaler.transform(sample)
}

/// Reverse [`scale`].
pub fn unscale(
    sample: &Frame<Scaled>,
    scaler: &FittedScaler,
) -> Result<Frame<Transformed>, PipelineError> {
    scaler.inverse_transform(sample)
}

impl FittedTransformer for FittedScaler {
    type Input = Frame<Transformed>;
    type Output = Frame<Scaled>;
    type Params = ScalerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PipelineError> {
        match self {
            FittedScaler::Standard(s) => s.transform(data),
            FittedScaler::MinMax(s) => s.transform(data),
        }
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PipelineError> {
        match self {
            FittedScaler::Standard(s) => s.inverse_transform(data),
            FittedScaler::MinMax(s) => s.inverse_transform(data),
        }
    }

    fn extract_params(&self) -> Self::Params {
        match self {
            FittedScaler::Standard(s) => ScalerParams::Standard(s.extract_params()),
            FittedScaler::MinMax(s) => ScalerParams::MinMax(s.extract_params()),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PipelineError> {
        Ok(match params {
            ScalerParams::Standard(p) => FittedScaler::Standard(FittedStandardScaler::from_params(p)?),
            ScalerParams::MinMax(p) => FittedScaler::MinMax(FittedMinMaxScaler::from_params(p)?),
        })
    }

    fn feature_names_in(&self) -> Vec<String> {
        match self {
            FittedScaler::Standard(s) => s.feature_names_in(),
            FittedScaler::MinMax(s) => s.feature_names_in(),
        }
    }
}

/// Values of `frame` in `names` order.
///
/// # Errors
/// [`PipelineError::SchemaMismatch`] unless the frame's column set equals
/// `names` exactly.
pub(crate) fn aligned_values<S: State>(
    frame: &Frame<S>,
    names: &[String],
) -> Result<Vec<f64>, PipelineError> {
    let (missing, unexpected) = schema::column_diff(names, frame.names());
    if !missing.is_empty() || !unexpected.is_empty() {
        return Err(PipelineError::SchemaMismatch {
            stage: "scaler",
            missing,
            unexpected,
        });
    }
    names.iter().map(|name| frame.column(name)).collect()
}

/// Check that every parameter vector matches the fitted columns and holds
/// only finite values.
pub(crate) fn validate_vectors(
    kind: &str,
    feature_names: &[String],
    vectors: &[(&str, &[f64])],
) -> Result<(), PipelineError> {
    if feature_names.is_empty() {
        return Err(PipelineError::InvalidArtifact(format!(
            "{} scaler has no columns",
            kind
        )));
    }
    for (i, name) in feature_names.iter().enumerate() {
        if feature_names[..i].contains(name) {
            return Err(PipelineError::InvalidArtifact(format!(
                "{} scaler lists column {} twice",
                kind, name
            )));
        }
    }
    for (label, values) in vectors {
        if values.len() != feature_names.len() {
            return Err(PipelineError::InvalidArtifact(format!(
                "{} scaler has {} {} values for {} columns",
                kind,
                values.len(),
                label,
                feature_names.len()
            )));
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(PipelineError::InvalidArtifact(format!(
                "{} scaler {} for {} is not finite",
                kind, label, feature_names[i]
            )));
        }
    }
    Ok(())
}

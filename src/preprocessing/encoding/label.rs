//! Label decoding for classifier outputs.
//!
//! Mirrors a fitted label encoder: code `i` stands for `classes[i]`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::crop::Crop;
use crate::error::PipelineError;
use crate::preprocessing::traits::FittedTransformer;

/// Serializable parameters for a [`LabelDecoder`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoderParams {
    /// Crop for each code, indexed by code.
    pub classes: Vec<Crop>,
}

/// Fitted label decoder: class code ↔ crop.
#[derive(Clone, Debug)]
pub struct LabelDecoder {
    classes: Vec<Crop>,
    crop_to_code: HashMap<Crop, usize>,
}

impl LabelDecoder {
    /// Crops in code order.
    pub fn classes(&self) -> &[Crop] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Crop for a class code.
    ///
    /// # Errors
    /// [`PipelineError::UnknownCategory`] when the code is out of range.
    pub fn decode(&self, code: usize) -> Result<Crop, PipelineError> {
        self.classes.get(code).copied().ok_or_else(|| {
            PipelineError::UnknownCategory(format!(
                "class code {} is outside the {} known labels",
                code,
                self.classes.len()
            ))
        })
    }

    /// Class code of a crop.
    pub fn encode(&self, crop: Crop) -> Result<usize, PipelineError> {
        self.crop_to_code.get(&crop).copied().ok_or_else(|| {
            PipelineError::UnknownCategory(format!("crop {} is not a known label", crop))
        })
    }
}

impl FittedTransformer for LabelDecoder {
    type Input = usize;
    type Output = Crop;
    type Params = LabelEncoderParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PipelineError> {
        self.decode(*data)
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PipelineError> {
        self.encode(*data)
    }

    fn extract_params(&self) -> Self::Params {
        LabelEncoderParams {
            classes: self.classes.clone(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PipelineError> {
        if params.classes.is_empty() {
            return Err(PipelineError::InvalidArtifact(
                "label decoder has no classes".to_string(),
            ));
        }
        let mut crop_to_code = HashMap::with_capacity(params.classes.len());
        for (code, &crop) in params.classes.iter().enumerate() {
            if crop_to_code.insert(crop, code).is_some() {
                return Err(PipelineError::InvalidArtifact(format!(
                    "crop {} appears twice in label decoder",
                    crop
                )));
            }
        }
        Ok(Self {
            classes: params.classes,
            crop_to_code,
        })
    }

    fn feature_names_in(&self) -> Vec<String> {
        Vec::new()
    }
}

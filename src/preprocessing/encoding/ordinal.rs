//! Ordinal encoding of the pH class.
//!
//! The category→code table is fixed at training time. It is loaded, never
//! learned here.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::PipelineError;
use crate::preprocessing::feature_engineering::{DerivedSample, PhCategory};
use crate::preprocessing::frame::{Encoded, Frame};
use crate::preprocessing::traits::FittedTransformer;
use crate::schema;

/// Serializable parameters for an [`OrdinalMapping`].
///
/// Stored as `(category, code)` pairs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrdinalEncoderParams {
    pub mapping: Vec<(PhCategory, i64)>,
}

impl Default for OrdinalEncoderParams {
    /// Alphabetical order of the category names, as sklearn's
    /// `OrdinalEncoder` assigns codes: Acidic=0, Alkaline=1, Neutral=2.
    fn default() -> Self {
        Self {
            mapping: vec![
                (PhCategory::Acidic, 0),
                (PhCategory::Alkaline, 1),
                (PhCategory::Neutral, 2),
            ],
        }
    }
}

/// Fitted pH category encoder.
#[derive(Clone, Debug)]
pub struct OrdinalMapping {
    to_code: HashMap<PhCategory, i64>,
    to_category: HashMap<i64, PhCategory>,
    params: OrdinalEncoderParams,
}

impl Default for OrdinalMapping {
    fn default() -> Self {
        // The default table has no duplicates.
        Self::build(OrdinalEncoderParams::default())
    }
}

impl OrdinalMapping {
    fn build(params: OrdinalEncoderParams) -> Self {
        let to_code = params.mapping.iter().copied().collect();
        let to_category = params.mapping.iter().map(|&(c, code)| (code, c)).collect();
        Self {
            to_code,
            to_category,
            params,
        }
    }

    /// Code of a category.
    ///
    /// # Errors
    /// [`PipelineError::UnknownCategory`] when the table has no entry for it.
    pub fn encode(&self, category: PhCategory) -> Result<i64, PipelineError> {
        self.to_code.get(&category).copied().ok_or_else(|| {
            PipelineError::UnknownCategory(format!("pH category {} has no ordinal code", category))
        })
    }

    /// Category of a code.
    pub fn decode(&self, code: i64) -> Result<PhCategory, PipelineError> {
        self.to_category.get(&code).copied().ok_or_else(|| {
            PipelineError::UnknownCategory(format!("ordinal code {} has no pH category", code))
        })
    }

    /// Build the encoded frame: the numeric columns of the derived sample
    /// followed by the pH class code.
    pub fn encode_sample(&self, sample: &DerivedSample) -> Result<Frame<Encoded>, PipelineError> {
        let code = self.encode(sample.ph_category)?;
        let mut values = sample.numeric_values().to_vec();
        values.push(code as f64);
        let frame = Frame::new(schema::to_owned_names(&schema::ENCODED_COLUMNS), values)?;
        log::debug!("encoded pH class {} as {}", sample.ph_category, code);
        Ok(frame)
    }
}

/// Encode a single category against a mapping.
pub fn encode_category(category: PhCategory, mapping: &OrdinalMapping) -> Result<i64, PipelineError> {
    mapping.encode(category)
}

impl FittedTransformer for OrdinalMapping {
    type Input = PhCategory;
    type Output = i64;
    type Params = OrdinalEncoderParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PipelineError> {
        self.encode(*data)
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PipelineError> {
        self.decode(*data)
    }

    fn extract_params(&self) -> Self::Params {
        self.params.clone()
    }

    fn from_params(params: Self::Params) -> Result<Self, PipelineError> {
        for (i, (category, code)) in params.mapping.iter().enumerate() {
            for (other_category, other_code) in &params.mapping[..i] {
                if other_category == category {
                    return Err(PipelineError::InvalidArtifact(format!(
                        "pH category {} mapped twice",
                        category
                    )));
                }
                if other_code == code {
                    return Err(PipelineError::InvalidArtifact(format!(
                        "ordinal code {} assigned to both {} and {}",
                        code, other_category, category
                    )));
                }
            }
        }
        Ok(Self::build(params))
    }

    fn feature_names_in(&self) -> Vec<String> {
        vec![schema::PH_CATEGORY.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::feature_engineering::engineer;
    use crate::sample::RawSample;

    #[test]
    fn test_ordinal_default_codes() {
        let m = OrdinalMapping::default();
        assert_eq!(m.encode(PhCategory::Acidic).unwrap(), 0);
        assert_eq!(m.encode(PhCategory::Alkaline).unwrap(), 1);
        assert_eq!(m.encode(PhCategory::Neutral).unwrap(), 2);
    }

    #[test]
    fn test_ordinal_inverse() {
        let m = OrdinalMapping::default();
        for c in PhCategory::ALL {
            let code = m.transform(&c).unwrap();
            assert_eq!(m.inverse_transform(&code).unwrap(), c);
        }
        assert!(matches!(
            m.decode(7),
            Err(PipelineError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_ordinal_unknown_category() {
        let params = OrdinalEncoderParams {
            mapping: vec![(PhCategory::Acidic, 0), (PhCategory::Neutral, 1)],
        };
        let m = OrdinalMapping::from_params(params).unwrap();
        assert!(matches!(
            encode_category(PhCategory::Alkaline, &m),
            Err(PipelineError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_ordinal_rejects_duplicate_codes() {
        let params = OrdinalEncoderParams {
            mapping: vec![(PhCategory::Acidic, 0), (PhCategory::Neutral, 0)],
        };
        assert!(matches!(
            OrdinalMapping::from_params(params),
            Err(PipelineError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn test_ordinal_rejects_duplicate_categories() {
        let params = OrdinalEncoderParams {
            mapping: vec![(PhCategory::Acidic, 0), (PhCategory::Acidic, 1)],
        };
        assert!(OrdinalMapping::from_params(params).is_err());
    }

    #[test]
    fn test_encode_sample_columns() {
        let raw = RawSample::new(90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9);
        let derived = engineer(&raw).unwrap();
        let frame = OrdinalMapping::default().encode_sample(&derived).unwrap();
        assert_eq!(frame.names(), &schema::ENCODED_COLUMNS);
        assert_eq!(frame.get("PH_Cat"), Some(2.0));
        assert_eq!(frame.get("Nitrogen"), Some(90.0));
    }

    #[test]
    fn test_ordinal_params_roundtrip() {
        let m = OrdinalMapping::default();
        let restored = OrdinalMapping::from_params(m.extract_params()).unwrap();
        assert_eq!(restored.extract_params(), OrdinalEncoderParams::default());
    }
}

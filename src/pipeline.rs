//! The seven-stage recommendation pipeline.
//!
//! ```text
//! RawSample -> validate -> engineer -> encode -> numeric transforms
//!           -> scale -> select features -> classify + decode
//! ```
//!
//! Every stage is a pure function of its input and the loaded
//! [`PipelineArtifacts`]; nothing is retained between calls.

use ndarray::Array1;
use serde::Serialize;

use crate::artifacts::PipelineArtifacts;
use crate::crop::Crop;
use crate::error::PipelineError;
use crate::model::{argmax, ensure_finite_output, Classifier};
use crate::preprocessing::feature_engineering::engineer;
use crate::preprocessing::frame::{Frame, Scaled};
use crate::preprocessing::traits::FittedTransformer;
use crate::sample::RawSample;
use crate::schema;

/// Ordered model input: a named subset of a scaled sample.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureVector {
    names: Vec<String>,
    values: Array1<f64>,
}

impl FeatureVector {
    /// Pick `names`, in that order, from a scaled sample.
    ///
    /// # Errors
    /// [`PipelineError::SchemaMismatch`] listing every name the sample lacks.
    pub fn select(sample: &Frame<Scaled>, names: &[String]) -> Result<Self, PipelineError> {
        let missing: Vec<String> = names
            .iter()
            .filter(|n| sample.position(n).is_none())
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(PipelineError::missing_columns("feature selector", missing));
        }
        let values = names
            .iter()
            .map(|n| sample.column(n))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            names: names.to_vec(),
            values: Array1::from(values),
        })
    }

    /// Build a vector directly from names and values.
    ///
    /// # Errors
    /// [`PipelineError::SchemaMismatch`] when a name repeats, or when names
    /// and values differ in count. Names without a value are reported as
    /// missing, values without a name as unexpected.
    pub fn from_parts(names: Vec<String>, values: Array1<f64>) -> Result<Self, PipelineError> {
        let repeated = schema::repeated_names(&names);
        if !repeated.is_empty() || names.len() != values.len() {
            return Err(PipelineError::SchemaMismatch {
                stage: "feature vector",
                missing: names.iter().skip(values.len()).cloned().collect(),
                unexpected: repeated
                    .into_iter()
                    .chain((names.len()..values.len()).map(|i| format!("<unnamed {}>", i)))
                    .collect(),
            });
        }
        Ok(Self { names, values })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Values rearranged into `order`. Both name lists must hold the same
    /// names exactly once.
    fn aligned_to(&self, order: &[String]) -> Result<Array1<f64>, PipelineError> {
        if self.names == order {
            return Ok(self.values.clone());
        }
        let (missing, mut unexpected) = schema::column_diff(order, &self.names);
        unexpected.extend(schema::repeated_names(&self.names));
        if !missing.is_empty() || !unexpected.is_empty() || self.names.len() != order.len() {
            return Err(PipelineError::SchemaMismatch {
                stage: "predictor",
                missing,
                unexpected,
            });
        }
        Ok(order
            .iter()
            .filter_map(|name| self.names.iter().position(|n| n == name))
            .map(|i| self.values[i])
            .collect())
    }
}

/// Classifier output decoded into crops.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Prediction {
    pub crop: Crop,
    /// Probability of `crop`, when the classifier produces probabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Probability of every class, in class-index order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<Vec<(Crop, f64)>>,
}

impl Prediction {
    /// The `k` most probable crops, highest first. Equal probabilities keep
    /// class-index order. Empty when the classifier gives no probabilities.
    pub fn top_k(&self, k: usize) -> Vec<(Crop, f64)> {
        let mut ranked = self.probabilities.clone().unwrap_or_default();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(k);
        ranked
    }
}

/// Classify a feature vector and decode the result.
///
/// # Errors
/// - [`PipelineError::SchemaMismatch`] when the vector's names are not the
///   classifier's feature names.
/// - [`PipelineError::UnknownCategory`] when a class code has no crop.
pub fn predict(
    artifacts: &PipelineArtifacts,
    features: &FeatureVector,
) -> Result<Prediction, PipelineError> {
    let classifier = artifacts.classifier();
    let labels = artifacts.labels();
    let x = features.aligned_to(classifier.feature_names())?;
    if let Some(i) = x.iter().position(|v| !v.is_finite()) {
        return Err(PipelineError::invalid_input(
            classifier.feature_names()[i].clone(),
            format!("feature value {} is not finite", x[i]),
        ));
    }

    let probabilities = classifier.predict_proba(x.view())?;
    if let Some(p) = &probabilities {
        ensure_finite_output(p.view())?;
    }
    let index = match &probabilities {
        Some(p) => argmax(p.view()).ok_or_else(|| {
            PipelineError::InvalidArtifact("classifier returned no probabilities".to_string())
        })?,
        None => classifier.predict_index(x.view())?,
    };

    let decode = |i: usize| -> Result<Crop, PipelineError> {
        let code = classifier.classes().get(i).copied().ok_or_else(|| {
            PipelineError::UnknownCategory(format!("class index {} out of range", i))
        })?;
        labels.decode(code)
    };

    let crop = decode(index)?;
    let (confidence, probabilities) = match probabilities {
        Some(p) => {
            let labelled = p
                .iter()
                .enumerate()
                .map(|(i, &v)| decode(i).map(|c| (c, v)))
                .collect::<Result<Vec<_>, _>>()?;
            (Some(p[index]), Some(labelled))
        }
        None => (None, None),
    };

    log::debug!("predicted {} (class index {})", crop, index);
    Ok(Prediction {
        crop,
        confidence,
        probabilities,
    })
}

/// Run stages 1 to 6: everything up to the classifier input.
pub fn prepare(
    artifacts: &PipelineArtifacts,
    raw: &RawSample,
) -> Result<FeatureVector, PipelineError> {
    let derived = engineer(raw)?;
    let encoded = artifacts.ordinal().encode_sample(&derived)?;
    let transformed = artifacts.numeric().transform(&encoded)?;
    let scaled = artifacts.scaler().transform(&transformed)?;
    scaled.ensure_finite()?;
    let features = FeatureVector::select(&scaled, artifacts.classifier().feature_names())?;
    log::debug!("selected {} model features", features.len());
    Ok(features)
}

/// Run the whole pipeline on one raw sample.
pub fn recommend(
    artifacts: &PipelineArtifacts,
    raw: &RawSample,
) -> Result<Prediction, PipelineError> {
    let features = prepare(artifacts, raw)?;
    predict(artifacts, &features)
}

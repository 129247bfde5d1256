//! The bundle of pre-fitted artifacts the pipeline runs on.
//!
//! Loaded once, validated as a whole, then shared read-only by every
//! prediction. Two on-disk forms exist: JSON, as exported from the training
//! environment, and compact bincode.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::model::{Classifier, ClassifierParams, FittedClassifier};
use crate::pipeline::{self, FeatureVector, Prediction};
use crate::preprocessing::encoding::{LabelDecoder, LabelEncoderParams, OrdinalEncoderParams, OrdinalMapping};
use crate::preprocessing::feature_engineering::PhCategory;
use crate::preprocessing::numeric::{NumericTransformer, NumericTransformerParams};
use crate::preprocessing::scaling::{FittedScaler, ScalerParams};
use crate::preprocessing::traits::FittedTransformer;
use crate::sample::RawSample;
use crate::schema;
use crate::serialization::{self, SerializableParams};

/// Serializable form of a [`PipelineArtifacts`] bundle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArtifactsParams {
    #[serde(default)]
    pub ordinal: OrdinalEncoderParams,
    pub numeric: NumericTransformerParams,
    pub scaler: ScalerParams,
    pub classifier: ClassifierParams,
    pub labels: LabelEncoderParams,
}

/// Every fitted stage of the pipeline.
#[derive(Clone, Debug)]
pub struct PipelineArtifacts {
    ordinal: OrdinalMapping,
    numeric: NumericTransformer,
    scaler: FittedScaler,
    classifier: FittedClassifier,
    labels: LabelDecoder,
}

impl PipelineArtifacts {
    pub fn ordinal(&self) -> &OrdinalMapping {
        &self.ordinal
    }

    pub fn numeric(&self) -> &NumericTransformer {
        &self.numeric
    }

    pub fn scaler(&self) -> &FittedScaler {
        &self.scaler
    }

    pub fn classifier(&self) -> &FittedClassifier {
        &self.classifier
    }

    pub fn labels(&self) -> &LabelDecoder {
        &self.labels
    }

    /// Run the full pipeline on one raw sample.
    pub fn recommend(&self, raw: &RawSample) -> Result<Prediction, PipelineError> {
        pipeline::recommend(self, raw)
    }

    /// Classify an already prepared feature vector.
    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction, PipelineError> {
        pipeline::predict(self, features)
    }

    pub fn extract_params(&self) -> ArtifactsParams {
        ArtifactsParams {
            ordinal: self.ordinal.extract_params(),
            numeric: self.numeric.extract_params(),
            scaler: self.scaler.extract_params(),
            classifier: self.classifier.extract_params(),
            labels: self.labels.extract_params(),
        }
    }

    /// Build every stage and check that they fit together.
    ///
    /// # Errors
    /// - [`PipelineError::InvalidArtifact`] when a stage is malformed or a
    ///   class code has no label.
    /// - [`PipelineError::SchemaMismatch`] when the transformer output, the
    ///   scaler columns and the classifier features disagree.
    pub fn from_params(params: ArtifactsParams) -> Result<Self, PipelineError> {
        let ordinal = OrdinalMapping::from_params(params.ordinal)?;
        let numeric = NumericTransformer::from_params(params.numeric)?;
        let scaler = FittedScaler::from_params(params.scaler)?;
        let classifier = FittedClassifier::from_params(params.classifier)?;
        let labels = LabelDecoder::from_params(params.labels)?;

        for category in PhCategory::ALL {
            if ordinal.encode(category).is_err() {
                log::warn!("ordinal mapping has no code for {}; such samples will fail", category);
            }
        }

        let transformed = numeric.output_columns(&schema::to_owned_names(&schema::ENCODED_COLUMNS))?;
        let scaler_columns = scaler.feature_names_in();
        let (missing, unexpected) = schema::column_diff(&scaler_columns, &transformed);
        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(PipelineError::SchemaMismatch {
                stage: "artifacts: transformer output vs scaler",
                missing,
                unexpected,
            });
        }

        let unknown_features: Vec<String> = classifier
            .feature_names()
            .iter()
            .filter(|name| !scaler_columns.contains(name))
            .cloned()
            .collect();
        if !unknown_features.is_empty() {
            return Err(PipelineError::missing_columns(
                "artifacts: classifier features vs scaler",
                unknown_features,
            ));
        }

        for &code in classifier.classes() {
            if labels.decode(code).is_err() {
                return Err(PipelineError::InvalidArtifact(format!(
                    "classifier class code {} has no label among {} classes",
                    code,
                    labels.n_classes()
                )));
            }
        }

        Ok(Self {
            ordinal,
            numeric,
            scaler,
            classifier,
            labels,
        })
    }

    /// Load a JSON bundle.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let params: ArtifactsParams = serialization::read_json(path)?;
        let artifacts = Self::from_params(params)?;
        artifacts.log_loaded(path);
        Ok(artifacts)
    }

    /// Write the bundle as JSON.
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PipelineError> {
        serialization::write_json(&self.extract_params(), path)
    }

    /// Load a bincode bundle written by [`PipelineArtifacts::save_to_file`].
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let params = ArtifactsParams::read_bincode(path)?;
        let artifacts = Self::from_params(params)?;
        artifacts.log_loaded(path);
        Ok(artifacts)
    }

    /// Write the bundle as bincode.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PipelineError> {
        self.extract_params().write_bincode(path)
    }

    /// Load by extension: `.json` as JSON, anything else as bincode.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_file(path)
        } else {
            Self::load_from_file(path)
        }
    }

    fn log_loaded(&self, path: &Path) {
        log::info!(
            "loaded artifacts from {}: {} scaler ({} columns), {} classifier ({} features, {} classes)",
            path.display(),
            self.scaler.kind(),
            self.scaler.feature_names_in().len(),
            self.classifier.kind(),
            self.classifier.n_features(),
            self.labels.n_classes()
        );
    }
}

//! Pre-trained crop classifiers.
//!
//! A classifier maps an ordered feature vector to one of its class indices.
//! Class index `i` stands for label-encoder code `classes()[i]`; decoding the
//! code into a [`Crop`](crate::crop::Crop) is the label decoder's job.

pub mod linear;
pub mod trees;

pub use linear::{LinearClassifier, LinearParams};
pub use trees::{DecisionTree, DecisionTreeParams, TreeEnsemble, TreeEnsembleParams};

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::schema;

/// Inference interface shared by all classifier kinds.
pub trait Classifier {
    /// Number of features the model consumes.
    fn n_features(&self) -> usize;

    /// Label-encoder code of each class index.
    fn classes(&self) -> &[usize];

    /// Class index of the prediction.
    fn predict_index(&self, x: ArrayView1<'_, f64>) -> Result<usize, PipelineError>;

    /// Probability of each class index, when the model produces them.
    fn predict_proba(&self, _x: ArrayView1<'_, f64>) -> Result<Option<Array1<f64>>, PipelineError> {
        Ok(None)
    }
}

/// Index of the largest value. Ties resolve to the lowest index.
///
/// `None` for an empty input or when any value is NaN.
pub fn argmax(values: ArrayView1<'_, f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            return None;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

pub(crate) fn check_width(expected: usize, x: ArrayView1<'_, f64>) -> Result<(), PipelineError> {
    if x.len() != expected {
        return Err(PipelineError::InvalidInput {
            field: "features".to_string(),
            reason: format!("expected {} features, got {}", expected, x.len()),
        });
    }
    Ok(())
}

/// Fail on the first non-finite class score or probability.
pub(crate) fn ensure_finite_output(values: ArrayView1<'_, f64>) -> Result<(), PipelineError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(PipelineError::TransformDomain {
            column: format!("classifier output {}", i),
            value: values[i],
            reason: "class score is not finite".to_string(),
        }),
        None => Ok(()),
    }
}

/// Model parameters of either classifier kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelParams {
    TreeEnsemble(TreeEnsembleParams),
    Linear(LinearParams),
}

/// Serializable classifier artifact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassifierParams {
    /// Ordered input feature names. Absent in older exports, in which case
    /// the deployed default list applies.
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    /// Label-encoder code for each class index.
    pub classes: Vec<usize>,
    pub model: ModelParams,
}

#[derive(Clone, Debug)]
enum Model {
    Trees(TreeEnsemble),
    Linear(LinearClassifier),
}

/// A loaded classifier together with its feature and class lists.
#[derive(Clone, Debug)]
pub struct FittedClassifier {
    feature_names: Vec<String>,
    classes: Vec<usize>,
    model: Model,
}

impl FittedClassifier {
    /// Ordered feature names the model was trained on.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn kind(&self) -> &'static str {
        match self.model {
            Model::Trees(_) => "tree_ensemble",
            Model::Linear(_) => "linear",
        }
    }

    pub fn extract_params(&self) -> ClassifierParams {
        ClassifierParams {
            feature_names: Some(self.feature_names.clone()),
            classes: self.classes.clone(),
            model: match &self.model {
                Model::Trees(t) => ModelParams::TreeEnsemble(t.extract_params()),
                Model::Linear(l) => ModelParams::Linear(l.extract_params()),
            },
        }
    }

    /// Build and validate a classifier.
    ///
    /// # Errors
    /// [`PipelineError::InvalidArtifact`] when the class list is empty or
    /// repeats a code, or when the model's shape disagrees with the feature
    /// or class lists.
    pub fn from_params(params: ClassifierParams) -> Result<Self, PipelineError> {
        let feature_names = params
            .feature_names
            .unwrap_or_else(|| schema::to_owned_names(&schema::DEFAULT_MODEL_FEATURES));

        if params.classes.is_empty() {
            return Err(PipelineError::InvalidArtifact(
                "classifier has no classes".to_string(),
            ));
        }
        for (i, code) in params.classes.iter().enumerate() {
            if params.classes[..i].contains(code) {
                return Err(PipelineError::InvalidArtifact(format!(
                    "classifier lists class code {} twice",
                    code
                )));
            }
        }
        for (i, name) in feature_names.iter().enumerate() {
            if feature_names[..i].contains(name) {
                return Err(PipelineError::InvalidArtifact(format!(
                    "classifier lists feature {} twice",
                    name
                )));
            }
        }

        let (model, n_features, n_classes) = match params.model {
            ModelParams::TreeEnsemble(p) => {
                let t = TreeEnsemble::from_params(p)?;
                let shape = (t.n_features(), t.n_classes());
                (Model::Trees(t), shape.0, shape.1)
            }
            ModelParams::Linear(p) => {
                let l = LinearClassifier::from_params(p)?;
                let shape = (l.n_features(), l.n_classes());
                (Model::Linear(l), shape.0, shape.1)
            }
        };

        if n_features != feature_names.len() {
            return Err(PipelineError::InvalidArtifact(format!(
                "classifier model takes {} features but lists {} names",
                n_features,
                feature_names.len()
            )));
        }
        if n_classes != params.classes.len() {
            return Err(PipelineError::InvalidArtifact(format!(
                "classifier model has {} outputs but lists {} classes",
                n_classes,
                params.classes.len()
            )));
        }

        Ok(Self {
            feature_names,
            classes: params.classes,
            model,
        })
    }
}

impl Classifier for FittedClassifier {
    fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    fn classes(&self) -> &[usize] {
        &self.classes
    }

    fn predict_index(&self, x: ArrayView1<'_, f64>) -> Result<usize, PipelineError> {
        match &self.model {
            Model::Trees(t) => t.predict_index(x),
            Model::Linear(l) => l.predict_index(x),
        }
    }

    fn predict_proba(&self, x: ArrayView1<'_, f64>) -> Result<Option<Array1<f64>>, PipelineError> {
        match &self.model {
            Model::Trees(t) => t.predict_proba(x).map(Some),
            Model::Linear(l) => l.predict_proba(x).map(Some),
        }
    }
}

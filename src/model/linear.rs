//! Multinomial logistic regression.
//!
//! `p = softmax(W · x + b)`, one weight row per class.

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::model::{argmax, check_width, ensure_finite_output};

/// Serializable parameters of a [`LinearClassifier`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearParams {
    /// `n_classes` rows of `n_features` weights.
    pub weights: Vec<Vec<f64>>,
    /// One intercept per class.
    pub intercept: Vec<f64>,
}

/// Fitted linear classifier.
#[derive(Clone, Debug)]
pub struct LinearClassifier {
    weights: Array2<f64>,
    intercept: Array1<f64>,
}

impl LinearClassifier {
    pub fn n_features(&self) -> usize {
        self.weights.ncols()
    }

    pub fn n_classes(&self) -> usize {
        self.weights.nrows()
    }

    /// Raw class scores `W · x + b`.
    ///
    /// # Errors
    /// [`PipelineError::TransformDomain`] when a score overflows or is NaN,
    /// since softmax over it would be NaN everywhere.
    pub fn decision_function(&self, x: ArrayView1<'_, f64>) -> Result<Array1<f64>, PipelineError> {
        check_width(self.n_features(), x)?;
        let scores = self.weights.dot(&x) + &self.intercept;
        ensure_finite_output(scores.view())?;
        Ok(scores)
    }

    pub fn predict_proba(&self, x: ArrayView1<'_, f64>) -> Result<Array1<f64>, PipelineError> {
        Ok(softmax(self.decision_function(x)?))
    }

    pub fn predict_index(&self, x: ArrayView1<'_, f64>) -> Result<usize, PipelineError> {
        let scores = self.decision_function(x)?;
        argmax(scores.view()).ok_or_else(|| PipelineError::InvalidArtifact("linear classifier scores have no maximum".to_string()))
    }

    pub fn extract_params(&self) -> LinearParams {
        LinearParams {
            weights: self.weights.rows().into_iter().map(|r| r.to_vec()).collect(),
            intercept: self.intercept.to_vec(),
        }
    }

    pub fn from_params(params: LinearParams) -> Result<Self, PipelineError> {
        let n_classes = params.weights.len();
        let n_features = params.weights.first().map_or(0, Vec::len);
        if n_classes < 2 || n_features == 0 {
            return Err(PipelineError::InvalidArtifact(format!(
                "linear classifier needs at least 2 classes and 1 feature, got {}x{}",
                n_classes, n_features
            )));
        }
        if params.intercept.len() != n_classes {
            return Err(PipelineError::InvalidArtifact(format!(
                "linear classifier has {} intercepts for {} classes",
                params.intercept.len(),
                n_classes
            )));
        }
        if params.weights.iter().any(|row| row.len() != n_features) {
            return Err(PipelineError::InvalidArtifact(
                "linear classifier weight rows differ in length".to_string(),
            ));
        }
        let flat: Vec<f64> = params.weights.into_iter().flatten().collect();
        if flat.iter().chain(&params.intercept).any(|v| !v.is_finite()) {
            return Err(PipelineError::InvalidArtifact(
                "linear classifier has non-finite parameters".to_string(),
            ));
        }
        let weights = Array2::from_shape_vec((n_classes, n_features), flat)
            .map_err(|e| PipelineError::InvalidArtifact(e.to_string()))?;
        Ok(Self {
            weights,
            intercept: Array1::from(params.intercept),
        })
    }
}

/// Numerically stable softmax.
pub fn softmax(scores: Array1<f64>) -> Array1<f64> {
    let max = scores.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
    let exp = scores.mapv(|v| (v - max).exp());
    let total = exp.sum();
    exp / total
}

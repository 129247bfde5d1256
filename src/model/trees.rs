//! Tree-ensemble classifier (extra-trees / random-forest export).
//!
//! Each tree is stored as flat node arrays, the way sklearn's `tree_`
//! attribute exposes them:
//!
//! - `children_left[i]`, `children_right[i]`: child node ids, `-1` at leaves.
//! - `feature[i]`, `threshold[i]`: split `x[feature] <= threshold` goes left.
//! - `value[i]`: per-class weight at node `i`.
//!
//! The ensemble probability is the mean of each tree's normalized leaf
//! distribution.

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::model::{argmax, check_width};

const LEAF: i64 = -1;

/// Flat node arrays of one fitted tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionTreeParams {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

#[derive(Clone, Debug)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        proba: Array1<f64>,
    },
}

/// A validated decision tree.
#[derive(Clone, Debug)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    params: DecisionTreeParams,
}

impl DecisionTree {
    /// Validate the node arrays.
    ///
    /// Children must point strictly forward, which rules out cycles, so
    /// traversal always ends at a leaf.
    fn from_params(
        params: DecisionTreeParams,
        n_features: usize,
        n_classes: usize,
    ) -> Result<Self, PipelineError> {
        let n_nodes = params.children_left.len();
        if n_nodes == 0 {
            return Err(PipelineError::InvalidArtifact("tree has no nodes".to_string()));
        }
        if params.children_right.len() != n_nodes
            || params.feature.len() != n_nodes
            || params.threshold.len() != n_nodes
            || params.value.len() != n_nodes
        {
            return Err(PipelineError::InvalidArtifact(format!(
                "tree node arrays differ in length (expected {})",
                n_nodes
            )));
        }

        let child = |id: i64, parent: usize| -> Result<usize, PipelineError> {
            if id <= parent as i64 || id >= n_nodes as i64 {
                return Err(PipelineError::InvalidArtifact(format!(
                    "node {} has invalid child {}",
                    parent, id
                )));
            }
            Ok(id as usize)
        };

        let mut nodes = Vec::with_capacity(n_nodes);
        for i in 0..n_nodes {
            let (l, r) = (params.children_left[i], params.children_right[i]);
            if l == LEAF && r == LEAF {
                let value = &params.value[i];
                if value.len() != n_classes {
                    return Err(PipelineError::InvalidArtifact(format!(
                        "leaf {} has {} class values, expected {}",
                        i,
                        value.len(),
                        n_classes
                    )));
                }
                if value.iter().any(|v| !v.is_finite() || *v < 0.0) {
                    return Err(PipelineError::InvalidArtifact(format!(
                        "leaf {} has negative or non-finite class values",
                        i
                    )));
                }
                let total: f64 = value.iter().sum();
                if total <= 0.0 {
                    return Err(PipelineError::InvalidArtifact(format!("leaf {} is empty", i)));
                }
                nodes.push(Node::Leaf {
                    proba: Array1::from_iter(value.iter().map(|v| v / total)),
                });
            } else {
                let feature = params.feature[i];
                if feature < 0 || feature as usize >= n_features {
                    return Err(PipelineError::InvalidArtifact(format!(
                        "node {} splits on feature {} of {}",
                        i, feature, n_features
                    )));
                }
                let threshold = params.threshold[i];
                if !threshold.is_finite() {
                    return Err(PipelineError::InvalidArtifact(format!(
                        "node {} has non-finite threshold",
                        i
                    )));
                }
                nodes.push(Node::Split {
                    feature: feature as usize,
                    threshold,
                    left: child(l, i)?,
                    right: child(r, i)?,
                });
            }
        }
        Ok(Self { nodes, params })
    }

    /// Normalized class distribution of the leaf `x` falls into.
    ///
    /// Features are rounded to `f32` before each split, matching the
    /// precision the thresholds were learned at.
    fn leaf_proba(&self, x: ArrayView1<'_, f64>) -> &Array1<f64> {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = f64::from(x[*feature] as f32);
                    id = if value <= *threshold { *left } else { *right };
                }
                Node::Leaf { proba } => return proba,
            }
        }
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }
}

/// Serializable parameters of a tree ensemble.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsembleParams {
    pub n_features: usize,
    pub n_classes: usize,
    pub trees: Vec<DecisionTreeParams>,
}

/// Averaging tree ensemble.
#[derive(Clone, Debug)]
pub struct TreeEnsemble {
    n_features: usize,
    n_classes: usize,
    trees: Vec<DecisionTree>,
}

impl TreeEnsemble {
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn extract_params(&self) -> TreeEnsembleParams {
        TreeEnsembleParams {
            n_features: self.n_features,
            n_classes: self.n_classes,
            trees: self.trees.iter().map(|t| t.params.clone()).collect(),
        }
    }

    pub fn from_params(params: TreeEnsembleParams) -> Result<Self, PipelineError> {
        if params.trees.is_empty() {
            return Err(PipelineError::InvalidArtifact(
                "tree ensemble has no trees".to_string(),
            ));
        }
        if params.n_features == 0 || params.n_classes == 0 {
            return Err(PipelineError::InvalidArtifact(
                "tree ensemble needs at least one feature and one class".to_string(),
            ));
        }
        let trees = params
            .trees
            .into_iter()
            .enumerate()
            .map(|(i, t)| {
                DecisionTree::from_params(t, params.n_features, params.n_classes).map_err(|e| match e {
                    PipelineError::InvalidArtifact(msg) => {
                        PipelineError::InvalidArtifact(format!("tree {}: {}", i, msg))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            n_features: params.n_features,
            n_classes: params.n_classes,
            trees,
        })
    }

    /// Mean normalized leaf distribution over all trees.
    pub fn predict_proba(&self, x: ArrayView1<'_, f64>) -> Result<Array1<f64>, PipelineError> {
        check_width(self.n_features, x)?;
        let mut sum = Array1::<f64>::zeros(self.n_classes);
        for tree in &self.trees {
            sum += tree.leaf_proba(x);
        }
        Ok(sum / self.trees.len() as f64)
    }

    pub fn predict_index(&self, x: ArrayView1<'_, f64>) -> Result<usize, PipelineError> {
        let p = self.predict_proba(x)?;
        argmax(p.view()).ok_or_else(|| PipelineError::InvalidArtifact("no classes".to_string()))
    }
}

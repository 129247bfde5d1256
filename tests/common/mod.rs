//! Shared fixtures: a complete 22-crop artifact bundle.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use crop_recommender::model::{DecisionTreeParams, LinearParams, ModelParams, TreeEnsembleParams};
use crop_recommender::preprocessing::numeric::{NumericTransformer, NumericTransformerParams, PowerParams, Standardization};
use crop_recommender::preprocessing::scaling::{MinMaxScalerParams, ScalerParams, StandardScalerParams};
use crop_recommender::preprocessing::{LabelEncoderParams, OrdinalEncoderParams};
use crop_recommender::schema;
use crop_recommender::{prepare, ArtifactsParams, ClassifierParams, Crop, FittedTransformer, PipelineArtifacts, RawSample};

/// The documented reference sample. The fixture classifier sends it to Rice.
pub fn reference_sample() -> RawSample {
    RawSample::new(90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9)
}

/// A sample far from the reference on every feature.
pub fn other_sample() -> RawSample {
    RawSample::new(20.0, 130.0, 200.0, 23.0, 92.0, 5.9, 110.0)
}

/// Crops in label-encoder order (alphabetical, as `classes_` stores them).
pub fn label_classes() -> Vec<Crop> {
    let mut classes = Crop::ALL.to_vec();
    classes.sort_by_key(|c| c.as_str());
    classes
}

fn code_of(crop: Crop) -> usize {
    label_classes()
        .iter()
        .position(|&c| c == crop)
        .expect("crop in vocabulary")
}

fn numeric_params() -> NumericTransformerParams {
    NumericTransformerParams::with_default_columns([
        PowerParams::YeoJohnson {
            lambda: -0.12,
            standardize: Some(Standardization {
                mean: 2.9,
                scale: 0.4,
            }),
        },
        PowerParams::Identity,
    ])
}

pub fn scaler_params() -> ScalerParams {
    let columns = NumericTransformer::from_params(numeric_params())
        .unwrap()
        .output_columns(&schema::to_owned_names(&schema::ENCODED_COLUMNS))
        .unwrap();
    // Temperature, pH_Value, Temp_Humidity_Index, PH_Cat, Log_Phosphorus,
    // Log_Humidity, Log_Rainfall, Log_NK_Ratio, Log_PK_Ratio, Log_NPK_Average,
    // Log_Rainfall_Humidity_Index, SQ_Nitrogen, PT_Potassium, PT_NP_Ratio
    let mean = vec![
        25.6, 6.47, 1800.0, 1.6, 3.7, 4.2, 4.5, 0.3, 0.6, 3.9, 9.0, 6.8, 0.0, 1.0,
    ];
    let scale = vec![
        5.1, 0.77, 650.0, 0.7, 0.7, 0.3, 0.5, 0.6, 0.4, 0.5, 0.9, 2.8, 1.0, 0.8,
    ];
    ScalerParams::Standard(StandardScalerParams {
        feature_names: columns,
        mean,
        scale,
    })
}

/// Min-max form of [`scaler_params`]: `x * (1 / scale) - mean / scale`.
pub fn minmax_scaler_params() -> ScalerParams {
    match scaler_params() {
        ScalerParams::Standard(s) => ScalerParams::MinMax(MinMaxScalerParams {
            min: s.mean.iter().zip(&s.scale).map(|(m, d)| -m / d).collect(),
            scale: s.scale.iter().map(|d| 1.0 / d).collect(),
            feature_names: s.feature_names,
        }),
        other => other,
    }
}

fn placeholder_classifier() -> ClassifierParams {
    let n = schema::DEFAULT_MODEL_FEATURES.len();
    ClassifierParams {
        feature_names: None,
        classes: (0..Crop::ALL.len()).collect(),
        model: ModelParams::Linear(LinearParams {
            weights: vec![vec![0.0; n]; Crop::ALL.len()],
            intercept: vec![0.0; Crop::ALL.len()],
        }),
    }
}

/// One stump per model feature, splitting just above the reference value.
/// The side holding the reference sample favours Rice.
fn trees_around(reference: &[f64]) -> Vec<DecisionTreeParams> {
    let n_classes = Crop::ALL.len();
    let rice = code_of(Crop::Rice);
    reference
        .iter()
        .enumerate()
        .map(|(f, &x)| {
            let mut near = vec![0.5; n_classes];
            near[rice] = 12.0;
            let mut far = vec![0.5; n_classes];
            far[(rice + 1 + f) % n_classes] = 12.0;
            DecisionTreeParams {
                children_left: vec![1, -1, -1],
                children_right: vec![2, -1, -1],
                feature: vec![f as i64, -2, -2],
                threshold: vec![x + 0.5, -2.0, -2.0],
                value: vec![vec![1.0; n_classes], near, far],
            }
        })
        .collect()
}

/// Complete bundle: default column plan, standard scaler and a tree
/// ensemble over the ten default model features.
pub fn bundle() -> ArtifactsParams {
    bundle_with_scaler(scaler_params())
}

/// Like [`bundle`], with the trees placed around the reference sample as
/// `scaler` sees it.
pub fn bundle_with_scaler(scaler: ScalerParams) -> ArtifactsParams {
    let mut params = ArtifactsParams {
        ordinal: OrdinalEncoderParams::default(),
        numeric: numeric_params(),
        scaler,
        classifier: placeholder_classifier(),
        labels: LabelEncoderParams {
            classes: label_classes(),
        },
    };

    let staging = PipelineArtifacts::from_params(params.clone()).unwrap();
    let reference = prepare(&staging, &reference_sample()).unwrap();

    params.classifier = ClassifierParams {
        feature_names: Some(schema::to_owned_names(&schema::DEFAULT_MODEL_FEATURES)),
        classes: (0..Crop::ALL.len()).collect(),
        model: ModelParams::TreeEnsemble(TreeEnsembleParams {
            n_features: reference.len(),
            n_classes: Crop::ALL.len(),
            trees: trees_around(&reference.values().to_vec()),
        }),
    };
    params
}

pub fn artifacts() -> PipelineArtifacts {
    PipelineArtifacts::from_params(bundle()).unwrap()
}

/// Write the fixture bundle into `dir`; `.json` names get JSON, others bincode.
pub fn write_bundle(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let artifacts = artifacts();
    if name.ends_with(".json") {
        artifacts.to_json_file(&path).unwrap();
    } else {
        artifacts.save_to_file(&path).unwrap();
    }
    path
}

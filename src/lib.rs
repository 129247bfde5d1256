//! # crop_recommender
//!
//! Turns seven soil and climate measurements into a crop recommendation by
//! replaying a fixed, pre-fitted feature pipeline and calling a pre-trained
//! classifier.
//!
//! ```text
//! RawSample ─► engineer ─► ordinal encode ─► log / sqrt / power ─► scale
//!           ─► select model features ─► classify ─► decode to Crop
//! ```
//!
//! All fitted parameters live in one immutable [`PipelineArtifacts`] bundle,
//! loaded once and passed by reference into every call.
//!
//! ## Example
//!
//! ```no_run
//! use crop_recommender::{PipelineArtifacts, RawSample};
//!
//! let artifacts = PipelineArtifacts::load("artifacts.json")?;
//! let sample = RawSample::new(90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9);
//! let prediction = artifacts.recommend(&sample)?;
//! println!("{}", prediction.crop);
//! # Ok::<(), crop_recommender::PipelineError>(())
//! ```

pub mod artifacts;
pub mod cli;
pub mod crop;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod preprocessing;
pub mod sample;
pub mod schema;
pub mod serialization;

pub use artifacts::{ArtifactsParams, PipelineArtifacts};
pub use crop::Crop;
pub use error::PipelineError;
pub use model::{Classifier, ClassifierParams, FittedClassifier};
pub use pipeline::{predict, prepare, recommend, FeatureVector, Prediction};
pub use preprocessing::{engineer, DerivedSample, FittedTransformer, PhCategory};
pub use sample::RawSample;

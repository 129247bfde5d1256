//! Core trait for fitted pipeline stages.
//!
//! Every stage in this crate is fitted elsewhere, at training time. What is
//! loaded here is only the learned parameters, so there is no unfitted
//! counterpart and no `fit` method.

use crate::error::PipelineError;
use crate::serialization::SerializableParams;

/// A pre-fitted transformation ready for inference.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
/// - `from_params()` validates the parameters, so a constructed stage never
///   fails for reasons that could have been detected at load time.
pub trait FittedTransformer: Sized {
    /// Input data type for transformation.
    type Input;
    /// Output data type after transformation.
    type Output;
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;

    /// Transform data using learned parameters.
    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PipelineError>;

    /// Reverse the transformation.
    ///
    /// Lossy stages (square root of clipped negatives) recover the clipped
    /// value, not the original.
    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PipelineError>;

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted stage from parameters.
    fn from_params(params: Self::Params) -> Result<Self, PipelineError>;

    /// Save the stage parameters to a file.
    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), PipelineError> {
        self.extract_params().write_bincode(path)
    }

    /// Load a stage from a file written by [`FittedTransformer::save_to_file`].
    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, PipelineError> {
        Self::from_params(Self::Params::read_bincode(path)?)
    }

    /// Names of the columns this stage expects, in its fitted order.
    fn feature_names_in(&self) -> Vec<String>;
}

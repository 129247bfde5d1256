//! Pre-fitted preprocessing stages.
//!
//! Every stage here replays a transformation that was fitted at training
//! time. Parameters are loaded from artifacts; nothing is learned at
//! inference.
//!
//! # Stages
//!
//! | Stage | Input | Output |
//! |-------|-------|--------|
//! | [`engineer`] | [`RawSample`](crate::sample::RawSample) | [`DerivedSample`] |
//! | [`OrdinalMapping::encode_sample`] | [`DerivedSample`] | `Frame<Encoded>` |
//! | [`NumericTransformer`] | `Frame<Encoded>` | `Frame<Transformed>` |
//! | [`FittedScaler`] | `Frame<Transformed>` | `Frame<Scaled>` |
//!
//! # Design
//!
//! - **Typed states**: a [`Frame`] carries its stage in a marker type, so a
//!   scaler cannot be handed an untransformed sample.
//! - **Named columns**: stages address columns by name, never by position.
//! - **Serializable**: every fitted stage round-trips through its `*Params`
//!   type, in bincode or JSON.

pub mod encoding;
pub mod feature_engineering;
pub mod frame;
pub mod numeric;
pub mod scaling;
pub mod traits;

pub use encoding::{encode_category, LabelDecoder, LabelEncoderParams, OrdinalEncoderParams, OrdinalMapping};
pub use feature_engineering::{engineer, DerivedSample, PhCategory};
pub use frame::{Encoded, Frame, Scaled, State, Transformed};
pub use numeric::{NumericTransformer, NumericTransformerParams, PowerParams, Standardization};
pub use scaling::{
    scale, unscale, FittedMinMaxScaler, FittedScaler, FittedStandardScaler, MinMaxScalerParams,
    ScalerParams, StandardScalerParams,
};
pub use traits::FittedTransformer;

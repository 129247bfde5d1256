//! Categorical encoders.
//!
//! - [`OrdinalMapping`] turns the pH class into the ordinal code the scaler
//!   and classifier were trained on.
//! - [`LabelDecoder`] turns classifier class codes back into crops.
//!
//! Both tables come from training-time artifacts; neither is learned here.

mod label;
mod ordinal;

pub use label::{LabelDecoder, LabelEncoderParams};
pub use ordinal::{encode_category, OrdinalEncoderParams, OrdinalMapping};

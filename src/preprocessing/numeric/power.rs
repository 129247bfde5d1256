//! Pre-fitted Yeo-Johnson power transform.
//!
//! For a fitted `lambda`:
//! ```text
//! x >= 0, lambda != 0:  ((x + 1)^lambda - 1) / lambda
//! x >= 0, lambda == 0:  ln(x + 1)
//! x <  0, lambda != 2:  -((1 - x)^(2 - lambda) - 1) / (2 - lambda)
//! x <  0, lambda == 2:  -ln(1 - x)
//! ```
//! optionally followed by `(y - mean) / scale` when the transform was
//! fitted with standardization. A zero `scale` divides by 1, as the
//! standard scaler does.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Lambdas closer than this to 0 or 2 use the logarithmic branch.
const LAMBDA_EPS: f64 = f64::EPSILON;

/// Standardization applied after the power transform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Standardization {
    pub mean: f64,
    pub scale: f64,
}

impl Standardization {
    fn divisor(&self) -> f64 {
        if self.scale == 0.0 {
            1.0
        } else {
            self.scale
        }
    }
}

/// Fitted power transform for one column.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerParams {
    YeoJohnson {
        lambda: f64,
        #[serde(default)]
        standardize: Option<Standardization>,
    },
    /// The training column had a single unique value; values pass through.
    Identity,
}

impl PowerParams {
    pub fn yeo_johnson(lambda: f64) -> Self {
        PowerParams::YeoJohnson {
            lambda,
            standardize: None,
        }
    }

    pub(crate) fn validate(&self, column: &str) -> Result<(), PipelineError> {
        if let PowerParams::YeoJohnson {
            lambda,
            standardize,
        } = self
        {
            if !lambda.is_finite() {
                return Err(PipelineError::InvalidArtifact(format!(
                    "power transform for {} has non-finite lambda",
                    column
                )));
            }
            if let Some(s) = standardize {
                if !s.mean.is_finite() || !s.scale.is_finite() {
                    return Err(PipelineError::InvalidArtifact(format!(
                        "power transform for {} has invalid standardization ({}, {})",
                        column, s.mean, s.scale
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn apply(&self, x: f64) -> f64 {
        match *self {
            PowerParams::Identity => x,
            PowerParams::YeoJohnson {
                lambda,
                standardize,
            } => {
                let y = yeo_johnson(x, lambda);
                match standardize {
                    Some(s) => (y - s.mean) / s.divisor(),
                    None => y,
                }
            }
        }
    }

    pub fn invert(&self, y: f64) -> f64 {
        match *self {
            PowerParams::Identity => y,
            PowerParams::YeoJohnson {
                lambda,
                standardize,
            } => {
                let y = match standardize {
                    Some(s) => y * s.divisor() + s.mean,
                    None => y,
                };
                yeo_johnson_inverse(y, lambda)
            }
        }
    }
}

pub fn yeo_johnson(x: f64, lambda: f64) -> f64 {
    if x >= 0.0 {
        if lambda.abs() < LAMBDA_EPS {
            x.ln_1p()
        } else {
            ((x + 1.0).powf(lambda) - 1.0) / lambda
        }
    } else if (lambda - 2.0).abs() < LAMBDA_EPS {
        -(-x).ln_1p()
    } else {
        let p = 2.0 - lambda;
        -((1.0 - x).powf(p) - 1.0) / p
    }
}

pub fn yeo_johnson_inverse(y: f64, lambda: f64) -> f64 {
    if y >= 0.0 {
        if lambda.abs() < LAMBDA_EPS {
            y.exp_m1()
        } else {
            (y * lambda + 1.0).powf(1.0 / lambda) - 1.0
        }
    } else if (lambda - 2.0).abs() < LAMBDA_EPS {
        1.0 - (-y).exp()
    } else {
        let p = 2.0 - lambda;
        1.0 - (1.0 - p * y).powf(1.0 / p)
    }
}

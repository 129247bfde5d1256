//! Column-wise numeric transforms.
//!
//! Three kinds of transform replace a source column `X` with a new column:
//!
//! | Kind   | Output  | Formula                    | Domain            |
//! |--------|---------|----------------------------|-------------------|
//! | log    | `Log_X` | `ln(1 + X)`                | `X > -1`          |
//! | sqrt   | `SQ_X`  | `sqrt(max(X, 0))`          | all (clips)       |
//! | power  | `PT_X`  | pre-fitted Yeo-Johnson     | all               |
//!
//! Groups run in that order (log, sqrt, power), each in its listed column
//! order. Outputs are appended at the end of the frame and the source is
//! dropped, which reproduces the training-time column order.

pub mod power;

pub use power::{PowerParams, Standardization};

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::preprocessing::frame::{Encoded, Frame, Transformed};
use crate::preprocessing::traits::FittedTransformer;
use crate::schema;

/// Serializable parameters for a [`NumericTransformer`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NumericTransformerParams {
    pub log_columns: Vec<String>,
    pub sqrt_columns: Vec<String>,
    /// Power-transformed columns with their fitted parameters.
    pub power_columns: Vec<(String, PowerParams)>,
}

impl NumericTransformerParams {
    /// The deployed plan with the supplied power parameters.
    pub fn with_default_columns(power: [PowerParams; 2]) -> Self {
        Self {
            log_columns: schema::to_owned_names(&schema::DEFAULT_LOG_COLUMNS),
            sqrt_columns: schema::to_owned_names(&schema::DEFAULT_SQRT_COLUMNS),
            power_columns: schema::DEFAULT_POWER_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .zip(power)
                .collect(),
        }
    }
}

/// Fitted numeric transformer.
#[derive(Clone, Debug)]
pub struct NumericTransformer {
    params: NumericTransformerParams,
}

fn log_transform(column: &str, x: f64) -> Result<f64, PipelineError> {
    if x <= -1.0 {
        return Err(PipelineError::TransformDomain {
            column: column.to_string(),
            value: x,
            reason: "log1p requires x > -1".to_string(),
        });
    }
    Ok(x.ln_1p())
}

fn sqrt_transform(column: &str, x: f64) -> f64 {
    if x < 0.0 {
        log::warn!("clipping negative {} ({}) to 0 before square root", column, x);
    }
    x.max(0.0).sqrt()
}

fn check_output(column: &str, input: f64, output: f64) -> Result<f64, PipelineError> {
    if output.is_finite() {
        Ok(output)
    } else {
        Err(PipelineError::TransformDomain {
            column: column.to_string(),
            value: input,
            reason: format!("transform produced {}", output),
        })
    }
}

impl NumericTransformer {
    pub fn params(&self) -> &NumericTransformerParams {
        &self.params
    }

    /// Every source column, in application order, paired with its output name.
    fn renames(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        let log = self
            .params
            .log_columns
            .iter()
            .map(|c| (c.as_str(), format!("{}{}", schema::LOG_PREFIX, c)));
        let sqrt = self
            .params
            .sqrt_columns
            .iter()
            .map(|c| (c.as_str(), format!("{}{}", schema::SQRT_PREFIX, c)));
        let power = self
            .params
            .power_columns
            .iter()
            .map(|(c, _)| (c.as_str(), format!("{}{}", schema::POWER_PREFIX, c)));
        log.chain(sqrt).chain(power)
    }

    /// Column names produced from `input_columns`, without touching data.
    ///
    /// # Errors
    /// [`PipelineError::SchemaMismatch`] when a designated column is absent.
    pub fn output_columns(&self, input_columns: &[String]) -> Result<Vec<String>, PipelineError> {
        let mut columns = input_columns.to_vec();
        let mut missing = Vec::new();
        for (source, output) in self.renames() {
            match columns.iter().position(|c| c == source) {
                Some(idx) => {
                    columns.remove(idx);
                    columns.push(output);
                }
                None => missing.push(source.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(PipelineError::missing_columns("numeric transformer", missing));
        }
        Ok(columns)
    }
}

/// Apply log, square-root and power transforms to an encoded sample.
pub fn transform(
    sample: &Frame<Encoded>,
    log_columns: &[String],
    sqrt_columns: &[String],
    power_columns: &[(String, PowerParams)],
) -> Result<Frame<Transformed>, PipelineError> {
    let transformer = NumericTransformer::from_params(NumericTransformerParams {
        log_columns: log_columns.to_vec(),
        sqrt_columns: sqrt_columns.to_vec(),
        power_columns: power_columns.to_vec(),
    })?;
    transformer.transform(sample)
}

impl FittedTransformer for NumericTransformer {
    type Input = Frame<Encoded>;
    type Output = Frame<Transformed>;
    type Params = NumericTransformerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PipelineError> {
        data.ensure_finite()?;
        let mut frame = data.clone();

        for column in &self.params.log_columns {
            let x = frame.remove(column)?;
            let y = check_output(column, x, log_transform(column, x)?)?;
            frame.push(format!("{}{}", schema::LOG_PREFIX, column), y)?;
        }
        for column in &self.params.sqrt_columns {
            let x = frame.remove(column)?;
            let y = check_output(column, x, sqrt_transform(column, x))?;
            frame.push(format!("{}{}", schema::SQRT_PREFIX, column), y)?;
        }
        for (column, power) in &self.params.power_columns {
            let x = frame.remove(column)?;
            let y = check_output(column, x, power.apply(x))?;
            frame.push(format!("{}{}", schema::POWER_PREFIX, column), y)?;
        }

        log::debug!("numeric transforms applied, {} columns", frame.len());
        Ok(frame.transition())
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PipelineError> {
        let mut frame: Frame<Transformed> = data.clone();

        // Undo in reverse application order.
        let mut restored: Vec<(String, f64)> = Vec::new();
        for (column, power) in self.params.power_columns.iter().rev() {
            let y = frame.remove(&format!("{}{}", schema::POWER_PREFIX, column))?;
            restored.push((column.clone(), power.invert(y)));
        }
        for column in self.params.sqrt_columns.iter().rev() {
            let y = frame.remove(&format!("{}{}", schema::SQRT_PREFIX, column))?;
            restored.push((column.clone(), y * y));
        }
        for column in self.params.log_columns.iter().rev() {
            let y = frame.remove(&format!("{}{}", schema::LOG_PREFIX, column))?;
            restored.push((column.clone(), y.exp_m1()));
        }

        let order = input_order(frame.names(), &restored);
        let mut names = Vec::with_capacity(order.len());
        let mut values = Vec::with_capacity(order.len());
        for name in order {
            let value = match restored.iter().find(|(n, _)| *n == name) {
                Some((_, v)) => *v,
                None => frame.column(&name)?,
            };
            names.push(name);
            values.push(value);
        }
        Frame::new(names, values)
    }

    fn extract_params(&self) -> Self::Params {
        self.params.clone()
    }

    fn from_params(params: Self::Params) -> Result<Self, PipelineError> {
        let mut seen: Vec<&str> = Vec::new();
        let all = params
            .log_columns
            .iter()
            .chain(params.sqrt_columns.iter())
            .chain(params.power_columns.iter().map(|(c, _)| c));
        for column in all {
            if seen.contains(&column.as_str()) {
                return Err(PipelineError::InvalidArtifact(format!(
                    "column {} is assigned to more than one transform",
                    column
                )));
            }
            seen.push(column);
        }
        for (column, power) in &params.power_columns {
            power.validate(column)?;
        }
        Ok(Self { params })
    }

    fn feature_names_in(&self) -> Vec<String> {
        self.renames().map(|(source, _)| source.to_string()).collect()
    }
}

/// Pre-transform column order.
///
/// The standard encoded layout when the columns are exactly that set,
/// otherwise the untouched columns followed by the restored sources in
/// application order.
fn input_order(untouched: &[String], restored: &[(String, f64)]) -> Vec<String> {
    let mut all: Vec<String> = untouched.to_vec();
    all.extend(restored.iter().rev().map(|(n, _)| n.clone()));

    let canonical = schema::to_owned_names(&schema::ENCODED_COLUMNS);
    if all.len() == canonical.len() && all.iter().all(|n| canonical.contains(n)) {
        canonical
    } else {
        all
    }
}

//! Error types for the recommendation pipeline.

use std::fmt;

/// Error type for every pipeline stage and for artifact loading.
#[derive(Debug)]
pub enum PipelineError {
    /// A raw input is non-finite, below its domain floor, or makes a derived
    /// feature undefined (e.g. a zero denominator).
    InvalidInput { field: String, reason: String },
    /// Encoder or decoder lookup miss.
    UnknownCategory(String),
    /// Column set differs from what a fitted stage expects.
    SchemaMismatch {
        stage: &'static str,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
    /// A numeric transform was applied outside its domain or produced a
    /// non-finite value.
    TransformDomain {
        column: String,
        value: f64,
        reason: String,
    },
    /// Loaded artifacts are internally inconsistent.
    InvalidArtifact(String),
    /// Serialization or deserialization error.
    SerializationError(String),
    /// I/O error during file operations.
    IoError(String),
}

impl PipelineError {
    pub(crate) fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PipelineError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing_columns(stage: &'static str, missing: Vec<String>) -> Self {
        PipelineError::SchemaMismatch {
            stage,
            missing,
            unexpected: Vec::new(),
        }
    }

    /// Short stable name of the error kind, used by the CLI in batch reports.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::InvalidInput { .. } => "invalid_input",
            PipelineError::UnknownCategory(_) => "unknown_category",
            PipelineError::SchemaMismatch { .. } => "schema_mismatch",
            PipelineError::TransformDomain { .. } => "transform_domain",
            PipelineError::InvalidArtifact(_) => "invalid_artifact",
            PipelineError::SerializationError(_) => "serialization",
            PipelineError::IoError(_) => "io",
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::InvalidInput { field, reason } => {
                write!(f, "Invalid input {}: {}", field, reason)
            }
            PipelineError::UnknownCategory(msg) => {
                write!(f, "Unknown category: {}", msg)
            }
            PipelineError::SchemaMismatch {
                stage,
                missing,
                unexpected,
            } => {
                write!(f, "Schema mismatch in {}", stage)?;
                if !missing.is_empty() {
                    write!(f, ": missing [{}]", missing.join(", "))?;
                }
                if !unexpected.is_empty() {
                    write!(f, ": unexpected [{}]", unexpected.join(", "))?;
                }
                Ok(())
            }
            PipelineError::TransformDomain {
                column,
                value,
                reason,
            } => {
                write!(
                    f,
                    "Transform domain error in column {} (value {}): {}",
                    column, value, reason
                )
            }
            PipelineError::InvalidArtifact(msg) => {
                write!(f, "Invalid artifact: {}", msg)
            }
            PipelineError::SerializationError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            PipelineError::IoError(msg) => {
                write!(f, "I/O error: {}", msg)
            }
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for PipelineError {
    fn from(err: bincode::Error) -> Self {
        PipelineError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::SerializationError(err.to_string())
    }
}

//! Single-row, named-column frame that tracks its preprocessing state at
//! the type level.
//!
//! The state machine:
//! ```text
//! Encoded --> Transformed --> Scaled --> FeatureVector
//! ```
//! A scaler only accepts `Frame<Transformed>`, so stages cannot be applied
//! out of order.

use std::marker::PhantomData;

use crate::error::PipelineError;

/// Marker trait for frame states.
pub trait State: Clone + Copy + Default + PartialEq + std::fmt::Debug + 'static {
    /// Human readable stage name, used in error messages.
    const NAME: &'static str;
}

/// pH class replaced by its ordinal code.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct Encoded;

impl State for Encoded {
    const NAME: &'static str = "encoded";
}

/// Log, square-root and power transforms applied.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct Transformed;

impl State for Transformed {
    const NAME: &'static str = "transformed";
}

/// Every column scaled by the fitted scaler.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct Scaled;

impl State for Scaled {
    const NAME: &'static str = "scaled";
}

/// An ordered set of named values in state `S`.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame<S: State> {
    names: Vec<String>,
    values: Vec<f64>,
    _state: PhantomData<S>,
}

impl<S: State> Frame<S> {
    /// Build a frame from parallel name/value lists.
    ///
    /// # Errors
    /// [`PipelineError::InvalidArtifact`] when the lists differ in length or
    /// a name repeats.
    pub fn new(names: Vec<String>, values: Vec<f64>) -> Result<Self, PipelineError> {
        if names.len() != values.len() {
            return Err(PipelineError::InvalidArtifact(format!(
                "{} frame has {} names but {} values",
                S::NAME,
                names.len(),
                values.len()
            )));
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(PipelineError::InvalidArtifact(format!(
                    "duplicate column {} in {} frame",
                    name,
                    S::NAME
                )));
            }
        }
        Ok(Self {
            names,
            values,
            _state: PhantomData,
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate `(name, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.position(name).map(|i| self.values[i])
    }

    /// Value of a column that must exist.
    ///
    /// # Errors
    /// [`PipelineError::SchemaMismatch`] listing the missing column.
    pub fn column(&self, name: &str) -> Result<f64, PipelineError> {
        self.get(name)
            .ok_or_else(|| PipelineError::missing_columns(S::NAME, vec![name.to_string()]))
    }

    /// Append a column at the end.
    pub(crate) fn push(&mut self, name: String, value: f64) -> Result<(), PipelineError> {
        if self.position(&name).is_some() {
            return Err(PipelineError::SchemaMismatch {
                stage: S::NAME,
                missing: Vec::new(),
                unexpected: vec![name],
            });
        }
        self.names.push(name);
        self.values.push(value);
        Ok(())
    }

    /// Remove a column and return its value.
    pub(crate) fn remove(&mut self, name: &str) -> Result<f64, PipelineError> {
        let idx = self
            .position(name)
            .ok_or_else(|| PipelineError::missing_columns(S::NAME, vec![name.to_string()]))?;
        self.names.remove(idx);
        Ok(self.values.remove(idx))
    }

    /// Check that every value is finite.
    pub fn ensure_finite(&self) -> Result<(), PipelineError> {
        match self.iter().find(|(_, v)| !v.is_finite()) {
            Some((name, value)) => Err(PipelineError::TransformDomain {
                column: name.to_string(),
                value,
                reason: format!("non-finite value in {} frame", S::NAME),
            }),
            None => Ok(()),
        }
    }

    /// Re-tag the frame with a new state. Only stages call this.
    pub(crate) fn transition<NewState: State>(self) -> Frame<NewState> {
        Frame {
            names: self.names,
            values: self.values,
            _state: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame<Encoded> {
        Frame::new(
            vec!["a".to_string(), "b".to_string()],
            vec![1.0, 2.0],
        )
        .unwrap()
    }

    #[test]
    fn test_frame_creation() {
        let f = frame();
        assert_eq!(f.len(), 2);
        assert!(!f.is_empty());
        assert_eq!(f.get("b"), Some(2.0));
        assert_eq!(f.get("c"), None);
    }

    #[test]
    fn test_frame_length_mismatch() {
        let result = Frame::<Encoded>::new(vec!["a".to_string()], vec![1.0, 2.0]);
        assert!(matches!(result, Err(PipelineError::InvalidArtifact(_))));
    }

    #[test]
    fn test_frame_duplicate_name() {
        let result = Frame::<Encoded>::new(vec!["a".to_string(), "a".to_string()], vec![1.0, 2.0]);
        assert!(result.is_err());
    }

    #[test]
    fn test_frame_push_remove() {
        let mut f = frame();
        f.push("c".to_string(), 3.0).unwrap();
        assert_eq!(f.names(), &["a", "b", "c"]);
        assert_eq!(f.remove("a").unwrap(), 1.0);
        assert_eq!(f.names(), &["b", "c"]);
        assert!(f.push("b".to_string(), 0.0).is_err());
    }

    #[test]
    fn test_frame_missing_column() {
        let f = frame();
        assert!(matches!(
            f.column("z"),
            Err(PipelineError::SchemaMismatch { ref missing, .. }) if missing == &vec!["z".to_string()]
        ));
    }

    #[test]
    fn test_frame_ensure_finite() {
        let mut f = frame();
        assert!(f.ensure_finite().is_ok());
        f.push("bad".to_string(), f64::NAN).unwrap();
        assert!(matches!(
            f.ensure_finite(),
            Err(PipelineError::TransformDomain { ref column, .. }) if column == "bad"
        ));
    }

    #[test]
    fn test_frame_transition_keeps_data() {
        let f = frame();
        let t: Frame<Transformed> = f.clone().transition();
        assert_eq!(t.names(), f.names());
        assert_eq!(t.values(), f.values());
    }
}

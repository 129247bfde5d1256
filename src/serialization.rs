//! Serialization of fitted pipeline parameters.
//!
//! Parameter types are plain serde structs holding numbers and names, never
//! live transformer state. Two encodings are supported: compact bincode for
//! deployment and JSON for exchange with the training environment.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::PipelineError;

/// Bincode encoding of a stage's `*Params`, or of the whole artifact bundle.
///
/// Failures surface as [`PipelineError::SerializationError`], so a truncated
/// or foreign file is reported the same way wherever it is loaded.
pub trait SerializableParams: Sized {
    fn to_bytes(&self) -> Result<Vec<u8>, PipelineError>;

    fn from_bytes(bytes: &[u8]) -> Result<Self, PipelineError>;

    /// Write the bincode form to `path`.
    fn write_bincode<P: AsRef<Path>>(&self, path: P) -> Result<(), PipelineError> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Read the bincode form from `path`.
    fn read_bincode<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        Self::from_bytes(&std::fs::read(path)?)
    }
}

impl<T> SerializableParams for T
where
    T: Serialize + DeserializeOwned,
{
    fn to_bytes(&self) -> Result<Vec<u8>, PipelineError> {
        Ok(bincode::serialize(self)?)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, PipelineError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Read JSON-encoded parameters from a file.
pub fn read_json<T, P>(path: P) -> Result<T, PipelineError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

/// Write parameters to a file as pretty-printed JSON.
pub fn write_json<T, P>(value: &T, path: P) -> Result<(), PipelineError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Dummy {
        names: Vec<String>,
        values: Vec<f64>,
    }

    fn dummy() -> Dummy {
        Dummy {
            names: vec!["Log_Rainfall".to_string()],
            values: vec![5.31],
        }
    }

    #[test]
    fn test_bytes_roundtrip() {
        let bytes = dummy().to_bytes().unwrap();
        assert_eq!(Dummy::from_bytes(&bytes).unwrap(), dummy());
    }

    #[test]
    fn test_bincode_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dummy.bin");
        dummy().write_bincode(&path).unwrap();
        assert_eq!(Dummy::read_bincode(&path).unwrap(), dummy());
    }

    #[test]
    fn test_truncated_bytes_are_serialization_errors() {
        let bytes = dummy().to_bytes().unwrap();
        assert!(matches!(
            Dummy::from_bytes(&bytes[..bytes.len() - 3]),
            Err(PipelineError::SerializationError(_))
        ));
    }

    #[test]
    fn test_json_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dummy.json");
        write_json(&dummy(), &path).unwrap();
        let loaded: Dummy = read_json(&path).unwrap();
        assert_eq!(loaded, dummy());
    }

    #[test]
    fn test_read_json_missing_file() {
        let result: Result<Dummy, _> = read_json("/nonexistent/params.json");
        assert!(matches!(result, Err(PipelineError::IoError(_))));
    }
}

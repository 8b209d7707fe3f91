//! Serialization of fitted transformer parameters.
//!
//! Parameters are plain serde structures (vectors, strings, scalars) encoded
//! with bincode. Artifact files are written and read inside a single function
//! scope so the file handle is released on every exit path.

use crate::preprocessing::PreprocessingError;
use std::error::Error;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// A trait for parameter representations that can be serialized to and from bytes.
///
/// Implementors should contain only plain data (e.g., `Vec<f64>`, `String`),
/// never live matrices or file handles.
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: Error + Send + Sync + 'static;

    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}

/// Write an artifact to `path`, creating missing parent directories.
///
/// A failure part-way through may leave a truncated file behind; callers must
/// treat the artifact as invalid whenever this returns an error.
pub fn write_artifact(path: &Path, bytes: &[u8]) -> Result<(), PreprocessingError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read the full contents of an artifact written by [`write_artifact`].
pub fn read_artifact(path: &Path) -> Result<Vec<u8>, PreprocessingError> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(bytes)
}

//! Error types for preprocessing operations.

use crate::dataset::DatasetError;
use ndarray::Array2;
use thiserror::Error;

/// Error type for preprocessing operations.
#[derive(Debug, Error)]
pub enum PreprocessingError {
    /// Shape mismatch between expected and actual matrix dimensions.
    #[error("Invalid shape: expected {expected}, got {got}")]
    InvalidShape { expected: String, got: String },
    /// Data contains missing values where none are allowed.
    #[error("Missing values: {0}")]
    MissingValues(String),
    /// Data contains an infinite value.
    #[error("Infinite value: {0}")]
    InfiniteValue(String),
    /// Invalid hyperparameter value or unsupported operation.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// A category seen at transform time was not observed during fit.
    #[error("Unknown category {value:?} in column {column}")]
    UnknownCategory { column: usize, value: String },
    /// Serialization or deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Empty data provided where non-empty was required.
    #[error("Empty data: {0}")]
    EmptyData(String),
    /// Feature dimension mismatch.
    #[error("Feature mismatch: expected {expected_features} features, got {got_features}")]
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },
    /// Column extraction from a data frame failed (missing column, unparsable number).
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

impl From<bincode::Error> for PreprocessingError {
    fn from(err: bincode::Error) -> Self {
        PreprocessingError::SerializationError(err.to_string())
    }
}

/// Reject `+inf` / `-inf` cells. NaN is left to the caller.
pub(crate) fn ensure_no_infinite(
    data: &Array2<f64>,
    transformer: &str,
) -> Result<(), PreprocessingError> {
    match data.indexed_iter().find(|(_, v)| v.is_infinite()) {
        Some(((row, col), v)) => Err(PreprocessingError::InfiniteValue(format!(
            "{transformer} found {v} at ({row}, {col})"
        ))),
        None => Ok(()),
    }
}

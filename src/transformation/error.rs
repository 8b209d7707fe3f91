//! Errors raised by the transformation driver.

use crate::dataset::DatasetError;
use crate::preprocessing::PreprocessingError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which input table an error concerns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Split {
    Train,
    Test,
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Split::Train => f.write_str("train"),
            Split::Test => f.write_str("test"),
        }
    }
}

/// Failure of one phase of a transformation run.
///
/// Each variant names the phase and keeps the underlying cause as its source.
#[derive(Debug, Error)]
pub enum TransformationError {
    #[error("failed to read {split} table {}", path.display())]
    Read {
        split: Split,
        path: PathBuf,
        #[source]
        source: DatasetError,
    },
    #[error("{split} table does not match the expected schema")]
    Schema {
        split: Split,
        #[source]
        source: DatasetError,
    },
    #[error("failed to build the preprocessor")]
    Build {
        #[source]
        source: PreprocessingError,
    },
    #[error("failed to fit the preprocessor on training features")]
    Fit {
        #[source]
        source: PreprocessingError,
    },
    #[error("failed to transform {split} features")]
    Transform {
        split: Split,
        #[source]
        source: PreprocessingError,
    },
    #[error("failed to save the preprocessor to {}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: PreprocessingError,
    },
    #[error("failed to load the preprocessor from {}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: PreprocessingError,
    },
}

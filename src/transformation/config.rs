//! Options for a transformation run.

use crate::preprocessing::HandleUnknown;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the persisted preprocessor.
pub const DEFAULT_PREPROCESSOR_PATH: &str = "artifacts/preprocessor.bin";

/// Options for a [`DataTransformation`](super::DataTransformation) run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataTransformationConfig {
    /// Where the fitted preprocessor is written.
    pub preprocessor_path: PathBuf,
    /// What the one-hot encoder does with categories unseen during fit.
    pub handle_unknown: HandleUnknown,
}

impl Default for DataTransformationConfig {
    fn default() -> Self {
        Self {
            preprocessor_path: PathBuf::from(DEFAULT_PREPROCESSOR_PATH),
            handle_unknown: HandleUnknown::default(),
        }
    }
}

impl DataTransformationConfig {
    pub fn with_preprocessor_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.preprocessor_path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_handle_unknown(mut self, handle_unknown: HandleUnknown) -> Self {
        self.handle_unknown = handle_unknown;
        self
    }
}

//! Categorical feature encoding transformers.
//!
//! This module provides encoders for converting string categories to numerical
//! representations that downstream numeric steps can consume.
//!
//! # Available Encoders
//!
//! ## OneHotEncoder
//! Converts each categorical column into one binary column per category
//! observed during fit.
//!
//! ```text
//! Input:  [["female"], ["male"], ["female"]]   (3 samples, 1 categorical feature)
//! Output: [[1, 0], [0, 1], [1, 0]]             (3 samples, 2 binary features)
//! ```
//!
//! # Design Notes
//!
//! Encoders read a [`CategoryMatrix`](crate::dataset::CategoryMatrix) and
//! expect every cell to be present; run an imputer first.

mod one_hot;

pub use one_hot::{FittedOneHotEncoder, OneHotEncoder, OneHotEncoderParams};

/// Strategy for handling unknown categories during transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum HandleUnknown {
    /// Raise an error when unknown categories are encountered.
    #[default]
    Error,
    /// Ignore unknown categories (the column's one-hot block is all zeros).
    Ignore,
}

impl std::str::FromStr for HandleUnknown {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(HandleUnknown::Error),
            "ignore" => Ok(HandleUnknown::Ignore),
            other => Err(format!(
                "unknown handle_unknown value {other:?} (expected \"error\" or \"ignore\")"
            )),
        }
    }
}

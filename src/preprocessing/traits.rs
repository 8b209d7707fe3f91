//! Core traits for preprocessing transformers.
//!
//! This module defines the two central traits:
//! - [`Transformer`]: Used during fitting; has hyperparameters and can learn from data.
//! - [`FittedTransformer`]: After fitting; ready for inference and serialization.

use crate::preprocessing::error::PreprocessingError;
use crate::serialization::{self, SerializableParams};

/// Trait for unfitted transformers with hyperparameters.
///
/// A transformer learns parameters from training data and can then transform
/// new data using those learned parameters. This trait represents the
/// configurable, unfitted state.
///
/// # Associated Types
/// - `Input`: Input data type (`Array2<f64>`, a category matrix or a `DataFrame`).
/// - `Output`: Output data type (typically `Array2<f64>`).
/// - `Params`: Serializable representation of learned parameters.
/// - `Fitted`: The corresponding fitted transformer type.
///
/// # Example
/// ```ignore
/// use score_prep::preprocessing::{Transformer, FittedTransformer, StandardScaler};
///
/// let scaler = StandardScaler::new();
/// let fitted = scaler.fit(&train)?;
/// let transformed = fitted.transform(&test)?;
/// ```
pub trait Transformer: Clone {
    /// Input data type for transformation.
    type Input;
    /// Output data type after transformation.
    type Output;
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer<Params = Self::Params, Input = Self::Input, Output = Self::Output>;

    /// Fit the transformer to the training data.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if:
    /// - Data is empty
    /// - Data contains values the transformer cannot learn from
    /// - Shape is incompatible with the transformer
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError>;

    /// Fit the transformer and transform the same data in one step.
    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let fitted = self.fit(data)?;
        fitted.transform(data)
    }
}

/// Trait for fitted transformers ready for inference.
///
/// After fitting, a transformer holds learned parameters (medians, categories,
/// scale factors) and can transform new data. It can be persisted and restored.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
/// - `save_to_file` / `load_from_file` use the same bincode encoding on every platform.
pub trait FittedTransformer: Clone {
    /// Input data type for transformation.
    type Input;
    /// Output data type after transformation.
    type Output;
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;

    /// Transform data using learned parameters.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if:
    /// - Input shape doesn't match expected number of features
    /// - Input contains values the fitted state cannot handle
    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError>;

    /// Reverse the transformation (if supported).
    ///
    /// Imputers cannot be inverted: the information about which cells were
    /// missing is lost.
    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PreprocessingError>;

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted transformer from parameters.
    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError>
    where
        Self: Sized;

    /// Save the fitted transformer to a file.
    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), PreprocessingError> {
        let bytes = self
            .extract_params()
            .to_bytes()
            .map_err(|e| PreprocessingError::SerializationError(e.to_string()))?;
        serialization::write_artifact(path.as_ref(), &bytes)
    }

    /// Load a fitted transformer from a file.
    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, PreprocessingError>
    where
        Self: Sized,
    {
        let bytes = serialization::read_artifact(path.as_ref())?;
        let params = Self::Params::from_bytes(&bytes)
            .map_err(|e| PreprocessingError::SerializationError(e.to_string()))?;
        Self::from_params(params)
    }

    /// Returns the number of features seen during fit.
    fn n_features_in(&self) -> usize;
}

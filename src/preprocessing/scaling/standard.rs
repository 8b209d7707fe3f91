//! Standard Scaler (Z-score normalization).
//!
//! Transforms features by removing the mean and scaling to unit variance.
//!
//! The standard score of a sample `x` is calculated as:
//! ```text
//! z = (x - u) / s
//! ```
//! where `u` is the mean of the training samples, and `s` is the population
//! standard deviation. With `with_mean = false` the `- u` term is skipped, but
//! `s` is still measured around the mean, so sparse-looking one-hot output
//! stays non-negative while columns reach unit variance.
//!
//! # Example
//! ```
//! use ndarray::array;
//! use score_prep::preprocessing::{FittedTransformer, StandardScaler, Transformer};
//!
//! let data = array![[1.0], [3.0]];
//! let fitted = StandardScaler::new().fit(&data).unwrap();
//! assert_eq!(fitted.transform(&data).unwrap(), array![[-1.0], [1.0]]);
//!
//! let uncentered = StandardScaler::new().with_mean(false).fit(&data).unwrap();
//! assert_eq!(uncentered.transform(&data).unwrap(), array![[1.0], [3.0]]);
//! ```

use crate::preprocessing::error::{ensure_no_infinite, PreprocessingError};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Configuration for StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerConfig {
    /// If True, center the data before scaling.
    pub with_mean: bool,
    /// If True, scale the data to unit variance.
    pub with_std: bool,
}

impl Default for StandardScalerConfig {
    fn default() -> Self {
        Self {
            with_mean: true,
            with_std: true,
        }
    }
}

/// Serializable parameters for a fitted StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerParams {
    /// Configuration options.
    pub config: StandardScalerConfig,
    /// Mean of each feature.
    pub mean: Vec<f64>,
    /// Standard deviation of each feature (all ones if with_std=False).
    pub std: Vec<f64>,
    /// Number of features seen during fit.
    pub n_features: usize,
}

/// StandardScaler transformer (unfitted).
///
/// Transforms features by removing the mean and scaling to unit variance.
#[derive(Clone, Debug, Default)]
pub struct StandardScaler {
    config: StandardScalerConfig,
}

impl StandardScaler {
    /// Create a new StandardScaler with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to center data by mean.
    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.config.with_mean = with_mean;
        self
    }

    /// Set whether to scale data to unit variance.
    pub fn with_std(mut self, with_std: bool) -> Self {
        self.config.with_std = with_std;
        self
    }

    pub fn config(&self) -> &StandardScalerConfig {
        &self.config
    }
}

impl Transformer for StandardScaler {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = StandardScalerParams;
    type Fitted = FittedStandardScaler;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let cols = data.ncols();
        ensure_no_infinite(data, "StandardScaler")?;

        let mean = data.mean_axis(Axis(0)).ok_or_else(|| {
            PreprocessingError::EmptyData("Cannot fit StandardScaler on empty data".to_string())
        })?;
        if mean.iter().any(|m| m.is_nan()) {
            return Err(PreprocessingError::MissingValues(
                "StandardScaler cannot be fitted on NaN values; impute first".to_string(),
            ));
        }

        let std = if self.config.with_std {
            // population std (ddof=0); constant features keep their scale
            data.std_axis(Axis(0), 0.0)
                .mapv(|s| if s == 0.0 { 1.0 } else { s })
        } else {
            Array1::ones(cols)
        };

        Ok(FittedStandardScaler {
            config: self.config.clone(),
            mean,
            std,
            n_features: cols,
        })
    }
}

/// Fitted StandardScaler ready for inference.
#[derive(Clone, Debug)]
pub struct FittedStandardScaler {
    config: StandardScalerConfig,
    mean: Array1<f64>,
    std: Array1<f64>,
    n_features: usize,
}

impl FittedStandardScaler {
    /// Get the mean values for each feature.
    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Get the standard deviation values for each feature.
    pub fn std(&self) -> &Array1<f64> {
        &self.std
    }

    pub fn config(&self) -> &StandardScalerConfig {
        &self.config
    }

    fn check_features(&self, cols: usize) -> Result<(), PreprocessingError> {
        if cols != self.n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: cols,
            });
        }
        Ok(())
    }
}

impl FittedTransformer for FittedStandardScaler {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = StandardScalerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        self.check_features(data.ncols())?;
        ensure_no_infinite(data, "StandardScaler")?;

        let mut result = data.clone();
        if self.config.with_mean {
            result -= &self.mean;
        }
        if self.config.with_std {
            result /= &self.std;
        }
        Ok(result)
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        self.check_features(data.ncols())?;

        let mut result = data.clone();
        if self.config.with_std {
            result *= &self.std;
        }
        if self.config.with_mean {
            result += &self.mean;
        }
        Ok(result)
    }

    fn extract_params(&self) -> Self::Params {
        StandardScalerParams {
            config: self.config.clone(),
            mean: self.mean.to_vec(),
            std: self.std.to_vec(),
            n_features: self.n_features,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if params.mean.len() != params.n_features || params.std.len() != params.n_features {
            return Err(PreprocessingError::InvalidParameter(format!(
                "StandardScaler params sized for {} features hold {} means and {} stds",
                params.n_features,
                params.mean.len(),
                params.std.len()
            )));
        }

        Ok(Self {
            config: params.config,
            mean: Array1::from(params.mean),
            std: Array1::from(params.std),
            n_features: params.n_features,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }
}

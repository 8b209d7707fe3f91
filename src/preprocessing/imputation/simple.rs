//! Simple Imputer.
//!
//! Imputation transformer for completing missing values in numeric columns.
//! Supports mean, median, most_frequent, and constant strategies.
//!
//! Note: This implementation treats NaN as missing values.
//!
//! # Example
//! ```
//! use ndarray::array;
//! use score_prep::preprocessing::{FittedTransformer, ImputeStrategy, SimpleImputer, Transformer};
//!
//! let data = array![[1.0, f64::NAN], [3.0, 4.0], [5.0, 6.0]];
//! let fitted = SimpleImputer::new(ImputeStrategy::Median).fit(&data).unwrap();
//! let imputed = fitted.transform(&data).unwrap();
//! assert_eq!(imputed[[0, 1]], 5.0);
//! ```

use crate::preprocessing::error::{ensure_no_infinite, PreprocessingError};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// Strategy for imputing missing values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Replace missing values with the mean of each column.
    #[default]
    Mean,
    /// Replace missing values with the median of each column.
    Median,
    /// Replace missing values with the most frequent value of each column.
    MostFrequent,
    /// Replace missing values with a constant value.
    Constant(f64),
}

/// Serializable parameters for a fitted SimpleImputer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimpleImputerParams {
    /// Strategy used for imputation.
    pub strategy: ImputeStrategy,
    /// Statistics (fill values) for each feature.
    pub statistics_: Vec<f64>,
    /// Number of features seen during fit.
    pub n_features: usize,
}

/// SimpleImputer transformer (unfitted).
///
/// Imputation transformer for completing missing values.
#[derive(Clone, Debug, Default)]
pub struct SimpleImputer {
    strategy: ImputeStrategy,
}

impl SimpleImputer {
    /// Create a new SimpleImputer with the specified strategy.
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self { strategy }
    }

    /// The configured strategy.
    pub fn strategy(&self) -> &ImputeStrategy {
        &self.strategy
    }
}

/// Fill value for one column, ignoring NaN values.
///
/// A column with no observed values falls back to `0.0`.
fn column_statistic(column: ArrayView1<f64>, strategy: &ImputeStrategy) -> f64 {
    if let ImputeStrategy::Constant(val) = strategy {
        return *val;
    }

    let mut observed: Vec<f64> = column.iter().copied().filter(|v| !v.is_nan()).collect();
    if observed.is_empty() {
        return 0.0;
    }

    match strategy {
        ImputeStrategy::Mean => observed.iter().sum::<f64>() / observed.len() as f64,
        ImputeStrategy::Median => {
            observed.sort_by(f64::total_cmp);
            let n = observed.len();
            if n % 2 == 0 {
                (observed[n / 2 - 1] + observed[n / 2]) / 2.0
            } else {
                observed[n / 2]
            }
        }
        ImputeStrategy::MostFrequent => {
            observed.sort_by(f64::total_cmp);
            most_frequent_sorted(&observed).copied().unwrap_or(0.0)
        }
        ImputeStrategy::Constant(val) => *val,
    }
}

/// Most frequent element of a sorted slice; ties go to the first (smallest) run.
pub(crate) fn most_frequent_sorted<T: PartialEq>(sorted: &[T]) -> Option<&T> {
    let mut best: Option<(&T, usize)> = None;
    let mut i = 0;
    while i < sorted.len() {
        let value = &sorted[i];
        let run = sorted[i..].iter().take_while(|v| *v == value).count();
        if best.map_or(true, |(_, count)| run > count) {
            best = Some((value, run));
        }
        i += run;
    }
    best.map(|(value, _)| value)
}

impl Transformer for SimpleImputer {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = SimpleImputerParams;
    type Fitted = FittedSimpleImputer;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if data.nrows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit SimpleImputer on empty data".to_string(),
            ));
        }
        ensure_no_infinite(data, "SimpleImputer")?;

        let statistics_ = data
            .axis_iter(Axis(1))
            .map(|column| column_statistic(column, &self.strategy))
            .collect();

        Ok(FittedSimpleImputer {
            strategy: self.strategy.clone(),
            statistics_,
            n_features: data.ncols(),
        })
    }
}

/// Fitted SimpleImputer ready for inference.
#[derive(Clone, Debug)]
pub struct FittedSimpleImputer {
    strategy: ImputeStrategy,
    statistics_: Vec<f64>,
    n_features: usize,
}

impl FittedSimpleImputer {
    /// Get the imputation statistics (fill values) for each feature.
    pub fn statistics(&self) -> &[f64] {
        &self.statistics_
    }

    /// Strategy the statistics were computed with.
    pub fn strategy(&self) -> &ImputeStrategy {
        &self.strategy
    }
}

impl FittedTransformer for FittedSimpleImputer {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = SimpleImputerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        if data.ncols() != self.n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: data.ncols(),
            });
        }
        ensure_no_infinite(data, "SimpleImputer")?;

        let mut result = data.clone();
        for (mut column, &fill) in result.axis_iter_mut(Axis(1)).zip(&self.statistics_) {
            column.mapv_inplace(|v| if v.is_nan() { fill } else { v });
        }
        Ok(result)
    }

    fn inverse_transform(&self, _data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        Err(PreprocessingError::InvalidParameter(
            "SimpleImputer does not support inverse_transform (missing value information is lost)"
                .to_string(),
        ))
    }

    fn extract_params(&self) -> Self::Params {
        SimpleImputerParams {
            strategy: self.strategy.clone(),
            statistics_: self.statistics_.clone(),
            n_features: self.n_features,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if params.statistics_.len() != params.n_features {
            return Err(PreprocessingError::InvalidParameter(format!(
                "SimpleImputer params hold {} statistics for {} features",
                params.statistics_.len(),
                params.n_features
            )));
        }

        Ok(Self {
            strategy: params.strategy,
            statistics_: params.statistics_,
            n_features: params.n_features,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }
}

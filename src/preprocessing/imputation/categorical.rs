//! Imputer for string-valued categorical columns.

use super::simple::most_frequent_sorted;
use crate::dataset::CategoryMatrix;
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// Strategy for imputing missing categories.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum CategoricalImputeStrategy {
    /// Replace missing cells with the most frequent category of the column.
    /// Ties resolve to the lexicographically smallest category.
    #[default]
    MostFrequent,
    /// Replace missing cells with a fixed label.
    Constant(String),
}

/// Serializable parameters for a fitted [`CategoricalImputer`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoricalImputerParams {
    pub strategy: CategoricalImputeStrategy,
    /// Fill value per feature.
    pub statistics_: Vec<String>,
    pub n_features: usize,
}

/// Fills missing cells of a [`CategoryMatrix`] with a per-column label.
#[derive(Clone, Debug, Default)]
pub struct CategoricalImputer {
    strategy: CategoricalImputeStrategy,
}

impl CategoricalImputer {
    pub fn new(strategy: CategoricalImputeStrategy) -> Self {
        Self { strategy }
    }

    pub fn most_frequent() -> Self {
        Self::new(CategoricalImputeStrategy::MostFrequent)
    }
}

fn column_mode(column: ArrayView1<Option<String>>) -> Option<String> {
    let mut observed: Vec<&str> = column.iter().filter_map(|c| c.as_deref()).collect();
    observed.sort_unstable();
    most_frequent_sorted(&observed).map(|s| s.to_string())
}

impl Transformer for CategoricalImputer {
    type Input = CategoryMatrix;
    type Output = CategoryMatrix;
    type Params = CategoricalImputerParams;
    type Fitted = FittedCategoricalImputer;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if data.nrows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit CategoricalImputer on empty data".to_string(),
            ));
        }

        let statistics_ = match &self.strategy {
            CategoricalImputeStrategy::Constant(label) => vec![label.clone(); data.ncols()],
            CategoricalImputeStrategy::MostFrequent => data
                .axis_iter(Axis(1))
                .enumerate()
                .map(|(idx, column)| {
                    column_mode(column).ok_or_else(|| {
                        PreprocessingError::EmptyData(format!(
                            "column {idx} has no observed values to take the most frequent from"
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(FittedCategoricalImputer {
            strategy: self.strategy.clone(),
            statistics_,
            n_features: data.ncols(),
        })
    }
}

/// Fitted [`CategoricalImputer`].
#[derive(Clone, Debug)]
pub struct FittedCategoricalImputer {
    strategy: CategoricalImputeStrategy,
    statistics_: Vec<String>,
    n_features: usize,
}

impl FittedCategoricalImputer {
    /// Fill value for each feature.
    pub fn statistics(&self) -> &[String] {
        &self.statistics_
    }
}

impl FittedTransformer for FittedCategoricalImputer {
    type Input = CategoryMatrix;
    type Output = CategoryMatrix;
    type Params = CategoricalImputerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        if data.ncols() != self.n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: data.ncols(),
            });
        }

        let mut result = data.clone();
        for (mut column, fill) in result.axis_iter_mut(Axis(1)).zip(&self.statistics_) {
            for cell in column.iter_mut().filter(|c| c.is_none()) {
                *cell = Some(fill.clone());
            }
        }
        Ok(result)
    }

    fn inverse_transform(&self, _data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        Err(PreprocessingError::InvalidParameter(
            "CategoricalImputer does not support inverse_transform (missing value information is lost)"
                .to_string(),
        ))
    }

    fn extract_params(&self) -> Self::Params {
        CategoricalImputerParams {
            strategy: self.strategy.clone(),
            statistics_: self.statistics_.clone(),
            n_features: self.n_features,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if params.statistics_.len() != params.n_features {
            return Err(PreprocessingError::InvalidParameter(format!(
                "CategoricalImputer params hold {} fill values for {} features",
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

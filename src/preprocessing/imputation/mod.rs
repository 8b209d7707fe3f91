//! Imputation transformers for handling missing values.
//!
//! This module provides transformers for imputing (filling in) missing values
//! in datasets.
//!
//! # Available Transformers
//!
//! | Transformer | Input | Description |
//! |-------------|-------|-------------|
//! | [`SimpleImputer`] | `Array2<f64>` (NaN = missing) | Impute with mean, median, most_frequent, or constant |
//! | [`CategoricalImputer`] | [`CategoryMatrix`](crate::dataset::CategoryMatrix) | Impute with most_frequent or constant label |

pub mod categorical;
pub mod simple;

pub use categorical::{
    CategoricalImputeStrategy, CategoricalImputer, CategoricalImputerParams,
    FittedCategoricalImputer,
};
pub use simple::{FittedSimpleImputer, ImputeStrategy, SimpleImputer, SimpleImputerParams};

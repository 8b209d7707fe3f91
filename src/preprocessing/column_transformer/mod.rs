//! ColumnTransformer for applying different pipelines to different columns.
//!
//! This module provides the `ColumnTransformer` which routes named column
//! groups of a [`DataFrame`](crate::dataset::DataFrame) to numeric or
//! categorical pipelines and concatenates the results.

#[allow(clippy::module_inception)]
mod column_transformer;

pub use column_transformer::{
    BranchParams, ColumnSpec, ColumnTransformer, ColumnTransformerParams, ColumnTransformerStep,
    FittedColumnTransformer, FittedColumnTransformerStep, StepParams,
};

//! Pipeline utilities for chaining transformers.
//!
//! This module provides tools for combining multiple transformers into
//! a single pipeline that can be fitted and used for inference.
//!
//! # Available Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Pipeline`] | Chain numeric transformers sequentially |
//! | [`CategoricalPipeline`] | Impute labels, one-hot encode, then run numeric steps |

mod categorical;
#[allow(clippy::module_inception)]
pub mod pipeline;

pub use categorical::{
    CategoricalPipeline, CategoricalPipelineParams, FittedCategoricalPipeline,
};
pub use pipeline::{
    FittedPipeline, Pipeline, PipelineParams, PipelineStep, PipelineStepEnum, PipelineStepParams,
};

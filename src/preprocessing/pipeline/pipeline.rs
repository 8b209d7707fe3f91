//! Pipeline for chaining numeric transformers.
//!
//! A Pipeline allows chaining multiple transformers together, where the output
//! of one transformer becomes the input to the next.
//!
//! # Example
//! ```
//! use ndarray::array;
//! use score_prep::preprocessing::{
//!     FittedTransformer, ImputeStrategy, Pipeline, SimpleImputer, StandardScaler, Transformer,
//! };
//!
//! let pipeline = Pipeline::new()
//!     .add_simple_imputer(SimpleImputer::new(ImputeStrategy::Median))
//!     .add_standard_scaler(StandardScaler::new());
//!
//! let data = array![[1.0], [f64::NAN], [3.0]];
//! let fitted = pipeline.fit(&data).unwrap();
//! assert_eq!(fitted.transform(&data).unwrap()[[1, 0]], 0.0);
//! ```

use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::imputation::{FittedSimpleImputer, SimpleImputer, SimpleImputerParams};
use crate::preprocessing::scaling::{FittedStandardScaler, StandardScaler, StandardScalerParams};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// A trait for fitted transformers that can be part of a pipeline.
///
/// Implemented by [`PipelineStepEnum`] over every fitted numeric
/// transformer that maps `Array2<f64>` to `Array2<f64>`.
pub trait PipelineStep: Clone {
    /// Transform the data.
    fn transform_step(&self, data: &Array2<f64>) -> Result<Array2<f64>, PreprocessingError>;
    /// Inverse transform the data (if supported).
    fn inverse_transform_step(&self, data: &Array2<f64>)
        -> Result<Array2<f64>, PreprocessingError>;
    /// Get the step name for debugging.
    fn step_name(&self) -> &'static str;
}

/// Serializable parameters of one fitted step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PipelineStepParams {
    SimpleImputer(SimpleImputerParams),
    StandardScaler(StandardScalerParams),
}

/// Serializable representation of a fitted pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineParams {
    /// Fitted steps in execution order.
    pub steps: Vec<PipelineStepParams>,
    /// Number of features seen during fit.
    pub n_features: usize,
}

/// A fitted step in the pipeline.
#[derive(Clone, Debug)]
pub enum PipelineStepEnum {
    /// SimpleImputer step.
    SimpleImputer(FittedSimpleImputer),
    /// StandardScaler step.
    StandardScaler(FittedStandardScaler),
}

impl PipelineStep for PipelineStepEnum {
    fn transform_step(&self, data: &Array2<f64>) -> Result<Array2<f64>, PreprocessingError> {
        match self {
            PipelineStepEnum::SimpleImputer(t) => t.transform(data),
            PipelineStepEnum::StandardScaler(t) => t.transform(data),
        }
    }

    fn inverse_transform_step(
        &self,
        data: &Array2<f64>,
    ) -> Result<Array2<f64>, PreprocessingError> {
        match self {
            PipelineStepEnum::SimpleImputer(t) => t.inverse_transform(data),
            PipelineStepEnum::StandardScaler(t) => t.inverse_transform(data),
        }
    }

    fn step_name(&self) -> &'static str {
        match self {
            PipelineStepEnum::SimpleImputer(_) => "SimpleImputer",
            PipelineStepEnum::StandardScaler(_) => "StandardScaler",
        }
    }
}

impl PipelineStepEnum {
    fn extract_params(&self) -> PipelineStepParams {
        match self {
            PipelineStepEnum::SimpleImputer(t) => PipelineStepParams::SimpleImputer(t.extract_params()),
            PipelineStepEnum::StandardScaler(t) => {
                PipelineStepParams::StandardScaler(t.extract_params())
            }
        }
    }

    fn from_params(params: PipelineStepParams) -> Result<Self, PreprocessingError> {
        match params {
            PipelineStepParams::SimpleImputer(p) => {
                FittedSimpleImputer::from_params(p).map(PipelineStepEnum::SimpleImputer)
            }
            PipelineStepParams::StandardScaler(p) => {
                FittedStandardScaler::from_params(p).map(PipelineStepEnum::StandardScaler)
            }
        }
    }

    fn n_features_in(&self) -> usize {
        match self {
            PipelineStepEnum::SimpleImputer(t) => t.n_features_in(),
            PipelineStepEnum::StandardScaler(t) => t.n_features_in(),
        }
    }
}

/// A step in the unfitted pipeline.
#[derive(Clone, Debug)]
pub enum UnfittedStepEnum {
    SimpleImputer(SimpleImputer),
    StandardScaler(StandardScaler),
}

impl UnfittedStepEnum {
    fn fit(&self, data: &Array2<f64>) -> Result<PipelineStepEnum, PreprocessingError> {
        match self {
            UnfittedStepEnum::SimpleImputer(t) => t.fit(data).map(PipelineStepEnum::SimpleImputer),
            UnfittedStepEnum::StandardScaler(t) => {
                t.fit(data).map(PipelineStepEnum::StandardScaler)
            }
        }
    }
}

/// Pipeline transformer (unfitted).
///
/// Chains multiple transformers together.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    steps: Vec<UnfittedStepEnum>,
}

impl Pipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a SimpleImputer to the pipeline.
    pub fn add_simple_imputer(mut self, imputer: SimpleImputer) -> Self {
        self.steps.push(UnfittedStepEnum::SimpleImputer(imputer));
        self
    }

    /// Add a StandardScaler to the pipeline.
    pub fn add_standard_scaler(mut self, scaler: StandardScaler) -> Self {
        self.steps.push(UnfittedStepEnum::StandardScaler(scaler));
        self
    }

    /// Get the number of steps in the pipeline.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the pipeline is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Transformer for Pipeline {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = PipelineParams;
    type Fitted = FittedPipeline;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if self.steps.is_empty() {
            return Err(PreprocessingError::InvalidParameter(
                "Cannot fit an empty pipeline".to_string(),
            ));
        }

        if data.nrows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit pipeline on empty data".to_string(),
            ));
        }

        let mut fitted_steps = Vec::with_capacity(self.steps.len());
        let mut current_data = data.clone();

        for step in &self.steps {
            let fitted = step.fit(&current_data)?;
            current_data = fitted.transform_step(&current_data)?;
            fitted_steps.push(fitted);
        }

        Ok(FittedPipeline {
            steps: fitted_steps,
            n_features: data.ncols(),
        })
    }
}

/// Fitted Pipeline ready for inference.
#[derive(Clone, Debug)]
pub struct FittedPipeline {
    steps: Vec<PipelineStepEnum>,
    n_features: usize,
}

impl FittedPipeline {
    /// Get the number of steps in the pipeline.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the pipeline is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Get the names of all steps in the pipeline.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.step_name()).collect()
    }

    /// Fitted steps in execution order.
    pub fn steps(&self) -> &[PipelineStepEnum] {
        &self.steps
    }

    /// Number of output features; every numeric step preserves width.
    pub fn n_features_out(&self) -> usize {
        self.n_features
    }
}

impl FittedTransformer for FittedPipeline {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = PipelineParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        if data.ncols() != self.n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: data.ncols(),
            });
        }

        let mut result = data.clone();
        for step in &self.steps {
            result = step.transform_step(&result)?;
        }
        Ok(result)
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        if data.ncols() != self.n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: data.ncols(),
            });
        }

        let mut result = data.clone();
        // Apply inverse transforms in reverse order
        for step in self.steps.iter().rev() {
            result = step.inverse_transform_step(&result)?;
        }
        Ok(result)
    }

    fn extract_params(&self) -> Self::Params {
        PipelineParams {
            steps: self.steps.iter().map(PipelineStepEnum::extract_params).collect(),
            n_features: self.n_features,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if params.steps.is_empty() {
            return Err(PreprocessingError::InvalidParameter(
                "Pipeline params contain no steps".to_string(),
            ));
        }

        let steps = params
            .steps
            .into_iter()
            .map(PipelineStepEnum::from_params)
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(step) = steps.iter().find(|s| s.n_features_in() != params.n_features) {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: params.n_features,
                got_features: step.n_features_in(),
            });
        }

        Ok(Self {
            steps,
            n_features: params.n_features,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }
}

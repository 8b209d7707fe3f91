//! Pipeline for categorical columns: impute, one-hot encode, then numeric steps.
//!
//! The encoder changes the element type from category labels to numbers, so
//! the chain has a fixed shape: an optional [`CategoricalImputer`], a
//! required [`OneHotEncoder`], then an optional numeric [`Pipeline`] over the
//! encoded columns.
//!
//! # Example
//! ```
//! use ndarray::array;
//! use score_prep::preprocessing::{
//!     CategoricalImputer, CategoricalPipeline, FittedTransformer, OneHotEncoder,
//!     StandardScaler, Transformer,
//! };
//!
//! let pipeline = CategoricalPipeline::new()
//!     .add_imputer(CategoricalImputer::most_frequent())
//!     .add_one_hot_encoder(OneHotEncoder::new())
//!     .add_standard_scaler(StandardScaler::new().with_mean(false));
//!
//! let data = array![[Some("none".to_string())], [None], [Some("completed".to_string())]];
//! let fitted = pipeline.fit(&data).unwrap();
//! assert_eq!(fitted.transform(&data).unwrap().ncols(), 2);
//! ```

use super::pipeline::{FittedPipeline, Pipeline, PipelineParams};
use crate::dataset::CategoryMatrix;
use crate::preprocessing::encoding::{FittedOneHotEncoder, OneHotEncoder, OneHotEncoderParams};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::imputation::{
    CategoricalImputer, CategoricalImputerParams, FittedCategoricalImputer,
};
use crate::preprocessing::scaling::StandardScaler;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Serializable representation of a fitted categorical pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoricalPipelineParams {
    pub imputer: Option<CategoricalImputerParams>,
    pub encoder: OneHotEncoderParams,
    /// Numeric steps applied to the encoded columns.
    pub post: Option<PipelineParams>,
    pub n_features: usize,
}

/// Categorical pipeline (unfitted).
#[derive(Clone, Debug, Default)]
pub struct CategoricalPipeline {
    imputer: Option<CategoricalImputer>,
    encoder: Option<OneHotEncoder>,
    post: Pipeline,
}

impl CategoricalPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the imputer that fills missing labels before encoding.
    pub fn add_imputer(mut self, imputer: CategoricalImputer) -> Self {
        self.imputer = Some(imputer);
        self
    }

    /// Set the encoder. Required before fitting.
    pub fn add_one_hot_encoder(mut self, encoder: OneHotEncoder) -> Self {
        self.encoder = Some(encoder);
        self
    }

    /// Append a scaler to the numeric steps that run after encoding.
    pub fn add_standard_scaler(mut self, scaler: StandardScaler) -> Self {
        self.post = self.post.add_standard_scaler(scaler);
        self
    }

    /// Number of configured steps.
    pub fn len(&self) -> usize {
        usize::from(self.imputer.is_some()) + usize::from(self.encoder.is_some()) + self.post.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Transformer for CategoricalPipeline {
    type Input = CategoryMatrix;
    type Output = Array2<f64>;
    type Params = CategoricalPipelineParams;
    type Fitted = FittedCategoricalPipeline;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let encoder = self.encoder.as_ref().ok_or_else(|| {
            PreprocessingError::InvalidParameter(
                "CategoricalPipeline requires a OneHotEncoder step".to_string(),
            )
        })?;

        if data.nrows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit pipeline on empty data".to_string(),
            ));
        }

        let (imputer, labels) = match &self.imputer {
            Some(imputer) => {
                let fitted = imputer.fit(data)?;
                let labels = fitted.transform(data)?;
                (Some(fitted), labels)
            }
            None => (None, data.clone()),
        };

        let encoder = encoder.fit(&labels)?;
        let post = if self.post.is_empty() {
            None
        } else {
            Some(self.post.fit(&encoder.transform(&labels)?)?)
        };

        Ok(FittedCategoricalPipeline {
            imputer,
            encoder,
            post,
            n_features: data.ncols(),
        })
    }
}

/// Fitted categorical pipeline ready for inference.
#[derive(Clone, Debug)]
pub struct FittedCategoricalPipeline {
    imputer: Option<FittedCategoricalImputer>,
    encoder: FittedOneHotEncoder,
    post: Option<FittedPipeline>,
    n_features: usize,
}

impl FittedCategoricalPipeline {
    pub fn imputer(&self) -> Option<&FittedCategoricalImputer> {
        self.imputer.as_ref()
    }

    pub fn encoder(&self) -> &FittedOneHotEncoder {
        &self.encoder
    }

    pub fn n_features_out(&self) -> usize {
        self.encoder.n_features_out()
    }

    /// Get the names of all steps in the pipeline.
    pub fn step_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.imputer.is_some() {
            names.push("CategoricalImputer");
        }
        names.push("OneHotEncoder");
        if let Some(post) = &self.post {
            names.extend(post.step_names());
        }
        names
    }

    /// Output column names, one per encoded category.
    pub fn feature_names_out<S: AsRef<str>>(
        &self,
        input_names: &[S],
    ) -> Result<Vec<String>, PreprocessingError> {
        self.encoder.feature_names_out(input_names)
    }
}

impl FittedTransformer for FittedCategoricalPipeline {
    type Input = CategoryMatrix;
    type Output = Array2<f64>;
    type Params = CategoricalPipelineParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        if data.ncols() != self.n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: data.ncols(),
            });
        }

        let encoded = match &self.imputer {
            Some(imputer) => self.encoder.transform(&imputer.transform(data)?)?,
            None => self.encoder.transform(data)?,
        };

        match &self.post {
            Some(post) => post.transform(&encoded),
            None => Ok(encoded),
        }
    }

    /// Undo the numeric steps and the encoding.
    ///
    /// Fails when an imputer is present, as imputation cannot be reversed.
    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        let encoded = match &self.post {
            Some(post) => post.inverse_transform(data)?,
            None => data.clone(),
        };
        let labels = self.encoder.inverse_transform(&encoded)?;

        match &self.imputer {
            Some(imputer) => imputer.inverse_transform(&labels),
            None => Ok(labels),
        }
    }

    fn extract_params(&self) -> Self::Params {
        CategoricalPipelineParams {
            imputer: self.imputer.as_ref().map(|i| i.extract_params()),
            encoder: self.encoder.extract_params(),
            post: self.post.as_ref().map(|p| p.extract_params()),
            n_features: self.n_features,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        let imputer = params
            .imputer
            .map(FittedCategoricalImputer::from_params)
            .transpose()?;
        let encoder = FittedOneHotEncoder::from_params(params.encoder)?;
        let post = params.post.map(FittedPipeline::from_params).transpose()?;

        if encoder.n_features_in() != params.n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: params.n_features,
                got_features: encoder.n_features_in(),
            });
        }
        if let Some(post) = &post {
            if post.n_features_in() != encoder.n_features_out() {
                return Err(PreprocessingError::FeatureMismatch {
                    expected_features: encoder.n_features_out(),
                    got_features: post.n_features_in(),
                });
            }
        }

        Ok(Self {
            imputer,
            encoder,
            post,
            n_features: params.n_features,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }
}

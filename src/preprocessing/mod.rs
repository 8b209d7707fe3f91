//! Data preprocessing transformers for tabular learning pipelines.
//!
//! Transformers follow a type-state pattern: an unfitted [`Transformer`]
//! holds hyperparameters and produces a [`FittedTransformer`] holding learned
//! statistics.
//!
//! # Design Philosophy
//!
//! - **Type Safety**: fitted and unfitted states are distinct types
//! - **Serializable**: fitted transformers can be saved and loaded
//! - **sklearn-compatible**: API familiar to users of scikit-learn
//!
//! # Available Transformers
//!
//! ## Imputation
//! - [`SimpleImputer`]: Fill missing numbers with mean, median, most_frequent, or constant
//! - [`CategoricalImputer`]: Fill missing labels with most_frequent or constant
//!
//! ## Encoding
//! - [`OneHotEncoder`]: One binary column per training category
//!
//! ## Scaling
//! - [`StandardScaler`]: Z-score normalization
//!
//! ## Composition
//! - [`Pipeline`]: Chain numeric transformers
//! - [`CategoricalPipeline`]: Impute, encode, then numeric steps
//! - [`ColumnTransformer`]: Route named column groups to pipelines
//!
//! # Example
//!
//! ```
//! use ndarray::array;
//! use score_prep::preprocessing::{FittedStandardScaler, FittedTransformer, StandardScaler, Transformer};
//!
//! let training_data = array![[1.0, 10.0], [3.0, 30.0]];
//! let fitted = StandardScaler::new().fit(&training_data).unwrap();
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("scaler.bin");
//! fitted.save_to_file(&path).unwrap();
//!
//! let loaded = FittedStandardScaler::load_from_file(&path).unwrap();
//! assert_eq!(loaded.transform(&training_data).unwrap(), fitted.transform(&training_data).unwrap());
//! ```

pub mod column_transformer;
pub mod encoding;
pub mod error;
pub mod imputation;
pub mod pipeline;
pub mod scaling;
pub mod traits;

// Re-export main types
pub use column_transformer::{
    ColumnSpec, ColumnTransformer, ColumnTransformerParams, ColumnTransformerStep,
    FittedColumnTransformer,
};
pub use encoding::{FittedOneHotEncoder, HandleUnknown, OneHotEncoder, OneHotEncoderParams};
pub use error::PreprocessingError;
pub use imputation::{
    CategoricalImputeStrategy, CategoricalImputer, CategoricalImputerParams,
    FittedCategoricalImputer, FittedSimpleImputer, ImputeStrategy, SimpleImputer,
    SimpleImputerParams,
};
pub use pipeline::{
    CategoricalPipeline, CategoricalPipelineParams, FittedCategoricalPipeline, FittedPipeline,
    Pipeline, PipelineParams, PipelineStep, PipelineStepEnum,
};
pub use scaling::{
    FittedStandardScaler, StandardScaler, StandardScalerConfig, StandardScalerParams,
};
pub use traits::{FittedTransformer, Transformer};

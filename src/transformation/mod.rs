//! Train/test transformation driver.
//!
//! [`DataTransformation`] loads the train and test tables, builds the
//! two-branch preprocessor, fits it on training features only, transforms
//! both splits, appends the raw target as the last column and persists the
//! fitted preprocessor.
//!
//! ```no_run
//! use score_prep::transformation::{DataTransformation, DataTransformationConfig};
//!
//! let driver = DataTransformation::new(DataTransformationConfig::default());
//! let output = driver.run("data/train.csv", "data/test.csv").unwrap();
//! println!("{} training rows, saved to {}", output.train.nrows(), output.preprocessor_path.display());
//! ```

mod config;
mod error;
pub mod schema;

pub use config::{DataTransformationConfig, DEFAULT_PREPROCESSOR_PATH};
pub use error::{Split, TransformationError};
pub use schema::Schema;

use crate::dataset::DataFrame;
use crate::preprocessing::{
    CategoricalImputer, CategoricalPipeline, ColumnSpec, ColumnTransformer,
    FittedColumnTransformer, FittedTransformer, ImputeStrategy, OneHotEncoder, Pipeline,
    PreprocessingError, SimpleImputer, StandardScaler, Transformer,
};
use ndarray::{concatenate, Array1, Array2, Axis};
use schema::{CAT_PIPELINE, NUM_PIPELINE};
use std::path::{Path, PathBuf};
use tracing::info;

/// Result of a transformation run.
#[derive(Clone, Debug)]
pub struct TransformationOutput {
    /// Transformed training features with the target as the last column.
    pub train: Array2<f64>,
    /// Transformed test features with the target as the last column.
    pub test: Array2<f64>,
    /// Where the fitted preprocessor was written.
    pub preprocessor_path: PathBuf,
    /// Names of the feature columns (the target column is not included).
    pub feature_names: Vec<String>,
}

/// Fits and applies the column preprocessor to a train/test pair.
#[derive(Clone, Debug, Default)]
pub struct DataTransformation {
    config: DataTransformationConfig,
    schema: Schema,
}

impl DataTransformation {
    pub fn new(config: DataTransformationConfig) -> Self {
        Self {
            config,
            schema: Schema::default(),
        }
    }

    /// Replace the column schema.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    pub fn config(&self) -> &DataTransformationConfig {
        &self.config
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Build the unfitted preprocessor.
    ///
    /// - `num_pipeline`: median imputation, then standardization.
    /// - `cat_pipeline`: most-frequent imputation, one-hot encoding, then
    ///   scaling without centering.
    pub fn build_preprocessor(&self) -> Result<ColumnTransformer, TransformationError> {
        self.schema
            .validate()
            .map_err(|source| TransformationError::Build { source })?;

        info!(columns = ?self.schema.numerical, "numerical columns");
        info!(columns = ?self.schema.categorical, "categorical columns");

        let num_pipeline = Pipeline::new()
            .add_simple_imputer(SimpleImputer::new(ImputeStrategy::Median))
            .add_standard_scaler(StandardScaler::new());

        let cat_pipeline = CategoricalPipeline::new()
            .add_imputer(CategoricalImputer::most_frequent())
            .add_one_hot_encoder(
                OneHotEncoder::new().with_handle_unknown(self.config.handle_unknown),
            )
            .add_standard_scaler(StandardScaler::new().with_mean(false));

        Ok(ColumnTransformer::new()
            .add_numeric(
                NUM_PIPELINE,
                num_pipeline,
                ColumnSpec::names(&self.schema.numerical),
            )
            .add_categorical(
                CAT_PIPELINE,
                cat_pipeline,
                ColumnSpec::names(&self.schema.categorical),
            ))
    }

    /// Load both tables from CSV and run the transformation.
    pub fn run<P, Q>(&self, train_path: P, test_path: Q) -> Result<TransformationOutput, TransformationError>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let train = read_table(Split::Train, train_path.as_ref())?;
        let test = read_table(Split::Test, test_path.as_ref())?;
        info!(
            train_rows = train.n_rows(),
            test_rows = test.n_rows(),
            "train and test data read"
        );

        self.run_on_frames(&train, &test)
    }

    /// Run the transformation on tables already in memory.
    ///
    /// The preprocessor is fitted on `train` features only. Nothing is
    /// written unless every earlier phase succeeds.
    pub fn run_on_frames(
        &self,
        train: &DataFrame,
        test: &DataFrame,
    ) -> Result<TransformationOutput, TransformationError> {
        info!("obtaining preprocessing object");
        let preprocessor = self.build_preprocessor()?;

        let (train_features, train_target) = self.split_target(Split::Train, train)?;
        let (test_features, test_target) = self.split_target(Split::Test, test)?;

        info!("starting preprocessing on training and test data");
        let fitted = preprocessor
            .fit(&train_features)
            .map_err(|source| TransformationError::Fit { source })?;
        let feature_names = fitted
            .feature_names_out()
            .map_err(|source| TransformationError::Fit { source })?;

        let train = transform_split(&fitted, Split::Train, &train_features, &train_target)?;
        let test = transform_split(&fitted, Split::Test, &test_features, &test_target)?;
        info!(
            train_shape = ?train.dim(),
            test_shape = ?test.dim(),
            "preprocessing finished"
        );

        let preprocessor_path = self.config.preprocessor_path.clone();
        fitted
            .save_to_file(&preprocessor_path)
            .map_err(|source| TransformationError::Persist {
                path: preprocessor_path.clone(),
                source,
            })?;
        info!(path = %preprocessor_path.display(), "saved preprocessor");

        Ok(TransformationOutput {
            train,
            test,
            preprocessor_path,
            feature_names,
        })
    }

    /// Read a preprocessor persisted by [`run`](Self::run).
    pub fn load_preprocessor<P: AsRef<Path>>(
        path: P,
    ) -> Result<FittedColumnTransformer, TransformationError> {
        let path = path.as_ref();
        FittedColumnTransformer::load_from_file(path).map_err(|source| TransformationError::Load {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Features (every column except the target) and the numeric target.
    fn split_target(
        &self,
        split: Split,
        frame: &DataFrame,
    ) -> Result<(DataFrame, Array1<f64>), TransformationError> {
        let schema_err = |source| TransformationError::Schema { split, source };

        frame
            .require_columns(&self.schema.required_columns())
            .map_err(schema_err)?;
        let features = frame.drop_column(&self.schema.target).map_err(schema_err)?;
        let target = frame
            .numeric_column(&self.schema.target)
            .map_err(schema_err)?;
        Ok((features, target))
    }
}

fn read_table(split: Split, path: &Path) -> Result<DataFrame, TransformationError> {
    DataFrame::from_csv_path(path).map_err(|source| TransformationError::Read {
        split,
        path: path.to_path_buf(),
        source,
    })
}

fn transform_split(
    fitted: &FittedColumnTransformer,
    split: Split,
    features: &DataFrame,
    target: &Array1<f64>,
) -> Result<Array2<f64>, TransformationError> {
    let transformed = fitted
        .transform(features)
        .map_err(|source| TransformationError::Transform { split, source })?;
    append_target(&transformed, target)
        .map_err(|source| TransformationError::Transform { split, source })
}

/// Append `target` as the last column of `features`.
fn append_target(
    features: &Array2<f64>,
    target: &Array1<f64>,
) -> Result<Array2<f64>, PreprocessingError> {
    let target = target.view().insert_axis(Axis(1));
    concatenate(Axis(1), &[features.view(), target]).map_err(|e| {
        PreprocessingError::InvalidShape {
            expected: format!("{} target values", features.nrows()),
            got: e.to_string(),
        }
    })
}

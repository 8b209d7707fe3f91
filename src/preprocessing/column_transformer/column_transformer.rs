//! ColumnTransformer implementation.
//!
//! Applies different pipelines to different named column groups of a
//! [`DataFrame`] and concatenates results.

use crate::dataset::DataFrame;
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::pipeline::{
    CategoricalPipeline, CategoricalPipelineParams, FittedCategoricalPipeline, FittedPipeline,
    Pipeline, PipelineParams,
};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{concatenate, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// The named columns a branch reads, in the order given.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnSpec(Vec<String>);

impl ColumnSpec {
    /// Build a spec from column names.
    pub fn names<S: AsRef<str>>(names: &[S]) -> Self {
        ColumnSpec(names.iter().map(|n| n.as_ref().to_string()).collect())
    }

    /// Check the columns against `frame` and return their names.
    fn resolve(&self, frame: &DataFrame) -> Result<Vec<String>, PreprocessingError> {
        if self.0.is_empty() {
            return Err(PreprocessingError::InvalidParameter(
                "ColumnTransformer branch selects no columns".to_string(),
            ));
        }
        frame.require_columns(&self.0)?;
        Ok(self.0.clone())
    }
}

impl From<Vec<String>> for ColumnSpec {
    fn from(names: Vec<String>) -> Self {
        ColumnSpec(names)
    }
}

/// Unfitted branch transformer.
#[derive(Clone, Debug)]
pub enum ColumnTransformerStep {
    /// Numeric pipeline over `f64` columns (missing cells become NaN).
    Numeric(Pipeline),
    /// Categorical pipeline over label columns.
    Categorical(CategoricalPipeline),
}

/// Fitted branch transformer.
#[derive(Clone, Debug)]
pub enum FittedColumnTransformerStep {
    Numeric(FittedPipeline),
    Categorical(FittedCategoricalPipeline),
}

impl ColumnTransformerStep {
    fn fit(
        &self,
        frame: &DataFrame,
        columns: &[String],
    ) -> Result<FittedColumnTransformerStep, PreprocessingError> {
        match self {
            ColumnTransformerStep::Numeric(p) => p
                .fit(&frame.numeric_matrix(columns)?)
                .map(FittedColumnTransformerStep::Numeric),
            ColumnTransformerStep::Categorical(p) => p
                .fit(&frame.categorical_matrix(columns)?)
                .map(FittedColumnTransformerStep::Categorical),
        }
    }
}

impl FittedColumnTransformerStep {
    /// Transform the named columns of `frame`.
    fn transform(
        &self,
        frame: &DataFrame,
        columns: &[String],
    ) -> Result<Array2<f64>, PreprocessingError> {
        match self {
            FittedColumnTransformerStep::Numeric(p) => p.transform(&frame.numeric_matrix(columns)?),
            FittedColumnTransformerStep::Categorical(p) => {
                p.transform(&frame.categorical_matrix(columns)?)
            }
        }
    }

    /// Get the step name.
    fn step_name(&self) -> &'static str {
        match self {
            FittedColumnTransformerStep::Numeric(_) => "Pipeline",
            FittedColumnTransformerStep::Categorical(_) => "CategoricalPipeline",
        }
    }

    fn n_features_in(&self) -> usize {
        match self {
            FittedColumnTransformerStep::Numeric(p) => p.n_features_in(),
            FittedColumnTransformerStep::Categorical(p) => p.n_features_in(),
        }
    }

    /// Get the number of output features.
    fn n_features_out(&self) -> usize {
        match self {
            FittedColumnTransformerStep::Numeric(p) => p.n_features_out(),
            FittedColumnTransformerStep::Categorical(p) => p.n_features_out(),
        }
    }

    fn feature_names_out(
        &self,
        branch: &str,
        columns: &[String],
    ) -> Result<Vec<String>, PreprocessingError> {
        let names = match self {
            FittedColumnTransformerStep::Numeric(_) => columns.to_vec(),
            FittedColumnTransformerStep::Categorical(p) => p.feature_names_out(columns)?,
        };
        Ok(names
            .into_iter()
            .map(|name| format!("{branch}__{name}"))
            .collect())
    }

    fn extract_params(&self) -> StepParams {
        match self {
            FittedColumnTransformerStep::Numeric(p) => StepParams::Numeric(p.extract_params()),
            FittedColumnTransformerStep::Categorical(p) => {
                StepParams::Categorical(p.extract_params())
            }
        }
    }

    fn from_params(params: StepParams) -> Result<Self, PreprocessingError> {
        match params {
            StepParams::Numeric(p) => {
                FittedPipeline::from_params(p).map(FittedColumnTransformerStep::Numeric)
            }
            StepParams::Categorical(p) => FittedCategoricalPipeline::from_params(p)
                .map(FittedColumnTransformerStep::Categorical),
        }
    }
}

/// ColumnTransformer applies different pipelines to different columns.
///
/// Branches run in the order they were added, and their outputs are
/// concatenated horizontally. Columns not named by any branch are dropped.
/// Columns are looked up by name on every call, so a frame passed to
/// `transform` may order its columns differently from the training frame.
///
/// # Example
/// ```
/// use score_prep::dataset::DataFrame;
/// use score_prep::preprocessing::{
///     CategoricalImputer, CategoricalPipeline, ColumnSpec, ColumnTransformer,
///     FittedTransformer, ImputeStrategy, OneHotEncoder, Pipeline, SimpleImputer,
///     StandardScaler, Transformer,
/// };
///
/// let ct = ColumnTransformer::new()
///     .add_numeric(
///         "num",
///         Pipeline::new()
///             .add_simple_imputer(SimpleImputer::new(ImputeStrategy::Median))
///             .add_standard_scaler(StandardScaler::new()),
///         ColumnSpec::names(&["reading_score"]),
///     )
///     .add_categorical(
///         "cat",
///         CategoricalPipeline::new()
///             .add_imputer(CategoricalImputer::most_frequent())
///             .add_one_hot_encoder(OneHotEncoder::new()),
///         ColumnSpec::names(&["lunch"]),
///     );
///
/// let frame = DataFrame::from_rows(
///     &["lunch", "reading_score"],
///     &[["standard", "72"], ["free/reduced", "90"], ["", "95"]],
/// ).unwrap();
///
/// let fitted = ct.fit(&frame).unwrap();
/// assert_eq!(fitted.transform(&frame).unwrap().ncols(), 3);
/// assert_eq!(
///     fitted.feature_names_out().unwrap(),
///     vec!["num__reading_score", "cat__lunch_free/reduced", "cat__lunch_standard"],
/// );
/// ```
#[derive(Clone, Debug, Default)]
pub struct ColumnTransformer {
    steps: Vec<(String, ColumnSpec, ColumnTransformerStep)>,
}

impl ColumnTransformer {
    /// Create a new empty ColumnTransformer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a numeric pipeline branch.
    pub fn add_numeric(self, name: &str, pipeline: Pipeline, spec: ColumnSpec) -> Self {
        self.add(name, ColumnTransformerStep::Numeric(pipeline), spec)
    }

    /// Add a categorical pipeline branch.
    pub fn add_categorical(
        self,
        name: &str,
        pipeline: CategoricalPipeline,
        spec: ColumnSpec,
    ) -> Self {
        self.add(name, ColumnTransformerStep::Categorical(pipeline), spec)
    }

    /// Add a generic step.
    pub fn add(mut self, name: &str, step: ColumnTransformerStep, spec: ColumnSpec) -> Self {
        self.steps.push((name.to_string(), spec, step));
        self
    }

    /// Get the number of branches.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Serializable parameters of a fitted branch transformer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StepParams {
    Numeric(PipelineParams),
    Categorical(CategoricalPipelineParams),
}

/// Serializable parameters for one fitted branch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BranchParams {
    /// Branch name, used as the output feature name prefix.
    pub name: String,
    /// Column names this branch reads.
    pub columns: Vec<String>,
    pub step: StepParams,
}

/// Serializable parameters for a fitted ColumnTransformer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnTransformerParams {
    /// Number of input features.
    pub n_features_in: usize,
    /// Number of output features.
    pub n_features_out: usize,
    /// Branches in execution order.
    pub branches: Vec<BranchParams>,
}

#[derive(Clone, Debug)]
struct FittedBranch {
    name: String,
    columns: Vec<String>,
    step: FittedColumnTransformerStep,
}

/// Fitted ColumnTransformer ready for inference.
#[derive(Clone, Debug)]
pub struct FittedColumnTransformer {
    branches: Vec<FittedBranch>,
    /// Number of columns in the training frame.
    n_features_in: usize,
    n_features_out: usize,
}

impl FittedColumnTransformer {
    /// Get the number of output features.
    pub fn n_features_out(&self) -> usize {
        self.n_features_out
    }

    /// Branch names with the columns each one reads.
    pub fn step_names(&self) -> Vec<(&str, &[String])> {
        self.branches
            .iter()
            .map(|b| (b.name.as_str(), b.columns.as_slice()))
            .collect()
    }

    /// Transformer kind per branch (`Pipeline` or `CategoricalPipeline`).
    pub fn step_kinds(&self) -> Vec<&'static str> {
        self.branches.iter().map(|b| b.step.step_name()).collect()
    }

    /// Every column read by some branch, in first-use order.
    pub fn required_columns(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.branches
            .iter()
            .flat_map(|b| b.columns.iter().map(String::as_str))
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Output column names.
    ///
    /// Numeric columns are named `<branch>__<column>`, one-hot columns
    /// `<branch>__<column>_<category>`.
    pub fn feature_names_out(&self) -> Result<Vec<String>, PreprocessingError> {
        let mut names = Vec::with_capacity(self.n_features_out);
        for branch in &self.branches {
            names.extend(branch.step.feature_names_out(&branch.name, &branch.columns)?);
        }
        Ok(names)
    }
}

impl Transformer for ColumnTransformer {
    type Input = DataFrame;
    type Output = Array2<f64>;
    type Params = ColumnTransformerParams;
    type Fitted = FittedColumnTransformer;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if data.n_rows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit ColumnTransformer on empty data".to_string(),
            ));
        }

        if self.steps.is_empty() {
            return Err(PreprocessingError::InvalidParameter(
                "Cannot fit empty ColumnTransformer".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut branches = Vec::with_capacity(self.steps.len());
        let mut n_features_out = 0;

        for (name, spec, step) in &self.steps {
            if !seen.insert(name.as_str()) {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "Duplicate ColumnTransformer branch name {name:?}"
                )));
            }

            let columns = spec.resolve(data)?;
            let fitted = step.fit(data, &columns)?;
            debug!(
                branch = %name,
                columns = columns.len(),
                outputs = fitted.n_features_out(),
                "fitted column transformer branch"
            );

            n_features_out += fitted.n_features_out();
            branches.push(FittedBranch {
                name: name.clone(),
                columns,
                step: fitted,
            });
        }

        Ok(FittedColumnTransformer {
            branches,
            n_features_in: data.n_cols(),
            n_features_out,
        })
    }
}

impl FittedTransformer for FittedColumnTransformer {
    type Input = DataFrame;
    type Output = Array2<f64>;
    type Params = ColumnTransformerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        data.require_columns(&self.required_columns())?;

        if data.n_rows() == 0 {
            return Ok(Array2::zeros((0, self.n_features_out)));
        }

        // Transform each branch and collect outputs
        let outputs = self
            .branches
            .iter()
            .map(|b| b.step.transform(data, &b.columns))
            .collect::<Result<Vec<_>, _>>()?;

        let views: Vec<ArrayView2<f64>> = outputs.iter().map(|o| o.view()).collect();
        concatenate(Axis(1), &views).map_err(|e| PreprocessingError::InvalidShape {
            expected: format!("({}, {})", data.n_rows(), self.n_features_out),
            got: e.to_string(),
        })
    }

    fn inverse_transform(&self, _data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        Err(PreprocessingError::InvalidParameter(
            "ColumnTransformer does not support inverse_transform".to_string(),
        ))
    }

    fn extract_params(&self) -> Self::Params {
        ColumnTransformerParams {
            n_features_in: self.n_features_in,
            n_features_out: self.n_features_out,
            branches: self
                .branches
                .iter()
                .map(|b| BranchParams {
                    name: b.name.clone(),
                    columns: b.columns.clone(),
                    step: b.step.extract_params(),
                })
                .collect(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        let mut branches = Vec::with_capacity(params.branches.len());
        for branch in params.branches {
            let step = FittedColumnTransformerStep::from_params(branch.step)?;
            if step.n_features_in() != branch.columns.len() {
                return Err(PreprocessingError::FeatureMismatch {
                    expected_features: branch.columns.len(),
                    got_features: step.n_features_in(),
                });
            }
            branches.push(FittedBranch {
                name: branch.name,
                columns: branch.columns,
                step,
            });
        }

        if branches.is_empty() {
            return Err(PreprocessingError::InvalidParameter(
                "ColumnTransformer params contain no branches".to_string(),
            ));
        }

        let n_features_out: usize = branches.iter().map(|b| b.step.n_features_out()).sum();
        if n_features_out != params.n_features_out {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: params.n_features_out,
                got_features: n_features_out,
            });
        }

        Ok(Self {
            branches,
            n_features_in: params.n_features_in,
            n_features_out,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetError;
    use crate::preprocessing::encoding::{HandleUnknown, OneHotEncoder};
    use crate::preprocessing::imputation::{CategoricalImputer, ImputeStrategy, SimpleImputer};
    use crate::preprocessing::scaling::StandardScaler;
    use approx::assert_abs_diff_eq;

    fn train_frame() -> DataFrame {
        DataFrame::from_rows(
            &["gender", "lunch", "reading_score", "writing_score", "math_score"],
            &[
                ["female", "standard", "72", "74", "71"],
                ["male", "free/reduced", "90", "", "69"],
                ["female", "", "95", "93", "90"],
                ["male", "standard", "", "44", "47"],
            ],
        )
        .unwrap()
    }

    fn num_pipeline() -> Pipeline {
        Pipeline::new()
            .add_simple_imputer(SimpleImputer::new(ImputeStrategy::Median))
            .add_standard_scaler(StandardScaler::new())
    }

    fn cat_pipeline(handle_unknown: HandleUnknown) -> CategoricalPipeline {
        CategoricalPipeline::new()
            .add_imputer(CategoricalImputer::most_frequent())
            .add_one_hot_encoder(OneHotEncoder::new().with_handle_unknown(handle_unknown))
            .add_standard_scaler(StandardScaler::new().with_mean(false))
    }

    fn preprocessor(handle_unknown: HandleUnknown) -> ColumnTransformer {
        ColumnTransformer::new()
            .add_numeric(
                "num_pipeline",
                num_pipeline(),
                ColumnSpec::names(&["writing_score", "reading_score"]),
            )
            .add_categorical(
                "cat_pipeline",
                cat_pipeline(handle_unknown),
                ColumnSpec::names(&["gender", "lunch"]),
            )
    }

    #[test]
    fn test_column_transformer_shape_and_order() {
        let frame = train_frame();
        let fitted = preprocessor(HandleUnknown::Error).fit(&frame).unwrap();

        assert_eq!(fitted.n_features_in(), 5);
        assert_eq!(fitted.n_features_out(), 2 + 2 + 2);

        let out = fitted.transform(&frame).unwrap();
        assert_eq!(out.dim(), (4, 6));
        assert!(out.iter().all(|v| v.is_finite()));

        // Numeric block is centred, categorical block is not
        for col in 0..2 {
            assert_abs_diff_eq!(out.column(col).mean().unwrap(), 0.0, epsilon = 1e-12);
        }
        for col in 2..6 {
            assert!(out.column(col).iter().all(|&v| v >= 0.0));
        }
    }

    #[test]
    fn test_column_transformer_feature_names() {
        let fitted = preprocessor(HandleUnknown::Error)
            .fit(&train_frame())
            .unwrap();
        assert_eq!(
            fitted.feature_names_out().unwrap(),
            vec![
                "num_pipeline__writing_score",
                "num_pipeline__reading_score",
                "cat_pipeline__gender_female",
                "cat_pipeline__gender_male",
                "cat_pipeline__lunch_free/reduced",
                "cat_pipeline__lunch_standard",
            ]
        );
        assert_eq!(fitted.step_kinds(), vec!["Pipeline", "CategoricalPipeline"]);
        let names: Vec<&str> = fitted.step_names().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["num_pipeline", "cat_pipeline"]);
    }

    #[test]
    fn test_column_transformer_matches_columns_by_name() {
        let frame = train_frame();
        let fitted = preprocessor(HandleUnknown::Error).fit(&frame).unwrap();

        let reordered = frame
            .select(&["math_score", "writing_score", "lunch", "gender", "reading_score"])
            .unwrap();
        assert_eq!(
            fitted.transform(&reordered).unwrap(),
            fitted.transform(&frame).unwrap()
        );
    }

    #[test]
    fn test_column_transformer_missing_column() {
        let frame = train_frame();
        let fitted = preprocessor(HandleUnknown::Error).fit(&frame).unwrap();

        let without_lunch = frame.drop_column("lunch").unwrap();
        let result = fitted.transform(&without_lunch);
        assert!(matches!(
            result,
            Err(PreprocessingError::Dataset(DatasetError::MissingColumn(ref c))) if c == "lunch"
        ));

        let result = preprocessor(HandleUnknown::Error).fit(&without_lunch);
        assert!(matches!(
            result,
            Err(PreprocessingError::Dataset(DatasetError::MissingColumn(_)))
        ));
    }

    #[test]
    fn test_column_transformer_unknown_category() {
        let frame = train_frame();
        let test = DataFrame::from_rows(
            &["gender", "lunch", "reading_score", "writing_score"],
            &[["female", "premium", "80", "81"]],
        )
        .unwrap();

        let strict = preprocessor(HandleUnknown::Error).fit(&frame).unwrap();
        assert!(matches!(
            strict.transform(&test),
            Err(PreprocessingError::UnknownCategory { .. })
        ));

        let lenient = preprocessor(HandleUnknown::Ignore).fit(&frame).unwrap();
        let out = lenient.transform(&test).unwrap();
        assert_eq!(out[[0, 4]], 0.0);
        assert_eq!(out[[0, 5]], 0.0);
    }

    #[test]
    fn test_column_transformer_missing_spec_column() {
        let result = ColumnTransformer::new()
            .add_numeric("num", num_pipeline(), ColumnSpec::names(&["race_ethnicity"]))
            .fit(&train_frame());
        assert!(matches!(
            result,
            Err(PreprocessingError::Dataset(DatasetError::MissingColumn(name))) if name == "race_ethnicity"
        ));
    }

    #[test]
    fn test_column_transformer_rejects_bad_config() {
        let frame = train_frame();
        assert!(ColumnTransformer::new().fit(&frame).is_err());

        let duplicate = ColumnTransformer::new()
            .add_numeric("num", num_pipeline(), ColumnSpec::names(&["reading_score"]))
            .add_numeric("num", num_pipeline(), ColumnSpec::names(&["writing_score"]));
        assert!(matches!(
            duplicate.fit(&frame),
            Err(PreprocessingError::InvalidParameter(_))
        ));

        let empty_spec = ColumnTransformer::new().add_numeric(
            "num",
            num_pipeline(),
            ColumnSpec::from(Vec::<String>::new()),
        );
        assert!(empty_spec.fit(&frame).is_err());
    }

    #[test]
    fn test_column_transformer_empty_data() {
        let empty = DataFrame::from_rows::<[&str; 2], &str>(&["gender", "lunch"], &[]).unwrap();
        let result = preprocessor(HandleUnknown::Error).fit(&empty);
        assert!(matches!(result, Err(PreprocessingError::EmptyData(_))));
    }

    #[test]
    fn test_column_transformer_zero_row_transform() {
        let frame = train_frame();
        let fitted = preprocessor(HandleUnknown::Error).fit(&frame).unwrap();
        let empty = DataFrame::from_rows::<[&str; 4], &str>(
            &["gender", "lunch", "reading_score", "writing_score"],
            &[],
        )
        .unwrap();
        assert_eq!(fitted.transform(&empty).unwrap().dim(), (0, 6));
    }

    #[test]
    fn test_column_transformer_inverse_not_supported() {
        let frame = train_frame();
        let fitted = preprocessor(HandleUnknown::Error).fit(&frame).unwrap();
        let out = fitted.transform(&frame).unwrap();
        assert!(matches!(
            fitted.inverse_transform(&out),
            Err(PreprocessingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_column_transformer_params_roundtrip() {
        let frame = train_frame();
        let fitted = preprocessor(HandleUnknown::Ignore).fit(&frame).unwrap();

        let params = fitted.extract_params();
        assert_eq!(params.branches.len(), 2);
        assert_eq!(params.n_features_out, 6);

        let restored = FittedColumnTransformer::from_params(params).unwrap();
        assert_eq!(
            restored.feature_names_out().unwrap(),
            fitted.feature_names_out().unwrap()
        );
        assert_eq!(
            restored.transform(&frame).unwrap(),
            fitted.transform(&frame).unwrap()
        );
    }

    #[test]
    fn test_column_transformer_from_params_checks_width() {
        let fitted = preprocessor(HandleUnknown::Error)
            .fit(&train_frame())
            .unwrap();
        let mut params = fitted.extract_params();
        params.n_features_out += 1;
        assert!(matches!(
            FittedColumnTransformer::from_params(params),
            Err(PreprocessingError::FeatureMismatch { .. })
        ));
    }

    #[test]
    fn test_column_transformer_save_load_file() {
        let frame = train_frame();
        let fitted = preprocessor(HandleUnknown::Error).fit(&frame).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifacts").join("preprocessor.bin");
        fitted.save_to_file(&path).unwrap();

        let loaded = FittedColumnTransformer::load_from_file(&path).unwrap();
        assert_eq!(
            loaded.transform(&frame).unwrap(),
            fitted.transform(&frame).unwrap()
        );
    }
}

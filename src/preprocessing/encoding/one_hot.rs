//! One-hot encoding for categorical features.
//!
//! Transforms string categories to one-hot (dummy) encoded vectors.

use crate::dataset::CategoryMatrix;
use crate::preprocessing::encoding::HandleUnknown;
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One-hot encoder for categorical features.
///
/// Each input column is treated as a categorical feature, and the encoder
/// learns the distinct values (categories) present in each column during
/// fitting. Categories are kept in lexicographic order, and output columns
/// are grouped per input column in input order.
///
/// # Example
/// ```
/// use ndarray::array;
/// use score_prep::preprocessing::{FittedTransformer, OneHotEncoder, Transformer};
///
/// let data = array![
///     [Some("standard".to_string())],
///     [Some("free/reduced".to_string())],
/// ];
///
/// let fitted = OneHotEncoder::new().fit(&data).unwrap();
/// let encoded = fitted.transform(&data).unwrap();
/// // categories: ["free/reduced", "standard"]
/// assert_eq!(encoded, array![[0.0, 1.0], [1.0, 0.0]]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct OneHotEncoder {
    /// How to handle unknown categories during transform.
    handle_unknown: HandleUnknown,
}

impl OneHotEncoder {
    /// Create a new OneHotEncoder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the strategy for handling unknown categories.
    pub fn with_handle_unknown(mut self, strategy: HandleUnknown) -> Self {
        self.handle_unknown = strategy;
        self
    }

    pub fn handle_unknown(&self) -> HandleUnknown {
        self.handle_unknown
    }
}

/// Serializable parameters for a fitted OneHotEncoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoderParams {
    /// Categories (sorted distinct values) for each input column.
    pub categories_: Vec<Vec<String>>,
    /// Number of categories per column.
    pub n_values_: Vec<usize>,
    /// Total number of output features.
    pub n_features_out: usize,
    /// Number of input features.
    pub n_features_in: usize,
    /// Handle unknown strategy.
    pub handle_unknown: HandleUnknown,
}

/// Fitted OneHotEncoder ready for inference.
#[derive(Clone, Debug)]
pub struct FittedOneHotEncoder {
    categories_: Vec<Vec<String>>,
    n_values_: Vec<usize>,
    /// Sum of `n_values_`.
    n_features_out: usize,
    n_features_in: usize,
    handle_unknown: HandleUnknown,
}

impl FittedOneHotEncoder {
    /// Get the categories learned for each feature.
    pub fn categories(&self) -> &[Vec<String>] {
        &self.categories_
    }

    /// Get the number of output features.
    pub fn n_features_out(&self) -> usize {
        self.n_features_out
    }

    /// Get the number of categories per input feature.
    pub fn n_values(&self) -> &[usize] {
        &self.n_values_
    }

    pub fn handle_unknown(&self) -> HandleUnknown {
        self.handle_unknown
    }

    /// Output column names, `<input>_<category>` for every category of every input.
    ///
    /// # Errors
    /// [`PreprocessingError::FeatureMismatch`] if `input_names` has the wrong length.
    pub fn feature_names_out<S: AsRef<str>>(
        &self,
        input_names: &[S],
    ) -> Result<Vec<String>, PreprocessingError> {
        if input_names.len() != self.n_features_in {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features_in,
                got_features: input_names.len(),
            });
        }

        Ok(input_names
            .iter()
            .zip(&self.categories_)
            .flat_map(|(name, cats)| {
                let name = name.as_ref();
                cats.iter().map(move |cat| format!("{name}_{cat}"))
            })
            .collect())
    }
}

impl Transformer for OneHotEncoder {
    type Input = CategoryMatrix;
    type Output = Array2<f64>;
    type Params = OneHotEncoderParams;
    type Fitted = FittedOneHotEncoder;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if data.nrows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit OneHotEncoder on empty data".to_string(),
            ));
        }

        let mut categories_: Vec<Vec<String>> = Vec::with_capacity(data.ncols());
        for (col, column) in data.axis_iter(Axis(1)).enumerate() {
            let mut distinct = BTreeSet::new();
            for (row, cell) in column.iter().enumerate() {
                let value = cell.as_deref().ok_or_else(|| {
                    PreprocessingError::MissingValues(format!(
                        "OneHotEncoder found a missing value at ({row}, {col}); impute before encoding"
                    ))
                })?;
                distinct.insert(value);
            }
            categories_.push(distinct.into_iter().map(str::to_string).collect());
        }

        let n_values_: Vec<usize> = categories_.iter().map(Vec::len).collect();
        let n_features_out = n_values_.iter().sum();

        Ok(FittedOneHotEncoder {
            categories_,
            n_values_,
            n_features_out,
            n_features_in: data.ncols(),
            handle_unknown: self.handle_unknown,
        })
    }
}

impl FittedTransformer for FittedOneHotEncoder {
    type Input = CategoryMatrix;
    type Output = Array2<f64>;
    type Params = OneHotEncoderParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let (rows, cols) = data.dim();

        if cols != self.n_features_in {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features_in,
                got_features: cols,
            });
        }

        let mut result = Array2::<f64>::zeros((rows, self.n_features_out));

        for (row, values) in data.axis_iter(Axis(0)).enumerate() {
            let mut out_col_offset = 0;
            for (col, cell) in values.iter().enumerate() {
                let value = cell.as_deref().ok_or_else(|| {
                    PreprocessingError::MissingValues(format!(
                        "OneHotEncoder found a missing value at ({row}, {col}); impute before encoding"
                    ))
                })?;

                match self.categories_[col].binary_search_by(|c| c.as_str().cmp(value)) {
                    Ok(idx) => result[[row, out_col_offset + idx]] = 1.0,
                    Err(_) if self.handle_unknown == HandleUnknown::Error => {
                        return Err(PreprocessingError::UnknownCategory {
                            column: col,
                            value: value.to_string(),
                        });
                    }
                    // With Ignore, leave as zeros
                    Err(_) => {}
                }

                out_col_offset += self.n_values_[col];
            }
        }

        Ok(result)
    }

    /// Map each one-hot block back to its category.
    ///
    /// A block with no active position (an ignored unknown category) becomes `None`.
    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        let (rows, out_cols) = data.dim();

        if out_cols != self.n_features_out {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features_out,
                got_features: out_cols,
            });
        }

        let mut result: CategoryMatrix = Array2::from_elem((rows, self.n_features_in), None);

        for (row, encoded) in data.axis_iter(Axis(0)).enumerate() {
            let mut in_col_offset = 0;
            for (col, cats) in self.categories_.iter().enumerate() {
                let block = encoded.slice(ndarray::s![in_col_offset..in_col_offset + cats.len()]);
                result[[row, col]] = block
                    .iter()
                    .position(|&v| v > 0.5)
                    .map(|idx| cats[idx].clone());
                in_col_offset += cats.len();
            }
        }

        Ok(result)
    }

    fn extract_params(&self) -> Self::Params {
        OneHotEncoderParams {
            categories_: self.categories_.clone(),
            n_values_: self.n_values_.clone(),
            n_features_out: self.n_features_out,
            n_features_in: self.n_features_in,
            handle_unknown: self.handle_unknown,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        let counts: Vec<usize> = params.categories_.iter().map(Vec::len).collect();
        if params.categories_.len() != params.n_features_in
            || counts != params.n_values_
            || counts.iter().sum::<usize>() != params.n_features_out
        {
            return Err(PreprocessingError::InvalidParameter(
                "OneHotEncoder params have inconsistent category counts".to_string(),
            ));
        }
        if params
            .categories_
            .iter()
            .any(|cats| cats.windows(2).any(|w| w[0] >= w[1]))
        {
            return Err(PreprocessingError::InvalidParameter(
                "OneHotEncoder categories must be sorted and distinct".to_string(),
            ));
        }

        Ok(FittedOneHotEncoder {
            categories_: params.categories_,
            n_values_: params.n_values_,
            n_features_out: params.n_features_out,
            n_features_in: params.n_features_in,
            handle_unknown: params.handle_unknown,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn cell(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    fn gender_and_lunch() -> CategoryMatrix {
        array![
            [cell("female"), cell("standard")],
            [cell("male"), cell("free/reduced")],
            [cell("female"), cell("standard")],
        ]
    }

    #[test]
    fn test_one_hot_encoder_single_column() {
        let data = array![[cell("group C")], [cell("group A")], [cell("group B")]];

        let fitted = OneHotEncoder::new().fit(&data).unwrap();

        assert_eq!(fitted.n_features_in(), 1);
        assert_eq!(fitted.n_features_out(), 3);
        assert_eq!(fitted.categories()[0], vec!["group A", "group B", "group C"]);

        let transformed = fitted.transform(&data).unwrap();
        assert_eq!(
            transformed,
            array![[0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
        );
    }

    #[test]
    fn test_one_hot_encoder_multiple_columns() {
        let data = gender_and_lunch();
        let fitted = OneHotEncoder::new().fit(&data).unwrap();

        assert_eq!(fitted.n_values(), &[2, 2]);
        let transformed = fitted.transform(&data).unwrap();
        // [female, male | free/reduced, standard]
        assert_eq!(transformed.row(0).to_vec(), vec![1.0, 0.0, 0.0, 1.0]);
        assert_eq!(transformed.row(1).to_vec(), vec![0.0, 1.0, 1.0, 0.0]);
        for row in transformed.axis_iter(Axis(0)) {
            assert_eq!(row.sum(), 2.0);
        }
    }

    #[test]
    fn test_one_hot_encoder_unknown_category_error() {
        let fitted = OneHotEncoder::new().fit(&gender_and_lunch()).unwrap();
        let test = array![[cell("nonbinary"), cell("standard")]];

        let result = fitted.transform(&test);
        assert!(matches!(
            result,
            Err(PreprocessingError::UnknownCategory { column: 0, ref value }) if value == "nonbinary"
        ));
    }

    #[test]
    fn test_one_hot_encoder_unknown_category_ignore() {
        let fitted = OneHotEncoder::new()
            .with_handle_unknown(HandleUnknown::Ignore)
            .fit(&gender_and_lunch())
            .unwrap();
        let test = array![[cell("nonbinary"), cell("standard")]];

        let transformed = fitted.transform(&test).unwrap();
        assert_eq!(transformed, array![[0.0, 0.0, 0.0, 1.0]]);

        let restored = fitted.inverse_transform(&transformed).unwrap();
        assert_eq!(restored, array![[None, cell("standard")]]);
    }

    #[test]
    fn test_one_hot_encoder_missing_value_rejected() {
        let data = array![[cell("female")], [None]];
        assert!(matches!(
            OneHotEncoder::new().fit(&data),
            Err(PreprocessingError::MissingValues(_))
        ));

        let fitted = OneHotEncoder::new().fit(&array![[cell("female")]]).unwrap();
        assert!(matches!(
            fitted.transform(&data),
            Err(PreprocessingError::MissingValues(_))
        ));
    }

    #[test]
    fn test_one_hot_encoder_inverse_transform() {
        let data = gender_and_lunch();
        let fitted = OneHotEncoder::new().fit(&data).unwrap();

        let transformed = fitted.transform(&data).unwrap();
        let restored = fitted.inverse_transform(&transformed).unwrap();
        assert_eq!(restored, data);
    }

    #[test]
    fn test_one_hot_encoder_feature_names_out() {
        let fitted = OneHotEncoder::new().fit(&gender_and_lunch()).unwrap();
        let names = fitted.feature_names_out(&["gender", "lunch"]).unwrap();
        assert_eq!(
            names,
            vec![
                "gender_female",
                "gender_male",
                "lunch_free/reduced",
                "lunch_standard"
            ]
        );
        assert!(fitted.feature_names_out(&["gender"]).is_err());
    }

    #[test]
    fn test_one_hot_encoder_empty_transform() {
        let fitted = OneHotEncoder::new().fit(&gender_and_lunch()).unwrap();
        let empty: CategoryMatrix = Array2::from_elem((0, 2), None);
        assert_eq!(fitted.transform(&empty).unwrap().dim(), (0, 4));
    }

    #[test]
    fn test_one_hot_encoder_empty_fit() {
        let empty: CategoryMatrix = Array2::from_elem((0, 1), None);
        assert!(matches!(
            OneHotEncoder::new().fit(&empty),
            Err(PreprocessingError::EmptyData(_))
        ));
    }

    #[test]
    fn test_one_hot_encoder_feature_mismatch() {
        let fitted = OneHotEncoder::new().fit(&gender_and_lunch()).unwrap();
        let result = fitted.transform(&array![[cell("female")]]);
        assert!(matches!(
            result,
            Err(PreprocessingError::FeatureMismatch {
                expected_features: 2,
                got_features: 1
            })
        ));
    }

    #[test]
    fn test_one_hot_encoder_params_roundtrip() {
        let data = gender_and_lunch();
        let fitted = OneHotEncoder::new()
            .with_handle_unknown(HandleUnknown::Ignore)
            .fit(&data)
            .unwrap();

        let restored = FittedOneHotEncoder::from_params(fitted.extract_params()).unwrap();
        assert_eq!(restored.categories(), fitted.categories());
        assert_eq!(restored.handle_unknown(), HandleUnknown::Ignore);
        assert_eq!(
            restored.transform(&data).unwrap(),
            fitted.transform(&data).unwrap()
        );
    }

    #[test]
    fn test_one_hot_encoder_from_params_rejects_unsorted() {
        let params = OneHotEncoderParams {
            categories_: vec![vec!["male".to_string(), "female".to_string()]],
            n_values_: vec![2],
            n_features_out: 2,
            n_features_in: 1,
            handle_unknown: HandleUnknown::Error,
        };
        assert!(FittedOneHotEncoder::from_params(params).is_err());
    }
}

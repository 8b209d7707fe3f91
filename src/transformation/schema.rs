//! Column schema of the student exam-scores dataset.

use crate::preprocessing::PreprocessingError;
use std::collections::HashSet;

/// Numeric feature columns, routed to the numeric branch.
pub const NUMERICAL_COLUMNS: [&str; 2] = ["writing_score", "reading_score"];

/// Categorical feature columns, routed to the categorical branch.
pub const CATEGORICAL_COLUMNS: [&str; 5] = [
    "gender",
    "race_ethnicity",
    "parental_level_of_education",
    "lunch",
    "test_preparation_course",
];

/// Regression target, appended raw as the last output column.
pub const TARGET_COLUMN: &str = "math_score";

/// Branch name of the numeric pipeline.
pub const NUM_PIPELINE: &str = "num_pipeline";

/// Branch name of the categorical pipeline.
pub const CAT_PIPELINE: &str = "cat_pipeline";

/// Column groups a preprocessor is built from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    pub numerical: Vec<String>,
    pub categorical: Vec<String>,
    pub target: String,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            numerical: NUMERICAL_COLUMNS.iter().map(|c| c.to_string()).collect(),
            categorical: CATEGORICAL_COLUMNS.iter().map(|c| c.to_string()).collect(),
            target: TARGET_COLUMN.to_string(),
        }
    }
}

impl Schema {
    /// Feature columns followed by the target: every column a table must carry.
    pub fn required_columns(&self) -> Vec<&str> {
        self.numerical
            .iter()
            .chain(&self.categorical)
            .map(String::as_str)
            .chain(std::iter::once(self.target.as_str()))
            .collect()
    }

    /// Check that both groups are non-empty and that no column appears twice
    /// or doubles as the target.
    pub fn validate(&self) -> Result<(), PreprocessingError> {
        if self.numerical.is_empty() || self.categorical.is_empty() {
            return Err(PreprocessingError::InvalidParameter(
                "schema needs at least one numerical and one categorical column".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for column in self.required_columns() {
            if !seen.insert(column) {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "column {column:?} is listed more than once in the schema"
                )));
            }
        }
        Ok(())
    }
}

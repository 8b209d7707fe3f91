//! # score-prep
//!
//! Column preprocessing for the student exam-scores dataset: a two-branch
//! transformer that is fitted on the training split, applied to both splits
//! and persisted for reuse at inference time.
//!
//! ## Core Design Principles
//!
//! - **Stateful Type Safety**: transformers carry their fitted state in the type
//!   system (`Transformer` vs `FittedTransformer`), so an unfitted pipeline
//!   cannot transform data.
//! - **Training/Inference Separation**: fitted transformers hold only learned
//!   statistics, and persist as plain serde structures.
//! - **Fit on train only**: test data never influences learned medians,
//!   categories or scale factors.
//!
//! ## Quick Start
//!
//! ```rust
//! use score_prep::dataset::DataFrame;
//! use score_prep::transformation::{DataTransformation, DataTransformationConfig};
//!
//! let header = [
//!     "gender", "race_ethnicity", "parental_level_of_education", "lunch",
//!     "test_preparation_course", "math_score", "reading_score", "writing_score",
//! ];
//! let train = DataFrame::from_rows(&header, &[
//!     ["female", "group B", "bachelor's degree", "standard", "none", "72", "72", "74"],
//!     ["male", "group A", "some college", "free/reduced", "completed", "47", "57", ""],
//! ]).unwrap();
//!
//! let dir = tempfile::tempdir().unwrap();
//! let config = DataTransformationConfig::default()
//!     .with_preprocessor_path(dir.path().join("preprocessor.bin"));
//!
//! let output = DataTransformation::new(config)
//!     .run_on_frames(&train, &train)
//!     .unwrap();
//! assert_eq!(output.train.ncols(), output.feature_names.len() + 1);
//! ```
//!
//! ## Module Structure
//!
//! - `dataset`: `DataFrame` and CSV reading/writing
//! - `preprocessing`: imputers, encoder, scaler, pipelines and the column transformer
//! - `serialization`: parameter encoding and artifact file I/O
//! - `transformation`: the train/test driver, its configuration and errors

/// Tabular data loading and column extraction.
pub mod dataset;

/// Data preprocessing transformers.
pub mod preprocessing;

/// Transformer persistence.
pub mod serialization;

/// Train/test transformation driver.
pub mod transformation;

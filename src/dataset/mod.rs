//! Tabular data loading for preprocessing workloads.
//!
//! This module provides [`DataFrame`], a small named-column table whose cells
//! are kept as optional strings until a transformer asks for them as numbers
//! or as categories, and the CSV reader/writer that feeds it.
//!
//! # Core Concepts
//!
//! - **Cell**: `Option<String>`; `None` marks a missing value. The markers
//!   recognised as missing are listed in [`MISSING_MARKERS`].
//! - **Numeric matrix**: `Array2<f64>` with `NaN` for missing cells.
//! - **Category matrix**: [`CategoryMatrix`], `Array2<Option<String>>`.
//!
//! # Example
//!
//! ```no_run
//! use score_prep::dataset::DataFrame;
//!
//! let frame = DataFrame::from_csv_path("data/train.csv").unwrap();
//! let scores = frame.numeric_matrix(&["writing_score", "reading_score"]).unwrap();
//! assert_eq!(scores.ncols(), 2);
//! ```

use ndarray::Array2;
use std::path::PathBuf;
use thiserror::Error;

mod frame;
mod io;

pub use self::frame::DataFrame;
pub use self::io::write_matrix_csv;

/// Matrix of categorical cells; `None` marks a missing value.
pub type CategoryMatrix = Array2<Option<String>>;

/// Cell contents treated as missing when loading tables.
pub const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Convert a raw cell into its stored form: trimmed, with missing markers mapped to `None`.
pub(crate) fn parse_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if MISSING_MARKERS.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Error type for loading tables and extracting columns from them.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The file could not be opened or created.
    #[error("cannot access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not well-formed delimited text (ragged rows, bad encoding).
    #[error("malformed CSV in {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    /// Two columns share the same header name.
    #[error("duplicate column {0:?}")]
    DuplicateColumn(String),
    /// A required column is absent.
    #[error("missing column {0:?}")]
    MissingColumn(String),
    /// A cell in a numeric column does not parse as a number.
    #[error("column {column:?}, row {row}: {value:?} is not a number")]
    InvalidNumber {
        column: String,
        row: usize,
        value: String,
    },
    /// A cell that must be present is missing.
    #[error("column {column:?}, row {row}: value is missing")]
    MissingValue { column: String, row: usize },
    /// Cell count does not match the declared shape.
    #[error("invalid table shape: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

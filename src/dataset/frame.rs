//! Named-column table with optional string cells.

use super::{parse_cell, CategoryMatrix, DatasetError};
use ndarray::{Array1, Array2, Axis, ErrorKind, ShapeError};
use std::collections::HashSet;

/// An in-memory table with named columns.
///
/// Cells are stored as `Option<String>` and typed only on extraction, so the
/// same frame serves both the numeric and the categorical branches of a
/// column transformer. A frame is immutable once built; selection methods
/// return new frames.
#[derive(Clone, Debug, PartialEq)]
pub struct DataFrame {
    columns: Vec<String>,
    cells: CategoryMatrix,
}

impl DataFrame {
    /// Build a frame from headers and a `(rows, columns)` cell matrix.
    ///
    /// # Errors
    /// - [`DatasetError::DuplicateColumn`] if a header repeats
    /// - [`DatasetError::Shape`] if the matrix width differs from the header count
    pub fn new(columns: Vec<String>, cells: CategoryMatrix) -> Result<Self, DatasetError> {
        if cells.ncols() != columns.len() {
            return Err(ShapeError::from_kind(ErrorKind::IncompatibleShape).into());
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(DatasetError::DuplicateColumn(name.clone()));
            }
        }

        Ok(Self { columns, cells })
    }

    /// Build a frame from raw string rows, applying the same cell parsing as CSV loading.
    ///
    /// ```
    /// use score_prep::dataset::DataFrame;
    ///
    /// let frame = DataFrame::from_rows(
    ///     &["gender", "reading_score"],
    ///     &[["female", "72"], ["male", ""]],
    /// ).unwrap();
    /// assert_eq!(frame.n_rows(), 2);
    /// assert!(frame.numeric_matrix(&["reading_score"]).unwrap()[[1, 0]].is_nan());
    /// ```
    pub fn from_rows<R, S>(columns: &[&str], rows: &[R]) -> Result<Self, DatasetError>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let n_cols = columns.len();
        let mut cells = Vec::with_capacity(rows.len() * n_cols);
        for row in rows {
            let row = row.as_ref();
            if row.len() != n_cols {
                return Err(ShapeError::from_kind(ErrorKind::IncompatibleShape).into());
            }
            cells.extend(row.iter().map(|cell| parse_cell(cell.as_ref())));
        }

        let cells = Array2::from_shape_vec((rows.len(), n_cols), cells)?;
        Self::new(columns.iter().map(|c| c.to_string()).collect(), cells)
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.cells.nrows()
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.cells.ncols()
    }

    /// Column names in table order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Raw cell matrix.
    pub fn cells(&self) -> &CategoryMatrix {
        &self.cells
    }

    /// Position of a column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Check that every named column is present.
    pub fn require_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<(), DatasetError> {
        self.indices_of(names).map(|_| ())
    }

    fn indices_of<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<usize>, DatasetError> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.column_index(name)
                    .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
            })
            .collect()
    }

    /// New frame holding only the named columns, in the order given.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<DataFrame, DatasetError> {
        let indices = self.indices_of(names)?;
        Self::new(
            indices.iter().map(|&i| self.columns[i].clone()).collect(),
            self.cells.select(Axis(1), &indices),
        )
    }

    /// New frame without the named column.
    pub fn drop_column(&self, name: &str) -> Result<DataFrame, DatasetError> {
        let dropped = self
            .column_index(name)
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))?;
        let keep: Vec<usize> = (0..self.n_cols()).filter(|&i| i != dropped).collect();
        Self::new(
            keep.iter().map(|&i| self.columns[i].clone()).collect(),
            self.cells.select(Axis(1), &keep),
        )
    }

    /// A fully populated numeric column, such as a regression target.
    ///
    /// Unlike [`numeric_matrix`](Self::numeric_matrix), a missing cell is an error.
    pub fn numeric_column(&self, name: &str) -> Result<Array1<f64>, DatasetError> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))?;

        self.cells
            .column(idx)
            .iter()
            .enumerate()
            .map(|(row, cell)| match cell {
                Some(value) => parse_number(name, row, value),
                None => Err(DatasetError::MissingValue {
                    column: name.to_string(),
                    row,
                }),
            })
            .collect::<Result<Vec<f64>, _>>()
            .map(Array1::from)
    }

    /// The named columns parsed as numbers, with `NaN` for missing cells.
    pub fn numeric_matrix<S: AsRef<str>>(&self, names: &[S]) -> Result<Array2<f64>, DatasetError> {
        let indices = self.indices_of(names)?;
        let mut out = Array2::<f64>::zeros((self.n_rows(), indices.len()));

        for (out_col, &idx) in indices.iter().enumerate() {
            let name = &self.columns[idx];
            for (row, cell) in self.cells.column(idx).iter().enumerate() {
                out[[row, out_col]] = match cell {
                    Some(value) => parse_number(name, row, value)?,
                    None => f64::NAN,
                };
            }
        }

        Ok(out)
    }

    /// The named columns as category labels, with `None` for missing cells.
    pub fn categorical_matrix<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<CategoryMatrix, DatasetError> {
        let indices = self.indices_of(names)?;
        Ok(self.cells.select(Axis(1), &indices))
    }
}

fn parse_number(column: &str, row: usize, value: &str) -> Result<f64, DatasetError> {
    value.parse::<f64>().map_err(|_| DatasetError::InvalidNumber {
        column: column.to_string(),
        row,
        value: value.to_string(),
    })
}

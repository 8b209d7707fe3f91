//! CSV reading and writing.

use super::{parse_cell, DataFrame, DatasetError};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use ndarray::Array2;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

impl DataFrame {
    /// Load a comma-delimited file with a header row.
    ///
    /// Cells are trimmed and the markers in
    /// [`MISSING_MARKERS`](super::MISSING_MARKERS) become missing values.
    /// Rows with a different field count than the header are rejected.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let csv_err = |source| DatasetError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(BufReader::new(file));

        let columns: Vec<String> = rdr
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut cells = Vec::new();
        let mut n_rows = 0;
        for result in rdr.records() {
            let record = result.map_err(csv_err)?;
            cells.extend(record.iter().map(parse_cell));
            n_rows += 1;
        }

        let cells = Array2::from_shape_vec((n_rows, columns.len()), cells)?;
        Self::new(columns, cells)
    }
}

/// Write a numeric matrix as CSV with the given header.
pub fn write_matrix_csv<P: AsRef<Path>>(
    path: P,
    header: &[String],
    matrix: &Array2<f64>,
) -> Result<(), DatasetError> {
    let path = path.as_ref();
    let io_err = |source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    };
    let csv_err = |source| DatasetError::Csv {
        path: path.to_path_buf(),
        source,
    };

    if header.len() != matrix.ncols() {
        return Err(ndarray::ShapeError::from_kind(ndarray::ErrorKind::IncompatibleShape).into());
    }

    let file = File::create(path).map_err(io_err)?;
    let mut wtr = WriterBuilder::new().from_writer(BufWriter::new(file));

    wtr.write_record(header).map_err(csv_err)?;
    for row in matrix.rows() {
        wtr.write_record(row.iter().map(|v| v.to_string()))
            .map_err(csv_err)?;
    }

    wtr.flush().map_err(io_err)
}

//! Fit the exam-scores preprocessor on a train split and apply it to both splits.
//!
//! ## Usage
//!
//! ```sh
//! score-prep --train data/train.csv --test data/test.csv
//! score-prep --train data/train.csv --test data/test.csv --output-dir artifacts --handle-unknown ignore
//! RUST_LOG=debug score-prep --train data/train.csv --test data/test.csv
//! ```

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use score_prep::dataset::write_matrix_csv;
use score_prep::preprocessing::HandleUnknown;
use score_prep::transformation::{
    schema::TARGET_COLUMN, DataTransformation, DataTransformationConfig,
    DEFAULT_PREPROCESSOR_PATH,
};
use serde::Serialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Fit the exam-scores preprocessor and transform train/test splits")]
struct Args {
    /// Training table (CSV with header).
    #[arg(long)]
    train: PathBuf,

    /// Test table (CSV with header).
    #[arg(long)]
    test: PathBuf,

    /// Where to save the fitted preprocessor.
    #[arg(long, default_value = DEFAULT_PREPROCESSOR_PATH)]
    artifact: PathBuf,

    /// Also write train_array.csv and test_array.csv here.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Unseen test categories: `error` or `ignore` (all-zero encoding).
    #[arg(long, default_value = "error")]
    handle_unknown: HandleUnknown,
}

#[derive(Serialize)]
struct Summary {
    train_rows: usize,
    test_rows: usize,
    columns: usize,
    preprocessor_path: PathBuf,
    feature_names: Vec<String>,
    arrays: Option<[PathBuf; 2]>,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let config = DataTransformationConfig::default()
        .with_preprocessor_path(&args.artifact)
        .with_handle_unknown(args.handle_unknown);
    let output = DataTransformation::new(config).run(&args.train, &args.test)?;

    let arrays = match &args.output_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let mut header = output.feature_names.clone();
            header.push(TARGET_COLUMN.to_string());

            let train_path = dir.join("train_array.csv");
            let test_path = dir.join("test_array.csv");
            write_matrix_csv(&train_path, &header, &output.train)?;
            write_matrix_csv(&test_path, &header, &output.test)?;
            info!(dir = %dir.display(), "wrote transformed arrays");
            Some([train_path, test_path])
        }
        None => None,
    };

    let summary = Summary {
        train_rows: output.train.nrows(),
        test_rows: output.test.nrows(),
        columns: output.train.ncols(),
        preprocessor_path: output.preprocessor_path,
        feature_names: output.feature_names,
        arrays,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

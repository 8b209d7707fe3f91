use score_prep::dataset::{DataFrame, DatasetError};
use score_prep::preprocessing::{FittedTransformer, HandleUnknown, PreprocessingError};
use score_prep::transformation::{
    DataTransformation, DataTransformationConfig, Split, TransformationError,
};
use std::fs;
use std::path::{Path, PathBuf};

const HEADER: &str = "gender,race_ethnicity,parental_level_of_education,lunch,test_preparation_course,math_score,reading_score,writing_score";

const GENDERS: [&str; 2] = ["female", "male"];
const RACES: [&str; 5] = ["group A", "group B", "group C", "group D", "group E"];
const EDUCATION: [&str; 6] = [
    "some high school",
    "high school",
    "some college",
    "associate's degree",
    "bachelor's degree",
    "master's degree",
];
const LUNCH: [&str; 2] = ["standard", "free/reduced"];
const PREP: [&str; 2] = ["none", "completed"];

/// 2 numeric columns + every category above + the target.
const N_COLUMNS: usize = 2 + 2 + 5 + 6 + 2 + 2 + 1;

fn row(i: usize) -> String {
    let math = 40 + (i * 7) % 60;
    let reading = 35 + (i * 11) % 65;
    let writing = 30 + (i * 13) % 70;
    format!(
        "{},{},\"{}\",{},{},{},{},{}",
        GENDERS[i % 2],
        RACES[i % 5],
        EDUCATION[i % 6],
        LUNCH[(i / 2) % 2],
        PREP[(i / 3) % 2],
        math,
        reading,
        writing
    )
}

fn write_csv(path: &Path, rows: impl IntoIterator<Item = String>) {
    let mut content = String::from(HEADER);
    content.push('\n');
    for row in rows {
        content.push_str(&row);
        content.push('\n');
    }
    fs::write(path, content).unwrap();
}

struct Fixture {
    dir: tempfile::TempDir,
    train: PathBuf,
    test: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let train = dir.path().join("train.csv");
        let test = dir.path().join("test.csv");
        write_csv(&train, (0..100).map(row));
        write_csv(&test, (100..120).map(row));
        Self { dir, train, test }
    }

    fn artifact(&self) -> PathBuf {
        self.dir.path().join("artifacts").join("preprocessor.bin")
    }

    fn driver(&self) -> DataTransformation {
        DataTransformation::new(
            DataTransformationConfig::default().with_preprocessor_path(self.artifact()),
        )
    }
}

#[test]
fn test_run_produces_arrays_and_artifact() {
    let fx = Fixture::new();
    let output = fx.driver().run(&fx.train, &fx.test).unwrap();

    assert_eq!(output.train.dim(), (100, N_COLUMNS));
    assert_eq!(output.test.dim(), (20, N_COLUMNS));
    assert_eq!(output.feature_names.len(), N_COLUMNS - 1);
    assert_eq!(output.preprocessor_path, fx.artifact());
    assert!(fx.artifact().exists());
}

#[test]
fn test_numeric_columns_are_standardized_on_train() {
    let fx = Fixture::new();
    let output = fx.driver().run(&fx.train, &fx.test).unwrap();

    for col in 0..2 {
        let column = output.train.column(col);
        let mean = column.mean().unwrap();
        let std = column.std(0.0);
        approx::assert_abs_diff_eq!(mean, 0.0, epsilon = 1e-9);
        approx::assert_abs_diff_eq!(std, 1.0, epsilon = 1e-9);
    }
}

#[test]
fn test_target_is_last_and_untouched() {
    let fx = Fixture::new();
    let output = fx.driver().run(&fx.train, &fx.test).unwrap();

    let last = N_COLUMNS - 1;
    for i in 0..100 {
        assert_eq!(output.train[[i, last]], (40 + (i * 7) % 60) as f64);
    }
    assert_eq!(output.test[[0, last]], (40 + (100 * 7) % 60) as f64);
}

#[test]
fn test_feature_names_follow_branch_order() {
    let fx = Fixture::new();
    let output = fx.driver().run(&fx.train, &fx.test).unwrap();

    assert_eq!(output.feature_names[0], "num_pipeline__writing_score");
    assert_eq!(output.feature_names[1], "num_pipeline__reading_score");
    assert_eq!(output.feature_names[2], "cat_pipeline__gender_female");
    assert_eq!(output.feature_names[3], "cat_pipeline__gender_male");
}

#[test]
fn test_loaded_preprocessor_matches_fitted() {
    let fx = Fixture::new();
    let output = fx.driver().run(&fx.train, &fx.test).unwrap();

    let loaded = DataTransformation::load_preprocessor(fx.artifact()).unwrap();
    let test = DataFrame::from_csv_path(&fx.test).unwrap();
    let features = test.drop_column("math_score").unwrap();
    let transformed = loaded.transform(&features).unwrap();

    assert_eq!(
        transformed,
        output.test.slice(ndarray::s![.., ..N_COLUMNS - 1])
    );
    assert_eq!(loaded.feature_names_out().unwrap(), output.feature_names);
}

#[test]
fn test_test_split_does_not_affect_fit() {
    let fx = Fixture::new();
    let baseline = fx.driver().run(&fx.train, &fx.test).unwrap();

    // An extreme outlier in the test table must not move the learned scale.
    let mut rows: Vec<String> = (100..119).map(row).collect();
    rows.push("male,group A,high school,standard,none,50,100000,100000".to_string());
    write_csv(&fx.test, rows);
    let shifted = fx.driver().run(&fx.train, &fx.test).unwrap();

    assert_eq!(baseline.train, shifted.train);
    assert_eq!(
        baseline.test.slice(ndarray::s![..19, ..]),
        shifted.test.slice(ndarray::s![..19, ..])
    );
}

#[test]
fn test_missing_values_are_imputed() {
    let fx = Fixture::new();
    let mut rows: Vec<String> = (0..99).map(row).collect();
    rows.push("female,,some college,,none,61,,".to_string());
    write_csv(&fx.train, rows);

    let output = fx.driver().run(&fx.train, &fx.test).unwrap();
    assert!(output.train.iter().all(|v| v.is_finite()));
    assert!(output.test.iter().all(|v| v.is_finite()));
}

fn train_reading_scores() -> Vec<f64> {
    (0..100).map(|i| (35 + (i * 11) % 65) as f64).collect()
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Most common training race; ties go to the smallest label.
fn train_race_mode() -> &'static str {
    let mut counts = std::collections::BTreeMap::new();
    for i in 0..100 {
        *counts.entry(RACES[i % 5]).or_insert(0usize) += 1;
    }
    let mut best = ("", 0);
    for (race, count) in counts {
        if count > best.1 {
            best = (race, count);
        }
    }
    best.0
}

#[test]
fn test_missing_test_cells_use_training_statistics() {
    let fx = Fixture::new();
    let reading_median = median(&train_reading_scores());
    let race_mode = train_race_mode();
    let other_race = RACES.iter().copied().find(|r| *r != race_mode).unwrap();

    // Rows 0 and 1 differ only in that row 0 leaves reading and race blank.
    // The remaining rows would pull a test-derived median and mode far away.
    let mut rows = vec![
        "female,,some college,standard,none,60,,62".to_string(),
        format!("female,{race_mode},some college,standard,none,60,{reading_median},62"),
    ];
    for _ in 0..5 {
        rows.push(format!("female,{other_race},some college,standard,none,60,100000,62"));
    }
    rows.push("male,,high school,standard,none,60,,62".to_string());
    write_csv(&fx.test, rows);

    let output = fx.driver().run(&fx.train, &fx.test).unwrap();
    assert_eq!(output.test.row(0), output.test.row(1));
    assert_ne!(output.test.row(0), output.test.row(2));

    // reading_score is the second numeric output
    let train = train_reading_scores();
    let mean = train.iter().sum::<f64>() / train.len() as f64;
    let std = (train.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / train.len() as f64).sqrt();
    approx::assert_abs_diff_eq!(
        output.test[[0, 1]],
        (reading_median - mean) / std,
        epsilon = 1e-9
    );
    approx::assert_abs_diff_eq!(output.test[[7, 1]], output.test[[0, 1]], epsilon = 1e-12);
}

#[test]
fn test_test_split_blanks_and_outliers_do_not_affect_fit() {
    let fx = Fixture::new();
    let baseline = fx.driver().run(&fx.train, &fx.test).unwrap();

    let mut rows: Vec<String> = (100..115).map(row).collect();
    rows.extend([
        "male,,high school,,none,50,,".to_string(),
        "male,group E,high school,standard,none,50,100000,-100000".to_string(),
        "male,group E,high school,standard,none,50,100000,-100000".to_string(),
        "male,group E,high school,standard,none,50,100000,-100000".to_string(),
        "male,group E,high school,standard,none,50,,".to_string(),
    ]);
    write_csv(&fx.test, rows);
    let shifted = fx.driver().run(&fx.train, &fx.test).unwrap();

    assert_eq!(baseline.train, shifted.train);
    assert_eq!(
        baseline.test.slice(ndarray::s![..15, ..]),
        shifted.test.slice(ndarray::s![..15, ..])
    );

    let loaded = DataTransformation::load_preprocessor(fx.artifact()).unwrap();
    let reloaded_train = loaded
        .transform(
            &DataFrame::from_csv_path(&fx.train)
                .unwrap()
                .drop_column("math_score")
                .unwrap(),
        )
        .unwrap();
    assert_eq!(
        reloaded_train,
        baseline.train.slice(ndarray::s![.., ..N_COLUMNS - 1])
    );
}

#[test]
fn test_unknown_test_category_fails_by_default() {
    let fx = Fixture::new();
    write_csv(
        &fx.test,
        ["female,group F,some college,standard,none,60,61,62".to_string()],
    );

    let result = fx.driver().run(&fx.train, &fx.test);
    match result {
        Err(TransformationError::Transform {
            split: Split::Test,
            source: PreprocessingError::UnknownCategory { column, value },
        }) => {
            assert_eq!(column, 1);
            assert_eq!(value, "group F");
        }
        other => panic!("expected unknown category error, got {other:?}"),
    }
    assert!(!fx.artifact().exists());
}

#[test]
fn test_unknown_test_category_ignored_when_configured() {
    let fx = Fixture::new();
    write_csv(
        &fx.test,
        ["female,group F,some college,standard,none,60,61,62".to_string()],
    );

    let driver = DataTransformation::new(
        DataTransformationConfig::default()
            .with_preprocessor_path(fx.artifact())
            .with_handle_unknown(HandleUnknown::Ignore),
    );
    let output = driver.run(&fx.train, &fx.test).unwrap();

    assert_eq!(output.test.dim(), (1, N_COLUMNS));
    // race block sits after 2 numeric and 2 gender columns
    assert!((4..9).all(|c| output.test[[0, c]] == 0.0));
}

#[test]
fn test_missing_train_file() {
    let fx = Fixture::new();
    let result = fx
        .driver()
        .run(fx.dir.path().join("nope.csv"), &fx.test);

    assert!(matches!(
        result,
        Err(TransformationError::Read {
            split: Split::Train,
            source: DatasetError::Io { .. },
            ..
        })
    ));
}

#[test]
fn test_missing_feature_column_in_test() {
    let fx = Fixture::new();
    fs::write(&fx.test, "gender,math_score\nfemale,50\n").unwrap();

    let result = fx.driver().run(&fx.train, &fx.test);
    assert!(matches!(
        result,
        Err(TransformationError::Schema {
            split: Split::Test,
            source: DatasetError::MissingColumn(_)
        })
    ));
}

//! Integration tests for the pipeline module.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use scorecard_cli::pipeline::{describe_columns, read_dataset, run_benchmark};
use scorecard_cli::types::BenchmarkRequest;
use scorecard_model::{BoostingParams, PropensityBounds, ScorecardError, WeightingOptions};

const REGION_CSV: &str = "\
provider,provider_id,region,outcome
north,1,A,10
south,2,A,5
north,1,B,12
south,2,B,4
";

fn write_csv(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("cases.csv");
    fs::write(&path, contents).unwrap();
    path
}

fn request(path: &Path, focal_column: &str, focal_value: &str) -> BenchmarkRequest {
    BenchmarkRequest {
        data_path: path.to_path_buf(),
        focal_column: focal_column.to_string(),
        focal_value: focal_value.to_string(),
        predictors: vec!["region".to_string()],
        outcomes: vec!["outcome".to_string()],
        params: BoostingParams::default(),
        weighting: WeightingOptions::default(),
        rounding_digits: 2,
    }
}

#[test]
fn test_run_benchmark_from_csv() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, REGION_CSV);

    let result = run_benchmark(&request(&path, "provider", "north")).unwrap();

    assert_eq!(result.rows, 4);
    assert_eq!(result.focal_rows, 2);
    assert_eq!(result.outcomes.len(), 1);
    assert_eq!(result.outcomes[0].outcome, "outcome");
    assert_eq!(result.outcomes[0].effect, 6.5);
    assert_eq!(
        result.balance.lines(),
        vec!["region_A:(0.5, 0.5)", "region_B:(0.5, 0.5)"]
    );
    assert_eq!(result.propensity.focal_count, 2);
    assert_eq!(result.propensity.control_count, 2);
}

#[test]
fn test_numeric_focal_column() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, REGION_CSV);

    let result = run_benchmark(&request(&path, "provider_id", "1")).unwrap();

    assert_eq!(result.focal_rows, 2);
    assert_eq!(result.outcomes[0].effect, 6.5);
}

#[test]
fn test_clipping_bounds_keep_estimate() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, REGION_CSV);
    let mut request = request(&path, "provider", "north");
    request.weighting =
        WeightingOptions::default().with_bounds(PropensityBounds::new(0.01, 0.99).unwrap());

    let result = run_benchmark(&request).unwrap();

    assert_eq!(result.outcomes[0].effect, 6.5);
}

#[test]
fn test_result_serializes_to_json() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, REGION_CSV);

    let result = run_benchmark(&request(&path, "provider", "north")).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["rows"], 4);
    assert_eq!(json["outcomes"][0]["effect"], 6.5);
    assert_eq!(json["balance"]["stats"][1]["covariate"], "region_B");
}

#[test]
fn test_missing_predictor_reports_context() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, REGION_CSV);
    let mut request = request(&path, "provider", "north");
    request.predictors.push("payer".to_string());

    let error = run_benchmark(&request).unwrap_err();
    let message = format!("{error:#}");

    assert!(message.contains("encode features"), "{message}");
    assert!(message.contains("payer"), "{message}");
}

#[test]
fn test_unknown_focal_value_leaves_no_weight() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, REGION_CSV);

    // No focal rows: the constant model scores every row 0, so all weights vanish.
    let error = run_benchmark(&request(&path, "provider", "east")).unwrap_err();

    assert!(matches!(
        error.downcast_ref::<ScorecardError>(),
        Some(ScorecardError::ZeroWeightSum)
    ));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.csv");

    assert!(read_dataset(&path).is_err());
}

#[test]
fn test_describe_columns() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, REGION_CSV);
    let data = read_dataset(&path).unwrap();

    let columns = describe_columns(&data);

    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["provider", "provider_id", "region", "outcome"]);
    assert_eq!(columns[0].encoding, Some("one-hot"));
    assert_eq!(columns[0].levels, Some(2));
    assert_eq!(columns[1].encoding, Some("numeric"));
    assert_eq!(columns[1].levels, None);
    assert!(columns.iter().all(|c| c.nulls == 0));
}

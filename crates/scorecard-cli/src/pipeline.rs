//! Benchmark pipeline with explicit stages.
//!
//! 1. **Ingest**: read the CSV into a polars `DataFrame`
//! 2. **Focal**: derive the focal indicator from the focal column
//! 3. **Fit**: train the propensity model and compute ATT weights
//! 4. **Evaluate**: estimate the focal effect on every outcome
//! 5. **Balance**: compare focal and reweighted non-focal covariate means

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use tracing::{debug, info, info_span};

use scorecard_core::Benchmark;
use scorecard_core::frame::{category_values, column_kind};
use scorecard_core::{ColumnKind, focal_indicator_from_column};

use crate::types::{BenchmarkRequest, BenchmarkResult, ColumnSummary};

/// Read a CSV file with a header row, inferring column types from the first rows.
pub fn read_dataset(path: &Path) -> Result<DataFrame> {
    let _span = info_span!("ingest", path = %path.display()).entered();
    let data = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("open {}", path.display()))?
        .finish()
        .with_context(|| format!("parse {}", path.display()))?;
    debug!(rows = data.height(), columns = data.width(), "dataset loaded");
    Ok(data)
}

/// Report how each column of `data` would be encoded as a feature.
pub fn describe_columns(data: &DataFrame) -> Vec<ColumnSummary> {
    data.get_columns()
        .iter()
        .map(|column| {
            let kind = column_kind(column).ok();
            let levels = match kind {
                Some(ColumnKind::Categorical) => category_values(column).ok().map(|values| {
                    values
                        .into_iter()
                        .flatten()
                        .collect::<BTreeSet<String>>()
                        .len()
                }),
                _ => None,
            };
            ColumnSummary {
                name: column.name().to_string(),
                dtype: column.dtype().to_string(),
                encoding: kind.map(encoding_label),
                nulls: column.null_count(),
                levels,
            }
        })
        .collect()
}

fn encoding_label(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Numeric => "numeric",
        ColumnKind::Boolean => "boolean",
        ColumnKind::Categorical => "one-hot",
    }
}

/// Read `request.data_path` and run the full benchmark on it.
pub fn run_benchmark(request: &BenchmarkRequest) -> Result<BenchmarkResult> {
    let data = read_dataset(&request.data_path)?;
    benchmark_frame(&data, request)
}

/// Run the benchmark stages on an already loaded dataset.
pub fn benchmark_frame(data: &DataFrame, request: &BenchmarkRequest) -> Result<BenchmarkResult> {
    let span = info_span!("benchmark", focal_column = %request.focal_column);
    let _guard = span.enter();
    let start = Instant::now();

    let focal = focal_indicator_from_column(data, &request.focal_column, &request.focal_value)
        .with_context(|| {
            format!(
                "derive focal indicator from {}={}",
                request.focal_column, request.focal_value
            )
        })?;
    let focal_rows = focal.iter().filter(|&&is_focal| is_focal).count();

    let mut benchmark = Benchmark::new(
        data,
        focal,
        request.predictors.as_slice(),
        request.outcomes.as_slice(),
    )
    .context("encode features")?
    .with_weighting(request.weighting);
    benchmark.fit(&request.params).context("fit propensity model")?;
    let outcomes = benchmark
        .evaluate(request.rounding_digits)
        .context("estimate outcome effects")?
        .to_vec();
    let balance = benchmark
        .calc_balance(request.rounding_digits)
        .context("compute covariate balance")?;
    let propensity = benchmark
        .propensity_summary()
        .context("summarize propensity scores")?;

    info!(
        rows = data.height(),
        focal_rows,
        outcomes = outcomes.len(),
        duration_ms = start.elapsed().as_millis(),
        "benchmark complete"
    );
    Ok(BenchmarkResult {
        data_path: request.data_path.clone(),
        rows: data.height(),
        focal_rows,
        outcomes,
        balance,
        propensity,
    })
}

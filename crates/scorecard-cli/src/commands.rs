use anyhow::{Context, Result};
use tracing::info_span;

use scorecard_cli::pipeline::{describe_columns, read_dataset, run_benchmark};
use scorecard_cli::types::{BenchmarkRequest, BenchmarkResult, ColumnSummary};
use scorecard_model::{BoostingParams, PropensityBounds, WeightingOptions};

use crate::cli::{ColumnsArgs, RunArgs};

pub fn run_scorecard(args: &RunArgs) -> Result<BenchmarkResult> {
    let request = build_request(args)?;
    let span = info_span!("run", data = %request.data_path.display());
    span.in_scope(|| run_benchmark(&request))
}

pub fn run_columns(args: &ColumnsArgs) -> Result<Vec<ColumnSummary>> {
    let data = read_dataset(&args.data)?;
    Ok(describe_columns(&data))
}

fn build_request(args: &RunArgs) -> Result<BenchmarkRequest> {
    let mut params = BoostingParams::new(args.learning_rate, args.n_estimators)
        .with_max_depth(args.max_depth)
        .with_subsample(args.subsample);
    if let Some(seed) = args.seed {
        params = params.with_seed(seed);
    }
    params.validate().context("invalid boosting parameters")?;

    let mut weighting = WeightingOptions::default();
    if let (Some(min), Some(max)) = (args.clip_min, args.clip_max) {
        let bounds = PropensityBounds::new(min, max).context("invalid clipping bounds")?;
        weighting = weighting.with_bounds(bounds);
    }

    Ok(BenchmarkRequest {
        data_path: args.data.clone(),
        focal_column: args.focal_column.clone(),
        focal_value: args.focal_value.clone(),
        predictors: args.predictors.clone(),
        outcomes: args.outcomes.clone(),
        params,
        weighting,
        rounding_digits: args.digits,
    })
}

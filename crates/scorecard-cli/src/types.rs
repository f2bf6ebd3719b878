use std::path::PathBuf;

use serde::Serialize;

use scorecard_model::{
    BalanceReport, BoostingParams, OutcomeEstimate, PropensitySummary, WeightingOptions,
};

/// Everything needed for one benchmark run over a CSV file.
#[derive(Debug, Clone)]
pub struct BenchmarkRequest {
    pub data_path: PathBuf,
    pub focal_column: String,
    /// Value of `focal_column` that marks the focal provider.
    pub focal_value: String,
    pub predictors: Vec<String>,
    pub outcomes: Vec<String>,
    pub params: BoostingParams,
    pub weighting: WeightingOptions,
    pub rounding_digits: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkResult {
    pub data_path: PathBuf,
    pub rows: usize,
    pub focal_rows: usize,
    pub outcomes: Vec<OutcomeEstimate>,
    pub balance: BalanceReport,
    pub propensity: PropensitySummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: String,
    /// How the column is encoded as a feature; `None` when it cannot be used.
    pub encoding: Option<&'static str>,
    pub nulls: usize,
    /// Distinct values, reported for categorical columns only.
    pub levels: Option<usize>,
}

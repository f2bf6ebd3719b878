//! CLI argument definitions for the provider scorecard.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use scorecard_model::{DEFAULT_LEARNING_RATE, DEFAULT_N_ESTIMATORS, DEFAULT_ROUNDING_DIGITS};

#[derive(Parser)]
#[command(
    name = "scorecard",
    version,
    about = "Benchmark a provider against its peers with propensity-score weighting",
    long_about = "Benchmark a focal provider against all other providers.\n\n\
                  Fits a gradient-boosted propensity model on case-mix predictors,\n\
                  reweights non-focal rows with ATT weights, and reports the focal\n\
                  effect on each outcome along with covariate balance."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fit the propensity model and report outcome effects and balance.
    Run(RunArgs),

    /// List the columns of a dataset and how each would be encoded.
    Columns(ColumnsArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// CSV file with one row per case and a header row.
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Column identifying the provider of each row.
    #[arg(long = "focal-column", value_name = "COLUMN")]
    pub focal_column: String,

    /// Value of the focal column that marks the focal provider.
    #[arg(long = "focal-value", value_name = "VALUE")]
    pub focal_value: String,

    /// Case-mix column used by the propensity model (repeatable).
    #[arg(long = "predictor", value_name = "COLUMN", required = true)]
    pub predictors: Vec<String>,

    /// Outcome column to estimate the focal effect for (repeatable).
    #[arg(long = "outcome", value_name = "COLUMN", required = true)]
    pub outcomes: Vec<String>,

    /// Shrinkage applied to each boosting stage.
    #[arg(long = "learning-rate", default_value_t = DEFAULT_LEARNING_RATE)]
    pub learning_rate: f64,

    /// Number of boosting stages.
    #[arg(long = "n-estimators", default_value_t = DEFAULT_N_ESTIMATORS)]
    pub n_estimators: usize,

    /// Maximum depth of each tree.
    #[arg(long = "max-depth", default_value_t = 3)]
    pub max_depth: usize,

    /// Fraction of rows sampled per stage; below 1.0 enables stochastic boosting.
    #[arg(long = "subsample", default_value_t = 1.0)]
    pub subsample: f64,

    /// Seed for row subsampling.
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Decimal places kept in effects and balance figures.
    #[arg(long = "digits", default_value_t = DEFAULT_ROUNDING_DIGITS)]
    pub digits: u32,

    /// Clip non-focal propensity scores to at least this value.
    #[arg(long = "clip-min", value_name = "P", requires = "clip_max")]
    pub clip_min: Option<f64>,

    /// Clip non-focal propensity scores to at most this value.
    #[arg(long = "clip-max", value_name = "P", requires = "clip_min")]
    pub clip_max: Option<f64>,

    /// How results are printed.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Args)]
pub struct ColumnsArgs {
    /// CSV file to inspect.
    #[arg(value_name = "DATA")]
    pub data: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

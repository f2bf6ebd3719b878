use thiserror::Error;

use crate::stage::EstimatorStage;

#[derive(Debug, Error)]
pub enum ScorecardError {
    #[error("column '{column}' not found in dataset")]
    MissingColumn { column: String },

    #[error("column '{column}' has unsupported type {dtype}")]
    UnsupportedColumnType { column: String, dtype: String },

    #[error("column '{column}' has a null value at row {row}")]
    NullValue { column: String, row: usize },

    #[error("{what} has length {actual}, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("dataset has no rows")]
    EmptyDataset,

    /// An operation was called before the pipeline reached the stage it needs.
    #[error("cannot {operation} while estimator is {stage}; call fit first")]
    InvalidStage {
        operation: &'static str,
        stage: EstimatorStage,
    },

    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },

    /// A non-focal row received a propensity of exactly 1, so its odds weight is undefined.
    #[error("propensity score {score} at non-focal row {row} makes the ATT weight undefined")]
    SaturatedPropensity { row: usize, score: f64 },

    #[error("{group} group has no rows")]
    EmptyGroup { group: &'static str },

    #[error("weights sum to zero")]
    ZeroWeightSum,

    #[error("invalid weight {weight} at row {row}")]
    InvalidWeights { row: usize, weight: f64 },

    #[error("linear solve failed: {0}")]
    Singular(String),

    #[error("data frame error: {0}")]
    Frame(String),
}

pub type Result<T> = std::result::Result<T, ScorecardError>;

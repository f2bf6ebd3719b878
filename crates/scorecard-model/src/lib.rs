pub mod error;
pub mod options;
pub mod report;
pub mod stage;

pub use error::{Result, ScorecardError};
pub use options::{
    BoostingParams, DEFAULT_LEARNING_RATE, DEFAULT_N_ESTIMATORS, DEFAULT_ROUNDING_DIGITS,
    PropensityBounds, WeightingOptions,
};
pub use report::{BalanceReport, BalanceStat, OutcomeEstimate, PropensitySummary};
pub use stage::EstimatorStage;

//! Propensity-score benchmarking of a focal provider against its peers.
//!
//! The pipeline is construct → [`Benchmark::fit`] → [`Benchmark::evaluate`]
//! / [`Benchmark::calc_balance`]. Numeric pieces are exposed separately so
//! they can be tested and reused on their own.

pub mod balance;
pub mod boosting;
pub mod design;
pub mod estimator;
pub mod frame;
pub mod regression;
pub mod tree;
pub mod weights;

pub use balance::{balance, round_to, weighted_mean};
pub use boosting::GradientBoostingClassifier;
pub use design::DesignMatrix;
pub use estimator::{Benchmark, FOCAL_COLUMN};
pub use frame::{ColumnKind, focal_indicator_from_column};
pub use regression::{LinearFit, weighted_least_squares};
pub use tree::{RegressionTree, TreeParams};
pub use weights::{att_weights, effective_sample_size};

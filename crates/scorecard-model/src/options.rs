//! Configuration options for propensity fitting and weighting.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScorecardError};

/// Step size applied to each boosting stage.
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
/// Number of boosting stages.
pub const DEFAULT_N_ESTIMATORS: usize = 500;
/// Decimal places kept in outcome estimates and balance statistics.
pub const DEFAULT_ROUNDING_DIGITS: u32 = 2;

/// Hyperparameters for the gradient-boosted propensity model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostingParams {
    /// Shrinkage applied to each tree's contribution.
    pub learning_rate: f64,
    /// Number of trees in the ensemble.
    pub n_estimators: usize,
    /// Maximum depth of each regression tree.
    pub max_depth: usize,
    /// Minimum rows a node needs before it may be split.
    pub min_samples_split: usize,
    /// Minimum rows allowed in a leaf.
    pub min_samples_leaf: usize,
    /// Fraction of rows drawn (without replacement) for each stage.
    ///
    /// Values below 1.0 turn on stochastic boosting, driven by `seed`.
    pub subsample: f64,
    /// Seed for row subsampling. `None` uses seed 0.
    pub seed: Option<u64>,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            n_estimators: DEFAULT_N_ESTIMATORS,
            max_depth: 3,
            min_samples_split: 2,
            min_samples_leaf: 1,
            subsample: 1.0,
            seed: None,
        }
    }
}

impl BoostingParams {
    pub fn new(learning_rate: f64, n_estimators: usize) -> Self {
        Self {
            learning_rate,
            n_estimators,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_subsample(mut self, subsample: f64) -> Self {
        self.subsample = subsample;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every knob before any training work starts.
    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(invalid("learning_rate", self.learning_rate));
        }
        if self.n_estimators == 0 {
            return Err(invalid("n_estimators", self.n_estimators));
        }
        if self.max_depth == 0 {
            return Err(invalid("max_depth", self.max_depth));
        }
        if self.min_samples_split < 2 {
            return Err(invalid("min_samples_split", self.min_samples_split));
        }
        if self.min_samples_leaf == 0 {
            return Err(invalid("min_samples_leaf", self.min_samples_leaf));
        }
        if !(self.subsample > 0.0 && self.subsample <= 1.0) {
            return Err(invalid("subsample", self.subsample));
        }
        Ok(())
    }
}

/// Closed interval that propensity scores are clipped into before weighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PropensityBounds {
    pub min: f64,
    pub max: f64,
}

impl PropensityBounds {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(min.is_finite() && max.is_finite()) || min < 0.0 || max >= 1.0 || min > max {
            return Err(ScorecardError::InvalidParameter {
                name: "propensity_bounds",
                value: format!("[{min}, {max}]"),
            });
        }
        Ok(Self { min, max })
    }

    pub fn clip(self, score: f64) -> f64 {
        score.clamp(self.min, self.max)
    }
}

/// How raw propensity scores are turned into ATT weights.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightingOptions {
    /// Clip scores into these bounds first. `None` keeps raw scores, so a
    /// non-focal score of exactly 1 is reported as an error.
    pub bounds: Option<PropensityBounds>,
}

impl WeightingOptions {
    #[must_use]
    pub fn with_bounds(mut self, bounds: PropensityBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

fn invalid(name: &'static str, value: impl ToString) -> ScorecardError {
    ScorecardError::InvalidParameter {
        name,
        value: value.to_string(),
    }
}

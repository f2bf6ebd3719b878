use serde::{Deserialize, Serialize};

/// Treatment-effect estimate for one evaluation design column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeEstimate {
    /// Design column name (`outcome` or `outcome_category`).
    pub outcome: String,
    /// Rounded coefficient on the focal indicator.
    pub effect: f64,
}

/// Focal versus reweighted non-focal mean of one predictor design column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceStat {
    pub covariate: String,
    pub focal_mean: f64,
    pub weighted_control_mean: f64,
}

impl BalanceStat {
    pub fn difference(&self) -> f64 {
        self.focal_mean - self.weighted_control_mean
    }

    /// Render as `covariate:(focal, control)`.
    pub fn line(&self) -> String {
        format!(
            "{}:({}, {})",
            self.covariate, self.focal_mean, self.weighted_control_mean
        )
    }
}

/// Covariate balance after ATT reweighting, in predictor design column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub stats: Vec<BalanceStat>,
}

impl BalanceReport {
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn get(&self, covariate: &str) -> Option<&BalanceStat> {
        self.stats.iter().find(|stat| stat.covariate == covariate)
    }

    pub fn lines(&self) -> Vec<String> {
        self.stats.iter().map(BalanceStat::line).collect()
    }

    /// Largest absolute focal/control gap across covariates.
    pub fn max_abs_difference(&self) -> Option<f64> {
        self.stats
            .iter()
            .map(|stat| stat.difference().abs())
            .reduce(f64::max)
    }
}

/// Distribution of fitted propensity scores and the resulting control weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropensitySummary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub focal_mean: f64,
    pub control_mean: f64,
    pub focal_count: usize,
    pub control_count: usize,
    /// Kish effective sample size of the non-focal weights, `(Σw)² / Σw²`.
    pub control_effective_size: f64,
}

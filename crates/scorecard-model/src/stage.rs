use std::fmt;

use serde::{Deserialize, Serialize};

/// Position of an estimator in the construct → fit → evaluate pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimatorStage {
    /// Design matrices are built; no model yet.
    #[default]
    Constructed,
    /// Propensity scores and ATT weights are available.
    Fitted,
    /// Outcome estimates have been computed from the current fit.
    Evaluated,
}

impl EstimatorStage {
    /// Whether propensity scores and weights exist at this stage.
    pub fn has_weights(self) -> bool {
        matches!(self, Self::Fitted | Self::Evaluated)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Constructed => "constructed",
            Self::Fitted => "fitted",
            Self::Evaluated => "evaluated",
        }
    }
}

impl fmt::Display for EstimatorStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

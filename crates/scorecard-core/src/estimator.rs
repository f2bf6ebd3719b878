//! Propensity-score benchmark of a focal group against all other rows.
//!
//! [`Benchmark`] holds the one-hot predictor and evaluation matrices, fits a
//! boosted propensity model, derives ATT weights, and produces weighted
//! outcome effects and covariate balance. Calls are gated by an
//! [`EstimatorStage`]: `evaluate` and `calc_balance` need a prior `fit`.

use polars::prelude::DataFrame;
use scorecard_model::{
    BalanceReport, BalanceStat, BoostingParams, EstimatorStage, OutcomeEstimate,
    PropensitySummary, Result, ScorecardError, WeightingOptions,
};
use tracing::{info, info_span, warn};

use crate::balance::{balance, round_to};
use crate::boosting::GradientBoostingClassifier;
use crate::design::DesignMatrix;
use crate::regression::weighted_least_squares;
use crate::weights::{att_weights, effective_sample_size};

/// Name given to the focal indicator column in outcome regressions.
pub const FOCAL_COLUMN: &str = "focal";

/// State produced by a successful fit.
#[derive(Debug, Clone)]
struct PropensityFit {
    model: GradientBoostingClassifier,
    scores: Vec<f64>,
    weights: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Benchmark {
    focal: Vec<bool>,
    predictors: DesignMatrix,
    evaluation: DesignMatrix,
    weighting: WeightingOptions,
    stage: EstimatorStage,
    fitted: Option<PropensityFit>,
    outcomes: Vec<OutcomeEstimate>,
}

impl Benchmark {
    /// Encode the predictor and evaluation features of `data`.
    ///
    /// `focal_indicator` must have one entry per row.
    pub fn new<P, E>(
        data: &DataFrame,
        focal_indicator: Vec<bool>,
        predictor_features: &[P],
        evaluation_features: &[E],
    ) -> Result<Self>
    where
        P: AsRef<str>,
        E: AsRef<str>,
    {
        if data.height() == 0 {
            return Err(ScorecardError::EmptyDataset);
        }
        if focal_indicator.len() != data.height() {
            return Err(ScorecardError::LengthMismatch {
                what: "focal indicator",
                expected: data.height(),
                actual: focal_indicator.len(),
            });
        }
        let predictors = DesignMatrix::from_frame(data, predictor_features)?;
        let evaluation = DesignMatrix::from_frame(data, evaluation_features)?;
        info!(
            rows = data.height(),
            focal_rows = focal_indicator.iter().filter(|&&f| f).count(),
            predictor_columns = predictors.ncols(),
            evaluation_columns = evaluation.ncols(),
            "benchmark constructed"
        );
        Ok(Self {
            focal: focal_indicator,
            predictors,
            evaluation,
            weighting: WeightingOptions::default(),
            stage: EstimatorStage::Constructed,
            fitted: None,
            outcomes: Vec::new(),
        })
    }

    /// Replace how propensity scores become weights. Applies from the next `fit`.
    #[must_use]
    pub fn with_weighting(mut self, weighting: WeightingOptions) -> Self {
        self.weighting = weighting;
        self
    }

    /// Train the propensity model and compute ATT weights.
    ///
    /// Overwrites any previous fit and discards stale outcome estimates. On
    /// error the estimator keeps its previous state.
    pub fn fit(&mut self, params: &BoostingParams) -> Result<()> {
        let _span = info_span!(
            "fit",
            learning_rate = params.learning_rate,
            n_estimators = params.n_estimators
        )
        .entered();

        let model = GradientBoostingClassifier::fit(self.predictors.values(), &self.focal, params)?;
        let scores = model.predict_proba(self.predictors.values());
        if let Some(bounds) = self.weighting.bounds {
            let clipped = scores
                .iter()
                .zip(&self.focal)
                .filter(|&(&score, &is_focal)| !is_focal && bounds.clip(score) != score)
                .count();
            if clipped > 0 {
                warn!(
                    clipped,
                    min = bounds.min,
                    max = bounds.max,
                    "clipped non-focal propensity scores"
                );
            }
        }
        let weights = att_weights(&self.focal, &scores, self.weighting.bounds)?;

        self.fitted = Some(PropensityFit {
            model,
            scores,
            weights,
        });
        self.outcomes.clear();
        self.stage = EstimatorStage::Fitted;
        info!(stage = %self.stage, "propensity model fitted");
        Ok(())
    }

    /// [`fit`](Self::fit) with default tree settings.
    pub fn fit_with(&mut self, learning_rate: f64, n_estimators: usize) -> Result<()> {
        self.fit(&BoostingParams::new(learning_rate, n_estimators))
    }

    /// Estimate the focal effect on every evaluation design column.
    ///
    /// Each column is regressed on the predictor design plus a trailing focal
    /// indicator, weighted by the ATT weights; the focal coefficient rounded
    /// to `rounding_digits` is the estimate. Every call replaces the stored
    /// estimates, so repeated calls never accumulate duplicates.
    pub fn evaluate(&mut self, rounding_digits: u32) -> Result<&[OutcomeEstimate]> {
        let weights = &self.require_fit("evaluate")?.weights;
        let _span = info_span!("evaluate", outcomes = self.evaluation.ncols()).entered();

        let regressors = self.predictors.with_indicator(FOCAL_COLUMN, &self.focal)?;
        let focal_index = regressors.ncols() - 1;
        let mut outcomes = Vec::with_capacity(self.evaluation.ncols());
        for (name, response) in self.evaluation.iter_columns() {
            let fit = weighted_least_squares(regressors.values(), response, weights)?;
            let effect = round_to(fit.coefficients[focal_index], rounding_digits);
            info!(outcome = name, effect, "outcome estimated");
            outcomes.push(OutcomeEstimate {
                outcome: name.to_string(),
                effect,
            });
        }

        self.outcomes = outcomes;
        self.stage = EstimatorStage::Evaluated;
        Ok(&self.outcomes)
    }

    /// Focal mean against weighted non-focal mean for every predictor column.
    ///
    /// Logs one `covariate:(focal, control)` line per column and returns the
    /// same figures as a [`BalanceReport`].
    pub fn calc_balance(&self, rounding_digits: u32) -> Result<BalanceReport> {
        let weights = &self.require_fit("calc_balance")?.weights;
        let mut stats = Vec::with_capacity(self.predictors.ncols());
        for (name, values) in self.predictors.iter_columns() {
            let (focal_mean, weighted_control_mean) =
                balance(values, &self.focal, weights, rounding_digits)?;
            let stat = BalanceStat {
                covariate: name.to_string(),
                focal_mean,
                weighted_control_mean,
            };
            info!("{}", stat.line());
            stats.push(stat);
        }
        Ok(BalanceReport { stats })
    }

    /// Summary of the fitted propensity distribution.
    pub fn propensity_summary(&self) -> Result<PropensitySummary> {
        let fit = self.require_fit("summarize propensity")?;
        let mut focal_scores = Vec::new();
        let mut control_scores = Vec::new();
        let mut control_weights = Vec::new();
        for ((&score, &weight), &is_focal) in fit.scores.iter().zip(&fit.weights).zip(&self.focal)
        {
            if is_focal {
                focal_scores.push(score);
            } else {
                control_scores.push(score);
                control_weights.push(weight);
            }
        }
        Ok(PropensitySummary {
            mean: mean(&fit.scores),
            min: fit.scores.iter().copied().fold(f64::INFINITY, f64::min),
            max: fit.scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            focal_mean: mean(&focal_scores),
            control_mean: mean(&control_scores),
            focal_count: focal_scores.len(),
            control_count: control_scores.len(),
            control_effective_size: effective_sample_size(&control_weights),
        })
    }

    pub fn stage(&self) -> EstimatorStage {
        self.stage
    }

    pub fn focal_indicator(&self) -> &[bool] {
        &self.focal
    }

    pub fn predictor_columns(&self) -> &[String] {
        self.predictors.column_names()
    }

    pub fn evaluation_columns(&self) -> &[String] {
        self.evaluation.column_names()
    }

    pub fn predictors(&self) -> &DesignMatrix {
        &self.predictors
    }

    pub fn evaluation(&self) -> &DesignMatrix {
        &self.evaluation
    }

    /// Fitted propensity scores; empty before `fit`.
    pub fn propensity_scores(&self) -> &[f64] {
        self.fitted.as_ref().map_or(&[], |fit| fit.scores.as_slice())
    }

    /// ATT weights; empty before `fit`.
    pub fn weights(&self) -> &[f64] {
        self.fitted.as_ref().map_or(&[], |fit| fit.weights.as_slice())
    }

    pub fn model(&self) -> Option<&GradientBoostingClassifier> {
        self.fitted.as_ref().map(|fit| &fit.model)
    }

    /// Estimates from the latest `evaluate`.
    pub fn outcomes(&self) -> &[OutcomeEstimate] {
        &self.outcomes
    }

    /// Bare effect values from the latest `evaluate`, in column order.
    pub fn effects(&self) -> Vec<f64> {
        self.outcomes.iter().map(|outcome| outcome.effect).collect()
    }

    fn require_fit(&self, operation: &'static str) -> Result<&PropensityFit> {
        match &self.fitted {
            Some(fit) if self.stage.has_weights() => Ok(fit),
            _ => Err(ScorecardError::InvalidStage {
                operation,
                stage: self.stage,
            }),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

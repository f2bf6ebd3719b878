//! Gradient-boosted binary classifier for propensity estimation.
//!
//! Log-loss boosting over least-squares regression trees. Each stage fits a
//! tree to the residual `y - p`, then replaces every leaf with a single
//! Newton step `Σ residual / Σ p(1 - p)` before adding the shrunken tree to
//! the raw score. Training is deterministic unless `subsample < 1`, and even
//! then the row draws come from a seeded `ChaCha8Rng`.

use nalgebra::DMatrix;
use rand::SeedableRng;
use rand::seq::index;
use rand_chacha::ChaCha8Rng;
use scorecard_model::{BoostingParams, Result, ScorecardError};
use tracing::debug;

use crate::tree::{RegressionTree, TreeParams};

/// Newton denominators below this are treated as zero.
const MIN_HESSIAN: f64 = 1e-150;

#[derive(Debug, Clone)]
pub struct GradientBoostingClassifier {
    params: BoostingParams,
    /// Prior log-odds, the raw score before any tree.
    init: f64,
    /// Set when every training label is identical.
    constant: Option<f64>,
    trees: Vec<RegressionTree>,
}

impl GradientBoostingClassifier {
    /// Train on the rows of `x` against binary `labels`.
    pub fn fit(x: &DMatrix<f64>, labels: &[bool], params: &BoostingParams) -> Result<Self> {
        params.validate()?;
        let n = x.nrows();
        if labels.len() != n {
            return Err(ScorecardError::LengthMismatch {
                what: "labels",
                expected: n,
                actual: labels.len(),
            });
        }
        if n == 0 {
            return Err(ScorecardError::EmptyDataset);
        }

        let y: Vec<f64> = labels.iter().map(|&l| if l { 1.0 } else { 0.0 }).collect();
        let positives = y.iter().sum::<f64>();
        let prior = positives / n as f64;
        if prior == 0.0 || prior == 1.0 {
            debug!(prior, "all labels identical; propensity model is constant");
            return Ok(Self {
                params: params.clone(),
                init: 0.0,
                constant: Some(prior),
                trees: Vec::new(),
            });
        }

        let init = (prior / (1.0 - prior)).ln();
        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            min_samples_leaf: params.min_samples_leaf,
        };
        let in_bag = ((params.subsample * n as f64) as usize).clamp(1, n);
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed.unwrap_or(0));
        let mut raw = vec![init; n];
        let mut trees = Vec::with_capacity(params.n_estimators);

        for stage in 0..params.n_estimators {
            let probabilities: Vec<f64> = raw.iter().map(|&f| sigmoid(f)).collect();
            let residuals: Vec<f64> = y
                .iter()
                .zip(&probabilities)
                .map(|(label, p)| label - p)
                .collect();
            let rows = if in_bag < n {
                let mut rows = index::sample(&mut rng, n, in_bag).into_vec();
                rows.sort_unstable();
                rows
            } else {
                (0..n).collect()
            };

            let (mut tree, leaves) = RegressionTree::fit(x, &residuals, rows, tree_params);
            for leaf in &leaves {
                let numerator: f64 = leaf.rows.iter().map(|&row| residuals[row]).sum();
                let denominator: f64 = leaf
                    .rows
                    .iter()
                    .map(|&row| probabilities[row] * (1.0 - probabilities[row]))
                    .sum();
                let value = if denominator.abs() < MIN_HESSIAN {
                    0.0
                } else {
                    numerator / denominator
                };
                tree.set_leaf_value(leaf.node, value);
            }

            for (row, score) in raw.iter_mut().enumerate() {
                *score += params.learning_rate * tree.predict_row(x, row);
            }
            trees.push(tree);

            if (stage + 1) % 100 == 0 {
                debug!(
                    stage = stage + 1,
                    log_loss = log_loss(&y, &raw),
                    "boosting progress"
                );
            }
        }

        debug!(
            trees = trees.len(),
            log_loss = log_loss(&y, &raw),
            "propensity model trained"
        );
        Ok(Self {
            params: params.clone(),
            init,
            constant: None,
            trees,
        })
    }

    /// Raw log-odds for every row of `x`.
    pub fn decision_function(&self, x: &DMatrix<f64>) -> Vec<f64> {
        let mut raw = vec![self.init; x.nrows()];
        for tree in &self.trees {
            for (row, score) in raw.iter_mut().enumerate() {
                *score += self.params.learning_rate * tree.predict_row(x, row);
            }
        }
        raw
    }

    /// Probability of the positive class for every row of `x`.
    pub fn predict_proba(&self, x: &DMatrix<f64>) -> Vec<f64> {
        if let Some(p) = self.constant {
            return vec![p; x.nrows()];
        }
        self.decision_function(x)
            .into_iter()
            .map(sigmoid)
            .collect()
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn params(&self) -> &BoostingParams {
        &self.params
    }

    pub fn is_constant(&self) -> bool {
        self.constant.is_some()
    }
}

pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Mean binomial deviance of raw scores, computed without forming `p`.
fn log_loss(y: &[f64], raw: &[f64]) -> f64 {
    let total: f64 = y
        .iter()
        .zip(raw)
        .map(|(label, f)| softplus(*f) - label * f)
        .sum();
    total / y.len().max(1) as f64
}

fn softplus(x: f64) -> f64 {
    if x > 0.0 {
        x + (-x).exp().ln_1p()
    } else {
        x.exp().ln_1p()
    }
}

//! Weighted least squares with an intercept.
//!
//! X and y are centred on their weighted means, rows are scaled by
//! `sqrt(w)`, and the centred system is solved by SVD. Singular values below
//! `RANK_TOLERANCE * s_max` are dropped, which yields the minimum-norm
//! solution when the design is collinear (a full set of dummies alongside the
//! intercept, for example). Coefficients of identified directions are
//! unaffected.

use nalgebra::{DMatrix, DVector};
use scorecard_model::{Result, ScorecardError};

/// Relative cut-off for treating a singular value as zero.
const RANK_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq)]
pub struct LinearFit {
    /// One coefficient per column of the design matrix.
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(beta, x)| beta * x)
                .sum::<f64>()
    }
}

/// Fit `y ≈ intercept + x β` minimising `Σ w_i (y_i - ŷ_i)²`.
pub fn weighted_least_squares(x: &DMatrix<f64>, y: &[f64], weights: &[f64]) -> Result<LinearFit> {
    let (n, p) = x.shape();
    if y.len() != n {
        return Err(ScorecardError::LengthMismatch {
            what: "response",
            expected: n,
            actual: y.len(),
        });
    }
    if weights.len() != n {
        return Err(ScorecardError::LengthMismatch {
            what: "weights",
            expected: n,
            actual: weights.len(),
        });
    }
    if n == 0 {
        return Err(ScorecardError::EmptyDataset);
    }
    if let Some((row, &weight)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(ScorecardError::InvalidWeights { row, weight });
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(ScorecardError::ZeroWeightSum);
    }

    let x_mean: Vec<f64> = (0..p)
        .map(|j| {
            x.column(j)
                .iter()
                .zip(weights)
                .map(|(value, w)| value * w)
                .sum::<f64>()
                / total
        })
        .collect();
    let y_mean = y.iter().zip(weights).map(|(value, w)| value * w).sum::<f64>() / total;

    if p == 0 {
        return Ok(LinearFit {
            coefficients: Vec::new(),
            intercept: y_mean,
        });
    }

    let root_w: Vec<f64> = weights.iter().map(|w| w.sqrt()).collect();
    let centred = DMatrix::from_fn(n, p, |i, j| root_w[i] * (x[(i, j)] - x_mean[j]));
    let response = DVector::from_fn(n, |i, _| root_w[i] * (y[i] - y_mean));

    let svd = centred.svd(true, true);
    let s_max = svd.singular_values.max();
    let tolerance = RANK_TOLERANCE * s_max;
    let beta = svd
        .solve(&response, tolerance)
        .map_err(|message| ScorecardError::Singular(message.to_string()))?;

    let intercept = y_mean
        - beta
            .iter()
            .zip(&x_mean)
            .map(|(b, mean)| b * mean)
            .sum::<f64>();
    Ok(LinearFit {
        coefficients: beta.iter().copied().collect(),
        intercept,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn recovers_exact_line() {
        let x = DMatrix::from_column_slice(4, 1, &[0.0, 1.0, 2.0, 3.0]);
        let y = [1.0, 3.0, 5.0, 7.0];
        let fit = weighted_least_squares(&x, &y, &[1.0; 4]).expect("fit");

        assert!(close(fit.coefficients[0], 2.0));
        assert!(close(fit.intercept, 1.0));
        assert!(close(fit.predict_row(&[4.0]), 9.0));
    }

    #[test]
    fn weights_shift_the_fit() {
        // Intercept-only regression reduces to the weighted mean.
        let x = DMatrix::<f64>::zeros(3, 0);
        let fit = weighted_least_squares(&x, &[1.0, 2.0, 6.0], &[1.0, 1.0, 2.0]).expect("fit");

        assert!(close(fit.intercept, 15.0 / 4.0));
    }

    #[test]
    fn zero_weight_rows_are_ignored() {
        let x = DMatrix::from_column_slice(4, 1, &[0.0, 1.0, 2.0, 3.0]);
        let y = [0.0, 1.0, 2.0, 100.0];
        let fit = weighted_least_squares(&x, &y, &[1.0, 1.0, 1.0, 0.0]).expect("fit");

        assert!(close(fit.coefficients[0], 1.0));
        assert!(close(fit.intercept, 0.0));
    }

    #[test]
    fn tolerates_full_dummy_set_with_intercept() {
        // group_a + group_b == 1, collinear with the intercept.
        let x = DMatrix::from_column_slice(
            4,
            3,
            &[
                1.0, 1.0, 0.0, 0.0, // group_a
                0.0, 0.0, 1.0, 1.0, // group_b
                1.0, 0.0, 1.0, 0.0, // treated
            ],
        );
        let y = [10.0, 5.0, 12.0, 4.0];
        let fit = weighted_least_squares(&x, &y, &[1.0; 4]).expect("fit");

        assert!(close(fit.coefficients[2], 6.5));
        assert!(close(fit.coefficients[0], -fit.coefficients[1]));
    }

    #[test]
    fn rejects_negative_weight() {
        let x = DMatrix::from_column_slice(2, 1, &[0.0, 1.0]);
        let err = weighted_least_squares(&x, &[0.0, 1.0], &[1.0, -1.0]).unwrap_err();

        assert!(matches!(err, ScorecardError::InvalidWeights { row: 1, .. }));
    }

    #[test]
    fn rejects_all_zero_weights() {
        let x = DMatrix::from_column_slice(2, 1, &[0.0, 1.0]);
        let err = weighted_least_squares(&x, &[0.0, 1.0], &[0.0, 0.0]).unwrap_err();

        assert!(matches!(err, ScorecardError::ZeroWeightSum));
    }
}

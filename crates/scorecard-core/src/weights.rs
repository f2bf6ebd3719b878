//! Average-treatment-effect-on-the-treated (ATT) weights.

use scorecard_model::{PropensityBounds, Result, ScorecardError};

/// ATT weight per row: 1 for focal rows, `score / (1 - score)` otherwise.
///
/// With `bounds`, non-focal scores are clipped into the interval first.
/// Without bounds a non-focal score of 1 (or above) has no finite odds and
/// is reported as [`ScorecardError::SaturatedPropensity`].
pub fn att_weights(
    focal: &[bool],
    scores: &[f64],
    bounds: Option<PropensityBounds>,
) -> Result<Vec<f64>> {
    if scores.len() != focal.len() {
        return Err(ScorecardError::LengthMismatch {
            what: "propensity scores",
            expected: focal.len(),
            actual: scores.len(),
        });
    }
    focal
        .iter()
        .zip(scores)
        .enumerate()
        .map(|(row, (&is_focal, &score))| {
            if is_focal {
                return Ok(1.0);
            }
            let score = bounds.map_or(score, |b| b.clip(score));
            if score >= 1.0 {
                return Err(ScorecardError::SaturatedPropensity { row, score });
            }
            Ok(score / (1.0 - score))
        })
        .collect()
}

/// Kish effective sample size `(Σw)² / Σw²`; 0 for an empty or all-zero set.
pub fn effective_sample_size(weights: &[f64]) -> f64 {
    let sum: f64 = weights.iter().sum();
    let sum_sq: f64 = weights.iter().map(|w| w * w).sum();
    if sum_sq > 0.0 { sum * sum / sum_sq } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focal_rows_weigh_one() {
        let weights = att_weights(&[true, false, true], &[0.9, 0.25, 0.1], None).unwrap();
        assert_eq!(weights[0], 1.0);
        assert_eq!(weights[2], 1.0);
        assert!((weights[1] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn saturated_control_score_is_an_error() {
        let err = att_weights(&[true, false], &[0.5, 1.0], None).unwrap_err();
        assert!(matches!(err, ScorecardError::SaturatedPropensity { row: 1, .. }));
    }

    #[test]
    fn saturated_focal_score_is_fine() {
        let weights = att_weights(&[true, false], &[1.0, 0.5], None).unwrap();
        assert_eq!(weights, vec![1.0, 1.0]);
    }

    #[test]
    fn bounds_clip_before_weighting() {
        let bounds = PropensityBounds::new(0.05, 0.95).unwrap();
        let weights = att_weights(&[false, false], &[1.0, 0.0], Some(bounds)).unwrap();
        assert!((weights[0] - 19.0).abs() < 1e-9);
        assert!((weights[1] - 0.05 / 0.95).abs() < 1e-12);
    }

    #[test]
    fn kish_size_of_equal_weights_is_count() {
        assert_eq!(effective_sample_size(&[2.0, 2.0, 2.0]), 3.0);
        assert_eq!(effective_sample_size(&[]), 0.0);
    }
}

//! Covariate balance under ATT weights.

use scorecard_model::{Result, ScorecardError};

/// Round to `digits` decimal places via the correctly rounded decimal form.
pub fn round_to(value: f64, digits: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.prec$}", prec = digits as usize)
        .parse()
        .unwrap_or(value)
}

/// `Σ w x / Σ w`.
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> Result<f64> {
    if values.len() != weights.len() {
        return Err(ScorecardError::LengthMismatch {
            what: "weights",
            expected: values.len(),
            actual: weights.len(),
        });
    }
    let total: f64 = weights.iter().sum();
    if total == 0.0 {
        return Err(ScorecardError::ZeroWeightSum);
    }
    Ok(values.iter().zip(weights).map(|(v, w)| v * w).sum::<f64>() / total)
}

/// `(focal mean, weighted non-focal mean)` of one covariate, both rounded.
///
/// Focal rows are averaged without weights; non-focal rows use their own ATT
/// weights. Either side being empty is [`ScorecardError::EmptyGroup`].
pub fn balance(values: &[f64], focal: &[bool], weights: &[f64], digits: u32) -> Result<(f64, f64)> {
    if focal.len() != values.len() {
        return Err(ScorecardError::LengthMismatch {
            what: "focal indicator",
            expected: values.len(),
            actual: focal.len(),
        });
    }
    if weights.len() != values.len() {
        return Err(ScorecardError::LengthMismatch {
            what: "weights",
            expected: values.len(),
            actual: weights.len(),
        });
    }

    let mut focal_values = Vec::new();
    let mut control_values = Vec::new();
    let mut control_weights = Vec::new();
    for ((&value, &is_focal), &weight) in values.iter().zip(focal).zip(weights) {
        if is_focal {
            focal_values.push(value);
        } else {
            control_values.push(value);
            control_weights.push(weight);
        }
    }
    if focal_values.is_empty() {
        return Err(ScorecardError::EmptyGroup { group: "focal" });
    }
    if control_values.is_empty() {
        return Err(ScorecardError::EmptyGroup { group: "non-focal" });
    }

    let focal_mean = focal_values.iter().sum::<f64>() / focal_values.len() as f64;
    let control_mean = weighted_mean(&control_values, &control_weights)?;
    Ok((round_to(focal_mean, digits), round_to(control_mean, digits)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_requested_digits() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(-0.987, 1), -1.0);
        assert!(round_to(f64::NAN, 2).is_nan());
    }

    #[test]
    fn balance_weights_only_control_rows() {
        let values = [1.0, 0.0, 1.0, 1.0];
        let focal = [true, true, false, false];
        // Focal weights are never consulted.
        let weights = [100.0, 100.0, 3.0, 1.0];
        let (mf, mc) = balance(&values, &focal, &weights, 2).unwrap();

        assert_eq!(mf, 0.5);
        assert_eq!(mc, 1.0);
    }

    #[test]
    fn weighted_control_mean() {
        let values = [0.0, 10.0, 20.0];
        let focal = [true, false, false];
        let (mf, mc) = balance(&values, &focal, &[1.0, 1.0, 3.0], 2).unwrap();

        assert_eq!(mf, 0.0);
        assert_eq!(mc, 17.5);
    }

    #[test]
    fn missing_control_group_is_an_error() {
        let err = balance(&[1.0, 2.0], &[true, true], &[1.0, 1.0], 2).unwrap_err();
        assert!(matches!(err, ScorecardError::EmptyGroup { group: "non-focal" }));
    }

    #[test]
    fn zero_control_weight_is_an_error() {
        let err = balance(&[1.0, 2.0], &[true, false], &[1.0, 0.0], 2).unwrap_err();
        assert!(matches!(err, ScorecardError::ZeroWeightSum));
    }
}

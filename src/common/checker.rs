//! This file defines some functions that checks some pre-conditions
//! E.g., Length of the parameter vector

use crate::error::{FitError, Result};


/// Check whether the given point has the declared number of variables.
#[inline(always)]
pub(crate) fn parameter_length(expected: usize, point: &[f64]) -> Result<()> {
    let got = point.len();
    if expected != got {
        return Err(FitError::ParameterLength { expected, got });
    }
    Ok(())
}


/// Check whether two parallel sequences have the same length.
#[inline(always)]
pub(crate) fn same_length(
    what: &'static str,
    expected: usize,
    got: usize,
) -> Result<()>
{
    if expected != got {
        return Err(FitError::LengthMismatch { what, expected, got });
    }
    Ok(())
}


/// Check whether the index refers to an existing element.
#[inline(always)]
pub(crate) fn index(index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(FitError::IndexOutOfRange { index, len });
    }
    Ok(())
}


/// Check the weight of an ensemble member.
/// The weight must be a finite positive number.
#[inline(always)]
pub(crate) fn model_weight(weight: f64) -> Result<()> {
    if !weight.is_finite() {
        let reason = "ensemble weights must be finite";
        return Err(FitError::InvalidWeight { weight, reason });
    }
    if weight <= 0f64 {
        let reason = "ensemble weights must be positive";
        return Err(FitError::InvalidWeight { weight, reason });
    }
    Ok(())
}


/// Check the weights of the training examples.
/// Each weight must be finite and non-negative.
#[inline(always)]
pub(crate) fn example_weights(weights: &[f64]) -> Result<()> {
    let bad = weights.iter()
        .copied()
        .find(|w| !w.is_finite() || *w < 0f64);

    match bad {
        Some(weight) => {
            let reason = "example weights must be finite and non-negative";
            Err(FitError::InvalidWeight { weight, reason })
        },
        None => Ok(()),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_length_success() {
        let point = vec![0f64; 3];
        assert!(parameter_length(3, &point).is_ok());
    }

    #[test]
    fn test_parameter_length_failure() {
        let point = vec![0f64; 2];
        let err = parameter_length(3, &point).unwrap_err();
        assert_eq!(err, FitError::ParameterLength { expected: 3, got: 2 });
    }

    #[test]
    fn test_index_failure() {
        assert!(index(0, 1).is_ok());
        assert_eq!(
            index(1, 1).unwrap_err(),
            FitError::IndexOutOfRange { index: 1, len: 1 }
        );
    }

    #[test]
    fn test_model_weight_success() {
        assert!(model_weight(1e-12).is_ok());
        assert!(model_weight(3.5).is_ok());
    }

    #[test]
    fn test_model_weight_failure_01() {
        assert!(model_weight(0f64).is_err());
    }

    #[test]
    fn test_model_weight_failure_02() {
        assert!(model_weight(-1f64).is_err());
        assert!(model_weight(f64::NAN).is_err());
        assert!(model_weight(f64::INFINITY).is_err());
    }

    #[test]
    fn test_example_weights() {
        assert!(example_weights(&[0f64, 1f64, 2.5]).is_ok());
        assert!(example_weights(&[1f64, -0.0001]).is_err());
        assert!(example_weights(&[f64::NAN]).is_err());
    }
}

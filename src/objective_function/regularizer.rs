use serde::{Serialize, Deserialize};

use crate::common::{checker, utils};
use crate::error::Result;

use super::ObjectiveFunction;


/// The squared two-norm penalty `0.5 * ||p||^2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoNormRegularizer {
    n_variables: usize,
}


impl TwoNormRegularizer {
    /// Construct a new penalty on `n_variables` variables.
    pub fn new(n_variables: usize) -> Self {
        Self { n_variables }
    }
}


impl ObjectiveFunction for TwoNormRegularizer {
    fn name(&self) -> &str {
        "TwoNormRegularizer"
    }


    fn number_of_variables(&self) -> usize {
        self.n_variables
    }


    fn has_first_derivative(&self) -> bool {
        true
    }


    fn eval(&self, point: &[f64]) -> Result<f64> {
        checker::parameter_length(self.n_variables, point)?;
        Ok(0.5 * utils::inner_product(point, point))
    }


    fn eval_derivative(&self, point: &[f64], derivative: &mut Vec<f64>)
        -> Result<f64>
    {
        checker::parameter_length(self.n_variables, point)?;
        derivative.clear();
        derivative.extend_from_slice(point);
        Ok(0.5 * utils::inner_product(point, point))
    }
}


/// The one-norm penalty `||p||_1`.
/// Its derivative at `0` is taken to be `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneNormRegularizer {
    n_variables: usize,
}


impl OneNormRegularizer {
    /// Construct a new penalty on `n_variables` variables.
    pub fn new(n_variables: usize) -> Self {
        Self { n_variables }
    }
}


impl ObjectiveFunction for OneNormRegularizer {
    fn name(&self) -> &str {
        "OneNormRegularizer"
    }


    fn number_of_variables(&self) -> usize {
        self.n_variables
    }


    fn has_first_derivative(&self) -> bool {
        true
    }


    fn eval(&self, point: &[f64]) -> Result<f64> {
        checker::parameter_length(self.n_variables, point)?;
        Ok(point.iter().map(|p| p.abs()).sum::<f64>())
    }


    fn eval_derivative(&self, point: &[f64], derivative: &mut Vec<f64>)
        -> Result<f64>
    {
        checker::parameter_length(self.n_variables, point)?;
        derivative.clear();
        derivative.extend(
            point.iter().map(|&p| if p == 0f64 { 0f64 } else { p.signum() })
        );
        Ok(point.iter().map(|p| p.abs()).sum::<f64>())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_norm() {
        let r = TwoNormRegularizer::new(3);
        let point = [1.0, -2.0, 2.0];
        assert_eq!(r.eval(&point).unwrap(), 4.5);

        let mut derivative = Vec::new();
        let value = r.eval_derivative(&point, &mut derivative).unwrap();
        assert_eq!(value, 4.5);
        assert_eq!(derivative, vec![1.0, -2.0, 2.0]);
    }

    #[test]
    fn test_one_norm() {
        let r = OneNormRegularizer::new(3);
        let point = [1.0, -2.0, 0.0];
        assert_eq!(r.eval(&point).unwrap(), 3.0);

        let mut derivative = Vec::new();
        r.eval_derivative(&point, &mut derivative).unwrap();
        assert_eq!(derivative, vec![1.0, -1.0, 0.0]);
    }

    #[test]
    fn test_wrong_length() {
        let r = TwoNormRegularizer::new(2);
        assert!(r.eval(&[1.0]).is_err());
    }
}

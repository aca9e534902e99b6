//! The loss interface consumed by the error function.
use crate::error::{FitError, Result};


/// This trait defines the loss functions.
///
/// A loss compares a label with a model output.
/// The error function only requires `eval_at_point`;
/// `derivative_at_point` is needed for gradients.
pub trait Loss {
    /// The type of a label.
    type Label;
    /// The type of a model output.
    type Output;


    /// The name of the loss function.
    fn name(&self) -> &str;


    /// Loss value for a single point.
    fn eval_at_point(&self, label: &Self::Label, output: &Self::Output) -> f64;


    /// Sum of the loss values over a batch.
    fn eval(&self, labels: &[Self::Label], outputs: &[Self::Output]) -> f64 {
        assert_eq!(labels.len(), outputs.len());

        labels.iter()
            .zip(outputs)
            .map(|(y, o)| self.eval_at_point(y, o))
            .sum::<f64>()
    }


    /// Returns `true` if `derivative_at_point` is available.
    fn has_first_derivative(&self) -> bool {
        false
    }


    /// Loss value for a single point and
    /// its gradient with respect to the (flattened) output.
    fn derivative_at_point(
        &self,
        _label: &Self::Label,
        _output: &Self::Output,
    ) -> Result<(f64, Vec<f64>)>
    {
        Err(FitError::DerivativeUnavailable(self.name().to_string()))
    }


    /// Sum of the loss values over a batch.
    /// `gradient[i]` receives the output gradient of the `i`-th example.
    fn eval_derivative(
        &self,
        labels: &[Self::Label],
        outputs: &[Self::Output],
        gradient: &mut Vec<Vec<f64>>,
    ) -> Result<f64>
    {
        assert_eq!(labels.len(), outputs.len());

        gradient.clear();
        gradient.reserve(labels.len());

        let mut value = 0f64;
        for (y, o) in labels.iter().zip(outputs) {
            let (v, g) = self.derivative_at_point(y, o)?;
            value += v;
            gradient.push(g);
        }
        Ok(value)
    }
}

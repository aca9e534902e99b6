//! Objective functions over a flat parameter vector.
//!
//! [`ErrorFunction`] is the objective an optimizer minimizes
//! to fit a model to labeled data.
//! [`TwoNormRegularizer`] and [`OneNormRegularizer`]
//! can be added to it as a penalty.

/// Defines the batch selection strategies.
pub mod batch_selection;
/// Defines the error function.
pub mod error_function;
/// Defines the builder of the error function.
pub mod builder;
/// Defines the regularizers.
pub mod regularizer;
// Type erasure over (dataset, model, loss).
pub(crate) mod function_wrapper;

pub use batch_selection::BatchSelection;
pub use error_function::ErrorFunction;
pub use builder::ErrorFunctionBuilder;
pub use regularizer::{OneNormRegularizer, TwoNormRegularizer};

use crate::error::{FitError, Result};


/// A scalar function of a parameter vector,
/// as seen by an optimizer.
pub trait ObjectiveFunction: Send + Sync {
    /// The name of the objective.
    fn name(&self) -> &str;


    /// Returns the number of variables.
    fn number_of_variables(&self) -> usize;


    /// Returns `true` if `eval_derivative` is available.
    fn has_first_derivative(&self) -> bool {
        false
    }


    /// Returns a point an optimizer can start from.
    fn propose_starting_point(&self) -> Vec<f64> {
        vec![0f64; self.number_of_variables()]
    }


    /// Evaluates the objective at `point`.
    fn eval(&self, point: &[f64]) -> Result<f64>;


    /// Evaluates the objective at `point` and writes the gradient
    /// into `derivative`, which is resized to `number_of_variables()`.
    /// Returns the same value as `eval`.
    fn eval_derivative(&self, _point: &[f64], _derivative: &mut Vec<f64>)
        -> Result<f64>
    {
        Err(FitError::DerivativeUnavailable(self.name().to_string()))
    }


    /// Returns the settings of the objective
    /// as pairs of `(key, value)`.
    fn info(&self) -> Option<Vec<(String, String)>> {
        None
    }
}

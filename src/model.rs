//! The model interface consumed by the error function and the ensembles.
use serde::{Serialize, Deserialize};

use crate::error::{FitError, Result};


/// The shape of a single input or output point.
/// A vector of length `n` has the shape `[n]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape(Vec<usize>);


impl Shape {
    /// Construct a new shape from its dimensions.
    pub fn new(dims: Vec<usize>) -> Self {
        Self(dims)
    }


    /// The shape of a vector with `n` entries.
    pub fn vector(n: usize) -> Self {
        Self(vec![n])
    }


    /// Returns the dimensions.
    pub fn dims(&self) -> &[usize] {
        &self.0[..]
    }


    /// Returns the number of scalar entries of a point of this shape.
    /// The empty shape has no entries.
    pub fn num_elements(&self) -> usize {
        if self.0.is_empty() {
            return 0;
        }
        self.0.iter().product()
    }


    /// Returns `true` if no dimension is known.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}


impl From<usize> for Shape {
    fn from(n: usize) -> Self {
        Self::vector(n)
    }
}


/// A parametric model mapping batches of inputs to batches of outputs.
///
/// The parameters are passed explicitly to [`Model::eval_with`],
/// so that evaluating a batch never mutates the model.
/// [`Model::eval`] is the convenience form that uses
/// the parameters stored in the model.
pub trait Model {
    /// The type of an input point.
    type Input;
    /// The type of an output point.
    type Output;
    /// Intermediate results of `eval_with`
    /// that `weighted_parameter_derivative` may reuse.
    type State: Default;


    /// The name of the model.
    fn name(&self) -> &str;


    /// Returns the expected shape of an input point.
    fn input_shape(&self) -> Shape;


    /// Returns the shape of an output point.
    fn output_shape(&self) -> Shape;


    /// Returns the stored parameters.
    fn parameter_vector(&self) -> Vec<f64>;


    /// Replaces the stored parameters.
    /// Fails if `parameters` does not have
    /// `number_of_parameters()` entries.
    fn set_parameter_vector(&mut self, parameters: &[f64]) -> Result<()>;


    /// Returns the number of parameters.
    fn number_of_parameters(&self) -> usize {
        self.parameter_vector().len()
    }


    /// Evaluates the model with the given `parameters`
    /// on a batch of inputs.
    /// `state` receives whatever the derivative computation needs.
    fn eval_with(
        &self,
        parameters: &[f64],
        inputs: &[Self::Input],
        state: &mut Self::State,
    ) -> Result<Vec<Self::Output>>;


    /// Evaluates the model with its stored parameters.
    fn eval(&self, inputs: &[Self::Input]) -> Result<Vec<Self::Output>> {
        let parameters = self.parameter_vector();
        let mut state = Self::State::default();
        self.eval_with(&parameters[..], inputs, &mut state)
    }


    /// Returns `true` if `weighted_parameter_derivative` is available.
    fn has_first_parameter_derivative(&self) -> bool {
        false
    }


    /// Chain rule through the model.
    ///
    /// `coefficients[i]` is the derivative of some scalar
    /// with respect to the (flattened) `i`-th output of the last
    /// `eval_with(parameters, inputs, state)` call.
    /// This method adds
    /// `sum_i coefficients[i]^T d output_i / d parameters`
    /// to `gradient`, which has `number_of_parameters()` entries.
    fn weighted_parameter_derivative(
        &self,
        _parameters: &[f64],
        _inputs: &[Self::Input],
        _state: &Self::State,
        _coefficients: &[Vec<f64>],
        _gradient: &mut [f64],
    ) -> Result<()>
    {
        Err(FitError::DerivativeUnavailable(self.name().to_string()))
    }
}

//! Type erasure for the error function.
//!
//! `ErrorFunction` holds a `Box<dyn FunctionWrapper>`,
//! so that the concrete dataset, model and loss types
//! do not leak into its signature.
use std::sync::Arc;

use rayon::prelude::*;

use crate::common::{checker, utils};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::loss::Loss;
use crate::model::Model;


/// The numeric interface of a (dataset, model, loss) triple.
///
/// `eval` and `eval_derivative` return the *unnormalized* sums
/// over the given batches together with the mass of those batches.
pub(crate) trait FunctionWrapper: Send + Sync {
    fn model_name(&self) -> &str;
    fn loss_name(&self) -> &str;
    fn number_of_variables(&self) -> usize;
    fn number_of_batches(&self) -> usize;
    fn number_of_elements(&self) -> usize;
    fn has_first_derivative(&self) -> bool;
    fn is_weighted(&self) -> bool;
    fn propose_starting_point(&self) -> Vec<f64>;
    fn eval(&self, point: &[f64], batches: &[usize]) -> Result<BatchSum>;
    fn eval_derivative(&self, point: &[f64], batches: &[usize])
        -> Result<BatchSum>;
    fn clone_box(&self) -> Box<dyn FunctionWrapper>;
}


/// Accumulated error (and gradient) over a set of batches.
#[derive(Debug, Clone)]
pub(crate) struct BatchSum {
    pub(crate) error: f64,
    pub(crate) gradient: Vec<f64>,
    pub(crate) mass: f64,
}


impl BatchSum {
    /// Adds the sums of `other` in place.
    fn merge(mut self, other: Self) -> Self {
        self.error += other.error;
        self.mass += other.mass;
        if self.gradient.is_empty() {
            self.gradient = other.gradient;
        } else if !other.gradient.is_empty() {
            utils::axpy(1f64, &other.gradient, &mut self.gradient);
        }
        self
    }
}


/// The generic adapter behind `FunctionWrapper`.
pub(crate) struct ErrorFunctionImpl<D, M, L> {
    data: Arc<D>,
    model: M,
    loss: L,
    parallel: bool,
}


impl<D, M, L> ErrorFunctionImpl<D, M, L>
    where D: Dataset,
          M: Model<Input = D::Input> + Send + Sync,
          L: Loss<Label = D::Label, Output = M::Output> + Send + Sync,
{
    pub(crate) fn new(data: Arc<D>, model: M, loss: L, parallel: bool)
        -> Self
    {
        Self { data, model, loss, parallel }
    }


    /// Runs `f` on every batch in `batches` and sums the results
    /// in the order of `batches`.
    fn reduce<F>(&self, batches: &[usize], f: F) -> Result<BatchSum>
        where F: Fn(usize) -> Result<BatchSum> + Send + Sync,
    {
        let sums = if self.parallel && batches.len() > 1 {
            batches.par_iter()
                .map(|&b| f(b))
                .collect::<Result<Vec<_>>>()?
        } else {
            batches.iter()
                .map(|&b| f(b))
                .collect::<Result<Vec<_>>>()?
        };

        let zero = BatchSum { error: 0f64, gradient: Vec::new(), mass: 0f64 };
        Ok(sums.into_iter().fold(zero, BatchSum::merge))
    }


    fn outputs(&self, point: &[f64], b: usize, state: &mut M::State)
        -> Result<Vec<M::Output>>
    {
        let inputs = self.data.batch_inputs(b);
        let outputs = self.model.eval_with(point, inputs, state)?;
        checker::same_length("model outputs", inputs.len(), outputs.len())?;
        Ok(outputs)
    }


    fn batch_error(&self, point: &[f64], b: usize) -> Result<BatchSum> {
        let mut state = M::State::default();
        let outputs = self.outputs(point, b, &mut state)?;
        let labels = self.data.batch_labels(b);

        let error = match self.data.batch_weights(b) {
            None => self.loss.eval(labels, &outputs[..]),
            Some(weights) => {
                labels.iter()
                    .zip(&outputs)
                    .zip(weights)
                    .map(|((y, o), w)| w * self.loss.eval_at_point(y, o))
                    .sum::<f64>()
            },
        };

        let mass = self.data.batch_mass(b);
        Ok(BatchSum { error, gradient: Vec::new(), mass })
    }


    fn batch_error_derivative(&self, point: &[f64], b: usize)
        -> Result<BatchSum>
    {
        let mut state = M::State::default();
        let outputs = self.outputs(point, b, &mut state)?;
        let labels = self.data.batch_labels(b);

        let mut coefficients = Vec::with_capacity(labels.len());
        let error = match self.data.batch_weights(b) {
            None => {
                self.loss.eval_derivative(
                    labels, &outputs[..], &mut coefficients
                )?
            },
            Some(weights) => {
                let mut error = 0f64;
                for ((y, o), &w) in labels.iter().zip(&outputs).zip(weights) {
                    let (value, mut grad) = self.loss.derivative_at_point(y, o)?;
                    utils::scale(w, &mut grad[..]);
                    error += w * value;
                    coefficients.push(grad);
                }
                error
            },
        };

        let mut gradient = vec![0f64; self.model.number_of_parameters()];
        self.model.weighted_parameter_derivative(
            point,
            self.data.batch_inputs(b),
            &state,
            &coefficients[..],
            &mut gradient[..],
        )?;

        let mass = self.data.batch_mass(b);
        Ok(BatchSum { error, gradient, mass })
    }
}


impl<D, M, L> FunctionWrapper for ErrorFunctionImpl<D, M, L>
    where D: Dataset + 'static,
          M: Model<Input = D::Input> + Clone + Send + Sync + 'static,
          L: Loss<Label = D::Label, Output = M::Output>
              + Clone + Send + Sync + 'static,
{
    fn model_name(&self) -> &str {
        self.model.name()
    }


    fn loss_name(&self) -> &str {
        self.loss.name()
    }


    fn number_of_variables(&self) -> usize {
        self.model.number_of_parameters()
    }


    fn number_of_batches(&self) -> usize {
        self.data.number_of_batches()
    }


    fn number_of_elements(&self) -> usize {
        self.data.number_of_elements()
    }


    fn has_first_derivative(&self) -> bool {
        self.model.has_first_parameter_derivative()
            && self.loss.has_first_derivative()
    }


    fn is_weighted(&self) -> bool {
        self.data.number_of_batches() > 0
            && self.data.batch_weights(0).is_some()
    }


    fn propose_starting_point(&self) -> Vec<f64> {
        self.model.parameter_vector()
    }


    fn eval(&self, point: &[f64], batches: &[usize]) -> Result<BatchSum> {
        self.reduce(batches, |b| self.batch_error(point, b))
    }


    fn eval_derivative(&self, point: &[f64], batches: &[usize])
        -> Result<BatchSum>
    {
        let mut sum = self.reduce(
            batches, |b| self.batch_error_derivative(point, b)
        )?;
        sum.gradient.resize(self.number_of_variables(), 0f64);
        Ok(sum)
    }


    fn clone_box(&self) -> Box<dyn FunctionWrapper> {
        Box::new(Self {
            data: Arc::clone(&self.data),
            model: self.model.clone(),
            loss: self.loss.clone(),
            parallel: self.parallel,
        })
    }
}

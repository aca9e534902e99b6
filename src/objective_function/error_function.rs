use std::fmt;
use std::sync::Arc;

use log::{debug, trace, warn};
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::common::{checker, utils};
use crate::constants::DEFAULT_PARALLEL;
use crate::dataset::{Dataset, LabeledData, WeightedLabeledData};
use crate::error::{FitError, Result};
use crate::loss::Loss;
use crate::model::Model;

use super::{BatchSelection, ObjectiveFunction};
use super::function_wrapper::{BatchSum, ErrorFunctionImpl, FunctionWrapper};


/// Objective function for supervised learning.
///
/// An `ErrorFunction` maps a parameter vector of a model
/// to the average loss of the model predictions on a labeled dataset.
/// Optimizers minimize it to fit the model to the data.
///
/// The input, label and output types are inferred from the dataset,
/// the model and the loss given to the constructor.
/// A model whose output type differs from the one of the loss
/// does not compile.
///
/// # Minibatches
/// With minibatches enabled,
/// each evaluation visits a single batch drawn uniformly at random.
/// The error is normalized by the size of the visited batches,
/// so full-batch and minibatch errors have the same magnitude.
/// A random source has to be bound by [`ErrorFunction::init`] or
/// [`ErrorFunction::set_rng`] before the first evaluation.
/// Clones share the random source of the original
/// until one of them binds a new one.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use minifit::prelude::*;
/// # fn fit<M, L>(inputs: Vec<Vec<f64>>, labels: Vec<Vec<f64>>, model: M, loss: L)
/// #     -> minifit::Result<()>
/// #     where M: Model<Input = Vec<f64>> + Clone + Send + Sync + 'static,
/// #           L: Loss<Label = Vec<f64>, Output = M::Output>
/// #               + Clone + Send + Sync + 'static,
/// # {
/// let data = LabeledData::new(inputs, labels, 32)?;
/// let mut error = ErrorFunction::new(data, model, loss, false)?;
/// error.set_regularizer(
///     1e-3,
///     Arc::new(TwoNormRegularizer::new(error.number_of_variables())),
/// )?;
///
/// let point = error.propose_starting_point();
/// let mut derivative = Vec::new();
/// let value = error.eval_derivative(&point, &mut derivative)?;
/// # Ok(())
/// # }
/// ```
pub struct ErrorFunction {
    wrapper: Box<dyn FunctionWrapper>,
    selection: BatchSelection,
    regularizer: Option<Arc<dyn ObjectiveFunction>>,
    regularization_strength: f64,
}


impl ErrorFunction {
    /// Construct a new error function over `dataset`.
    /// If `use_minibatch` is `true`, every evaluation visits
    /// a single random batch instead of the whole dataset.
    pub fn new<I, Y, M, L>(
        dataset: impl Into<Arc<LabeledData<I, Y>>>,
        model: M,
        loss: L,
        use_minibatch: bool,
    ) -> Result<Self>
        where I: Send + Sync + 'static,
              Y: Send + Sync + 'static,
              M: Model<Input = I> + Clone + Send + Sync + 'static,
              L: Loss<Label = Y, Output = M::Output>
                  + Clone + Send + Sync + 'static,
    {
        let selection = if use_minibatch {
            BatchSelection::minibatch()
        } else {
            BatchSelection::FullBatch
        };
        Self::from_parts(
            dataset.into(), model, loss, selection, DEFAULT_PARALLEL
        )
    }


    /// Construct a new error function over a weighted dataset.
    /// The weight of an example scales its contribution
    /// to the error and to the gradient.
    /// Weighted error functions always visit the whole dataset.
    pub fn weighted<I, Y, M, L>(
        dataset: impl Into<Arc<WeightedLabeledData<I, Y>>>,
        model: M,
        loss: L,
    ) -> Result<Self>
        where I: Send + Sync + 'static,
              Y: Send + Sync + 'static,
              M: Model<Input = I> + Clone + Send + Sync + 'static,
              L: Loss<Label = Y, Output = M::Output>
                  + Clone + Send + Sync + 'static,
    {
        let dataset = dataset.into();
        let total = dataset.total_weight();
        if !dataset.is_empty() && total <= 0f64 {
            let reason = "the total example weight must be positive";
            return Err(FitError::InvalidWeight { weight: total, reason });
        }
        Self::from_parts(
            dataset, model, loss, BatchSelection::FullBatch, DEFAULT_PARALLEL
        )
    }


    /// Construct a new error function from its parts.
    /// This is the constructor behind `new`, `weighted`
    /// and [`ErrorFunctionBuilder`](super::ErrorFunctionBuilder).
    pub(crate) fn from_parts<D, M, L>(
        dataset: Arc<D>,
        model: M,
        loss: L,
        selection: BatchSelection,
        parallel: bool,
    ) -> Result<Self>
        where D: Dataset + 'static,
              M: Model<Input = D::Input> + Clone + Send + Sync + 'static,
              L: Loss<Label = D::Label, Output = M::Output>
                  + Clone + Send + Sync + 'static,
    {
        if dataset.number_of_elements() == 0 {
            return Err(FitError::EmptyDataset);
        }

        // The declared parameter count must agree with
        // the vector `set_parameter_vector` expects.
        let n_variables = model.number_of_parameters();
        let parameters = model.parameter_vector();
        checker::parameter_length(n_variables, &parameters[..])?;

        debug!(
            "ErrorFunction: model `{}`, loss `{}`, {} variables, \
             {} examples in {} batches, {}",
            model.name(),
            loss.name(),
            n_variables,
            dataset.number_of_elements(),
            dataset.number_of_batches(),
            selection,
        );

        let wrapper = ErrorFunctionImpl::new(dataset, model, loss, parallel);
        Ok(Self {
            wrapper: Box::new(wrapper),
            selection,
            regularizer: None,
            regularization_strength: 0f64,
        })
    }


    /// Adds `factor * regularizer(point)` to the error
    /// and `factor * grad regularizer(point)` to the derivative.
    ///
    /// Any real `factor` is accepted,
    /// but a factor `<= 0` disables the regularization term.
    /// Fails if the regularizer is defined on a different
    /// number of variables.
    pub fn set_regularizer(
        &mut self,
        factor: f64,
        regularizer: Arc<dyn ObjectiveFunction>,
    ) -> Result<()>
    {
        let expected = self.number_of_variables();
        let got = regularizer.number_of_variables();
        if expected != got {
            return Err(FitError::ParameterLength { expected, got });
        }

        if factor <= 0f64 {
            warn!(
                "regularization factor {factor} <= 0. \
                 `{}` is ignored",
                regularizer.name()
            );
        }
        debug!("regularizer `{}` with factor {factor}", regularizer.name());

        self.regularizer = Some(regularizer);
        self.regularization_strength = factor;
        Ok(())
    }


    /// Removes the regularizer.
    pub fn clear_regularizer(&mut self) {
        self.regularizer = None;
        self.regularization_strength = 0f64;
    }


    /// Returns the regularization factor.
    pub fn regularization_strength(&self) -> f64 {
        self.regularization_strength
    }


    /// Binds a random source seeded from the operating system.
    /// Only minibatch evaluation draws from it.
    pub fn init(&mut self) {
        self.set_rng(StdRng::from_entropy());
    }


    /// Binds `rng` as the random source of minibatch sampling.
    pub fn set_rng(&mut self, rng: StdRng) {
        self.selection.bind_rng(rng);
    }


    /// Returns `true` if each evaluation visits a single random batch.
    pub fn uses_minibatches(&self) -> bool {
        self.selection.is_minibatch()
    }


    /// Returns the number of variables,
    /// that is, the number of parameters of the model.
    pub fn number_of_variables(&self) -> usize {
        self.wrapper.number_of_variables()
    }


    /// Returns the current parameters of the model.
    pub fn propose_starting_point(&self) -> Vec<f64> {
        self.wrapper.propose_starting_point()
    }


    /// Returns `true` if the model, the loss and the active regularizer
    /// are differentiable, so that `eval_derivative` succeeds.
    pub fn has_first_derivative(&self) -> bool {
        self.wrapper.has_first_derivative()
            && self.active_regularizer()
                .map_or(true, |r| r.has_first_derivative())
    }


    /// Evaluates the error at `point`.
    pub fn eval(&self, point: &[f64]) -> Result<f64> {
        checker::parameter_length(self.number_of_variables(), point)?;

        let batches = self.select_batches()?;
        let BatchSum { error, mass, .. } = self.wrapper.eval(point, &batches)?;

        let mut error = error / mass;
        if let Some(regularizer) = self.active_regularizer() {
            error += self.regularization_strength * regularizer.eval(point)?;
        }
        Ok(error)
    }


    /// Evaluates the error at `point` and writes its gradient
    /// into `derivative`.
    /// `derivative` is resized to `number_of_variables()`.
    /// Returns the same value as `eval`.
    pub fn eval_derivative(&self, point: &[f64], derivative: &mut Vec<f64>)
        -> Result<f64>
    {
        checker::parameter_length(self.number_of_variables(), point)?;
        if !self.wrapper.has_first_derivative() {
            let name = format!(
                "{} with {}",
                self.wrapper.model_name(),
                self.wrapper.loss_name(),
            );
            return Err(FitError::DerivativeUnavailable(name));
        }

        let batches = self.select_batches()?;
        let BatchSum { error, mut gradient, mass }
            = self.wrapper.eval_derivative(point, &batches)?;

        let mut error = error / mass;
        utils::scale(1f64 / mass, &mut gradient[..]);

        if let Some(regularizer) = self.active_regularizer() {
            let factor = self.regularization_strength;
            let mut reg_gradient = Vec::with_capacity(gradient.len());
            error += factor * regularizer.eval_derivative(
                point, &mut reg_gradient
            )?;
            checker::same_length(
                "regularizer gradient", gradient.len(), reg_gradient.len()
            )?;
            utils::axpy(factor, &reg_gradient[..], &mut gradient[..]);
        }

        *derivative = gradient;
        Ok(error)
    }


    /// Prints the settings of this error function.
    pub fn stats(&self) {
        let info = ObjectiveFunction::info(self).unwrap_or_default();
        utils::print_stats("Objective", self.name(), &info[..]);
    }


    fn select_batches(&self) -> Result<Vec<usize>> {
        let batches = self.selection.select(self.wrapper.number_of_batches())?;
        trace!("ErrorFunction: evaluating batches {batches:?}");
        Ok(batches)
    }


    fn active_regularizer(&self) -> Option<&dyn ObjectiveFunction> {
        if self.regularization_strength <= 0f64 {
            return None;
        }
        self.regularizer.as_deref()
    }
}


impl Clone for ErrorFunction {
    fn clone(&self) -> Self {
        Self {
            wrapper: self.wrapper.clone_box(),
            selection: self.selection.clone(),
            regularizer: self.regularizer.clone(),
            regularization_strength: self.regularization_strength,
        }
    }
}


impl fmt::Debug for ErrorFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let regularizer = self.regularizer.as_ref().map(|r| r.name());
        f.debug_struct("ErrorFunction")
            .field("model", &self.wrapper.model_name())
            .field("loss", &self.wrapper.loss_name())
            .field("n_variables", &self.number_of_variables())
            .field("selection", &self.selection)
            .field("regularizer", &regularizer)
            .field("regularization_strength", &self.regularization_strength)
            .finish()
    }
}


impl ObjectiveFunction for ErrorFunction {
    fn name(&self) -> &str {
        "ErrorFunction"
    }


    fn number_of_variables(&self) -> usize {
        ErrorFunction::number_of_variables(self)
    }


    fn has_first_derivative(&self) -> bool {
        ErrorFunction::has_first_derivative(self)
    }


    fn propose_starting_point(&self) -> Vec<f64> {
        ErrorFunction::propose_starting_point(self)
    }


    fn eval(&self, point: &[f64]) -> Result<f64> {
        ErrorFunction::eval(self, point)
    }


    fn eval_derivative(&self, point: &[f64], derivative: &mut Vec<f64>)
        -> Result<f64>
    {
        ErrorFunction::eval_derivative(self, point, derivative)
    }


    fn info(&self) -> Option<Vec<(String, String)>> {
        let regularizer = match &self.regularizer {
            Some(r) => format!("{} (x {})", r.name(), self.regularization_strength),
            None => "Nothing".to_string(),
        };
        let info = vec![
            ("Model".to_string(), self.wrapper.model_name().to_string()),
            ("Loss".to_string(), self.wrapper.loss_name().to_string()),
            ("# Variables".to_string(), self.number_of_variables().to_string()),
            ("# Examples".to_string(), self.wrapper.number_of_elements().to_string()),
            ("# Batches".to_string(), self.wrapper.number_of_batches().to_string()),
            ("Weighted".to_string(), self.wrapper.is_weighted().to_string()),
            ("Sampling".to_string(), self.selection.to_string()),
            ("Regularizer".to_string(), regularizer),
        ];
        Some(info)
    }
}

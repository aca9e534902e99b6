use std::sync::Arc;

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::constants::DEFAULT_PARALLEL;
use crate::dataset::LabeledData;
use crate::error::Result;
use crate::loss::Loss;
use crate::model::Model;

use super::{BatchSelection, ErrorFunction, ObjectiveFunction};


/// `ErrorFunctionBuilder` is a struct to construct [`ErrorFunction`].
/// You need to specify the followings:
///
/// - Training examples,
/// - Model, and
/// - Loss function.
///
/// The remaining settings have defaults:
/// full-batch evaluation, parallel batches, no regularizer,
/// and no random source.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use minifit::prelude::*;
/// # fn build<M, L>(data: LabeledData<Vec<f64>, Vec<f64>>, model: M, loss: L)
/// #     -> minifit::Result<()>
/// #     where M: Model<Input = Vec<f64>> + Clone + Send + Sync + 'static,
/// #           L: Loss<Label = Vec<f64>, Output = M::Output>
/// #               + Clone + Send + Sync + 'static,
/// # {
/// let n_variables = model.number_of_parameters();
/// let error = ErrorFunctionBuilder::new(data, model, loss)
///     .minibatch(true)
///     .seed(1234)
///     .regularizer(0.01, Arc::new(TwoNormRegularizer::new(n_variables)))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ErrorFunctionBuilder<I, Y, M, L> {
    dataset: Arc<LabeledData<I, Y>>,
    model: M,
    loss: L,
    minibatch: bool,
    parallel: bool,
    rng: Option<StdRng>,
    regularizer: Option<(f64, Arc<dyn ObjectiveFunction>)>,
}


impl<I, Y, M, L> ErrorFunctionBuilder<I, Y, M, L>
    where I: Send + Sync + 'static,
          Y: Send + Sync + 'static,
          M: Model<Input = I> + Clone + Send + Sync + 'static,
          L: Loss<Label = Y, Output = M::Output>
              + Clone + Send + Sync + 'static,
{
    /// Construct a new instance of `ErrorFunctionBuilder`.
    pub fn new(
        dataset: impl Into<Arc<LabeledData<I, Y>>>,
        model: M,
        loss: L,
    ) -> Self
    {
        Self {
            dataset: dataset.into(),
            model,
            loss,
            minibatch: false,
            parallel: DEFAULT_PARALLEL,
            rng: None,
            regularizer: None,
        }
    }


    /// Visit a single random batch per evaluation.
    /// Default is `false`.
    pub fn minibatch(mut self, minibatch: bool) -> Self {
        self.minibatch = minibatch;
        self
    }


    /// Evaluate the batches in parallel.
    /// The result does not depend on this setting.
    /// Default is `true`.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }


    /// Bind a random source seeded with `seed`.
    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = Some(StdRng::seed_from_u64(seed));
        self
    }


    /// Bind `rng` as the random source.
    pub fn rng(mut self, rng: StdRng) -> Self {
        self.rng = Some(rng);
        self
    }


    /// Set the regularizer and its factor.
    /// See [`ErrorFunction::set_regularizer`].
    pub fn regularizer(
        mut self,
        factor: f64,
        regularizer: Arc<dyn ObjectiveFunction>,
    ) -> Self
    {
        self.regularizer = Some((factor, regularizer));
        self
    }


    /// Build the [`ErrorFunction`].
    pub fn build(self) -> Result<ErrorFunction> {
        let selection = if self.minibatch {
            BatchSelection::minibatch()
        } else {
            BatchSelection::FullBatch
        };

        let mut error = ErrorFunction::from_parts(
            self.dataset, self.model, self.loss, selection, self.parallel,
        )?;

        if let Some(rng) = self.rng {
            error.set_rng(rng);
        }
        if let Some((factor, regularizer)) = self.regularizer {
            error.set_regularizer(factor, regularizer)?;
        }
        Ok(error)
    }
}

#![warn(missing_docs)]

//!
//! A crate that provides the error functions used to fit
//! the parameters of a model to labeled data,
//! and ensembles that combine several models into one prediction.
//!
//! This crate includes two components.
//!
//! - [`ErrorFunction`]
//!     Given a labeled dataset, a model and a loss,
//!     an `ErrorFunction` maps a parameter vector to the average loss
//!     of the model on the dataset and, if both the model and the loss
//!     are differentiable, to its gradient.
//!     Optimizers (gradient descent, quasi-Newton methods,
//!     evolution strategies) only see this map.
//!     Evaluation visits either the whole dataset
//!     or one random batch (minibatch learning),
//!     and may add a regularization term.
//!
//! - [`MeanModel`]
//!     An ensemble of weighted models.
//!     Continuous outputs are combined by their weighted mean,
//!     class predictions by weighted voting.
//!     A `MeanModel` is itself a [`Model`],
//!     so it can be evaluated by an `ErrorFunction`.
//!
//! Concrete models and losses are not part of this crate.
//! Implement [`Model`] and [`Loss`] for them.

pub mod constants;
pub mod dataset;
pub mod ensemble;
pub mod error;
pub mod loss;
pub mod model;
pub mod objective_function;
pub mod prelude;

mod common;


pub use error::{FitError, Result};

pub use dataset::{
    Batch,
    Dataset,
    LabeledData,
    WeightedLabeledData,
};

pub use model::{Model, Shape};
pub use loss::Loss;

pub use objective_function::{
    BatchSelection,
    ErrorFunction,
    ErrorFunctionBuilder,
    ObjectiveFunction,
    OneNormRegularizer,
    TwoNormRegularizer,
};

pub use ensemble::{
    Aggregate,
    Aggregation,
    MeanModel,
};

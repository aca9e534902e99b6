//! Error type shared by every component of this crate.
use thiserror::Error;


/// Errors reported by the error function and the ensemble models.
///
/// All variants are contract violations:
/// they abort the current operation and leave the receiver untouched.
/// Numerical problems (`NaN`, `inf`) are never reported here,
/// they propagate through the returned values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FitError {
    /// The dataset does not contain a single example.
    #[error("the dataset is empty")]
    EmptyDataset,

    /// Two sequences that must be parallel have different lengths.
    #[error("length mismatch in {what}: expected {expected}, got {got}")]
    LengthMismatch {
        /// What was compared.
        what: &'static str,
        /// The expected length.
        expected: usize,
        /// The actual length.
        got: usize,
    },

    /// The batch size must be positive.
    #[error("batch size must be positive, got {0}")]
    InvalidBatchSize(usize),

    /// A parameter vector of the wrong length was supplied.
    #[error("parameter vector has length {got}, expected {expected}")]
    ParameterLength {
        /// The declared number of parameters.
        expected: usize,
        /// The length of the supplied vector.
        got: usize,
    },

    /// A weight violates its domain.
    #[error("invalid weight {weight}: {reason}")]
    InvalidWeight {
        /// The rejected weight.
        weight: f64,
        /// Which rule was violated.
        reason: &'static str,
    },

    /// An index does not refer to an existing element.
    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of elements.
        len: usize,
    },

    /// The model or the loss cannot provide a first derivative.
    #[error("`{0}` does not provide a first derivative")]
    DerivativeUnavailable(String),

    /// Minibatch sampling was requested before a random source was bound.
    #[error(
        "no random number generator is bound. \
         call `ErrorFunction::init` or `ErrorFunction::set_rng` first"
    )]
    RngNotInitialized,

    /// A sub-model output has a different size than the ensemble output.
    #[error("output dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// The output size of the ensemble.
        expected: usize,
        /// The output size produced by the sub-model.
        got: usize,
    },

    /// A sub-model voted for a class outside of the output range.
    #[error("class index {class} is out of range for {n_classes} classes")]
    ClassOutOfRange {
        /// The predicted class index.
        class: usize,
        /// The output size of the ensemble.
        n_classes: usize,
    },

    /// A stored weight sum disagrees with the weights it should total.
    #[error("stored weight sum {stored} does not match the weights ({computed})")]
    InconsistentWeightSum {
        /// The stored sum.
        stored: f64,
        /// The sum of the weights.
        computed: f64,
    },

    /// An ensemble without sub-models cannot be evaluated.
    #[error("the ensemble has no sub-models")]
    EmptyEnsemble,

    /// The ensemble output size is unset and cannot be inferred.
    #[error(
        "the output size is unknown. \
         call `MeanModel::set_output_size` before evaluation"
    )]
    UnknownOutputSize,
}


/// Result type of this crate.
pub type Result<T> = std::result::Result<T, FitError>;

//! Labeled datasets split into batches.
//!
//! The error function only talks to datasets through the [`Dataset`] trait:
//! an ordered partition into batches, the number of elements,
//! and per-batch access to inputs, labels and (optional) weights.

// Provides the unweighted dataset.
pub(crate) mod labeled_data;
// Provides the dataset with a weight per example.
pub(crate) mod weighted_data;

pub use labeled_data::{Batch, LabeledData};
pub use weighted_data::WeightedLabeledData;


/// A read-only view of a labeled dataset partitioned into batches.
///
/// Implementors must not change while an error function holds them.
pub trait Dataset: Send + Sync {
    /// The type of an input point.
    type Input;
    /// The type of a label.
    type Label;

    /// Returns the number of batches.
    fn number_of_batches(&self) -> usize;

    /// Returns the number of (input, label) pairs.
    fn number_of_elements(&self) -> usize;

    /// Returns the inputs of the `i`-th batch.
    fn batch_inputs(&self, i: usize) -> &[Self::Input];

    /// Returns the labels of the `i`-th batch.
    fn batch_labels(&self, i: usize) -> &[Self::Label];

    /// Returns the example weights of the `i`-th batch, if any.
    fn batch_weights(&self, _i: usize) -> Option<&[f64]> {
        None
    }

    /// Returns the mass of the `i`-th batch,
    /// that is, the sum of its example weights
    /// or the number of its examples for unweighted data.
    fn batch_mass(&self, i: usize) -> f64 {
        match self.batch_weights(i) {
            Some(weights) => weights.iter().sum::<f64>(),
            None => self.batch_labels(i).len() as f64,
        }
    }

    /// Returns the mass of the whole dataset.
    fn total_mass(&self) -> f64 {
        (0..self.number_of_batches())
            .map(|i| self.batch_mass(i))
            .sum::<f64>()
    }
}

use serde::{Serialize, Deserialize};

use crate::common::checker;
use crate::error::Result;
use super::{Dataset, LabeledData};


/// A [`LabeledData`] with one non-negative weight per example.
/// The weights follow the batch partition of the underlying data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedLabeledData<I, L> {
    data: LabeledData<I, L>,
    weights: Vec<Vec<f64>>,
}


impl<I, L> WeightedLabeledData<I, L> {
    /// Attach `weights` to `data`.
    /// `weights[k]` is the weight of the `k`-th element of `data`.
    pub fn new(data: LabeledData<I, L>, weights: Vec<f64>) -> Result<Self> {
        let n_elements = data.number_of_elements();
        checker::same_length("example weights", n_elements, weights.len())?;
        checker::example_weights(&weights[..])?;

        let mut weights = weights.into_iter();
        let weights = data.batches()
            .iter()
            .map(|batch| weights.by_ref().take(batch.len()).collect())
            .collect::<Vec<Vec<f64>>>();

        Ok(Self { data, weights })
    }


    /// Attach the weight `1` to every element of `data`.
    pub fn uniform(data: LabeledData<I, L>) -> Self {
        let weights = data.batches()
            .iter()
            .map(|batch| vec![1f64; batch.len()])
            .collect();
        Self { data, weights }
    }


    /// Returns the underlying labeled data.
    #[inline(always)]
    pub fn data(&self) -> &LabeledData<I, L> {
        &self.data
    }


    /// Returns the weights of the `i`-th batch.
    #[inline(always)]
    pub fn weights(&self, i: usize) -> &[f64] {
        &self.weights[i][..]
    }


    /// Returns the sum of all example weights.
    pub fn total_weight(&self) -> f64 {
        self.weights.iter()
            .flatten()
            .sum::<f64>()
    }


    /// Returns the number of `(input, label)` pairs.
    #[inline(always)]
    pub fn number_of_elements(&self) -> usize {
        self.data.number_of_elements()
    }


    /// Returns `true` if the dataset has no elements.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}


impl<I, L> Dataset for WeightedLabeledData<I, L>
    where I: Send + Sync,
          L: Send + Sync,
{
    type Input = I;
    type Label = L;

    fn number_of_batches(&self) -> usize {
        self.data.number_of_batches()
    }

    fn number_of_elements(&self) -> usize {
        self.data.number_of_elements()
    }

    fn batch_inputs(&self, i: usize) -> &[I] {
        self.data.batch(i).inputs()
    }

    fn batch_labels(&self, i: usize) -> &[L] {
        self.data.batch(i).labels()
    }

    fn batch_weights(&self, i: usize) -> Option<&[f64]> {
        Some(&self.weights[i][..])
    }
}

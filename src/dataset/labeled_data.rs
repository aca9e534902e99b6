use serde::{Serialize, Deserialize};

use crate::common::checker;
use crate::constants::DEFAULT_BATCH_SIZE;
use crate::error::{FitError, Result};
use super::Dataset;


/// A batch of `(input, label)` pairs, stored as two parallel vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch<I, L> {
    inputs: Vec<I>,
    labels: Vec<L>,
}


impl<I, L> Batch<I, L> {
    /// Construct a new batch.
    /// Fails if `inputs` and `labels` have different lengths.
    pub fn new(inputs: Vec<I>, labels: Vec<L>) -> Result<Self> {
        checker::same_length("batch labels", inputs.len(), labels.len())?;
        Ok(Self { inputs, labels })
    }


    /// Returns the inputs of this batch.
    #[inline(always)]
    pub fn inputs(&self) -> &[I] {
        &self.inputs[..]
    }


    /// Returns the labels of this batch.
    #[inline(always)]
    pub fn labels(&self) -> &[L] {
        &self.labels[..]
    }


    /// Returns the number of examples in this batch.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.labels.len()
    }


    /// Returns `true` if this batch has no examples.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}


/// Struct `LabeledData` holds an ordered sequence of
/// `(input, label)` pairs partitioned into batches.
///
/// The partition is fixed at construction.
/// Every batch has `batch_size` elements except possibly the last one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledData<I, L> {
    batches: Vec<Batch<I, L>>,
    n_elements: usize,
}


impl<I, L> LabeledData<I, L> {
    /// Construct a new dataset from parallel vectors of inputs and labels.
    /// Consecutive runs of `batch_size` elements form a batch.
    pub fn new(inputs: Vec<I>, labels: Vec<L>, batch_size: usize)
        -> Result<Self>
    {
        if batch_size == 0 {
            return Err(FitError::InvalidBatchSize(batch_size));
        }
        checker::same_length("dataset labels", inputs.len(), labels.len())?;

        let n_elements = labels.len();
        let mut batches = Vec::with_capacity(n_elements.div_ceil(batch_size));

        let mut inputs = inputs.into_iter();
        let mut labels = labels.into_iter();
        loop {
            let xs = inputs.by_ref().take(batch_size).collect::<Vec<_>>();
            if xs.is_empty() { break; }
            let ys = labels.by_ref().take(batch_size).collect::<Vec<_>>();
            batches.push(Batch { inputs: xs, labels: ys });
        }

        Ok(Self { batches, n_elements })
    }


    /// Same as `LabeledData::new` with the default batch size.
    pub fn from_elements(inputs: Vec<I>, labels: Vec<L>) -> Result<Self> {
        Self::new(inputs, labels, DEFAULT_BATCH_SIZE)
    }


    /// Construct a new dataset from an explicit partition.
    /// Empty batches are dropped.
    pub fn from_batches(batches: Vec<Batch<I, L>>) -> Self {
        let batches = batches.into_iter()
            .filter(|batch| !batch.is_empty())
            .collect::<Vec<_>>();
        let n_elements = batches.iter()
            .map(|batch| batch.len())
            .sum::<usize>();

        Self { batches, n_elements }
    }


    /// Returns the `i`-th batch.
    #[inline(always)]
    pub fn batch(&self, i: usize) -> &Batch<I, L> {
        &self.batches[i]
    }


    /// Returns the batches.
    #[inline(always)]
    pub fn batches(&self) -> &[Batch<I, L>] {
        &self.batches[..]
    }


    /// Returns the number of batches.
    #[inline(always)]
    pub fn number_of_batches(&self) -> usize {
        self.batches.len()
    }


    /// Returns the number of `(input, label)` pairs.
    #[inline(always)]
    pub fn number_of_elements(&self) -> usize {
        self.n_elements
    }


    /// Returns `true` if the dataset has no elements.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.n_elements == 0
    }


    /// Returns an iterator over all `(input, label)` pairs in order.
    pub fn elements(&self) -> impl Iterator<Item = (&I, &L)> + '_ {
        self.batches.iter()
            .flat_map(|batch| batch.inputs.iter().zip(&batch.labels))
    }
}


impl<I, L> Dataset for LabeledData<I, L>
    where I: Send + Sync,
          L: Send + Sync,
{
    type Input = I;
    type Label = L;

    fn number_of_batches(&self) -> usize {
        self.batches.len()
    }

    fn number_of_elements(&self) -> usize {
        self.n_elements
    }

    fn batch_inputs(&self, i: usize) -> &[I] {
        self.batches[i].inputs()
    }

    fn batch_labels(&self, i: usize) -> &[L] {
        self.batches[i].labels()
    }
}

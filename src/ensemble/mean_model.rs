use log::debug;
use rayon::prelude::*;
use serde::{Serialize, Deserialize};

use crate::common::{checker, utils};
use crate::constants::{DEFAULT_MODEL_WEIGHT, WEIGHT_SUM_TOLERANCE};
use crate::error::{FitError, Result};
use crate::model::{Model, Shape};

use super::{Aggregate, Aggregation};


/// Calculates the weighted mean of a set of models.
///
/// Each member `h_i` carries a positive weight `w_i`.
/// For continuous outputs the prediction is
/// ```txt
/// f(x) = sum_i ( w_i * h_i(x) ) / sum_i w_i,
/// ```
/// for class indices the `k`-th entry of the prediction is
/// the share of the weight voting for class `k`.
/// The rule is fixed by the output type of the members,
/// see [`Aggregate`].
///
/// A `MeanModel` has no parameters of its own.
/// You can read/write this struct by `Serde` trait.
/// Deserialization rejects weights that `add_model` would reject,
/// a weight list that does not match the members,
/// and a weight sum that does not match the weights.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(try_from = "RawMeanModel<M>")]
pub struct MeanModel<M> {
    /// Set of members.
    models: Vec<M>,
    /// Weights on each member in `self.models`.
    weights: Vec<f64>,
    /// Total sum of `self.weights`.
    weight_sum: f64,
    /// Output dimensionality, `0` if unset.
    output_dim: usize,
}


/// The serialized form of `MeanModel`, checked before use.
#[derive(Deserialize)]
struct RawMeanModel<M> {
    models: Vec<M>,
    weights: Vec<f64>,
    weight_sum: f64,
    output_dim: usize,
}


impl<M> TryFrom<RawMeanModel<M>> for MeanModel<M> {
    type Error = FitError;

    fn try_from(raw: RawMeanModel<M>) -> Result<Self> {
        let RawMeanModel { models, weights, weight_sum, output_dim } = raw;

        checker::same_length("ensemble weights", models.len(), weights.len())?;
        weights.iter()
            .try_for_each(|&w| checker::model_weight(w))?;

        let computed = weights.iter().sum::<f64>();
        let tolerance = WEIGHT_SUM_TOLERANCE * computed.max(1f64);
        let consistent = (weight_sum - computed).abs() <= tolerance;
        if !consistent {
            return Err(FitError::InconsistentWeightSum {
                stored: weight_sum, computed,
            });
        }

        Ok(Self { models, weights, weight_sum, output_dim })
    }
}


impl<M> Default for MeanModel<M> {
    fn default() -> Self {
        Self {
            models: Vec::new(),
            weights: Vec::new(),
            weight_sum: 0f64,
            output_dim: 0,
        }
    }
}


impl<M> MeanModel<M> {
    /// Construct an empty ensemble.
    pub fn new() -> Self {
        Self::default()
    }


    /// Adds a new member to the ensemble.
    /// Fails if `weight` is not a finite positive number,
    /// in which case the ensemble is left unchanged.
    pub fn add_model(&mut self, model: M, weight: f64) -> Result<()> {
        checker::model_weight(weight)?;

        self.models.push(model);
        self.weights.push(weight);
        self.weight_sum += weight;
        debug!(
            "MeanModel: added member #{} with weight {weight}",
            self.models.len()
        );
        Ok(())
    }


    /// Adds a new member with the default weight `1`.
    pub fn push_model(&mut self, model: M) {
        self.models.push(model);
        self.weights.push(DEFAULT_MODEL_WEIGHT);
        self.weight_sum += DEFAULT_MODEL_WEIGHT;
        debug!(
            "MeanModel: added member #{} with weight {DEFAULT_MODEL_WEIGHT}",
            self.models.len()
        );
    }


    /// Sets the weight of the `i`-th member.
    /// The same rule as in `add_model` applies to `weight`.
    pub fn set_weight(&mut self, i: usize, weight: f64) -> Result<()> {
        checker::index(i, self.weights.len())?;
        checker::model_weight(weight)?;

        self.weight_sum += weight - self.weights[i];
        self.weights[i] = weight;
        debug!("MeanModel: member #{} now has weight {weight}", i + 1);
        Ok(())
    }


    /// Removes the `i`-th member and returns it with its weight.
    pub fn remove_model(&mut self, i: usize) -> Result<(M, f64)> {
        checker::index(i, self.models.len())?;

        let model = self.models.remove(i);
        let weight = self.weights.remove(i);
        self.weight_sum = if self.models.is_empty() {
            0f64
        } else {
            self.weight_sum - weight
        };
        debug!("MeanModel: removed member #{} with weight {weight}", i + 1);
        Ok((model, weight))
    }


    /// Removes all members from the ensemble.
    pub fn clear_models(&mut self) {
        debug!("MeanModel: removed all {} members", self.models.len());
        self.models.clear();
        self.weights.clear();
        self.weight_sum = 0f64;
    }


    /// Sets the dimensionality of the output.
    pub fn set_output_size(&mut self, dim: usize) {
        self.output_dim = dim;
    }


    /// Returns the dimensionality of the output, `0` if unset.
    pub fn output_size(&self) -> usize {
        self.output_dim
    }


    /// Returns the number of members.
    pub fn number_of_models(&self) -> usize {
        self.models.len()
    }


    /// Returns the `i`-th member.
    pub fn get_model(&self, i: usize) -> Option<&M> {
        self.models.get(i)
    }


    /// Returns the weight of the `i`-th member.
    pub fn weight(&self, i: usize) -> Option<f64> {
        self.weights.get(i).copied()
    }


    /// Returns the members.
    pub fn models(&self) -> &[M] {
        &self.models[..]
    }


    /// Returns the weights of the members.
    pub fn weights(&self) -> &[f64] {
        &self.weights[..]
    }


    /// Returns the sum of the weights.
    pub fn weight_sum(&self) -> f64 {
        self.weight_sum
    }


    /// Decompose the ensemble
    /// into the two vectors `Vec<f64>` and `Vec<M>`
    pub fn decompose(self) -> (Vec<f64>, Vec<M>) {
        (self.weights, self.models)
    }
}


impl<M> MeanModel<M>
    where M: Model,
          M::Output: Aggregate,
{
    /// Returns the aggregation rule of this ensemble.
    pub fn aggregation(&self) -> Aggregation {
        <M::Output as Aggregate>::AGGREGATION
    }


    /// Returns the output size used for evaluation.
    /// If none was set, the output shape of the first member is used.
    fn effective_output_size(&self) -> Result<usize> {
        if self.output_dim > 0 {
            return Ok(self.output_dim);
        }
        let dim = self.models.first()
            .map(|h| h.output_shape().num_elements())
            .unwrap_or(0);
        if dim == 0 {
            return Err(FitError::UnknownOutputSize);
        }
        Ok(dim)
    }


    /// Prints the members and their weights.
    pub fn stats(&self) {
        let mut info = vec![
            ("Aggregation".to_string(), self.aggregation().to_string()),
            ("# Models".to_string(), self.models.len().to_string()),
            ("Output size".to_string(), self.output_dim.to_string()),
            ("Weight sum".to_string(), format!("{:.6}", self.weight_sum)),
        ];
        info.extend(
            self.models.iter()
                .zip(&self.weights)
                .enumerate()
                .map(|(i, (h, w))| {
                    (format!("[{: >3}] {}", i + 1, h.name()), format!("{w:.6}"))
                })
        );
        utils::print_stats("Model", "MeanModel", &info[..]);
    }
}


impl<M> Model for MeanModel<M>
    where M: Model + Sync,
          M::Input: Sync,
          M::Output: Aggregate + Send,
{
    type Input = M::Input;
    type Output = Vec<f64>;
    type State = ();


    fn name(&self) -> &str {
        "MeanModel"
    }


    fn input_shape(&self) -> Shape {
        self.models.first()
            .map(|h| h.input_shape())
            .unwrap_or_default()
    }


    fn output_shape(&self) -> Shape {
        match self.effective_output_size() {
            Ok(dim) => Shape::vector(dim),
            Err(_) => Shape::default(),
        }
    }


    /// This model does not have any parameters.
    fn parameter_vector(&self) -> Vec<f64> {
        Vec::new()
    }


    /// This model does not have any parameters.
    fn set_parameter_vector(&mut self, parameters: &[f64]) -> Result<()> {
        checker::parameter_length(0, parameters)
    }


    fn number_of_parameters(&self) -> usize {
        0
    }


    fn eval_with(
        &self,
        parameters: &[f64],
        inputs: &[Self::Input],
        _state: &mut Self::State,
    ) -> Result<Vec<Vec<f64>>>
    {
        checker::parameter_length(0, parameters)?;
        if self.models.is_empty() {
            return Err(FitError::EmptyEnsemble);
        }
        let dim = self.effective_output_size()?;

        let responses = self.models.par_iter()
            .map(|h| h.eval(inputs))
            .collect::<Result<Vec<_>>>()?;

        let mut outputs = vec![vec![0f64; dim]; inputs.len()];
        for (&w, response) in self.weights.iter().zip(responses) {
            checker::same_length(
                "member outputs", inputs.len(), response.len()
            )?;
            outputs.iter_mut()
                .zip(&response)
                .try_for_each(|(row, out)| out.accumulate(w, &mut row[..]))?;
        }

        outputs.iter_mut()
            .flatten()
            .for_each(|o| { *o /= self.weight_sum; });
        Ok(outputs)
    }
}

//! Models, losses and datasets shared by the integration tests.
#![allow(dead_code)]

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use serde::{Serialize, Deserialize};

use minifit::prelude::*;


/// `f(x) = W x + b` with `W` stored row-major, followed by `b`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    n_in: usize,
    n_out: usize,
    parameters: Vec<f64>,
}


impl LinearModel {
    pub fn new(n_in: usize, n_out: usize) -> Self {
        let parameters = vec![0f64; n_in * n_out + n_out];
        Self { n_in, n_out, parameters }
    }


    pub fn with_parameters(n_in: usize, n_out: usize, parameters: Vec<f64>)
        -> Self
    {
        assert_eq!(parameters.len(), n_in * n_out + n_out);
        Self { n_in, n_out, parameters }
    }


    fn predict(&self, parameters: &[f64], x: &[f64]) -> Vec<f64> {
        let bias = &parameters[self.n_in * self.n_out..];
        (0..self.n_out).map(|j| {
                let row = &parameters[j * self.n_in..(j + 1) * self.n_in];
                row.iter()
                    .zip(x)
                    .map(|(w, xi)| w * xi)
                    .sum::<f64>()
                    + bias[j]
            })
            .collect()
    }
}


impl Model for LinearModel {
    type Input = Vec<f64>;
    type Output = Vec<f64>;
    type State = ();

    fn name(&self) -> &str {
        "LinearModel"
    }

    fn input_shape(&self) -> Shape {
        Shape::vector(self.n_in)
    }

    fn output_shape(&self) -> Shape {
        Shape::vector(self.n_out)
    }

    fn parameter_vector(&self) -> Vec<f64> {
        self.parameters.clone()
    }

    fn set_parameter_vector(&mut self, parameters: &[f64]) -> Result<()> {
        if parameters.len() != self.parameters.len() {
            return Err(FitError::ParameterLength {
                expected: self.parameters.len(),
                got: parameters.len(),
            });
        }
        self.parameters = parameters.to_vec();
        Ok(())
    }

    fn eval_with(
        &self,
        parameters: &[f64],
        inputs: &[Vec<f64>],
        _state: &mut (),
    ) -> Result<Vec<Vec<f64>>>
    {
        if parameters.len() != self.parameters.len() {
            return Err(FitError::ParameterLength {
                expected: self.parameters.len(),
                got: parameters.len(),
            });
        }
        Ok(inputs.iter().map(|x| self.predict(parameters, x)).collect())
    }

    fn has_first_parameter_derivative(&self) -> bool {
        true
    }

    fn weighted_parameter_derivative(
        &self,
        _parameters: &[f64],
        inputs: &[Vec<f64>],
        _state: &(),
        coefficients: &[Vec<f64>],
        gradient: &mut [f64],
    ) -> Result<()>
    {
        let offset = self.n_in * self.n_out;
        for (x, c) in inputs.iter().zip(coefficients) {
            for j in 0..self.n_out {
                for k in 0..self.n_in {
                    gradient[j * self.n_in + k] += c[j] * x[k];
                }
                gradient[offset + j] += c[j];
            }
        }
        Ok(())
    }
}


/// A model without parameters that always returns `value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstantModel {
    pub value: Vec<f64>,
}


impl Model for ConstantModel {
    type Input = Vec<f64>;
    type Output = Vec<f64>;
    type State = ();

    fn name(&self) -> &str {
        "ConstantModel"
    }

    fn input_shape(&self) -> Shape {
        Shape::default()
    }

    fn output_shape(&self) -> Shape {
        Shape::vector(self.value.len())
    }

    fn parameter_vector(&self) -> Vec<f64> {
        Vec::new()
    }

    fn set_parameter_vector(&mut self, parameters: &[f64]) -> Result<()> {
        if !parameters.is_empty() {
            return Err(FitError::ParameterLength {
                expected: 0, got: parameters.len(),
            });
        }
        Ok(())
    }

    fn eval_with(
        &self,
        _parameters: &[f64],
        inputs: &[Vec<f64>],
        _state: &mut (),
    ) -> Result<Vec<Vec<f64>>>
    {
        Ok(vec![self.value.clone(); inputs.len()])
    }
}


/// Predicts class `1` if `x[feature] >= threshold`, class `0` otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdClassifier {
    pub feature: usize,
    pub threshold: f64,
}


impl Model for ThresholdClassifier {
    type Input = Vec<f64>;
    type Output = usize;
    type State = ();

    fn name(&self) -> &str {
        "ThresholdClassifier"
    }

    fn input_shape(&self) -> Shape {
        Shape::default()
    }

    fn output_shape(&self) -> Shape {
        Shape::vector(2)
    }

    fn parameter_vector(&self) -> Vec<f64> {
        Vec::new()
    }

    fn set_parameter_vector(&mut self, parameters: &[f64]) -> Result<()> {
        if !parameters.is_empty() {
            return Err(FitError::ParameterLength {
                expected: 0, got: parameters.len(),
            });
        }
        Ok(())
    }

    fn eval_with(
        &self,
        _parameters: &[f64],
        inputs: &[Vec<f64>],
        _state: &mut (),
    ) -> Result<Vec<usize>>
    {
        let classes = inputs.iter()
            .map(|x| if x[self.feature] >= self.threshold { 1 } else { 0 })
            .collect();
        Ok(classes)
    }
}


/// A classifier that always predicts `class`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstantClassifier {
    pub class: usize,
    pub n_classes: usize,
}


impl Model for ConstantClassifier {
    type Input = Vec<f64>;
    type Output = usize;
    type State = ();

    fn name(&self) -> &str {
        "ConstantClassifier"
    }

    fn input_shape(&self) -> Shape {
        Shape::default()
    }

    fn output_shape(&self) -> Shape {
        Shape::vector(self.n_classes)
    }

    fn parameter_vector(&self) -> Vec<f64> {
        Vec::new()
    }

    fn set_parameter_vector(&mut self, parameters: &[f64]) -> Result<()> {
        if !parameters.is_empty() {
            return Err(FitError::ParameterLength {
                expected: 0, got: parameters.len(),
            });
        }
        Ok(())
    }

    fn eval_with(
        &self,
        _parameters: &[f64],
        inputs: &[Vec<f64>],
        _state: &mut (),
    ) -> Result<Vec<usize>>
    {
        Ok(vec![self.class; inputs.len()])
    }
}


/// `||o - y||^2`.
#[derive(Debug, Clone, Copy)]
pub struct SquaredLoss;


impl Loss for SquaredLoss {
    type Label = Vec<f64>;
    type Output = Vec<f64>;

    fn name(&self) -> &str {
        "SquaredLoss"
    }

    fn eval_at_point(&self, label: &Vec<f64>, output: &Vec<f64>) -> f64 {
        label.iter()
            .zip(output)
            .map(|(y, o)| (o - y).powi(2))
            .sum::<f64>()
    }

    fn has_first_derivative(&self) -> bool {
        true
    }

    fn derivative_at_point(&self, label: &Vec<f64>, output: &Vec<f64>)
        -> Result<(f64, Vec<f64>)>
    {
        let value = self.eval_at_point(label, output);
        let gradient = label.iter()
            .zip(output)
            .map(|(y, o)| 2.0 * (o - y))
            .collect();
        Ok((value, gradient))
    }
}


/// `<y, o>`, linear in the output.
#[derive(Debug, Clone, Copy)]
pub struct LinearLoss;


impl Loss for LinearLoss {
    type Label = Vec<f64>;
    type Output = Vec<f64>;

    fn name(&self) -> &str {
        "LinearLoss"
    }

    fn eval_at_point(&self, label: &Vec<f64>, output: &Vec<f64>) -> f64 {
        label.iter()
            .zip(output)
            .map(|(y, o)| y * o)
            .sum::<f64>()
    }

    fn has_first_derivative(&self) -> bool {
        true
    }

    fn derivative_at_point(&self, label: &Vec<f64>, output: &Vec<f64>)
        -> Result<(f64, Vec<f64>)>
    {
        Ok((self.eval_at_point(label, output), label.clone()))
    }
}


/// `1` for a wrong class, `0` otherwise.
#[derive(Debug, Clone, Copy)]
pub struct ZeroOneLoss;


impl Loss for ZeroOneLoss {
    type Label = usize;
    type Output = usize;

    fn name(&self) -> &str {
        "ZeroOneLoss"
    }

    fn eval_at_point(&self, label: &usize, output: &usize) -> f64 {
        if label != output { 1.0 } else { 0.0 }
    }
}


/// Inputs in `R^3` and labels in `R^2` from a noisy linear map.
pub fn linear_examples(n_examples: usize, seed: u64)
    -> (Vec<Vec<f64>>, Vec<Vec<f64>>)
{
    let mut rng = StdRng::seed_from_u64(seed);
    let feature = Normal::new(0.0, 1.0).unwrap();
    let noise = Normal::new(0.0, 0.5).unwrap();

    let inputs = (0..n_examples)
        .map(|_| feature.sample_iter(&mut rng).take(3).collect::<Vec<f64>>())
        .collect::<Vec<_>>();
    let labels = inputs.iter()
        .map(|x| {
            vec![
                1.0 + 2.0 * x[0] - x[1] + noise.sample(&mut rng),
                -0.5 + x[2] + 0.5 * x[0] + noise.sample(&mut rng),
            ]
        })
        .collect::<Vec<_>>();
    (inputs, labels)
}


/// `linear_examples` partitioned into batches of `batch_size`.
pub fn linear_dataset(n_examples: usize, batch_size: usize, seed: u64)
    -> LabeledData<Vec<f64>, Vec<f64>>
{
    let (inputs, labels) = linear_examples(n_examples, seed);
    LabeledData::new(inputs, labels, batch_size).unwrap()
}


/// A point with standard normal entries.
pub fn random_point(n_variables: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let dist = Normal::new(0.0, 1.0).unwrap();
    dist.sample_iter(&mut rng).take(n_variables).collect()
}


/// Central finite differences of `f` at `point`.
pub fn numerical_gradient<F>(f: F, point: &[f64], h: f64) -> Vec<f64>
    where F: Fn(&[f64]) -> f64,
{
    (0..point.len()).map(|i| {
            let mut plus = point.to_vec();
            let mut minus = point.to_vec();
            plus[i] += h;
            minus[i] -= h;
            (f(&plus) - f(&minus)) / (2.0 * h)
        })
        .collect()
}

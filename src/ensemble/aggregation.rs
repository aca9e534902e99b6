use std::fmt;

use serde::{Serialize, Deserialize};

use crate::common::utils;
use crate::error::{FitError, Result};


/// The rule an ensemble uses to combine the outputs of its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aggregation {
    /// Weighted arithmetic mean of continuous outputs.
    Mean,
    /// Weighted vote over predicted class indices.
    Vote,
}


impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mean => "Weighted mean",
            Self::Vote => "Weighted vote",
        };

        write!(f, "{name}")
    }
}


/// Output types an ensemble can combine.
///
/// The aggregation rule is a property of the output type,
/// so a single ensemble only ever uses one rule.
pub trait Aggregate {
    /// The aggregation rule for this output type.
    const AGGREGATION: Aggregation;


    /// Adds the contribution of `self` with `weight`
    /// to the output row `row`.
    fn accumulate(&self, weight: f64, row: &mut [f64]) -> Result<()>;
}


impl Aggregate for Vec<f64> {
    const AGGREGATION: Aggregation = Aggregation::Mean;

    fn accumulate(&self, weight: f64, row: &mut [f64]) -> Result<()> {
        if self.len() != row.len() {
            return Err(FitError::DimensionMismatch {
                expected: row.len(),
                got: self.len(),
            });
        }
        utils::axpy(weight, &self[..], row);
        Ok(())
    }
}


impl Aggregate for f64 {
    const AGGREGATION: Aggregation = Aggregation::Mean;

    fn accumulate(&self, weight: f64, row: &mut [f64]) -> Result<()> {
        if row.len() != 1 {
            return Err(FitError::DimensionMismatch {
                expected: row.len(),
                got: 1,
            });
        }
        row[0] += weight * self;
        Ok(())
    }
}


impl Aggregate for usize {
    const AGGREGATION: Aggregation = Aggregation::Vote;

    fn accumulate(&self, weight: f64, row: &mut [f64]) -> Result<()> {
        let class = *self;
        let n_classes = row.len();
        if class >= n_classes {
            return Err(FitError::ClassOutOfRange { class, n_classes });
        }
        row[class] += weight;
        Ok(())
    }
}

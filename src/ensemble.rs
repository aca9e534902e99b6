//! Ensembles of already trained models.

/// Defines the aggregation rules.
pub mod aggregation;
/// Defines the weighted mean of models.
pub mod mean_model;

pub use aggregation::{Aggregate, Aggregation};
pub use mean_model::MeanModel;

//! Exports the standard objective functions, ensembles and traits.
//!

pub use crate::error::{
    FitError,
    Result,
};


pub use crate::dataset::{
    // Dataset trait
    Dataset,

    LabeledData,
    WeightedLabeledData,
};


pub use crate::model::{
    // Model trait
    Model,
    Shape,
};


pub use crate::loss::Loss;


pub use crate::objective_function::{
    // Objective function trait
    ObjectiveFunction,

    // Error function ---------------------------
    ErrorFunction,
    ErrorFunctionBuilder,


    // Regularizers -----------------------------
    OneNormRegularizer,
    TwoNormRegularizer,
};


pub use crate::ensemble::{
    Aggregate,
    Aggregation,
    MeanModel,
};

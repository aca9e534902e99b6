//! Default settings of the error functions and the ensembles.
/// Batch size used by `LabeledData::from_elements`.
pub const DEFAULT_BATCH_SIZE:    usize = 256;
/// Batches are evaluated in parallel unless told otherwise.
pub const DEFAULT_PARALLEL:       bool = true;
/// Weight given to a sub-model by `MeanModel::push_model`.
pub const DEFAULT_MODEL_WEIGHT:    f64 = 1f64;
/// Relative tolerance between a deserialized weight sum
/// and the sum of the deserialized weights.
pub const WEIGHT_SUM_TOLERANCE:    f64 = 1e-9;

pub(crate) const STAT_WIDTH:     usize = 24;
pub(crate) const FULL_WIDTH:     usize = 56;

//! Defines some common functions used in this library.

/// Defines some checker functions.
pub(crate) mod checker;

/// Defines vector helpers and the stats printer.
pub(crate) mod utils;

//! Risk calculation errors

use thiserror::Error;

/// Errors from the net-debit-cap calculator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NdcComputeError {
    #[error("ABSOLUTE net debit cap requires a fixed value")]
    MissingFixedValue,

    #[error("PERCENTAGE net debit cap requires a percentage")]
    MissingPercentage,
}

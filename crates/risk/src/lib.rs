//! HubAdmin risk - Net debit cap calculation
//!
//! One pure function shared by the NDC-approval path and the settlement
//! reconciliation path, so both derive caps identically.

pub mod error;
pub mod ndc;

pub use error::NdcComputeError;
pub use ndc::compute_net_debit_cap;
